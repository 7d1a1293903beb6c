use super::common::common_fields;
use super::validate::{check_value, FieldIssue, IssueKind};
use super::StepKind;
use crate::core::schema::SchemaDescription as S;
use serde_json::Value;

/// `parallel` runs its nested `steps` concurrently. Nested steps are validated as steps in
/// their own right by the caller.
pub struct ParallelStep {
    schema: S,
}

impl ParallelStep {
    pub fn new() -> Self {
        let schema = common_fields().extend(S::object([
            ("steps", S::map().required()),
            (
                "success_criteria",
                S::object([
                    (
                        "steps",
                        S::object([
                            ("only", S::array(S::string())),
                            ("ignore", S::array(S::string())),
                        ]),
                    ),
                    ("condition", S::map()),
                ]),
            ),
        ]));
        Self { schema }
    }
}

impl Default for ParallelStep {
    fn default() -> Self {
        Self::new()
    }
}

impl StepKind for ParallelStep {
    fn step_type(&self) -> &str {
        "parallel"
    }

    fn schema(&self) -> &S {
        &self.schema
    }

    fn validate_step(&self, step: &Value) -> Vec<FieldIssue> {
        let mut issues = check_value(&self.schema, step);
        let nested = step.get("steps").and_then(Value::as_object);
        if nested.is_some_and(|steps| steps.is_empty()) {
            issues.push(FieldIssue::new(
                IssueKind::InvalidValue,
                "$.steps",
                Some("steps"),
                "parallel step must define at least one nested step",
            ));
        }
        if let (Some(nested), Some(only)) = (
            nested,
            step.pointer("/success_criteria/steps/only")
                .and_then(Value::as_array),
        ) {
            for name in only.iter().filter_map(Value::as_str) {
                if !nested.contains_key(name) {
                    issues.push(FieldIssue::new(
                        IssueKind::InvalidValue,
                        "$.success_criteria.steps.only",
                        Some("only"),
                        format!("success_criteria references unknown nested step '{}'", name),
                    ));
                }
            }
        }
        issues
    }
}
