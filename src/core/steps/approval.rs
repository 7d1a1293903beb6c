use super::common::common_fields;
use super::validate::{check_value, FieldIssue, IssueKind};
use super::StepKind;
use crate::core::schema::SchemaDescription as S;
use serde_json::Value;

const FINAL_STATES: &[&str] = &["approved", "denied", "terminated"];
const TIME_UNITS: &[&str] = &["minutes", "hours"];

/// `pending-approval` pauses the pipeline until a human decides, optionally timing out into a
/// final state.
pub struct ApprovalStep {
    schema: S,
}

impl ApprovalStep {
    pub fn new() -> Self {
        // Own keys first so the structured `timeout` wins over the common string one.
        let schema = S::object([
            (
                "timeout",
                S::alternatives([
                    S::string(),
                    S::object([
                        ("duration", S::number()),
                        ("finalState", S::string()),
                        ("timeUnit", S::string()),
                    ]),
                ]),
            ),
            ("requested_by", S::string()),
        ])
        .extend(common_fields());
        Self { schema }
    }
}

impl Default for ApprovalStep {
    fn default() -> Self {
        Self::new()
    }
}

fn check_enum(step: &Value, key: &str, allowed: &[&str], out: &mut Vec<FieldIssue>) {
    let Some(value) = step.pointer(&format!("/timeout/{}", key)).and_then(Value::as_str) else {
        return;
    };
    if !allowed.contains(&value) {
        out.push(FieldIssue::new(
            IssueKind::InvalidValue,
            format!("$.timeout.{}", key),
            Some(key),
            format!(
                "timeout.{} must be one of {}, got '{}'",
                key,
                allowed.join(", "),
                value
            ),
        ));
    }
}

impl StepKind for ApprovalStep {
    fn step_type(&self) -> &str {
        "pending-approval"
    }

    fn schema(&self) -> &S {
        &self.schema
    }

    fn validate_step(&self, step: &Value) -> Vec<FieldIssue> {
        let mut issues = check_value(&self.schema, step);
        check_enum(step, "finalState", FINAL_STATES, &mut issues);
        check_enum(step, "timeUnit", TIME_UNITS, &mut issues);
        issues
    }
}
