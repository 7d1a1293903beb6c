use super::{CheckedStep, LintContext, LintResult, LintSeverity, PipelineLintRule};
use crate::core::error::InterpolationError;
use crate::core::interpolation::placeholder_name;
use crate::core::schema::JsonPath;
use crate::core::steps::{check_value, FieldIssue, IssueKind};
use crate::core::suggest::suggest;

pub fn built_in_rules() -> Vec<Box<dyn PipelineLintRule>> {
    vec![
        Box::new(UnknownStepTypeRule),
        Box::new(RootSchemaRule),
        Box::new(StepSchemaRule),
        Box::new(ConversionFailureRule),
        Box::new(UnresolvedPlaceholderRule),
    ]
}

const PIPELINE_LOCATION: &str = "pipeline";

fn did_you_mean(name: Option<String>) -> Option<String> {
    name.map(|name| format!("did you mean '{}'?", name))
}

fn issue_code(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::UnknownField => "PIPE-LINT-002",
        IssueKind::MissingField => "PIPE-LINT-003",
        IssueKind::TypeMismatch | IssueKind::InvalidValue => "PIPE-LINT-004",
    }
}

fn issue_result(issue: FieldIssue, location: String, line: usize) -> LintResult {
    let suggestion = match issue.kind {
        IssueKind::UnknownField => did_you_mean(issue.suggestion),
        IssueKind::MissingField => Some("add the missing field".to_string()),
        _ => issue.suggestion,
    };
    LintResult::new(
        issue_code(issue.kind),
        LintSeverity::Error,
        issue.message,
        Some(location),
        suggestion,
    )
    .with_path(issue.path)
    .at_line(line)
}

struct UnknownStepTypeRule;

impl PipelineLintRule for UnknownStepTypeRule {
    fn validate(&self, ctx: &LintContext<'_>) -> Vec<LintResult> {
        let mut out = Vec::new();
        for checked in &ctx.steps {
            if ctx.registry.contains(&checked.step_type) {
                continue;
            }
            let suggestion = suggest(ctx.registry.step_types(), &checked.step_type);
            out.push(
                LintResult::new(
                    "PIPE-LINT-001",
                    LintSeverity::Error,
                    format!(
                        "step '{}' has unknown type '{}'",
                        checked.step.name, checked.step_type
                    ),
                    Some(checked.step.qualified_name()),
                    did_you_mean(suggestion),
                )
                .with_path("$.type")
                .at_line(ctx.line_of(Some(checked.step.name), Some("type"))),
            );
        }
        out
    }
}

struct RootSchemaRule;

impl PipelineLintRule for RootSchemaRule {
    fn validate(&self, ctx: &LintContext<'_>) -> Vec<LintResult> {
        check_value(ctx.registry.root_schema(), &ctx.root.body)
            .into_iter()
            .filter(|issue| !ctx.root.failed_at(&issue.path))
            .map(|issue| {
                let line = ctx.line_of(None, issue.key.as_deref());
                issue_result(issue, PIPELINE_LOCATION.to_string(), line)
            })
            .collect()
    }
}

struct StepSchemaRule;

impl PipelineLintRule for StepSchemaRule {
    fn validate(&self, ctx: &LintContext<'_>) -> Vec<LintResult> {
        let mut out = Vec::new();
        for checked in &ctx.steps {
            let Some(kind) = ctx.registry.get(&checked.step_type) else {
                continue;
            };
            if !checked.body.is_object() {
                out.push(
                    LintResult::new(
                        "PIPE-LINT-004",
                        LintSeverity::Error,
                        format!("step '{}' must be a mapping", checked.step.name),
                        Some(checked.step.qualified_name()),
                        None,
                    )
                    .at_line(ctx.line_of(Some(checked.step.name), None)),
                );
                continue;
            }
            for issue in kind.validate_step(&checked.body) {
                if checked.failed_at(&issue.path) {
                    continue;
                }
                let line = ctx.line_of(Some(checked.step.name), issue.key.as_deref());
                out.push(issue_result(issue, checked.step.qualified_name(), line));
            }
        }
        out
    }
}

struct ConversionFailureRule;

impl ConversionFailureRule {
    fn result(
        ctx: &LintContext<'_>,
        err: &InterpolationError,
        location: String,
        step: Option<&str>,
    ) -> LintResult {
        let (path, hint) = match err {
            InterpolationError::Conversion {
                field_type, path, ..
            } => (
                Some(path.clone()),
                Some(format!(
                    "use a {} literal or a bound ${{{{variable}}}}",
                    field_type
                )),
            ),
            InterpolationError::Lookup(_) => (None, None),
        };
        let key = path.as_deref().and_then(last_key);
        let mut result = LintResult::new(
            "PIPE-LINT-005",
            LintSeverity::Error,
            err.to_string(),
            Some(location),
            hint,
        )
        .at_line(ctx.line_of(step, key.as_deref()));
        result.path = path;
        result
    }
}

impl PipelineLintRule for ConversionFailureRule {
    fn validate(&self, ctx: &LintContext<'_>) -> Vec<LintResult> {
        let mut out: Vec<LintResult> = ctx
            .root
            .conversion_errors
            .iter()
            .map(|err| Self::result(ctx, err, PIPELINE_LOCATION.to_string(), None))
            .collect();
        for checked in &ctx.steps {
            for err in &checked.conversion_errors {
                out.push(Self::result(
                    ctx,
                    err,
                    checked.step.qualified_name(),
                    Some(checked.step.name),
                ));
            }
        }
        out
    }
}

struct UnresolvedPlaceholderRule;

impl UnresolvedPlaceholderRule {
    fn tracked_paths<'c>(ctx: &'c LintContext<'_>, checked: &CheckedStep<'_>) -> Vec<&'c str> {
        let catalog = ctx.engine.catalog();
        catalog
            .target_types()
            .filter_map(|field_type| {
                catalog.get_paths_for_step(field_type, &checked.step_type, ctx.engine.key_case())
            })
            .flat_map(|paths| {
                paths
                    .single_type_fields
                    .iter()
                    .chain(paths.multiple_types_fields.iter())
                    .map(String::as_str)
            })
            .collect()
    }
}

impl PipelineLintRule for UnresolvedPlaceholderRule {
    fn validate(&self, ctx: &LintContext<'_>) -> Vec<LintResult> {
        let mut out = Vec::new();
        for checked in &ctx.steps {
            for path in Self::tracked_paths(ctx, checked) {
                let Ok(parsed) = JsonPath::parse(path) else {
                    continue;
                };
                for (location, value) in parsed.matches(&checked.body) {
                    let Some(variable) = value.as_str().and_then(placeholder_name) else {
                        continue;
                    };
                    if ctx.variables.contains_key(variable) {
                        continue;
                    }
                    let key = last_key(&location);
                    out.push(
                        LintResult::new(
                            "PIPE-LINT-006",
                            LintSeverity::Warning,
                            format!(
                                "variable '{}' used by '{}' is not bound; the field stays unresolved",
                                variable, location
                            ),
                            Some(checked.step.qualified_name()),
                            Some(format!("bind '{}' or replace the placeholder", variable)),
                        )
                        .with_path(location.clone())
                        .at_line(ctx.line_of(Some(checked.step.name), key.as_deref())),
                    );
                }
            }
        }
        out
    }
}

/// Final key segment of a concrete path, ignoring array indices.
fn last_key(path: &str) -> Option<String> {
    let mut trimmed = path;
    while trimmed.ends_with(']') {
        match trimmed.rfind('[') {
            Some(index) => trimmed = &trimmed[..index],
            None => break,
        }
    }
    trimmed
        .rsplit('.')
        .next()
        .filter(|key| !key.is_empty() && *key != "$")
        .map(str::to_string)
}
