use crate::core::interpolation::placeholder_name;
use crate::core::schema::{SchemaDescription, SchemaKind};
use crate::core::suggest::suggest;
use crate::core::types::FieldType;
use serde::Serialize;
use serde_json::Value;

/// Category of a schema violation found in a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    UnknownField,
    MissingField,
    TypeMismatch,
    InvalidValue,
}

/// Single schema violation, addressed by the concrete path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub kind: IssueKind,
    pub path: String,
    /// Last key of the path, used to locate the field in source text.
    pub key: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

impl FieldIssue {
    pub fn new(
        kind: IssueKind,
        path: impl Into<String>,
        key: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            key: key.map(str::to_string),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }
}

/// Check `value` against `schema`, collecting every violation.
///
/// Placeholder strings (`${{name}}`) satisfy any shape since their value is only known at run
/// time.
pub fn check_value(schema: &SchemaDescription, value: &Value) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    check(schema, value, "$", None, &mut issues);
    issues
}

fn describe(types: impl IntoIterator<Item = FieldType>) -> String {
    types
        .into_iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn actual_type(value: &Value) -> &'static str {
    FieldType::of(value).map_or("null", |t| t.as_str())
}

fn check(
    schema: &SchemaDescription,
    value: &Value,
    path: &str,
    key: Option<&str>,
    out: &mut Vec<FieldIssue>,
) {
    if value.as_str().and_then(placeholder_name).is_some() {
        return;
    }
    match &schema.kind {
        SchemaKind::Scalar { field_type } => {
            if *field_type != FieldType::Any && FieldType::of(value) != Some(*field_type) {
                out.push(FieldIssue::new(
                    IssueKind::TypeMismatch,
                    path,
                    key,
                    format!(
                        "'{}' must be {}, got {}",
                        path,
                        field_type,
                        actual_type(value)
                    ),
                ));
            }
        }
        SchemaKind::Array { items } => {
            let Some(elements) = value.as_array() else {
                out.push(FieldIssue::new(
                    IssueKind::TypeMismatch,
                    path,
                    key,
                    format!("'{}' must be array, got {}", path, actual_type(value)),
                ));
                return;
            };
            for (index, element) in elements.iter().enumerate() {
                check(items, element, &format!("{}[{}]", path, index), key, out);
            }
        }
        SchemaKind::Object(object) => {
            let Some(map) = value.as_object() else {
                out.push(FieldIssue::new(
                    IssueKind::TypeMismatch,
                    path,
                    key,
                    format!("'{}' must be object, got {}", path, actual_type(value)),
                ));
                return;
            };
            for (declared, child) in &object.keys {
                let aliased = object
                    .renames
                    .iter()
                    .any(|rename| rename.to == *declared && map.contains_key(&rename.from));
                if child.required && !map.contains_key(declared) && !aliased {
                    out.push(FieldIssue::new(
                        IssueKind::MissingField,
                        format!("{}.{}", path, declared),
                        key,
                        format!("'{}' is required", declared),
                    ));
                }
            }
            for (field, child_value) in map {
                match object.get(field) {
                    Some(child) => check(
                        child,
                        child_value,
                        &format!("{}.{}", path, field),
                        Some(field),
                        out,
                    ),
                    None if object.allow_unknown => {}
                    None => {
                        let names = object.known_names();
                        let suggestion = suggest(names.iter().map(String::as_str), field);
                        out.push(
                            FieldIssue::new(
                                IssueKind::UnknownField,
                                format!("{}.{}", path, field),
                                Some(field),
                                format!("field '{}' is not allowed", field),
                            )
                            .with_suggestion(suggestion),
                        );
                    }
                }
            }
        }
        SchemaKind::Alternatives { candidates } => {
            let runtime = FieldType::of(value);
            let mut matching = candidates.iter().filter(|candidate| {
                runtime.is_some_and(|t| candidate.concrete_types().contains(&t))
                    || candidate.concrete_types().contains(&FieldType::Any)
            });
            let first = matching.next();
            let ambiguous = matching.next().is_some();
            match first {
                Some(candidate) if !ambiguous => check(candidate, value, path, key, out),
                Some(_) => {
                    let accepted = candidates.iter().any(|candidate| {
                        let mut scratch = Vec::new();
                        check(candidate, value, path, key, &mut scratch);
                        scratch.is_empty()
                    });
                    if !accepted {
                        out.push(FieldIssue::new(
                            IssueKind::InvalidValue,
                            path,
                            key,
                            format!("'{}' does not match any allowed shape", path),
                        ));
                    }
                }
                None => out.push(FieldIssue::new(
                    IssueKind::TypeMismatch,
                    path,
                    key,
                    format!(
                        "'{}' must be {}, got {}",
                        path,
                        describe(schema.concrete_types()),
                        actual_type(value)
                    ),
                )),
            }
        }
    }
}
