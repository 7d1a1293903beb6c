#![allow(clippy::result_large_err)] // Document APIs return AppError to keep parse context without boxing.

use crate::core::error::AppError;
use crate::core::steps::step_type_of;
use crate::core::types::ErrorCategory;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed pipeline document together with the text it came from.
#[derive(Debug, Clone)]
pub struct PipelineDocument {
    /// Original source text, kept for line lookups in diagnostics.
    pub raw: String,
    pub value: Value,
    pub source: Option<PathBuf>,
}

/// Step found in a document, possibly nested inside another step.
#[derive(Debug, Clone, Copy)]
pub struct StepRef<'a> {
    /// Key of the step in its parent `steps` mapping.
    pub name: &'a str,
    /// Name of the enclosing step, when nested.
    pub parent: Option<&'a str>,
    pub body: &'a Value,
}

impl StepRef<'_> {
    /// `parent.name` for nested steps, `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match self.parent {
            Some(parent) => format!("{}.{}", parent, self.name),
            None => self.name.to_string(),
        }
    }

    pub fn step_type<'b>(&'b self, default_type: &'b str) -> &'b str {
        step_type_of(self.body, default_type)
    }
}

impl PipelineDocument {
    /// Parse YAML (or JSON) text into a document.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let value: Value = serde_yaml::from_str(text).map_err(|err| {
            AppError::new(
                ErrorCategory::SerializationError,
                format!("failed to parse pipeline: {}", err),
            )
        })?;
        let document = Self {
            raw: text.to_string(),
            value,
            source: None,
        };
        document.validate_shape()?;
        Ok(document)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|err| {
            AppError::new(
                ErrorCategory::IoError,
                format!("failed to read {}: {}", path.display(), err),
            )
        })?;
        let mut document = Self::parse(&text).map_err(|err| {
            err.with_context(format!("while loading {}", path.display()))
        })?;
        document.source = Some(path.to_path_buf());
        Ok(document)
    }

    fn validate_shape(&self) -> Result<(), AppError> {
        let Some(root) = self.value.as_object() else {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "pipeline document must be a mapping",
            ));
        };
        match root.get("steps") {
            Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(AppError::new(
                ErrorCategory::ValidationError,
                "'steps' must be a mapping of step names to steps",
            )),
            None => Err(AppError::new(
                ErrorCategory::ValidationError,
                "pipeline document must define 'steps'",
            )),
        }
    }

    /// Every step of the document, parents before their nested steps.
    pub fn steps(&self) -> Vec<StepRef<'_>> {
        let mut out = Vec::new();
        collect_steps(&self.value, None, &mut out);
        out
    }
}

fn collect_steps<'a>(container: &'a Value, parent: Option<&'a str>, out: &mut Vec<StepRef<'a>>) {
    let Some(steps) = container.get("steps").and_then(Value::as_object) else {
        return;
    };
    for (name, body) in steps {
        out.push(StepRef {
            name,
            parent,
            body,
        });
        collect_steps(body, Some(name), out);
    }
}
