use crate::core::types::{ErrorCategory, FieldType};
use std::collections::HashMap;

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
    pub context: HashMap<String, String>,
    pub recovery_suggestions: Vec<String>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let code = match category {
            ErrorCategory::ValidationError => "PIPE-VAL-000",
            ErrorCategory::ConversionError => "PIPE-INT-001",
            ErrorCategory::LookupError => "PIPE-INT-002",
            ErrorCategory::PathError => "PIPE-PATH-001",
            ErrorCategory::SerializationError => "PIPE-SER-000",
            ErrorCategory::IoError => "IO_ERROR",
            ErrorCategory::InternalError => "PIPE-INTERNAL",
        };
        AppError {
            category,
            code: code.to_string(),
            message: message.into(),
            context: HashMap::new(),
            recovery_suggestions: vec![],
            source: None,
        }
    }

    pub fn with_context<T: Into<String>>(mut self, context: T) -> Self {
        self.context.insert("context".to_string(), context.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_suggestion<T: Into<String>>(mut self, suggestion: T) -> Self {
        self.recovery_suggestions.push(suggestion.into());
        self
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            let mut pairs: Vec<_> = self.context.iter().collect();
            pairs.sort();
            write!(f, " (Context: {:?})", pairs)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError {
            category: ErrorCategory::InternalError,
            code: "ANYHOW_ERROR".to_string(),
            message: e.to_string(),
            context: HashMap::new(),
            recovery_suggestions: vec!["Check the error details".to_string()],
            source: Some(e),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError {
            category: ErrorCategory::IoError,
            code: "IO_ERROR".to_string(),
            message: e.to_string(),
            context: HashMap::new(),
            recovery_suggestions: vec!["Check file permissions and paths".to_string()],
            source: Some(anyhow::anyhow!(e)),
        }
    }
}

/// Failures raised while coercing document values into their declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    #[error("cannot convert {value:?} at '{path}' to {field_type}: {reason}")]
    Conversion {
        field_type: FieldType,
        path: String,
        value: String,
        reason: String,
    },
    #[error("no interpolator registered for field type {0}")]
    Lookup(FieldType),
}

impl InterpolationError {
    /// Path of the offending field, when the failure is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            InterpolationError::Conversion { path, .. } => Some(path.as_str()),
            InterpolationError::Lookup(_) => None,
        }
    }

    /// Re-root a step-relative path (`$.no_cache`) under `prefix` (`$.steps.build`).
    pub fn scoped(self, prefix: &str) -> Self {
        match self {
            InterpolationError::Conversion {
                field_type,
                path,
                value,
                reason,
            } => InterpolationError::Conversion {
                field_type,
                path: format!("{}{}", prefix, path.strip_prefix('$').unwrap_or(&path)),
                value,
                reason,
            },
            other => other,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            InterpolationError::Conversion { field_type, .. } => *field_type,
            InterpolationError::Lookup(field_type) => *field_type,
        }
    }
}

impl From<InterpolationError> for AppError {
    fn from(err: InterpolationError) -> Self {
        match &err {
            InterpolationError::Conversion {
                field_type, path, ..
            } => {
                let mut app = AppError::new(ErrorCategory::ConversionError, err.to_string())
                    .with_suggestion(format!(
                        "set '{}' to a {} value or a bound ${{{{variable}}}}",
                        path, field_type
                    ));
                app.add_context("path", path);
                app.add_context("field_type", field_type.as_str());
                app
            }
            InterpolationError::Lookup(field_type) => {
                let mut app = AppError::new(ErrorCategory::LookupError, err.to_string());
                app.add_context("field_type", field_type.as_str());
                app
            }
        }
    }
}

/// Malformed path expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path must start with '$': {0}")]
    MissingRoot(String),
    #[error("empty segment at offset {offset} in path '{path}'")]
    EmptySegment { path: String, offset: usize },
    #[error("unsupported bracket segment at offset {offset} in path '{path}'")]
    UnsupportedBracket { path: String, offset: usize },
}

impl From<PathError> for AppError {
    fn from(err: PathError) -> Self {
        AppError::new(ErrorCategory::PathError, err.to_string())
    }
}

pub trait ErrorReporter {
    fn report_error(&self, error: &AppError);
}

pub struct DefaultErrorReporter;

impl DefaultErrorReporter {
    pub fn new() -> Self {
        DefaultErrorReporter
    }
}

impl Default for DefaultErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for DefaultErrorReporter {
    fn report_error(&self, error: &AppError) {
        eprintln!("[ERROR] {}: {}", error.code, error.message);
        if !error.context.is_empty() {
            let mut pairs: Vec<_> = error.context.iter().collect();
            pairs.sort();
            eprintln!("  Context: {:?}", pairs);
        }
        for suggestion in &error.recovery_suggestions {
            eprintln!("  Hint: {}", suggestion);
        }
        if let Some(ref source) = error.source {
            eprintln!("  Caused by: {}", source);
        }
    }
}
