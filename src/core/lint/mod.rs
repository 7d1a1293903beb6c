use crate::core::catalog::CatalogCache;
use crate::core::config::EngineConfig;
use crate::core::document::{PipelineDocument, StepRef};
use crate::core::error::InterpolationError;
use crate::core::interpolation::{InterpolationEngine, InterpolatorRegistry, Variables};
use crate::core::locate::locate;
use crate::core::steps::StepRegistry;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub mod rules;
pub use rules::*;

/// Diagnostic severity levels emitted by pipeline lint rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
    Info,
}

impl LintSeverity {
    fn rank(&self) -> u8 {
        match self {
            LintSeverity::Error => 3,
            LintSeverity::Warning => 2,
            LintSeverity::Info => 1,
        }
    }
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "Error"),
            LintSeverity::Warning => write!(f, "Warning"),
            LintSeverity::Info => write!(f, "Info"),
        }
    }
}

/// Individual lint/validation result emitted by a rule.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub code: String,
    pub severity: LintSeverity,
    pub message: String,
    /// Qualified step name, or `pipeline` for document-level findings.
    pub location: Option<String>,
    pub path: Option<String>,
    /// 1-based source line, when it could be found.
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl LintResult {
    /// Create a new lint result with optional location and suggestion.
    pub fn new(
        code: impl Into<String>,
        severity: LintSeverity,
        message: impl Into<String>,
        location: Option<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            location,
            path: None,
            line: None,
            suggestion,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = (line > 0).then_some(line);
        self
    }
}

impl fmt::Display for LintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.severity, self.code)?;
        if let Some(line) = self.line {
            write!(f, " line {}", line)?;
        }
        if let Some(location) = &self.location {
            write!(f, " {}", location)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// A step after coercion, as seen by lint rules.
pub struct CheckedStep<'a> {
    pub step: StepRef<'a>,
    pub step_type: String,
    /// Body with every convertible field coerced. Fields that failed keep their raw value.
    pub body: Value,
    pub conversion_errors: Vec<InterpolationError>,
}

/// Document-level fields after coercion.
pub struct CheckedRoot {
    pub body: Value,
    pub conversion_errors: Vec<InterpolationError>,
}

/// Whether `path` already failed conversion and is reported as such.
fn failed_conversion(errors: &[InterpolationError], path: &str) -> bool {
    errors.iter().any(|err| err.path() == Some(path))
}

impl CheckedStep<'_> {
    pub fn failed_at(&self, path: &str) -> bool {
        failed_conversion(&self.conversion_errors, path)
    }
}

impl CheckedRoot {
    pub fn failed_at(&self, path: &str) -> bool {
        failed_conversion(&self.conversion_errors, path)
    }
}

/// Everything a rule may inspect.
pub struct LintContext<'a> {
    pub document: &'a PipelineDocument,
    pub registry: &'a StepRegistry,
    pub engine: &'a InterpolationEngine,
    pub variables: &'a Variables,
    pub root: CheckedRoot,
    pub steps: Vec<CheckedStep<'a>>,
}

impl LintContext<'_> {
    /// Source line of `key` within step `name` (or of the step itself).
    pub fn line_of(&self, name: Option<&str>, key: Option<&str>) -> usize {
        locate(&self.document.raw, name, key)
    }
}

/// Trait implemented by pipeline lint rules.
pub trait PipelineLintRule {
    fn validate(&self, ctx: &LintContext<'_>) -> Vec<LintResult>;
}

/// Registry that runs all built-in pipeline lint rules.
pub struct LintRegistry {
    registry: StepRegistry,
    engine: InterpolationEngine,
    rules: Vec<Box<dyn PipelineLintRule>>,
}

impl LintRegistry {
    /// Construct a registry populated with the built-in step types and rules.
    pub fn new(cache: &CatalogCache) -> Self {
        Self::from_config(cache, &EngineConfig::default())
    }

    /// Built-in step types and rules, with the engine tuned by `config`.
    pub fn from_config(cache: &CatalogCache, config: &EngineConfig) -> Self {
        let registry = StepRegistry::builtin();
        let engine =
            InterpolationEngine::from_cache(cache, &registry, InterpolatorRegistry::builtin())
                .with_key_case(config.key_case)
                .with_default_step_type(config.default_step_type.clone());
        Self::with_parts(registry, engine)
    }

    pub fn with_parts(registry: StepRegistry, engine: InterpolationEngine) -> Self {
        Self {
            registry,
            engine,
            rules: built_in_rules(),
        }
    }

    /// Run all registered lint rules against the pipeline document.
    /// The results are already sorted by `(severity desc, code asc, location asc, line asc)`.
    pub fn run(&self, document: &PipelineDocument, variables: &Variables) -> Vec<LintResult> {
        let steps = document
            .steps()
            .into_iter()
            .map(|step| {
                let step_type = step.step_type(self.engine.default_step_type()).to_string();
                let mut body = step.body.clone();
                let conversion_errors = self.engine.coerce_fields(&mut body, variables);
                CheckedStep {
                    step,
                    step_type,
                    body,
                    conversion_errors,
                }
            })
            .collect();

        let mut root_body = document.value.clone();
        let root_errors = self.engine.coerce_root(&mut root_body, variables);
        let root = CheckedRoot {
            body: root_body,
            conversion_errors: root_errors,
        };

        let ctx = LintContext {
            document,
            registry: &self.registry,
            engine: &self.engine,
            variables,
            root,
            steps,
        };

        let mut results = Vec::new();
        for rule in &self.rules {
            results.extend(rule.validate(&ctx));
        }
        results.sort_by(|a, b| {
            let severity_cmp = b.severity.rank().cmp(&a.severity.rank());
            severity_cmp
                .then(a.code.cmp(&b.code))
                .then(a.location.cmp(&b.location))
                .then(a.line.cmp(&b.line))
        });
        tracing::debug!(findings = results.len(), "lint finished");
        results
    }
}

/// Whether any result is an error.
pub fn has_errors(results: &[LintResult]) -> bool {
    results
        .iter()
        .any(|result| result.severity == LintSeverity::Error)
}
