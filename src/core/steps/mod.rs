//! Data-driven table of pipeline step types.
//!
//! Each step type is a value implementing [`StepKind`]; the registry selects it by the step's
//! `type` tag. Most kinds are plain [`StepDescriptor`]s whose validation is purely schema driven,
//! while a few add checks the schema cannot express.

pub mod approval;
pub mod build;
pub mod common;
pub mod composition;
pub mod freestyle;
pub mod git_clone;
pub mod parallel;
pub mod push;
pub mod validate;

pub use common::root_schema;
pub use validate::{check_value, FieldIssue, IssueKind};

use crate::core::schema::SchemaDescription;
use indexmap::IndexMap;
use serde_json::Value;

/// Step type used when a step omits `type`.
pub const DEFAULT_STEP_TYPE: &str = "freestyle";

/// Capabilities every step type provides.
pub trait StepKind: Send + Sync {
    fn step_type(&self) -> &str;

    fn schema(&self) -> &SchemaDescription;

    /// Check a step body against this step type.
    fn validate_step(&self, step: &Value) -> Vec<FieldIssue> {
        check_value(self.schema(), step)
    }
}

/// Step type whose behaviour is fully described by its schema.
pub struct StepDescriptor {
    step_type: String,
    schema: SchemaDescription,
}

impl StepDescriptor {
    pub fn new(step_type: impl Into<String>, schema: SchemaDescription) -> Self {
        Self {
            step_type: step_type.into(),
            schema,
        }
    }
}

impl StepKind for StepDescriptor {
    fn step_type(&self) -> &str {
        &self.step_type
    }

    fn schema(&self) -> &SchemaDescription {
        &self.schema
    }
}

/// Registry mapping step type tags to their [`StepKind`].
pub struct StepRegistry {
    root: SchemaDescription,
    kinds: IndexMap<String, Box<dyn StepKind>>,
}

impl StepRegistry {
    /// Empty registry validating documents against `root`.
    pub fn new(root: SchemaDescription) -> Self {
        Self {
            root,
            kinds: IndexMap::new(),
        }
    }

    /// Registry populated with the built-in step types.
    pub fn builtin() -> Self {
        let mut registry = Self::new(root_schema());
        registry.register(Box::new(freestyle::step()));
        registry.register(Box::new(build::step()));
        registry.register(Box::new(push::step()));
        registry.register(Box::new(git_clone::step()));
        registry.register(Box::new(composition::step()));
        registry.register(Box::new(approval::ApprovalStep::new()));
        registry.register(Box::new(parallel::ParallelStep::new()));
        registry
    }

    /// Add or replace a step type. Replacing keeps the original registration order.
    pub fn register(&mut self, kind: Box<dyn StepKind>) {
        self.kinds.insert(kind.step_type().to_string(), kind);
    }

    pub fn get(&self, step_type: &str) -> Option<&dyn StepKind> {
        self.kinds.get(step_type).map(|kind| kind.as_ref())
    }

    pub fn contains(&self, step_type: &str) -> bool {
        self.kinds.contains_key(step_type)
    }

    pub fn step_types(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// `(step type, schema)` pairs in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &SchemaDescription)> {
        self.kinds
            .iter()
            .map(|(name, kind)| (name.as_str(), kind.schema()))
    }

    pub fn root_schema(&self) -> &SchemaDescription {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Declared type of a step body, falling back to `default_type`.
pub fn step_type_of<'a>(step: &'a Value, default_type: &'a str) -> &'a str {
    step.get("type")
        .and_then(Value::as_str)
        .unwrap_or(default_type)
}
