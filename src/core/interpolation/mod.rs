//! Coerce raw document values into the types their schema declares.
//!
//! The engine reads the [`PathCatalog`] for each step and visits every location of every tracked
//! path. Paths from the single-type bucket are strict: a value that cannot be converted aborts
//! the whole operation. Paths from the multiple-types bucket are lenient: another declared shape
//! may explain the value, so a failed conversion leaves it as it was.

mod boolean;

pub use boolean::BooleanInterpolator;

use crate::core::catalog::{CatalogCache, PathCatalog};
use crate::core::error::InterpolationError;
use crate::core::schema::{FieldPathSet, JsonPath};
use crate::core::steps::{step_type_of, StepRegistry, DEFAULT_STEP_TYPE};
use crate::core::types::{FieldType, KeyCase};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, OnceLock};

/// Variable bindings available to `${{name}}` placeholders.
pub type Variables = HashMap<String, String>;

/// Why a raw value could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ConversionFailure {
    pub reason: String,
}

impl ConversionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Converter from raw strings into one concrete field type.
pub trait Interpolator: Send + Sync {
    fn field_type(&self) -> FieldType;

    fn convert_value(&self, raw: &str) -> Result<Value, ConversionFailure>;
}

/// Interpolators keyed by the field type they produce.
pub struct InterpolatorRegistry {
    by_type: IndexMap<FieldType, Box<dyn Interpolator>>,
}

impl InterpolatorRegistry {
    pub fn empty() -> Self {
        Self {
            by_type: IndexMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(BooleanInterpolator));
        registry
    }

    pub fn register(&mut self, interpolator: Box<dyn Interpolator>) {
        self.by_type.insert(interpolator.field_type(), interpolator);
    }

    pub fn get(&self, field_type: FieldType) -> Result<&dyn Interpolator, InterpolationError> {
        self.by_type
            .get(&field_type)
            .map(|interpolator| interpolator.as_ref())
            .ok_or(InterpolationError::Lookup(field_type))
    }

    /// Field types with a registered converter, in registration order.
    pub fn field_types(&self) -> Vec<FieldType> {
        self.by_type.keys().copied().collect()
    }
}

impl Default for InterpolatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$\{\{([A-Za-z_][A-Za-z0-9_.\-]*)\}\}$").expect("placeholder pattern is valid")
    })
}

/// Variable name of a string that is exactly one `${{name}}` placeholder.
pub fn placeholder_name(text: &str) -> Option<&str> {
    placeholder_pattern()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Per-pass state: what we convert to, with which bindings, and how failures are treated.
pub struct InterpolationContext<'a> {
    pub field_type: FieldType,
    pub variables: &'a Variables,
    pub strict: bool,
}

/// Applies the path catalog to pipeline documents.
pub struct InterpolationEngine {
    catalog: Arc<PathCatalog>,
    interpolators: InterpolatorRegistry,
    key_case: KeyCase,
    default_step_type: String,
}

impl InterpolationEngine {
    pub fn new(catalog: Arc<PathCatalog>, interpolators: InterpolatorRegistry) -> Self {
        Self {
            catalog,
            interpolators,
            key_case: KeyCase::Plain,
            default_step_type: DEFAULT_STEP_TYPE.to_string(),
        }
    }

    /// Engine over the catalog memoized in `cache`, building it from `steps` on first use.
    pub fn from_cache(
        cache: &CatalogCache,
        steps: &StepRegistry,
        interpolators: InterpolatorRegistry,
    ) -> Self {
        let catalog = cache.get_or_build(steps, &interpolators.field_types());
        Self::new(catalog, interpolators)
    }

    pub fn with_key_case(mut self, key_case: KeyCase) -> Self {
        self.key_case = key_case;
        self
    }

    pub fn with_default_step_type(mut self, step_type: impl Into<String>) -> Self {
        self.default_step_type = step_type.into();
        self
    }

    pub fn catalog(&self) -> &PathCatalog {
        &self.catalog
    }

    pub fn key_case(&self) -> KeyCase {
        self.key_case
    }

    pub fn default_step_type(&self) -> &str {
        &self.default_step_type
    }

    /// Coerced copy of a whole document. The input is never modified.
    ///
    /// Document-level fields are coerced first. Then every entry of the top-level `steps`
    /// mapping is handled, including steps nested in the `steps` mapping of another step. A
    /// strict conversion failure anywhere discards the copy and returns the error.
    pub fn handle_all_steps(
        &self,
        document: &Value,
        variables: &Variables,
    ) -> Result<Value, InterpolationError> {
        let mut output = document.clone();
        first_failure(self.coerce_root(&mut output, variables))?;
        self.apply_to_steps(&mut output, variables, "$")?;
        Ok(output)
    }

    /// Coerced copy of a single step body, including any steps nested in it.
    pub fn handle_single_step(
        &self,
        step: &Value,
        variables: &Variables,
    ) -> Result<Value, InterpolationError> {
        let mut output = step.clone();
        self.apply_to_step(&mut output, variables, "$")?;
        Ok(output)
    }

    fn apply_to_steps(
        &self,
        container: &mut Value,
        variables: &Variables,
        prefix: &str,
    ) -> Result<(), InterpolationError> {
        if let Some(steps) = container.get_mut("steps").and_then(Value::as_object_mut) {
            for (name, step) in steps.iter_mut() {
                tracing::trace!(step = %name, "interpolating step");
                let scope = format!("{}.steps.{}", prefix, name);
                self.apply_to_step(step, variables, &scope)?;
            }
        }
        Ok(())
    }

    fn apply_to_step(
        &self,
        step: &mut Value,
        variables: &Variables,
        scope: &str,
    ) -> Result<(), InterpolationError> {
        self.interpolate_fields(step, variables)
            .map_err(|err| err.scoped(scope))?;
        self.apply_to_steps(step, variables, scope)
    }

    /// Coerce the fields of `step` itself for every registered type, leaving nested steps alone.
    pub fn interpolate_fields(
        &self,
        step: &mut Value,
        variables: &Variables,
    ) -> Result<(), InterpolationError> {
        first_failure(self.coerce_fields(step, variables))
    }

    /// Like [`InterpolationEngine::interpolate_fields`], but keeps going past strict failures.
    ///
    /// Every field that converts is rewritten. The failures come back in visit order.
    pub fn coerce_fields(&self, step: &mut Value, variables: &Variables) -> Vec<InterpolationError> {
        let mut failures = Vec::new();
        for field_type in self.interpolators.field_types() {
            match self.step_failures(step, field_type, variables) {
                Ok(found) => failures.extend(found),
                Err(err) => failures.push(err),
            }
        }
        failures
    }

    /// Coerce the document-level fields declared by the root schema, leaving `steps` alone.
    pub fn coerce_root(&self, document: &mut Value, variables: &Variables) -> Vec<InterpolationError> {
        let mut failures = Vec::new();
        for field_type in self.interpolators.field_types() {
            let Ok(interpolator) = self.interpolators.get(field_type) else {
                continue;
            };
            if let Some(paths) = self.catalog.get_root_paths(field_type, self.key_case) {
                failures.extend(coerce_paths(document, paths, interpolator, variables));
            }
        }
        failures
    }

    /// Coerce the fields of `step` declared as `field_type`, in place.
    ///
    /// Fails with a lookup error when no interpolator produces `field_type`.
    pub fn interpolate_step(
        &self,
        step: &mut Value,
        field_type: FieldType,
        variables: &Variables,
    ) -> Result<(), InterpolationError> {
        first_failure(self.step_failures(step, field_type, variables)?)
    }

    fn step_failures(
        &self,
        step: &mut Value,
        field_type: FieldType,
        variables: &Variables,
    ) -> Result<Vec<InterpolationError>, InterpolationError> {
        let interpolator = self.interpolators.get(field_type)?;
        let step_type = step_type_of(step, &self.default_step_type).to_string();
        Ok(self
            .catalog
            .get_paths_for_step(field_type, &step_type, self.key_case)
            .map(|paths| coerce_paths(step, paths, interpolator, variables))
            .unwrap_or_default())
    }
}

fn first_failure(failures: Vec<InterpolationError>) -> Result<(), InterpolationError> {
    match failures.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Strict pass over `single_type_fields`, then lenient pass over `multiple_types_fields`.
fn coerce_paths(
    target: &mut Value,
    paths: &FieldPathSet,
    interpolator: &dyn Interpolator,
    variables: &Variables,
) -> Vec<InterpolationError> {
    let mut failures = Vec::new();
    let strict = InterpolationContext {
        field_type: interpolator.field_type(),
        variables,
        strict: true,
    };
    for path in &paths.single_type_fields {
        interpolate_path(target, path, interpolator, &strict, &mut failures);
    }
    let lenient = InterpolationContext {
        strict: false,
        ..strict
    };
    for path in &paths.multiple_types_fields {
        interpolate_path(target, path, interpolator, &lenient, &mut failures);
    }
    failures
}

fn interpolate_path(
    target: &mut Value,
    path: &str,
    interpolator: &dyn Interpolator,
    ctx: &InterpolationContext<'_>,
    failures: &mut Vec<InterpolationError>,
) {
    // Catalog paths come from the walker and always parse; a foreign one simply matches nothing.
    let Ok(parsed) = JsonPath::parse(path) else {
        tracing::warn!(path, "skipping malformed catalog path");
        return;
    };
    let visited = parsed.for_each_mut::<Infallible, _>(target, |location, value| {
        if let Err(err) = coerce_location(location, value, interpolator, ctx) {
            failures.push(err);
        }
        Ok(())
    });
    if let Err(never) = visited {
        match never {}
    }
}

fn coerce_location(
    location: &str,
    value: &mut Value,
    interpolator: &dyn Interpolator,
    ctx: &InterpolationContext<'_>,
) -> Result<(), InterpolationError> {
    if value.is_null() || FieldType::of(value) == Some(ctx.field_type) {
        return Ok(());
    }

    let raw = match &*value {
        Value::String(text) => match placeholder_name(text) {
            Some(name) => match ctx.variables.get(name) {
                Some(bound) => bound.clone(),
                None => {
                    tracing::debug!(path = location, variable = name, "placeholder left unresolved");
                    return Ok(());
                }
            },
            None => text.clone(),
        },
        other => other.to_string(),
    };

    match interpolator.convert_value(&raw) {
        Ok(converted) => {
            tracing::trace!(path = location, strict = ctx.strict, "coerced value");
            *value = converted;
            Ok(())
        }
        Err(failure) if ctx.strict => Err(InterpolationError::Conversion {
            field_type: ctx.field_type,
            path: location.to_string(),
            value: raw,
            reason: failure.reason,
        }),
        Err(failure) => {
            tracing::debug!(
                path = location,
                reason = %failure,
                "lenient field left unmodified"
            );
            Ok(())
        }
    }
}
