//! Precomputed field paths for every (target type, step type) pair.

use crate::core::schema::{walk, FieldPathSet, SchemaDescription};
use crate::core::steps::StepRegistry;
use crate::core::types::{FieldType, KeyCase};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::{Arc, OnceLock};

/// Paths of one target type, keyed by step type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepPaths {
    pub steps: IndexMap<String, FieldPathSet>,
}

/// Field paths for every supported target type, in plain and camel-cased key forms.
///
/// Step types without any field of a target type have no entry for it. Paths of the root
/// document schema are kept apart from the step views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathCatalog {
    plain: IndexMap<FieldType, StepPaths>,
    camel: IndexMap<FieldType, StepPaths>,
    #[serde(skip)]
    root_plain: IndexMap<FieldType, FieldPathSet>,
    #[serde(skip)]
    root_camel: IndexMap<FieldType, FieldPathSet>,
}

impl PathCatalog {
    pub fn build<'a, I>(schemas: I, targets: &[FieldType]) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a SchemaDescription)>,
    {
        let schemas: Vec<_> = schemas.into_iter().collect();
        let mut catalog = PathCatalog::default();
        for &target in targets {
            for case in [KeyCase::Plain, KeyCase::Camel] {
                let mut steps = IndexMap::new();
                for &(step_type, schema) in &schemas {
                    let paths = walk(schema, target, case);
                    if !paths.is_empty() {
                        steps.insert(step_type.to_string(), paths);
                    }
                }
                catalog
                    .view_mut(case)
                    .insert(target, StepPaths { steps });
            }
        }
        tracing::debug!(
            step_types = schemas.len(),
            targets = targets.len(),
            paths = catalog.path_count(),
            "built path catalog"
        );
        catalog
    }

    /// Add the paths of the root document schema for each of `targets`.
    pub fn with_root(mut self, schema: &SchemaDescription, targets: &[FieldType]) -> Self {
        for &target in targets {
            for case in [KeyCase::Plain, KeyCase::Camel] {
                let paths = walk(schema, target, case);
                if paths.is_empty() {
                    continue;
                }
                match case {
                    KeyCase::Plain => self.root_plain.insert(target, paths),
                    KeyCase::Camel => self.root_camel.insert(target, paths),
                };
            }
        }
        self
    }

    pub fn from_registry(registry: &StepRegistry, targets: &[FieldType]) -> Self {
        Self::build(registry.schemas(), targets).with_root(registry.root_schema(), targets)
    }

    fn view_mut(&mut self, case: KeyCase) -> &mut IndexMap<FieldType, StepPaths> {
        match case {
            KeyCase::Plain => &mut self.plain,
            KeyCase::Camel => &mut self.camel,
        }
    }

    /// Catalog for one key form, shaped `{ <type>: { steps: { <step>: FieldPathSet } } }`.
    pub fn view(&self, case: KeyCase) -> &IndexMap<FieldType, StepPaths> {
        match case {
            KeyCase::Plain => &self.plain,
            KeyCase::Camel => &self.camel,
        }
    }

    /// Tracked paths of `step_type` for `target`, or `None` when it has none.
    pub fn get_paths_for_step(
        &self,
        target: FieldType,
        step_type: &str,
        case: KeyCase,
    ) -> Option<&FieldPathSet> {
        self.view(case)
            .get(&target)
            .and_then(|paths| paths.steps.get(step_type))
    }

    /// Tracked document-level paths for `target`, or `None` when the root schema has none.
    pub fn get_root_paths(&self, target: FieldType, case: KeyCase) -> Option<&FieldPathSet> {
        match case {
            KeyCase::Plain => self.root_plain.get(&target),
            KeyCase::Camel => self.root_camel.get(&target),
        }
    }

    pub fn target_types(&self) -> impl Iterator<Item = FieldType> + '_ {
        self.plain.keys().copied()
    }

    fn path_count(&self) -> usize {
        self.plain
            .values()
            .chain(self.camel.values())
            .flat_map(|paths| paths.steps.values())
            .map(FieldPathSet::len)
            .sum()
    }
}

/// Compute-once holder for a [`PathCatalog`].
///
/// The first call to [`CatalogCache::get_or_build`] fixes the catalog; later calls return it
/// unchanged whatever registry they pass. Concurrent first callers block on the single
/// initialisation instead of building duplicates.
#[derive(Debug, Default)]
pub struct CatalogCache {
    cell: OnceLock<Arc<PathCatalog>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, registry: &StepRegistry, targets: &[FieldType]) -> Arc<PathCatalog> {
        self.cell
            .get_or_init(|| Arc::new(PathCatalog::from_registry(registry, targets)))
            .clone()
    }

    pub fn get(&self) -> Option<Arc<PathCatalog>> {
        self.cell.get().cloned()
    }

    /// Drop the memoized catalog so the next request rebuilds it.
    pub fn reset(&mut self) -> Option<Arc<PathCatalog>> {
        self.cell.take()
    }
}
