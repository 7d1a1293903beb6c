use super::case::render_key;
use super::path::{ROOT, WILDCARD};
use super::{SchemaDescription, SchemaKind};
use crate::core::types::{FieldType, KeyCase};
use serde::Serialize;
use std::collections::HashSet;

/// Paths of one step schema whose declared type matches a target type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPathSet {
    /// Fields declaring exactly the target type.
    pub single_type_fields: Vec<String>,
    /// Fields whose alternatives include the target type among others.
    pub multiple_types_fields: Vec<String>,
}

impl FieldPathSet {
    pub fn is_empty(&self) -> bool {
        self.single_type_fields.is_empty() && self.multiple_types_fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.single_type_fields.len() + self.multiple_types_fields.len()
    }

    /// Whether `path` was recorded in the single-type bucket.
    pub fn is_strict(&self, path: &str) -> bool {
        self.single_type_fields.iter().any(|p| p == path)
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    Single,
    Multiple,
}

struct Walker {
    target: FieldType,
    case: KeyCase,
    seen: HashSet<String>,
    out: FieldPathSet,
}

impl Walker {
    fn record(&mut self, path: &str, bucket: Bucket) {
        if !self.seen.insert(path.to_string()) {
            return;
        }
        match bucket {
            Bucket::Single => self.out.single_type_fields.push(path.to_string()),
            Bucket::Multiple => self.out.multiple_types_fields.push(path.to_string()),
        }
    }

    fn visit(&mut self, node: &SchemaDescription, path: &str) {
        match &node.kind {
            SchemaKind::Object(object) => {
                for (key, child) in &object.keys {
                    let child_path = format!("{}.{}", path, render_key(key, self.case));
                    self.visit(child, &child_path);
                }
            }
            SchemaKind::Array { items } => {
                let item_path = format!("{}{}", path, WILDCARD);
                self.visit(items, &item_path);
            }
            SchemaKind::Alternatives { candidates } => {
                let types = node.concrete_types();
                if types.contains(&self.target) {
                    let bucket = if types.len() == 1 {
                        Bucket::Single
                    } else {
                        Bucket::Multiple
                    };
                    self.record(path, bucket);
                }
                for candidate in candidates {
                    self.visit_candidate(candidate, path);
                }
            }
            SchemaKind::Scalar { field_type } => {
                if *field_type == self.target {
                    self.record(path, Bucket::Single);
                }
            }
        }
    }

    // Scalar candidates were already accounted for by the alternatives node itself; only
    // structured candidates can contribute deeper paths.
    fn visit_candidate(&mut self, candidate: &SchemaDescription, path: &str) {
        match &candidate.kind {
            SchemaKind::Scalar { .. } => {}
            SchemaKind::Alternatives { candidates } => {
                for nested in candidates {
                    self.visit_candidate(nested, path);
                }
            }
            SchemaKind::Object(_) | SchemaKind::Array { .. } => self.visit(candidate, path),
        }
    }
}

/// Compute the paths of `schema` whose declared type matches `target`.
///
/// The walk is depth-first in key declaration order. The first time a path is recorded fixes its
/// bucket; later sightings through other branches are ignored.
pub fn walk(schema: &SchemaDescription, target: FieldType, case: KeyCase) -> FieldPathSet {
    let mut walker = Walker {
        target,
        case,
        seen: HashSet::new(),
        out: FieldPathSet::default(),
    };
    walker.visit(schema, ROOT);
    walker.out
}
