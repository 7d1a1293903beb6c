//! Abstract schema descriptions for pipeline documents and the machinery that introspects them.
//!
//! A [`SchemaDescription`] is an owned, finite tree: object nodes own their children, array nodes
//! own their item description and alternatives own their candidates. The tree cannot refer back to
//! itself, so every walk over it terminates.

pub mod case;
pub mod path;
pub mod walker;

pub use case::{camel_case, render_key};
pub use path::{JsonPath, Segment};
pub use walker::{walk, FieldPathSet};

use crate::core::types::FieldType;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::BTreeSet;

/// Shape of a single schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SchemaKind {
    Object(ObjectSchema),
    Array { items: Box<SchemaDescription> },
    Alternatives { candidates: Vec<SchemaDescription> },
    Scalar { field_type: FieldType },
}

/// Legacy key accepted in place of a canonical key at one object level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Keys of an object node, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectSchema {
    pub keys: IndexMap<String, SchemaDescription>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub renames: Vec<Rename>,
    /// Accept keys that are not declared (free-form maps such as `environment`).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_unknown: bool,
}

impl ObjectSchema {
    /// Canonical key names followed by legacy aliases, deduplicated, in declaration order.
    pub fn known_names(&self) -> IndexSet<String> {
        let mut names: IndexSet<String> = self.keys.keys().cloned().collect();
        for rename in &self.renames {
            names.insert(rename.from.clone());
        }
        names
    }

    /// Resolve a key through the rename table; canonical keys map to themselves.
    pub fn canonical_key<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.keys.contains_key(key) {
            return Some(key);
        }
        self.renames
            .iter()
            .find(|rename| rename.from == key)
            .map(|rename| rename.to.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&SchemaDescription> {
        self.canonical_key(key).and_then(|key| self.keys.get(key))
    }
}

/// Declared shape and type constraints of a document field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescription {
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl SchemaDescription {
    pub fn scalar(field_type: FieldType) -> Self {
        Self {
            kind: SchemaKind::Scalar { field_type },
            required: false,
        }
    }

    pub fn string() -> Self {
        Self::scalar(FieldType::String)
    }

    pub fn boolean() -> Self {
        Self::scalar(FieldType::Boolean)
    }

    pub fn number() -> Self {
        Self::scalar(FieldType::Number)
    }

    pub fn any() -> Self {
        Self::scalar(FieldType::Any)
    }

    /// Free-form mapping whose keys are not described.
    pub fn map() -> Self {
        Self {
            kind: SchemaKind::Object(ObjectSchema {
                allow_unknown: true,
                ..ObjectSchema::default()
            }),
            required: false,
        }
    }

    pub fn object<K, I>(keys: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaDescription)>,
    {
        Self {
            kind: SchemaKind::Object(ObjectSchema {
                keys: keys.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                renames: Vec::new(),
                allow_unknown: false,
            }),
            required: false,
        }
    }

    pub fn array(items: SchemaDescription) -> Self {
        Self {
            kind: SchemaKind::Array {
                items: Box::new(items),
            },
            required: false,
        }
    }

    pub fn alternatives<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = SchemaDescription>,
    {
        Self {
            kind: SchemaKind::Alternatives {
                candidates: candidates.into_iter().collect(),
            },
            required: false,
        }
    }

    /// `string` or list of strings, the most common alternative shape in step schemas.
    pub fn string_or_list() -> Self {
        Self::alternatives([Self::string(), Self::array(Self::string())])
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Register a legacy alias on an object node. No-op for other kinds.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        if let SchemaKind::Object(object) = &mut self.kind {
            object.renames.push(Rename {
                from: from.into(),
                to: to.into(),
            });
        }
        self
    }

    /// Merge the keys of `other` into this object node, keeping existing keys first.
    pub fn extend(mut self, other: SchemaDescription) -> Self {
        if let (SchemaKind::Object(object), SchemaKind::Object(extra)) = (&mut self.kind, other.kind)
        {
            for (key, value) in extra.keys {
                object.keys.entry(key).or_insert(value);
            }
            object.renames.extend(extra.renames);
        }
        self
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Concrete types this node can take. Alternatives contribute the union of their candidates.
    pub fn concrete_types(&self) -> BTreeSet<FieldType> {
        let mut types = BTreeSet::new();
        self.collect_types(&mut types);
        types
    }

    fn collect_types(&self, types: &mut BTreeSet<FieldType>) {
        match &self.kind {
            SchemaKind::Object(_) => {
                types.insert(FieldType::Object);
            }
            SchemaKind::Array { .. } => {
                types.insert(FieldType::Array);
            }
            SchemaKind::Scalar { field_type } => {
                types.insert(*field_type);
            }
            SchemaKind::Alternatives { candidates } => {
                for candidate in candidates {
                    candidate.collect_types(types);
                }
            }
        }
    }
}
