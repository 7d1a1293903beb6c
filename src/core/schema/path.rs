use crate::core::error::PathError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const ROOT: &str = "$";
pub const WILDCARD: &str = "[*]";

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Wildcard,
}

/// Parsed `$.key[*].other` expression addressing locations in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn parse(text: &str) -> Result<Self, PathError> {
        let rest = text
            .strip_prefix(ROOT)
            .ok_or_else(|| PathError::MissingRoot(text.to_string()))?;
        let mut segments = Vec::new();
        let mut offset = ROOT.len();
        let mut rest = rest;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix(WILDCARD) {
                segments.push(Segment::Wildcard);
                offset += WILDCARD.len();
                rest = after;
            } else if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                if end == 0 {
                    return Err(PathError::EmptySegment {
                        path: text.to_string(),
                        offset,
                    });
                }
                segments.push(Segment::Key(after[..end].to_string()));
                offset += 1 + end;
                rest = &after[end..];
            } else {
                return Err(PathError::UnsupportedBracket {
                    path: text.to_string(),
                    offset,
                });
            }
        }
        Ok(Self { segments })
    }

    /// Visit every location the path resolves to, in document order.
    ///
    /// Missing keys and shape mismatches (a key segment over an array, a wildcard over an
    /// object) resolve to nothing. The callback receives the concrete path of each location, with
    /// wildcards replaced by element indices.
    pub fn for_each_mut<E, F>(&self, root: &mut Value, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&str, &mut Value) -> Result<(), E>,
    {
        descend_mut(root, &self.segments, ROOT.to_string(), &mut visit)
    }

    /// Read-only variant of [`JsonPath::for_each_mut`] collecting `(concrete path, value)` pairs.
    pub fn matches<'v>(&self, root: &'v Value) -> Vec<(String, &'v Value)> {
        let mut out = Vec::new();
        descend(root, &self.segments, ROOT.to_string(), &mut out);
        out
    }
}

fn descend_mut<E>(
    value: &mut Value,
    segments: &[Segment],
    concrete: String,
    visit: &mut dyn FnMut(&str, &mut Value) -> Result<(), E>,
) -> Result<(), E> {
    let Some((head, rest)) = segments.split_first() else {
        return visit(&concrete, value);
    };
    match head {
        Segment::Key(key) => {
            if let Some(child) = value.as_object_mut().and_then(|map| map.get_mut(key)) {
                descend_mut(child, rest, format!("{}.{}", concrete, key), visit)?;
            }
        }
        Segment::Wildcard => {
            if let Some(items) = value.as_array_mut() {
                for (index, item) in items.iter_mut().enumerate() {
                    descend_mut(item, rest, format!("{}[{}]", concrete, index), visit)?;
                }
            }
        }
    }
    Ok(())
}

fn descend<'v>(
    value: &'v Value,
    segments: &[Segment],
    concrete: String,
    out: &mut Vec<(String, &'v Value)>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push((concrete, value));
        return;
    };
    match head {
        Segment::Key(key) => {
            if let Some(child) = value.get(key.as_str()) {
                descend(child, rest, format!("{}.{}", concrete, key), out);
            }
        }
        Segment::Wildcard => {
            if let Some(items) = value.as_array() {
                for (index, item) in items.iter().enumerate() {
                    descend(item, rest, format!("{}[{}]", concrete, index), out);
                }
            }
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT)?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Wildcard => f.write_str(WILDCARD)?,
            }
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
