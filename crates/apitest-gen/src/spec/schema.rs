//! Schema lookup: the definition/component table and reference resolution.

use std::collections::BTreeMap;
use std::fmt;

use serde_yaml_ng::Value;

use super::helpers::{get_in, ref_name};
use super::SpecVersion;

/// Primitive kind of a schema property, taken from its first declared type.
///
/// Matching is case-sensitive: only the exact strings `string`, `integer`
/// and `boolean` are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `type: string`
    String,
    /// `type: integer`
    Integer,
    /// `type: boolean`
    Boolean,
    /// Anything else: `number`, `array`, `object`, `$ref`, composed schemas.
    Other,
}

impl PrimitiveKind {
    /// Classify a declared `type` string.
    #[must_use]
    pub fn from_type(ty: &str) -> Self {
        match ty {
            "string" => Self::String,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            _ => Self::Other,
        }
    }

    /// Classify a property schema node.
    ///
    /// `type` may be a single string or, in `OpenAPI` 3.1, a list such as
    /// `[string, "null"]`; the first string entry wins.
    fn of_property(property: &Value) -> Self {
        let declared = match property.as_mapping().and_then(|m| m.get("type")) {
            Some(Value::String(ty)) => Some(ty.as_str()),
            Some(Value::Sequence(types)) => types.iter().find_map(Value::as_str),
            _ => None,
        };
        declared.map_or(Self::Other, Self::from_type)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Other => "other",
        })
    }
}

/// A named schema reduced to its property kinds, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    /// Schema name (key in the definition/component table).
    pub name: String,
    /// Property name → primitive kind.
    pub properties: Vec<(String, PrimitiveKind)>,
}

impl SchemaDescriptor {
    /// Create a descriptor from `(property, kind)` pairs.
    #[must_use]
    pub fn new<N, P>(name: impl Into<String>, properties: P) -> Self
    where
        N: Into<String>,
        P: IntoIterator<Item = (N, PrimitiveKind)>,
    {
        Self {
            name: name.into(),
            properties: properties
                .into_iter()
                .map(|(prop, kind)| (prop.into(), kind))
                .collect(),
        }
    }

    /// Whether the schema declares at least one property.
    #[must_use]
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    fn from_node(name: &str, node: &Value) -> Self {
        let properties = node
            .as_mapping()
            .and_then(|m| m.get("properties"))
            .and_then(Value::as_mapping)
            .map(|props| {
                props
                    .iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), PrimitiveKind::of_property(v))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.to_string(),
            properties,
        }
    }
}

/// The definition (v2) or component schema (v3) table of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTable {
    schemas: BTreeMap<String, SchemaDescriptor>,
}

impl SchemaTable {
    /// Read `definitions` (v2) or `components.schemas` (v3) from a document.
    pub(crate) fn from_document(doc: &Value, version: SpecVersion) -> Self {
        let section: &[&str] = match version {
            SpecVersion::V2 => &["definitions"],
            SpecVersion::V3 => &["components", "schemas"],
        };

        let schemas = get_in(doc, section)
            .and_then(Value::as_mapping)
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(k, v)| {
                        let name = k.as_str()?;
                        Some((name.to_string(), SchemaDescriptor::from_node(name, v)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { schemas }
    }

    /// Resolve a schema reference by its trailing name component.
    ///
    /// Returns `None` when no schema of that name exists.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> Option<&SchemaDescriptor> {
        self.schemas.get(ref_name(reference))
    }

    /// Look up a schema by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaDescriptor> {
        self.schemas.get(name)
    }

    /// Number of schemas in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// All schemas, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaDescriptor> {
        self.schemas.values()
    }
}

impl FromIterator<SchemaDescriptor> for SchemaTable {
    fn from_iter<I: IntoIterator<Item = SchemaDescriptor>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }
}
