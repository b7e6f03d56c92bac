//! Specification document model.
//!
//! Parses raw Swagger 2 / `OpenAPI` 3 text into an [`ApiSpec`]: the ordered
//! paths with their normalized operations plus the schema table. Reading is
//! split across submodules:
//! - `adapter`: v2/v3 operation → [`OperationDescriptor`]
//! - `schema`: definition/component table and `$ref` lookup
//! - `helpers`: shared YAML lookups

mod adapter;
mod helpers;
mod schema;

use std::collections::BTreeMap;
use std::fmt;

use serde_yaml_ng::Value;

pub use adapter::{
    HttpMethod, OperationDescriptor, Parameter, ParameterLocation, RequestBody,
};
pub use schema::{PrimitiveKind, SchemaDescriptor, SchemaTable};

use crate::error::{Error, Result};

/// Major specification version of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVersion {
    /// Swagger 2.0 (`swagger: "2.0"`).
    V2,
    /// `OpenAPI` 3.x (`openapi: 3.0.x` / `3.1.x`).
    V3,
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V2 => "Swagger 2",
            Self::V3 => "OpenAPI 3",
        })
    }
}

/// One declared path and its operations, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathItem {
    /// Path template (e.g., `/pets/{id}`).
    pub path: String,
    /// Operations declared on this path.
    pub operations: Vec<OperationDescriptor>,
}

/// A parsed specification document.
#[derive(Debug, Clone)]
pub struct ApiSpec {
    version: SpecVersion,
    paths: Vec<PathItem>,
    schemas: SchemaTable,

    /// Raw operation nodes keyed by `(path, method)`, for change detection.
    /// Scalar mapping keys are normalized to strings.
    pub(crate) raw_operations: BTreeMap<(String, HttpMethod), Value>,

    /// Raw schema nodes keyed by name, for change detection.
    pub(crate) raw_schemas: BTreeMap<String, Value>,
}

impl ApiSpec {
    /// Parse a YAML or JSON specification document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] for unparseable text,
    /// [`Error::InvalidDocument`] if the root is not a mapping, and
    /// [`Error::UnsupportedVersion`] if neither `swagger: 2.x` nor
    /// `openapi: 3.x` is declared.
    pub fn parse(text: &str) -> Result<Self> {
        let doc: Value = serde_yaml_ng::from_str(text)?;
        let version = detect_version(&doc)?;

        let schemas = SchemaTable::from_document(&doc, version);

        let mut paths: Vec<PathItem> = Vec::new();
        let mut raw_operations = BTreeMap::new();
        helpers::for_each_operation(&doc, |path, method_key, operation, path_item| {
            let Some(method) = HttpMethod::from_key(method_key) else {
                return;
            };
            let descriptor = adapter::adapt(&doc, version, method, path, operation, path_item);

            match paths.last_mut() {
                Some(item) if item.path == path => item.operations.push(descriptor),
                _ => paths.push(PathItem {
                    path: path.to_string(),
                    operations: vec![descriptor],
                }),
            }
            raw_operations.insert(
                (path.to_string(), method),
                helpers::normalize_keys(&Value::Mapping(operation.clone())),
            );
        });

        let schema_section: &[&str] = match version {
            SpecVersion::V2 => &["definitions"],
            SpecVersion::V3 => &["components", "schemas"],
        };
        let raw_schemas = helpers::get_in(&doc, schema_section)
            .and_then(Value::as_mapping)
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), helpers::normalize_keys(v))))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            %version,
            paths = paths.len(),
            operations = raw_operations.len(),
            schemas = schemas.len(),
            "parsed specification"
        );

        Ok(Self {
            version,
            paths,
            schemas,
            raw_operations,
            raw_schemas,
        })
    }

    /// Major specification version.
    #[must_use]
    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// All declared paths with at least one operation, in declaration order.
    #[must_use]
    pub fn paths(&self) -> &[PathItem] {
        &self.paths
    }

    /// Look up a path item by its exact template.
    #[must_use]
    pub fn path(&self, path: &str) -> Option<&PathItem> {
        self.paths.iter().find(|item| item.path == path)
    }

    /// Look up a single operation.
    #[must_use]
    pub fn operation(&self, method: HttpMethod, path: &str) -> Option<&OperationDescriptor> {
        self.path(path)?
            .operations
            .iter()
            .find(|op| op.method == method)
    }

    /// All operations of the document, path by path.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.paths.iter().flat_map(|item| item.operations.iter())
    }

    /// The definition/component schema table.
    #[must_use]
    pub fn schemas(&self) -> &SchemaTable {
        &self.schemas
    }
}

fn detect_version(doc: &Value) -> Result<SpecVersion> {
    let root = doc.as_mapping().ok_or_else(|| Error::InvalidDocument {
        reason: "document root is not a mapping".to_string(),
    })?;

    if let Some(swagger) = root.get("swagger") {
        let found = helpers::scalar_to_string(swagger);
        return match found.as_deref() {
            Some(v) if v.starts_with('2') => Ok(SpecVersion::V2),
            _ => Err(Error::UnsupportedVersion { found }),
        };
    }

    if let Some(openapi) = root.get("openapi") {
        let found = helpers::scalar_to_string(openapi);
        return match found.as_deref() {
            Some(v) if v.starts_with('3') => Ok(SpecVersion::V3),
            _ => Err(Error::UnsupportedVersion { found }),
        };
    }

    Err(Error::UnsupportedVersion { found: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_versions() {
        let v2 = ApiSpec::parse("swagger: '2.0'\npaths: {}\n").unwrap();
        assert_eq!(v2.version(), SpecVersion::V2);

        let v2_unquoted = ApiSpec::parse("swagger: 2.0\npaths: {}\n").unwrap();
        assert_eq!(v2_unquoted.version(), SpecVersion::V2);

        let v3 = ApiSpec::parse("openapi: 3.1.0\npaths: {}\n").unwrap();
        assert_eq!(v3.version(), SpecVersion::V3);
    }

    #[test]
    fn json_documents_parse() {
        let spec = ApiSpec::parse(
            r#"{"openapi":"3.0.0","paths":{"/a":{"get":{"responses":{"200":{"description":"ok"}}}}}}"#,
        )
        .unwrap();
        assert!(spec
            .operation(HttpMethod::Get, "/a")
            .unwrap()
            .allows_status(200));
    }

    #[test]
    fn rejects_unknown_versions() {
        let err = ApiSpec::parse("openapi: 4.0.0\n").unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { found: Some(v) } if v == "4.0.0"));

        let err = ApiSpec::parse("info: {}\n").unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion { found: None }));
    }

    #[test]
    fn rejects_non_mapping_root() {
        let err = ApiSpec::parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { .. }));
    }

    #[test]
    fn rejects_invalid_yaml() {
        let err = ApiSpec::parse("paths: [[[").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn keeps_path_and_operation_order() {
        let spec = ApiSpec::parse(
            r"
openapi: 3.0.0
paths:
  /b:
    post: {}
    get: {}
  /a:
    delete: {}
",
        )
        .unwrap();
        let listed: Vec<String> = spec
            .operations()
            .map(|op| format!("{} {}", op.method, op.path))
            .collect();
        assert_eq!(listed, vec!["POST /b", "GET /b", "DELETE /a"]);
        assert!(spec.path("/c").is_none());
    }
}
