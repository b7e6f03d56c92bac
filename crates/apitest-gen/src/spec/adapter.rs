//! Operation descriptor adapter.
//!
//! Normalizes a v2 or v3 operation node into one [`OperationDescriptor`] so
//! rules are written once against a single shape. Version-specific details
//! (`in: body` parameters vs. `requestBody`, `#/parameters` vs.
//! `#/components/parameters`) stay in this module.

use std::collections::BTreeSet;
use std::fmt;

use serde_yaml_ng::{Mapping, Value};

use super::helpers::{is_json_media_type, ref_of, resolve_node, scalar_to_string};
use super::SpecVersion;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `PATCH`
    Patch,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Parse a path item key (`get`, `post`, ...). Keys are case-sensitive.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// Path template placeholder.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie (v3 only).
    Cookie,
    /// Legacy v2 body parameter.
    Body,
    /// Legacy v2 form field.
    FormData,
}

impl ParameterLocation {
    /// Parse the `in` field of a parameter.
    #[must_use]
    pub fn from_in(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            "body" => Some(Self::Body),
            "formData" => Some(Self::FormData),
            _ => None,
        }
    }
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Where the parameter is carried.
    pub location: ParameterLocation,
    /// Whether the parameter must be supplied.
    pub required: bool,
}

impl Parameter {
    /// Create a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
        }
    }
}

/// Request body of an operation, from either a v2 `in: body` parameter or a
/// v3 `requestBody`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    /// Whether a body must be sent.
    pub required: bool,
    /// Schema `$ref` of the first JSON representation, when it is a reference.
    pub schema_ref: Option<String>,
}

/// Version-independent view of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders.
    pub path: String,
    /// Parameters in declaration order (operation-level first, inherited
    /// path-level after).
    pub parameters: Vec<Parameter>,
    /// Request body, if the operation declares one.
    pub request_body: Option<RequestBody>,
    /// Declared response keys (`"200"`, `"404"`, `"default"`, ...).
    pub status_codes: BTreeSet<String>,
}

impl OperationDescriptor {
    /// Create a descriptor with no parameters, body or responses.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            parameters: Vec::new(),
            request_body: None,
            status_codes: BTreeSet::new(),
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the request body.
    #[must_use]
    pub fn with_request_body(mut self, required: bool, schema_ref: Option<&str>) -> Self {
        self.request_body = Some(RequestBody {
            required,
            schema_ref: schema_ref.map(ToString::to_string),
        });
        self
    }

    /// Declare response status codes.
    #[must_use]
    pub fn with_statuses(mut self, codes: &[u16]) -> Self {
        self.status_codes
            .extend(codes.iter().map(ToString::to_string));
        self
    }

    /// True iff the parameter list is empty, whatever the locations.
    #[must_use]
    pub fn has_no_parameters(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameters carried in the path template.
    pub fn path_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
    }

    /// Whether the operation declares a response with this status code.
    #[must_use]
    pub fn allows_status(&self, code: u16) -> bool {
        self.status_codes.contains(&code.to_string())
    }

    /// Schema reference of the request body, if any.
    #[must_use]
    pub fn body_schema_ref(&self) -> Option<&str> {
        self.request_body.as_ref()?.schema_ref.as_deref()
    }

    /// Schema reference of the request body, only when the body is required.
    #[must_use]
    pub fn required_body_schema_ref(&self) -> Option<&str> {
        self.request_body
            .as_ref()
            .filter(|body| body.required)?
            .schema_ref
            .as_deref()
    }
}

/// Build a descriptor from a raw operation node.
///
/// Assumes a structurally valid document; malformed entries (parameters
/// without `name`/`in`, dangling `$ref`s) are skipped rather than reported.
pub(crate) fn adapt(
    doc: &Value,
    version: SpecVersion,
    method: HttpMethod,
    path: &str,
    operation: &Mapping,
    path_item: &Mapping,
) -> OperationDescriptor {
    let parameter_section: &[&str] = match version {
        SpecVersion::V2 => &["parameters"],
        SpecVersion::V3 => &["components", "parameters"],
    };

    let own = parameter_nodes(doc, parameter_section, operation);
    let inherited = parameter_nodes(doc, parameter_section, path_item);

    let mut parameters: Vec<Parameter> = own.iter().filter_map(|n| to_parameter(n)).collect();
    let mut request_body = None;

    for node in &inherited {
        let Some(param) = to_parameter(node) else {
            continue;
        };
        let overridden = parameters
            .iter()
            .any(|p| p.name == param.name && p.location == param.location);
        if !overridden {
            parameters.push(param);
        }
    }

    match version {
        SpecVersion::V2 => {
            let body_node = own
                .iter()
                .chain(inherited.iter())
                .find(|n| n.get("in").and_then(Value::as_str) == Some("body"));
            if let Some(node) = body_node {
                request_body = Some(RequestBody {
                    required: is_required(node, false),
                    schema_ref: node.get("schema").and_then(ref_of).map(ToString::to_string),
                });
            }
        }
        SpecVersion::V3 => {
            request_body = operation
                .get("requestBody")
                .and_then(|node| resolve_node(doc, &["components", "requestBodies"], node))
                .and_then(Value::as_mapping)
                .map(v3_request_body);
        }
    }

    let status_codes = operation
        .get("responses")
        .and_then(Value::as_mapping)
        .map(|responses| responses.keys().filter_map(scalar_to_string).collect())
        .unwrap_or_default();

    OperationDescriptor {
        method,
        path: path.to_string(),
        parameters,
        request_body,
        status_codes,
    }
}

/// Resolved parameter mappings declared under `parameters` of `owner`.
fn parameter_nodes<'a>(doc: &'a Value, section: &[&str], owner: &'a Mapping) -> Vec<&'a Mapping> {
    owner
        .get("parameters")
        .and_then(Value::as_sequence)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| resolve_node(doc, section, p)?.as_mapping())
                .collect()
        })
        .unwrap_or_default()
}

fn to_parameter(node: &Mapping) -> Option<Parameter> {
    let name = node.get("name")?.as_str()?;
    let location = ParameterLocation::from_in(node.get("in")?.as_str()?)?;
    Some(Parameter {
        name: name.to_string(),
        location,
        required: is_required(node, location == ParameterLocation::Path),
    })
}

fn is_required(node: &Mapping, default: bool) -> bool {
    node.get("required")
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

/// Extract the body from a v3 `requestBody`: the schema of the first
/// JSON-compatible media type, in declaration order.
fn v3_request_body(body: &Mapping) -> RequestBody {
    let schema_ref = body
        .get("content")
        .and_then(Value::as_mapping)
        .and_then(|content| {
            content
                .iter()
                .find(|(media_type, _)| media_type.as_str().is_some_and(is_json_media_type))
        })
        .and_then(|(_, media)| media.as_mapping()?.get("schema"))
        .and_then(ref_of)
        .map(ToString::to_string);

    RequestBody {
        required: is_required(body, false),
        schema_ref,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn adapt_first(yaml: &str, version: SpecVersion) -> OperationDescriptor {
        let doc: Value = serde_yaml_ng::from_str(yaml).unwrap();
        let mut found = None;
        super::super::helpers::for_each_operation(&doc, |path, method, op, item| {
            if found.is_none() {
                let method = HttpMethod::from_key(method).unwrap();
                found = Some(adapt(&doc, version, method, path, op, item));
            }
        });
        found.unwrap()
    }

    #[test]
    fn absent_parameters_equal_empty_list() {
        let absent = adapt_first("paths:\n  /a:\n    get: {}\n", SpecVersion::V3);
        let empty = adapt_first("paths:\n  /a:\n    get:\n      parameters: []\n", SpecVersion::V3);
        assert!(absent.has_no_parameters());
        assert_eq!(absent.parameters, empty.parameters);
    }

    #[test]
    fn v2_body_parameter_becomes_request_body() {
        let op = adapt_first(
            r"
swagger: '2.0'
paths:
  /pets:
    post:
      parameters:
        - name: pet
          in: body
          required: true
          schema:
            $ref: '#/definitions/Pet'
      responses:
        201:
          description: created
",
            SpecVersion::V2,
        );
        assert_eq!(op.parameters.len(), 1, "body parameter stays in the list");
        assert_eq!(op.parameters[0].location, ParameterLocation::Body);
        assert_eq!(op.required_body_schema_ref(), Some("#/definitions/Pet"));
        assert!(op.allows_status(201));
    }

    #[test]
    fn v3_request_body_uses_first_json_media_type() {
        let op = adapt_first(
            r"
openapi: 3.0.3
paths:
  /pets:
    post:
      requestBody:
        content:
          application/xml:
            schema:
              $ref: '#/components/schemas/XmlPet'
          application/vnd.pet+json:
            schema:
              $ref: '#/components/schemas/Pet'
          application/json:
            schema:
              $ref: '#/components/schemas/Other'
",
            SpecVersion::V3,
        );
        assert!(op.has_no_parameters());
        assert_eq!(op.body_schema_ref(), Some("#/components/schemas/Pet"));
        assert_eq!(op.required_body_schema_ref(), None, "required defaults to false");
    }

    #[test]
    fn v3_request_body_ref_is_resolved() {
        let op = adapt_first(
            r"
openapi: 3.0.3
paths:
  /pets:
    put:
      requestBody:
        $ref: '#/components/requestBodies/PetBody'
components:
  requestBodies:
    PetBody:
      required: true
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Pet'
",
            SpecVersion::V3,
        );
        assert_eq!(op.required_body_schema_ref(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn inline_body_schema_has_no_ref() {
        let op = adapt_first(
            r"
openapi: 3.0.3
paths:
  /pets:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
",
            SpecVersion::V3,
        );
        assert!(op.request_body.is_some());
        assert_eq!(op.body_schema_ref(), None);
    }

    #[test]
    fn path_level_parameters_are_inherited_unless_overridden() {
        let op = adapt_first(
            r"
openapi: 3.0.3
paths:
  /pets/{id}:
    parameters:
      - name: id
        in: path
        required: true
      - name: verbose
        in: query
    get:
      parameters:
        - name: verbose
          in: query
          required: true
",
            SpecVersion::V3,
        );
        assert_eq!(
            op.parameters,
            vec![
                Parameter::new("verbose", ParameterLocation::Query, true),
                Parameter::new("id", ParameterLocation::Path, true),
            ]
        );
        assert_eq!(op.path_parameters().count(), 1);
    }

    #[test]
    fn parameter_refs_are_resolved_per_version() {
        let v2 = adapt_first(
            r"
swagger: '2.0'
parameters:
  Id:
    name: id
    in: path
paths:
  /a/{id}:
    get:
      parameters:
        - $ref: '#/parameters/Id'
",
            SpecVersion::V2,
        );
        assert_eq!(v2.path_parameters().count(), 1);
        assert!(v2.parameters[0].required, "path parameters default to required");

        let dangling = adapt_first(
            r"
openapi: 3.0.3
paths:
  /a/{id}:
    get:
      parameters:
        - $ref: '#/components/parameters/Nope'
",
            SpecVersion::V3,
        );
        assert!(dangling.has_no_parameters());
    }

    #[test]
    fn method_keys_are_lower_case_only() {
        assert_eq!(HttpMethod::from_key("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::from_key("DELETE"), None);
        assert_eq!(HttpMethod::from_key("summary"), None);
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }
}
