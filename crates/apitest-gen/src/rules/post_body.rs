//! Valid-Creation-POST rule: synthesized request body.

use apitest_model::{Assertion, TestCase, TestRequest};
use serde_json::{Map, Value};

use super::{schema_with_properties, Generated, Rule};
use crate::spec::{HttpMethod, OperationDescriptor, PrimitiveKind, SchemaDescriptor, SchemaTable};

/// A `POST` without path parameters that declares 201 should accept a body
/// synthesized from its schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidCreationPost;

impl Rule for ValidCreationPost {
    fn name(&self) -> &'static str {
        "valid-creation-post"
    }

    fn apply(&self, operation: &OperationDescriptor, schemas: &SchemaTable) -> Option<Generated> {
        if operation.method != HttpMethod::Post
            || operation.path_parameters().next().is_some()
            || !operation.allows_status(201)
        {
            return None;
        }

        let schema = schema_with_properties(operation.body_schema_ref(), schemas)?;

        let path = &operation.path;
        let request = TestRequest::new("POST", path)
            .with_body(example_body(schema))
            .with_assertion(Assertion::status_equals(201));
        let test_case = TestCase::single(format!("Test POST {path}"), request);
        let rationale = format!(
            "A schema for the body of the method POST {path} is given in the documentation. \
             Based on this, an example body has been generated. Please check its correctness."
        );
        Some((test_case, rationale))
    }
}

/// Build a JSON object with a placeholder value per primitive property.
///
/// Properties of any other kind are left out of the body.
fn example_body(schema: &SchemaDescriptor) -> String {
    let body: Map<String, Value> = schema
        .properties
        .iter()
        .filter_map(|(name, kind)| {
            let value = match kind {
                PrimitiveKind::String => Value::from("text"),
                PrimitiveKind::Integer => Value::from(100),
                PrimitiveKind::Boolean => Value::from(true),
                PrimitiveKind::Other => return None,
            };
            Some((name.clone(), value))
        })
        .collect();

    Value::Object(body).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Parameter, ParameterLocation};
    use pretty_assertions::assert_eq;

    fn schemas() -> SchemaTable {
        [SchemaDescriptor::new(
            "Dish",
            [
                ("name", PrimitiveKind::String),
                ("rating", PrimitiveKind::Integer),
                ("vegan", PrimitiveKind::Boolean),
                ("price", PrimitiveKind::Other),
            ],
        )]
        .into_iter()
        .collect()
    }

    fn creation(path: &str) -> OperationDescriptor {
        OperationDescriptor::new(HttpMethod::Post, path)
            .with_request_body(false, Some("#/definitions/Dish"))
            .with_statuses(&[201, 400])
    }

    #[test]
    fn synthesizes_body_from_primitive_properties() {
        let (case, _) = ValidCreationPost.apply(&creation("/dishes"), &schemas()).unwrap();
        assert_eq!(case.name, "Test POST /dishes");

        let request = &case.requests[0];
        assert_eq!(request.assertions, vec![Assertion::status_equals(201)]);
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "name": "text", "rating": 100, "vegan": true })
        );
    }

    #[test]
    fn abstains_on_path_parameters_or_missing_201() {
        let with_path = creation("/menus/{id}/dishes")
            .with_parameter(Parameter::new("id", ParameterLocation::Path, true));
        assert!(ValidCreationPost.apply(&with_path, &schemas()).is_none());

        let mut no_201 = creation("/dishes");
        no_201.status_codes.remove("201");
        assert!(ValidCreationPost.apply(&no_201, &schemas()).is_none());
    }

    #[test]
    fn abstains_without_resolvable_schema() {
        let op = OperationDescriptor::new(HttpMethod::Post, "/dishes")
            .with_request_body(true, Some("#/definitions/Nope"))
            .with_statuses(&[201]);
        assert!(ValidCreationPost.apply(&op, &schemas()).is_none());
    }

    #[test]
    fn single_string_property_body() {
        let schemas: SchemaTable = [SchemaDescriptor::new("Test", [("name", PrimitiveKind::String)])]
            .into_iter()
            .collect();
        let op = OperationDescriptor::new(HttpMethod::Post, "/test")
            .with_request_body(true, Some("#/components/schemas/Test"))
            .with_statuses(&[201]);
        let (case, _) = ValidCreationPost.apply(&op, &schemas).unwrap();
        assert_eq!(case.requests[0].body, r#"{"name":"text"}"#);
    }
}
