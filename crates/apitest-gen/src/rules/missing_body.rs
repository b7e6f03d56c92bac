//! Missing-Body-Property rule.

use apitest_model::{Assertion, TestCase};

use super::{request_with_empty_path_params, schema_with_properties, Generated, Rule};
use crate::spec::{OperationDescriptor, SchemaTable};

/// Sending `{}` where a body with declared properties is required must be
/// rejected with 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingBodyProperty;

impl Rule for MissingBodyProperty {
    fn name(&self) -> &'static str {
        "missing-body-property"
    }

    fn apply(&self, operation: &OperationDescriptor, schemas: &SchemaTable) -> Option<Generated> {
        let schema = schema_with_properties(operation.required_body_schema_ref(), schemas)?;

        let method = operation.method;
        let path = &operation.path;
        let request = request_with_empty_path_params(operation)
            .with_body("{}")
            .with_assertion(Assertion::status_equals(400));
        let test_case = TestCase::single(
            format!("{method} {path} bad request (missing body property)"),
            request,
        );
        let rationale = format!(
            "The method {method} {path} requires a body following the {} schema. \
             Intentionally violating it should return status code 400 (Bad request).",
            schema.name
        );
        Some((test_case, rationale))
    }
}
