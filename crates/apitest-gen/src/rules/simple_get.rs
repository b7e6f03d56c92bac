//! Simple-Success-GET rule.

use apitest_model::{Assertion, TestCase, TestRequest};

use super::{Generated, Rule};
use crate::spec::{HttpMethod, OperationDescriptor, SchemaTable};

/// A `GET` without any parameters can always be called, so it must answer 200.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleGet;

impl Rule for SimpleGet {
    fn name(&self) -> &'static str {
        "simple-get"
    }

    fn apply(&self, operation: &OperationDescriptor, _schemas: &SchemaTable) -> Option<Generated> {
        if operation.method != HttpMethod::Get
            || !operation.has_no_parameters()
            || !operation.allows_status(200)
        {
            return None;
        }

        let path = &operation.path;
        let request = TestRequest::new("GET", path).with_assertion(Assertion::status_equals(200));
        let test_case = TestCase::single(format!("Simple GET {path} test"), request);
        let rationale = format!(
            "The method GET {path} has no parameters and therefore all requests \
             should return status code 200 (OK)."
        );
        Some((test_case, rationale))
    }
}
