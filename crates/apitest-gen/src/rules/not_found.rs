//! Resource-Not-Found rule.

use apitest_model::{Assertion, TestCase};

use super::{request_with_empty_path_params, Generated, Rule};
use crate::spec::{OperationDescriptor, SchemaTable};

/// Empty path parameters address no resource, so a declared 404 must be returned.
///
/// The rationale is left empty; the test name already states the contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceNotFound;

impl Rule for ResourceNotFound {
    fn name(&self) -> &'static str {
        "resource-not-found"
    }

    fn apply(&self, operation: &OperationDescriptor, _schemas: &SchemaTable) -> Option<Generated> {
        if operation.path_parameters().next().is_none() || !operation.allows_status(404) {
            return None;
        }

        let request =
            request_with_empty_path_params(operation).with_assertion(Assertion::status_equals(404));
        let test_case = TestCase::single(
            format!("{} {} not found test", operation.method, operation.path),
            request,
        );
        Some((test_case, String::new()))
    }
}
