//! Unauthorized-Access rule.

use apitest_model::{Assertion, TestCase, ANONYMOUS_AGENT};

use super::{request_with_empty_path_params, Generated, Rule};
use crate::spec::{OperationDescriptor, SchemaTable};

/// If 401 or 403 is declared, the operation may require an identity; calling
/// it anonymously must be refused. 401 takes precedence over 403.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthorizedAccess;

impl Rule for UnauthorizedAccess {
    fn name(&self) -> &'static str {
        "unauthorized-access"
    }

    fn apply(&self, operation: &OperationDescriptor, _schemas: &SchemaTable) -> Option<Generated> {
        let status = [401, 403]
            .into_iter()
            .find(|code| operation.allows_status(*code))?;

        let method = operation.method;
        let path = &operation.path;
        let request = request_with_empty_path_params(operation)
            .with_agent(ANONYMOUS_AGENT)
            .with_assertion(Assertion::status_equals(status));
        let test_case = TestCase::single(format!("Unauthorized test for {method} {path}"), request);
        let rationale = format!(
            "The method {method} {path} might require an authenticated caller. Therefore, \
             a request without credentials should result in status code {status}. \
             All parameters (if there are any) can be set to arbitrary values."
        );
        Some((test_case, rationale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{HttpMethod, Parameter, ParameterLocation};

    fn expected_status(op: &OperationDescriptor) -> Option<u16> {
        let (case, _) = UnauthorizedAccess.apply(op, &SchemaTable::default())?;
        case.requests[0].assertions[0].expected_status()
    }

    #[test]
    fn prefers_401_over_403() {
        let both = OperationDescriptor::new(HttpMethod::Delete, "/test").with_statuses(&[403, 401]);
        assert_eq!(expected_status(&both), Some(401));

        let only_403 = OperationDescriptor::new(HttpMethod::Delete, "/test").with_statuses(&[403]);
        assert_eq!(expected_status(&only_403), Some(403));

        let neither = OperationDescriptor::new(HttpMethod::Delete, "/test").with_statuses(&[200]);
        assert_eq!(expected_status(&neither), None);
    }

    #[test]
    fn uses_anonymous_agent_and_empty_path_params() {
        let op = OperationDescriptor::new(HttpMethod::Get, "/test/{id}")
            .with_parameter(Parameter::new("id", ParameterLocation::Path, true))
            .with_statuses(&[200, 401]);

        let (case, rationale) = UnauthorizedAccess.apply(&op, &SchemaTable::default()).unwrap();
        assert_eq!(case.name, "Unauthorized test for GET /test/{id}");
        let request = &case.requests[0];
        assert_eq!(request.auth_selected_agent, ANONYMOUS_AGENT);
        assert_eq!(request.path_params["id"], "");
        assert!(request.body.is_empty());
        assert!(rationale.contains("status code 401"));
    }
}
