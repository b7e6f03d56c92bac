//! Generator rules.
//!
//! Each rule inspects one [`OperationDescriptor`] and either produces a
//! single test case with its rationale or abstains. Rules are independent:
//! the pipeline runs every enabled rule and unions their outputs.
//!
//! - [`SimpleGet`]: parameterless `GET` must return 200
//! - [`MissingBodyProperty`]: empty body against a required schema → 400
//! - [`ResourceNotFound`]: empty path parameters → 404
//! - [`UnauthorizedAccess`]: anonymous caller → 401 (else 403)
//! - [`ValidCreationPost`]: synthesized body for `POST` → 201

mod missing_body;
mod not_found;
mod post_body;
mod simple_get;
mod unauthorized;

use apitest_model::{TestCase, TestRequest};

use crate::spec::{OperationDescriptor, SchemaDescriptor, SchemaTable};

pub use missing_body::MissingBodyProperty;
pub use not_found::ResourceNotFound;
pub use post_body::ValidCreationPost;
pub use simple_get::SimpleGet;
pub use unauthorized::UnauthorizedAccess;

/// A test case paired with the human-readable reason it should hold.
pub type Generated = (TestCase, String);

/// A structural test case generator.
///
/// Implementations must be pure: the same descriptor and schema table always
/// yield the same result.
pub trait Rule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Produce a test case for `operation`, or `None` to abstain.
    fn apply(&self, operation: &OperationDescriptor, schemas: &SchemaTable) -> Option<Generated>;
}

/// A request for the operation's method and path with every path parameter
/// set to `""`.
fn request_with_empty_path_params(operation: &OperationDescriptor) -> TestRequest {
    operation.path_parameters().fold(
        TestRequest::new(operation.method.as_str(), &operation.path),
        |request, param| request.with_path_param(&param.name, ""),
    )
}

/// Resolve the body schema reference, keeping it only if it has properties.
fn schema_with_properties<'a>(
    schema_ref: Option<&str>,
    schemas: &'a SchemaTable,
) -> Option<&'a SchemaDescriptor> {
    schemas
        .resolve(schema_ref?)
        .filter(|schema| schema.has_properties())
}
