//! Structural difference between two specification revisions.
//!
//! Operations are matched by `(path, method)`. An operation present in both
//! revisions counts as changed when its raw node or its normalized descriptor
//! differs, so edits to path-level parameters are caught too.

use std::collections::BTreeSet;

use crate::spec::{ApiSpec, HttpMethod, OperationDescriptor};

/// An operation present in only one of the two revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// The operation as declared in the revision that has it.
    pub operation: OperationDescriptor,
}

/// An operation present in both revisions with a different definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedOperation {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub path: String,
    /// Definition in the old revision.
    pub previous: OperationDescriptor,
    /// Definition in the new revision.
    pub updated: OperationDescriptor,
}

/// Differences between an old and a new revision.
///
/// Every list follows declaration order: `new_endpoints` and
/// `changed_operations` that of the new revision, `missing_endpoints` that of
/// the old one, and `changed_schemas` is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecDiff {
    new_endpoints: Vec<Endpoint>,
    missing_endpoints: Vec<Endpoint>,
    changed_operations: Vec<ChangedOperation>,
    changed_schemas: Vec<String>,
}

impl SpecDiff {
    /// Compare two parsed revisions.
    #[must_use]
    pub fn between(old: &ApiSpec, new: &ApiSpec) -> Self {
        let mut diff = Self::default();

        for operation in new.operations() {
            let key = (operation.path.clone(), operation.method);
            let Some(previous) = old.operation(operation.method, &operation.path) else {
                diff.new_endpoints.push(Endpoint {
                    method: operation.method,
                    path: operation.path.clone(),
                    operation: operation.clone(),
                });
                continue;
            };

            if old.raw_operations.get(&key) != new.raw_operations.get(&key) || previous != operation {
                diff.changed_operations.push(ChangedOperation {
                    method: operation.method,
                    path: operation.path.clone(),
                    previous: previous.clone(),
                    updated: operation.clone(),
                });
            }
        }

        diff.missing_endpoints = old
            .operations()
            .filter(|op| new.operation(op.method, &op.path).is_none())
            .map(|op| Endpoint {
                method: op.method,
                path: op.path.clone(),
                operation: op.clone(),
            })
            .collect();

        let names: BTreeSet<&String> = old.raw_schemas.keys().chain(new.raw_schemas.keys()).collect();
        diff.changed_schemas = names
            .into_iter()
            .filter(|name| old.raw_schemas.get(*name) != new.raw_schemas.get(*name))
            .cloned()
            .collect();

        tracing::debug!(
            new_endpoints = diff.new_endpoints.len(),
            missing_endpoints = diff.missing_endpoints.len(),
            changed_operations = diff.changed_operations.len(),
            changed_schemas = diff.changed_schemas.len(),
            "computed specification diff"
        );

        diff
    }

    /// Whether the two revisions differ at all.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !(self.new_endpoints.is_empty()
            && self.missing_endpoints.is_empty()
            && self.changed_operations.is_empty()
            && self.changed_schemas.is_empty())
    }

    /// Operations only the new revision declares.
    #[must_use]
    pub fn new_endpoints(&self) -> &[Endpoint] {
        &self.new_endpoints
    }

    /// Operations only the old revision declares.
    #[must_use]
    pub fn missing_endpoints(&self) -> &[Endpoint] {
        &self.missing_endpoints
    }

    /// Operations whose definition changed.
    #[must_use]
    pub fn changed_operations(&self) -> &[ChangedOperation] {
        &self.changed_operations
    }

    /// Names of schemas added, removed or altered.
    #[must_use]
    pub fn changed_schemas(&self) -> &[String] {
        &self.changed_schemas
    }
}
