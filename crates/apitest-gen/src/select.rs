//! Diff-driven single-test selection.

use crate::diff::SpecDiff;
use crate::generate::Generator;
use crate::rules::Generated;
use crate::spec::{ApiSpec, OperationDescriptor, SchemaTable};

impl Generator {
    /// Pick one test case for the change between two revisions.
    ///
    /// New endpoints are tried first, then changed operations (using their
    /// updated definitions), both in the diff's declaration order. The first
    /// candidate with any rule output wins, and its first test case in set
    /// order is returned. Returns `None` when `diff` has no changes or no
    /// candidate satisfies any rule.
    ///
    /// `updated` is the new revision; its schema table resolves body references.
    #[must_use]
    pub fn select_test_for_change(&self, diff: &SpecDiff, updated: &ApiSpec) -> Option<Generated> {
        if !diff.has_changes() {
            tracing::debug!("no changes between revisions");
            return None;
        }

        let new_endpoints = diff.new_endpoints().iter().map(|e| ("new", &e.operation));
        let changed = diff.changed_operations().iter().map(|c| ("changed", &c.updated));

        new_endpoints
            .chain(changed)
            .find_map(|(kind, operation)| self.first_for(kind, operation, updated.schemas()))
    }

    fn first_for(
        &self,
        kind: &'static str,
        operation: &OperationDescriptor,
        schemas: &SchemaTable,
    ) -> Option<Generated> {
        let selected = self.generate_for_operation(operation, schemas).pop_first();
        match &selected {
            Some((test_case, _)) => tracing::debug!(
                kind,
                method = %operation.method,
                path = %operation.path,
                test_case = %test_case.name,
                "selected test case for change"
            ),
            None => tracing::debug!(
                kind,
                method = %operation.method,
                path = %operation.path,
                "no rule applies to changed operation"
            ),
        }
        selected
    }
}
