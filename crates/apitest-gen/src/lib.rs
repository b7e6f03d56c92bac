#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod diff;
mod error;
mod generate;
mod output;
pub mod rules;
mod select;
pub mod spec;

pub use apitest_model::{Assertion, Comparator, TestCase, TestRequest};
pub use config::{ProjectConfig, RuleConfig};
pub use diff::{ChangedOperation, Endpoint, SpecDiff};
pub use error::{Error, Result};
pub use generate::{GenerateConfig, GeneratedSet, Generator};
pub use output::{selection_to_json, to_json, GeneratedItem};
pub use rules::{Generated, Rule};
pub use spec::{ApiSpec, HttpMethod, OperationDescriptor, SchemaTable, SpecVersion};

/// Generate test cases for every operation of a document, using all built-in rules.
///
/// # Errors
///
/// Returns an error if `document` cannot be parsed.
pub fn generate_for_specification(document: &str) -> Result<GeneratedSet> {
    let spec = ApiSpec::parse(document)?;
    Ok(Generator::default().generate_for_specification(&spec))
}

/// Generate test cases for the operations of one path of a document.
///
/// # Errors
///
/// Returns an error if `document` cannot be parsed, or
/// [`Error::PathNotFound`] if it does not declare `path`.
pub fn generate_for_path(document: &str, path: &str) -> Result<GeneratedSet> {
    let spec = ApiSpec::parse(document)?;
    Generator::default().generate_for_path(&spec, path)
}

/// Select at most one test case for the change from `old_document` to
/// `new_document`, using all built-in rules.
///
/// Returns `Ok(None)` when the revisions are identical or no new or changed
/// operation satisfies any rule.
///
/// # Errors
///
/// Returns an error if either document cannot be parsed.
pub fn select_test_for_change(old_document: &str, new_document: &str) -> Result<Option<Generated>> {
    if old_document == new_document {
        return Ok(None);
    }
    let old = ApiSpec::parse(old_document)?;
    let new = ApiSpec::parse(new_document)?;
    let diff = SpecDiff::between(&old, &new);
    Ok(Generator::default().select_test_for_change(&diff, &new))
}
