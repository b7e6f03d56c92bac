//! Shared test case model for the apitest-gen ecosystem.
//!
//! This crate holds the value types exchanged between the generator
//! (`apitest-gen`) and whatever executes the generated cases: a [`TestCase`]
//! is a named sequence of [`TestRequest`]s, each carrying its own
//! [`Assertion`]s. The serde representation of these types is the agreed
//! wire shape; you should not need to depend on this crate directly unless
//! you consume generated cases.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod test_case;

pub use test_case::{
    Assertion, Comparator, TestCase, TestRequest, ANONYMOUS_AGENT, DEFAULT_AGENT,
    STATUS_CODE_ASSERTION_TYPE,
};
