//! Test case, request and assertion value types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Agent selector meaning "whatever identity the executor uses by default".
pub const DEFAULT_AGENT: i32 = -1;

/// Agent selector meaning "call without credentials".
pub const ANONYMOUS_AGENT: i32 = 0;

/// Wire id of the status code assertion kind.
pub const STATUS_CODE_ASSERTION_TYPE: u8 = 0;

/// A named, executable test case.
///
/// Equality, ordering and hashing are structural, so a `TestCase` can key a
/// map of generated cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Human-readable label.
    pub name: String,
    /// Requests executed in order.
    pub requests: Vec<TestRequest>,
}

impl TestCase {
    /// Create a test case consisting of exactly one request.
    #[must_use]
    pub fn single(name: impl Into<String>, request: TestRequest) -> Self {
        Self {
            name: name.into(),
            requests: vec![request],
        }
    }
}

/// One HTTP request of a test case, together with its assertions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    /// Upper-case HTTP method (e.g., `"GET"`).
    pub method: String,
    /// Path template, placeholders (`{id}`) left unresolved.
    pub path: String,
    /// Placeholder name → value.
    #[serde(default)]
    pub path_params: BTreeMap<String, String>,
    /// Identity selector, see [`DEFAULT_AGENT`] and [`ANONYMOUS_AGENT`].
    #[serde(default = "default_agent")]
    pub auth_selected_agent: i32,
    /// Raw request body. Empty means no body.
    #[serde(default)]
    pub body: String,
    /// Assertions checked against the response.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

fn default_agent() -> i32 {
    DEFAULT_AGENT
}

impl TestRequest {
    /// Create a request with no body, no path parameters and the default agent.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            path_params: BTreeMap::new(),
            auth_selected_agent: DEFAULT_AGENT,
            body: String::new(),
            assertions: Vec::new(),
        }
    }

    /// Set the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the identity selector.
    #[must_use]
    pub fn with_agent(mut self, agent: i32) -> Self {
        self.auth_selected_agent = agent;
        self
    }

    /// Set a path placeholder value.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Append an assertion.
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }
}

/// How an assertion compares the observed value with the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Comparator {
    /// Observed value must equal the expected value.
    Equals,
}

impl Comparator {
    /// Numeric wire id.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Equals => 0,
        }
    }

    /// Inverse of [`Comparator::id`].
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Equals),
            _ => None,
        }
    }
}

/// A check applied to a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "WireAssertion", try_from = "WireAssertion")]
pub enum Assertion {
    /// Compare the response status code.
    StatusCode {
        /// Position among the request's assertions. Not part of the wire shape.
        order: u32,
        /// Comparison operator.
        comparator: Comparator,
        /// Expected HTTP status.
        expected_status: u16,
    },
}

impl Assertion {
    /// `status == expected`, at position 0.
    #[must_use]
    pub fn status_equals(expected_status: u16) -> Self {
        Self::StatusCode {
            order: 0,
            comparator: Comparator::Equals,
            expected_status,
        }
    }

    /// Expected status of a status code assertion.
    #[must_use]
    pub fn expected_status(&self) -> Option<u16> {
        match self {
            Self::StatusCode {
                expected_status, ..
            } => Some(*expected_status),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAssertion {
    assertion_type: u8,
    comparator: u8,
    expected_status: u16,
}

impl From<Assertion> for WireAssertion {
    fn from(assertion: Assertion) -> Self {
        match assertion {
            Assertion::StatusCode {
                comparator,
                expected_status,
                ..
            } => Self {
                assertion_type: STATUS_CODE_ASSERTION_TYPE,
                comparator: comparator.id(),
                expected_status,
            },
        }
    }
}

impl TryFrom<WireAssertion> for Assertion {
    type Error = String;

    fn try_from(wire: WireAssertion) -> Result<Self, Self::Error> {
        if wire.assertion_type != STATUS_CODE_ASSERTION_TYPE {
            return Err(format!("unknown assertion type {}", wire.assertion_type));
        }
        let comparator = Comparator::from_id(wire.comparator)
            .ok_or_else(|| format!("unknown comparator {}", wire.comparator))?;
        Ok(Self::StatusCode {
            order: 0,
            comparator,
            expected_status: wire.expected_status,
        })
    }
}
