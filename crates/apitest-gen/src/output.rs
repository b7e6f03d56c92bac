//! Caller-facing JSON rendering of generated test cases.

use apitest_model::TestCase;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generate::GeneratedSet;
use crate::rules::Generated;

/// One generated test case with its rationale, as serialized to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    /// The test case.
    pub test_case: TestCase,
    /// Why the test case should hold. May be empty.
    pub description: String,
}

impl From<Generated> for GeneratedItem {
    fn from((test_case, description): Generated) -> Self {
        Self {
            test_case,
            description,
        }
    }
}

/// Render a generated set as a JSON array of `{testCase, description}`,
/// ordered by test case.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn to_json(set: &GeneratedSet, pretty: bool) -> Result<String> {
    let items: Vec<GeneratedItem> = set
        .iter()
        .map(|(test_case, description)| GeneratedItem {
            test_case: test_case.clone(),
            description: description.to_string(),
        })
        .collect();
    render(&items, pretty)
}

/// Render a diff selection as one `{testCase, description}` object, or `{}`
/// when nothing was selected.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn selection_to_json(selection: Option<&Generated>, pretty: bool) -> Result<String> {
    match selection {
        Some(generated) => render(&GeneratedItem::from(generated.clone()), pretty),
        None => render(&serde_json::Map::new(), pretty),
    }
}

fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
