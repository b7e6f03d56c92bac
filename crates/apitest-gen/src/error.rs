//! Typed error enum for the `apitest-gen` library API.
//!
//! Rule evaluation never fails; a rule that cannot apply abstains. These
//! errors cover the edges around it: reading and parsing documents and
//! config files, and serializing results. The CLI (`main.rs`) converts them
//! to `anyhow::Error` at the binary boundary for richer context messages.

/// Errors produced by `apitest-gen` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading config or document files).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure. JSON documents are parsed as YAML too.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization failure while rendering results.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The document declares neither `swagger: 2.x` nor `openapi: 3.x`.
    #[error(
        "unsupported specification version {found:?}; \
         expected `swagger: \"2.0\"` or `openapi: 3.x`"
    )]
    UnsupportedVersion {
        /// The version string found, if any.
        found: Option<String>,
    },

    /// The document is syntactically valid but not shaped like a specification.
    #[error("invalid specification document: {reason}")]
    InvalidDocument {
        /// What is wrong with the document.
        reason: String,
    },

    /// A path template requested by the caller is not declared in the document.
    #[error("path '{path}' is not declared in the specification")]
    PathNotFound {
        /// The unknown path template.
        path: String,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
