//! Error types for rule documents.

use caseline_kernel::CaselineError;
use std::path::PathBuf;

/// Errors raised while loading or compiling a rule document.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// The document declares a schema this crate does not read.
    #[error("unsupported rule document schema: {0}")]
    UnsupportedSchema(u32),

    #[error("invalid rule document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid rule document TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A pattern test failed to compile.
    #[error("invalid pattern in case {index} (`{pattern}`): {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registration or case-kind lookup failed.
    #[error(transparent)]
    Kernel(#[from] CaselineError),
}
