//! Error types for Caseline kernel operations.

/// Errors arising from case-kind registration and lookup.
///
/// Matching itself never fails: an empty or non-firing case list falls
/// through to the default.
#[derive(Debug, thiserror::Error)]
pub enum CaselineError {
    /// A registration argument is unusable (bad name or missing method).
    #[error("invalid argument for case kind `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },

    /// The case name collides with a built-in operation or an earlier registration.
    #[error("case name already in use: {0}")]
    DuplicateName(String),

    /// No case kind is registered under this name.
    #[error("unknown case kind: {0}")]
    CaseKindUnknown(String),
}

impl CaselineError {
    pub(crate) fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
