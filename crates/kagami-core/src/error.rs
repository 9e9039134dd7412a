use thiserror::Error;

/// Errors that can occur during Kagami core operations.
///
/// Parsing itself never fails: ambiguous names fall back to defaults.
/// What remains are construction-time failures.
#[derive(Debug, Error)]
pub enum KagamiError {
    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Result type alias for Kagami core operations.
pub type Result<T> = std::result::Result<T, KagamiError>;
