//! Error types for Valise

use thiserror::Error;

/// Result type alias using Valise's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Valise
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model backend protocol error (fatal to a run)
    #[error("Model provider error: {0}")]
    Provider(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    /// Invalid input (bad tool arguments, malformed operator input)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tool-level failure (upstream lookup error); recovered inside the run
    #[error("Tool failure: {0}")]
    ToolFailure(String),

    /// The agent exhausted its re-ask budget without producing a final answer
    #[error("Agent did not converge within {0} re-ask cycles")]
    NonConvergence(u32),
}

impl Error {
    /// Check if the error is recoverable inside the conversation loop.
    ///
    /// Recoverable errors are converted into tool-result turns and fed back
    /// to the model; everything else is surfaced to the run's caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::ToolFailure(_))
    }

    /// Check if the error means the run never converged (as opposed to a
    /// structural failure)
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, Error::NonConvergence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failures_are_recoverable() {
        assert!(Error::ToolFailure("city not found".into()).is_recoverable());
        assert!(Error::InvalidInput("missing 'city'".into()).is_recoverable());
        assert!(!Error::Provider("connection refused".into()).is_recoverable());
    }

    #[test]
    fn non_convergence_is_distinct() {
        assert!(Error::NonConvergence(8).is_non_convergence());
        assert!(!Error::Provider("boom".into()).is_non_convergence());
    }
}
