//! Kit-level errors
//!
//! Raised while building selectors or resolving them. Failures of the test
//! units themselves are never reported here; they are recorded in
//! [`ExecutionResults`](crate::models::ExecutionResults).

use thiserror::Error;

/// Errors raised by the kit before or instead of producing results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KitError {
    /// A value was supplied but is not usable (blank name, single missing type)
    #[error("{0}")]
    InvalidArgument(String),

    /// A required collection was not supplied at all
    #[error("{0}")]
    NullReference(String),

    /// A selector did not map onto anything the engine knows
    #[error("Could not resolve {selector}: {reason}")]
    Resolution { selector: String, reason: String },

    /// The engine could not be started
    #[error("Engine failure: {0}")]
    Engine(String),
}

impl KitError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        KitError::InvalidArgument(message.into())
    }

    pub fn null_reference(message: impl Into<String>) -> Self {
        KitError::NullReference(message.into())
    }

    pub fn resolution(selector: impl ToString, reason: impl Into<String>) -> Self {
        KitError::Resolution {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the kit
pub type KitResult<T> = Result<T, KitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message_is_verbatim() {
        let err = KitError::invalid_argument("methodParameterTypes must not be null");
        assert_eq!(err.to_string(), "methodParameterTypes must not be null");
    }

    #[test]
    fn test_resolution_message() {
        let err = KitError::resolution("[class:Missing]", "class not found");
        assert_eq!(
            err.to_string(),
            "Could not resolve [class:Missing]: class not found"
        );
    }
}
