//! Error types for sqlstitch

use crate::engine::ClauseAction;
use thiserror::Error;

/// Result type alias for sqlstitch operations
pub type StitchResult<T> = Result<T, StitchError>;

/// Errors raised while building SQL or reading parameters back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StitchError {
    /// A clause was called directly in a position where it cannot appear.
    #[error("Illegal clause: {action:?} is not allowed after {blocked_by:?}")]
    IllegalClause {
        action: ClauseAction,
        blocked_by: ClauseAction,
    },

    /// A parameter descriptor already carries a name.
    #[error("Parameter is already named '{name}' and cannot be renamed")]
    AlreadyNamed { name: String },

    /// A descriptor or template was wrapped into another descriptor.
    #[error("Value is already a parameter descriptor or template and cannot be wrapped again")]
    NestedParameter,

    /// No parameter is registered under the name.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// The stored value cannot be converted to the requested type.
    #[error("Parameter '{name}' holds {found} which cannot be read as {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The stored value is null and the requested type is not an `Option`.
    #[error("Parameter '{0}' is null")]
    NullValue(String),

    /// Invalid or unreadable settings.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StitchError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is an illegal clause error
    pub fn is_illegal_clause(&self) -> bool {
        matches!(self, Self::IllegalClause { .. })
    }

    /// Check if this is a parameter lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ParameterNotFound(_))
    }
}
