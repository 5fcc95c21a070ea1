//! Error types and result definitions for sjs.
//!
//! Every variant is fatal: there is no guest-level catch, so an error unwinds
//! the whole evaluation. Cached and uncached dispatch must produce the same
//! variant with the same payload for the same failing operation.

use thiserror::Error;

/// The unified result type used throughout sjs.
pub type RtResult<T> = Result<T, RuntimeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Argument count disagrees with a non-variadic target.
    #[error("wrong number of arguments for {name}: {found} given, expected {expected}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// No binding found during global or lexical resolution.
    #[error("reference error: {name} is not defined")]
    UnboundIdentifier { name: String },

    /// The resolved value cannot be called.
    #[error("type error: {what} is not a function")]
    NotInvocable { what: String },

    /// Property access on something that is not an object.
    #[error("type error: {what} is not an object")]
    NotAnObject { what: String },

    /// Method call whose property resolved to undefined.
    #[error("type error: no method {name}")]
    NoSuchMethod { name: String },

    #[error("type error: {message}")]
    TypeError { message: String },

    #[error("division by zero")]
    DivisionByZero,
}

impl RuntimeError {
    pub fn arity(name: &str, expected: usize, found: usize) -> Self {
        RuntimeError::ArityMismatch {
            name: name.to_string(),
            expected,
            found,
        }
    }

    pub fn unbound(name: &str) -> Self {
        RuntimeError::UnboundIdentifier {
            name: name.to_string(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
        }
    }
}
