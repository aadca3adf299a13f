//! Error types raised by agent actors.
//!
//! An actor failure is never caught by the scheduler: it aborts the step
//! and surfaces to the caller wrapped in [`GameError::Agent`].
//!
//! [`GameError::Agent`]: crate::game::GameError::Agent

/// Errors an agent's actor can raise while computing its value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    /// The actor read a variable that has not been computed or seeded yet.
    #[error("environment has no value for `{key}`")]
    MissingKey {
        /// The variable that was looked up.
        key: String,
    },

    /// The variable exists but holds the wrong kind of value.
    #[error("`{key}` holds a {found} value, expected {expected}")]
    TypeMismatch {
        /// The variable that was looked up.
        key: String,
        /// The kind the actor asked for.
        expected: &'static str,
        /// The kind actually stored.
        found: &'static str,
    },

    /// A numeric domain error (e.g. the log of a non-positive number).
    #[error("domain error: {message}")]
    Domain {
        /// Description of the offending computation.
        message: String,
    },

    /// An observer failed to render its output.
    #[error("render error: {message}")]
    Render {
        /// Description of the rendering failure.
        message: String,
    },
}

impl AgentError {
    /// Shorthand for a [`AgentError::Domain`] error.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }
}
