//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and game execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// Building or running a game failed.
    #[error("game error: {source}")]
    Game {
        /// The underlying game error.
        #[from]
        source: equilibria_core::GameError,
    },

    /// A strategy could not be constructed.
    #[error("strategy error: {source}")]
    Strategy {
        /// The underlying strategy error.
        #[from]
        source: equilibria_agents::StrategyError,
    },

    /// The final environment could not be serialized.
    #[error("output error: {source}")]
    Output {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
