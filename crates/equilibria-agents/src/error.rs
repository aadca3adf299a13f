//! Error types for strategy construction.

/// Errors raised while building an agent strategy.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// A debug template failed to compile.
    #[error("invalid debug template: {source}")]
    Template {
        /// The underlying template error.
        #[from]
        source: minijinja::Error,
    },
}
