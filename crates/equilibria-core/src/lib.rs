//! Environment, agents, and the step scheduler for iterative equilibrium
//! search.
//!
//! Coupled equations whose quantities depend on each other are solved by
//! iteration: each quantity is computed by an agent from the current
//! values of the others, and the scheduler repeats until the caller is
//! satisfied the values have settled.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`]: a named, periodic policy over the environment.
//! - [`environment`] -- [`Environment`]: the shared variable bindings.
//! - [`error`] -- [`AgentError`] raised by policies.
//! - [`game`] -- [`Game`]: registration, stepping, run and finalize.
//! - [`numeric`] -- clamping and real-part helpers for policies.
//! - [`value`] -- [`Value`]: what a variable can hold.

pub mod agent;
pub mod environment;
pub mod error;
pub mod game;
pub mod numeric;
pub mod value;

pub use agent::{Actor, Agent, EVERY_STEP};
pub use environment::Environment;
pub use error::AgentError;
pub use game::{
    Entry, Game, GameError, GameOptions, NoOpObserver, Registrations, StepObserver, StepSummary,
};
pub use value::Value;
