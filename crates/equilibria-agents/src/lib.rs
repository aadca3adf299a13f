//! Reusable agent strategies for equilibrium games.
//!
//! The scheduler in `equilibria-core` treats every agent as an opaque
//! function of the environment. This crate provides the construction
//! functions that build the common shapes of that function.
//!
//! # Modules
//!
//! - [`debug`] -- [`debug_agent`]: periodically log a rendered template.
//! - [`error`] -- [`StrategyError`] for strategy construction failures.
//! - [`policy`] -- closed-form numeric policies and constants.
//! - [`tracked`] -- wrap an agent to record the steps it fires on.
//! - [`trajectory`] -- a step observer that records variables over time.

pub mod debug;
pub mod error;
pub mod policy;
pub mod tracked;
pub mod trajectory;

pub use debug::debug_agent;
pub use error::StrategyError;
pub use policy::{constant_agent, policy, probability_policy};
pub use tracked::{FiringLog, tracked};
pub use trajectory::TrajectoryRecorder;
