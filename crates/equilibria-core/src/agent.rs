//! Agents: named, periodic policies over the environment.
//!
//! An [`Agent`] wraps an actor, any function `&Environment -> Value`, with
//! the scheduling data the [`Game`] needs: the variable it writes (if
//! any), how often it fires, and an optional default used to seed the
//! environment before the first step.
//!
//! Agents are immutable once built. To reuse one policy under a different
//! name or cadence, derive a new agent with [`Agent::clone_with`]; the
//! actor is shared, the original is left untouched.
//!
//! [`Game`]: crate::game::Game

use std::fmt;
use std::num::NonZeroU64;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::AgentError;
use crate::value::Value;

/// The callable at the heart of an agent.
pub type Actor = dyn Fn(&Environment) -> Result<Value, AgentError>;

/// Period of an agent that fires on every step.
pub const EVERY_STEP: NonZeroU64 = NonZeroU64::MIN;

/// A periodic policy producing one value per firing.
#[derive(Clone)]
pub struct Agent {
    /// Environment key the output is written to. `None` for observers.
    name: Option<String>,
    /// The policy itself, shared between clones.
    actor: Rc<Actor>,
    /// Fires when `step % period == 0`.
    period: NonZeroU64,
    /// Seed value for `name` before the first computation.
    default: Option<Value>,
}

impl Agent {
    /// Create a named agent that fires every step.
    pub fn new<F>(name: impl Into<String>, actor: F) -> Self
    where
        F: Fn(&Environment) -> Result<Value, AgentError> + 'static,
    {
        Self {
            name: Some(name.into()),
            actor: Rc::new(actor),
            period: EVERY_STEP,
            default: None,
        }
    }

    /// Create an unnamed agent. Its output is discarded; it exists for
    /// its side effects (logging, tracing, recording).
    pub fn observer<F>(actor: F) -> Self
    where
        F: Fn(&Environment) -> Result<Value, AgentError> + 'static,
    {
        Self {
            name: None,
            actor: Rc::new(actor),
            period: EVERY_STEP,
            default: None,
        }
    }

    /// Set the firing period.
    #[must_use]
    pub fn with_period(mut self, period: NonZeroU64) -> Self {
        self.period = period;
        self
    }

    /// Set the default value seeded into the environment on registration.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Derive a new agent sharing this one's actor and default.
    ///
    /// `name` and `period` override the inherited values when given.
    /// `self` is not modified.
    #[must_use]
    pub fn clone_with(&self, name: Option<&str>, period: Option<NonZeroU64>) -> Self {
        Self {
            name: name.map(str::to_owned).or_else(|| self.name.clone()),
            actor: Rc::clone(&self.actor),
            period: period.unwrap_or(self.period),
            default: self.default,
        }
    }

    /// Run the actor against `env`.
    ///
    /// # Errors
    ///
    /// Returns whatever the actor raises, unmodified.
    pub fn invoke(&self, env: &Environment) -> Result<Value, AgentError> {
        (self.actor)(env)
    }

    /// Whether this agent fires on the given step index.
    pub const fn fires_at(&self, step: u64) -> bool {
        // `period` is non-zero, so the remainder always exists.
        matches!(step.checked_rem(self.period.get()), Some(0))
    }

    /// The environment key this agent writes, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The firing period.
    pub const fn period(&self) -> NonZeroU64 {
        self.period
    }

    /// The default value, if one was supplied.
    pub const fn default_value(&self) -> Option<Value> {
        self.default
    }

    /// Whether a default value was supplied.
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("period", &self.period)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
