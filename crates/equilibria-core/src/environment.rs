//! The shared variable environment.
//!
//! A [`Environment`] maps variable names to [`Value`]s and carries a small
//! amount of read-only step metadata (owning game, current step index,
//! whether the game is finalizing). A [`Game`] owns exactly one
//! environment and hands out only shared references to it, so agents can
//! read everything but mutate nothing.
//!
//! Lookups of absent keys are errors, not defaults: a missing key means
//! the variable has not been computed yet, and the agent that asked for it
//! was scheduled too early.
//!
//! [`Game`]: crate::game::Game

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::error::AgentError;
use crate::value::Value;

/// Variable bindings plus step metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    /// Name of the owning game.
    game: String,
    /// Index of the step currently executing (or about to execute).
    step: u64,
    /// Whether the owning game is in its finalize phase.
    finalizing: bool,
    /// Variable name -> current value.
    vars: BTreeMap<String, Value>,
}

impl Environment {
    /// Create an empty environment for the named game.
    pub fn new(game: impl Into<String>) -> Self {
        Self {
            game: game.into(),
            ..Self::default()
        }
    }

    /// Name of the game that owns this environment.
    pub fn game_name(&self) -> &str {
        &self.game
    }

    /// Index of the step being executed.
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Whether the owning game is finalizing.
    pub const fn is_finalizing(&self) -> bool {
        self.finalizing
    }

    /// Look up a variable.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingKey`] if the variable is absent.
    pub fn get(&self, key: &str) -> Result<Value, AgentError> {
        self.vars
            .get(key)
            .copied()
            .ok_or_else(|| AgentError::MissingKey {
                key: key.to_owned(),
            })
    }

    /// Look up a variable, treating absence as "not yet computed".
    pub fn try_get(&self, key: &str) -> Option<Value> {
        self.vars.get(key).copied()
    }

    /// Look up a variable as a real number. Integers widen.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingKey`] if absent, or
    /// [`AgentError::TypeMismatch`] if the value has no real view.
    pub fn float(&self, key: &str) -> Result<f64, AgentError> {
        let value = self.get(key)?;
        value.as_f64().ok_or_else(|| AgentError::TypeMismatch {
            key: key.to_owned(),
            expected: "float",
            found: value.kind(),
        })
    }

    /// Look up a variable as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingKey`] if absent, or
    /// [`AgentError::TypeMismatch`] if the value is not an integer.
    pub fn int(&self, key: &str) -> Result<i64, AgentError> {
        let value = self.get(key)?;
        value.as_i64().ok_or_else(|| AgentError::TypeMismatch {
            key: key.to_owned(),
            expected: "int",
            found: value.kind(),
        })
    }

    /// Look up a variable as a boolean.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::MissingKey`] if absent, or
    /// [`AgentError::TypeMismatch`] if the value is not a boolean.
    pub fn boolean(&self, key: &str) -> Result<bool, AgentError> {
        let value = self.get(key)?;
        value.as_bool().ok_or_else(|| AgentError::TypeMismatch {
            key: key.to_owned(),
            expected: "bool",
            found: value.kind(),
        })
    }

    /// Whether the variable has been populated.
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Bind a variable, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are bound.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over the bindings.
    ///
    /// Iteration happens to be sorted by key; callers should not rely on it.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Borrow the raw bindings.
    pub const fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }

    /// Bind a variable only if it is absent. Returns whether it was bound.
    pub(crate) fn seed(&mut self, key: &str, value: Value) -> bool {
        if self.vars.contains_key(key) {
            return false;
        }
        self.vars.insert(key.to_owned(), value);
        true
    }

    /// Commit a batch of writes collected during an independent step.
    pub(crate) fn merge(&mut self, batch: BTreeMap<String, Value>) {
        self.vars.extend(batch);
    }

    pub(crate) const fn set_step(&mut self, step: u64) {
        self.step = step;
    }

    pub(crate) const fn set_finalizing(&mut self, finalizing: bool) {
        self.finalizing = finalizing;
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.vars.serialize(serializer)
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Environment {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
