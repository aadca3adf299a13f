//! The step scheduler that drives agents toward a fixed point.
//!
//! A [`Game`] owns one [`Environment`] and an ordered list of [`Agent`]s.
//! Each step fires every agent whose period divides the step index, in
//! registration order, and commits their outputs in one of two modes:
//!
//! - **Sequential** (the default): each output is written to the live
//!   environment as soon as it is computed, so an agent sees the outputs
//!   of every agent registered before it in the same step.
//! - **Independent**: outputs are collected into a batch and merged after
//!   all agents have fired, so every agent in a step sees the same
//!   pre-step snapshot.
//!
//! [`Game::run`] executes a fixed number of steps (there is no convergence
//! check) and then [`Game::finalize`]s: `max_period` further steps so that
//! slow agents catch up with their dependencies.
//!
//! Agent failures abort the step. In sequential mode the environment keeps
//! whatever was written before the failure; in independent mode the batch
//! is discarded and the environment is exactly the pre-step state.

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::agent::Agent;
use crate::environment::Environment;
use crate::error::AgentError;
use crate::value::Value;

/// Errors that can occur while registering agents or stepping a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A registration was malformed (e.g. an empty variable name).
    #[error("invalid registration: {reason}")]
    InvalidRegistration {
        /// Explanation of what is wrong with the registration.
        reason: String,
    },

    /// An agent's actor failed. The step was aborted.
    #[error("agent {agent} failed on step {step}: {source}")]
    Agent {
        /// Name of the failing agent, or `<observer #i>` for unnamed ones.
        agent: String,
        /// Index of the step that was executing.
        step: u64,
        /// The actor's error, unmodified.
        source: AgentError,
    },

    /// Step counter would overflow.
    #[error("step counter overflow: cannot advance beyond u64::MAX")]
    StepOverflow,
}

/// Construction options for a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GameOptions {
    /// Evaluate agents against a shared pre-step snapshot and commit their
    /// outputs as one batch.
    #[serde(default)]
    pub independent_update: bool,

    /// Steps executed by [`Game::run`] when no count is given.
    #[serde(default = "default_run_steps")]
    pub default_run_steps: u64,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            independent_update: false,
            default_run_steps: default_run_steps(),
        }
    }
}

const fn default_run_steps() -> u64 {
    1000
}

/// What a registration installs: a constant or an agent.
#[derive(Debug, Clone)]
pub enum Entry {
    /// A fixed value written straight into the environment.
    Constant(Value),
    /// An agent, renamed to the registration's key when one is given.
    Agent(Agent),
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

impl From<Agent> for Entry {
    fn from(agent: Agent) -> Self {
        Self::Agent(agent)
    }
}

/// A positional registration.
#[derive(Debug, Clone)]
enum Positional {
    /// An agent registered under its own name (or none).
    Agent(Agent),
    /// A `(name, entry)` pair.
    Pair(String, Entry),
}

/// A batch of registrations for [`Game::add_agents`].
///
/// Positional registrations are applied first, in insertion order.
/// Keyword registrations follow, in key order. Callers building
/// sequential dependency chains should use positional registrations.
#[derive(Debug, Clone, Default)]
pub struct Registrations {
    positional: Vec<Positional>,
    keywords: BTreeMap<String, Entry>,
}

impl Registrations {
    /// Start an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its own name.
    #[must_use]
    pub fn agent(mut self, agent: Agent) -> Self {
        self.positional.push(Positional::Agent(agent));
        self
    }

    /// Register a positional `(name, entry)` pair.
    #[must_use]
    pub fn pair(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.positional.push(Positional::Pair(name.into(), entry.into()));
        self
    }

    /// Register a positional constant.
    #[must_use]
    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pair(name, Entry::Constant(value.into()))
    }

    /// Register a keyword entry. A later keyword with the same name
    /// replaces an earlier one.
    #[must_use]
    pub fn keyword(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.keywords.insert(name.into(), entry.into());
        self
    }

    /// Total number of registrations in the batch.
    pub fn len(&self) -> usize {
        self.positional.len().saturating_add(self.keywords.len())
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Flatten into `(name, entry)` pairs in application order.
    fn into_ordered(self) -> Vec<(Option<String>, Entry)> {
        self.positional
            .into_iter()
            .map(|p| match p {
                Positional::Agent(agent) => (None, Entry::Agent(agent)),
                Positional::Pair(name, entry) => (Some(name), entry),
            })
            .chain(self.keywords.into_iter().map(|(k, e)| (Some(k), e)))
            .collect()
    }
}

/// Summary of a single executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    /// Index of the step that was executed.
    pub step: u64,
    /// Number of agents that fired.
    pub fired: usize,
    /// Number of environment variables written.
    pub written: usize,
    /// Whether the step ran during finalize.
    pub finalizing: bool,
}

/// Callback invoked after each step completes.
///
/// Implementations can use this to report progress or record
/// trajectories. The callback receives the step summary and the
/// environment as committed by that step.
pub trait StepObserver {
    /// Called after a step completes successfully.
    fn on_step(&mut self, summary: &StepSummary, env: &Environment);
}

/// A no-op step observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_step(&mut self, _summary: &StepSummary, _env: &Environment) {}
}

/// An environment plus the agents that iterate it.
#[derive(Debug)]
pub struct Game {
    /// Human-readable game name.
    name: String,
    /// The shared environment. Never handed out mutably.
    env: Environment,
    /// Agents in evaluation order.
    agents: Vec<Agent>,
    /// Update mode and default run length.
    options: GameOptions,
    /// Number of completed steps; also the index of the next step.
    step: u64,
}

impl Game {
    /// Create an empty sequential game with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, GameOptions::default())
    }

    /// Create an empty game with the given options.
    pub fn with_options(name: impl Into<String>, options: GameOptions) -> Self {
        let name = name.into();
        Self {
            env: Environment::new(name.clone()),
            name,
            agents: Vec::new(),
            options,
            step: 0,
        }
    }

    /// Create a game and apply a batch of registrations.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if any registration is
    /// malformed.
    pub fn from_registrations(
        name: impl Into<String>,
        options: GameOptions,
        registrations: Registrations,
    ) -> Result<Self, GameError> {
        let mut game = Self::with_options(name, options);
        game.add_agents(registrations)?;
        Ok(game)
    }

    /// Write a constant into the environment, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if `name` is empty.
    pub fn add_constant(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), GameError> {
        check_name(name)?;
        self.env.insert(name, value);
        Ok(())
    }

    /// Append an agent under its own name (or none, for observers).
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if the agent's name is
    /// empty.
    pub fn add_agent(&mut self, agent: Agent) -> Result<(), GameError> {
        if let Some(name) = agent.name() {
            check_name(name)?;
        }
        self.register(agent);
        Ok(())
    }

    /// Append a copy of `agent` renamed to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if `name` is empty.
    pub fn add_named_agent(&mut self, name: &str, agent: &Agent) -> Result<(), GameError> {
        check_name(name)?;
        self.register(agent.clone_with(Some(name), None));
        Ok(())
    }

    /// Apply a batch of registrations.
    ///
    /// The whole batch is validated before anything is applied, so a
    /// malformed batch leaves the game unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if any registration is
    /// malformed.
    pub fn add_agents(&mut self, registrations: Registrations) -> Result<(), GameError> {
        let ordered = registrations.into_ordered();

        for (name, entry) in &ordered {
            match (name, entry) {
                (Some(name), _) => check_name(name)?,
                (None, Entry::Agent(agent)) => {
                    if let Some(name) = agent.name() {
                        check_name(name)?;
                    }
                }
                (None, Entry::Constant(_)) => {
                    return Err(GameError::InvalidRegistration {
                        reason: "constant registered without a name".to_owned(),
                    });
                }
            }
        }

        for (name, entry) in ordered {
            match (name, entry) {
                (Some(name), Entry::Constant(value)) => self.env.insert(name, value),
                (Some(name), Entry::Agent(agent)) => {
                    self.register(agent.clone_with(Some(name.as_str()), None));
                }
                (None, Entry::Agent(agent)) => self.register(agent),
                // Rejected during validation above.
                (None, Entry::Constant(_)) => {}
            }
        }
        Ok(())
    }

    /// Append a copy of `agent` that fires every `period` steps.
    ///
    /// `name` renames the copy when given. Attached agents do not seed
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if `name` is empty.
    pub fn attach(
        &mut self,
        agent: &Agent,
        period: NonZeroU64,
        name: Option<&str>,
    ) -> Result<(), GameError> {
        if let Some(name) = name {
            check_name(name)?;
        }
        self.agents.push(agent.clone_with(name, Some(period)));
        Ok(())
    }

    /// Wrap a raw function as an agent firing every `period` steps.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRegistration`] if `name` is empty.
    pub fn attach_fn<F>(
        &mut self,
        actor: F,
        period: NonZeroU64,
        name: Option<&str>,
    ) -> Result<(), GameError>
    where
        F: Fn(&Environment) -> Result<Value, AgentError> + 'static,
    {
        let agent = match name {
            Some(name) => {
                check_name(name)?;
                Agent::new(name, actor)
            }
            None => Agent::observer(actor),
        };
        self.agents.push(agent.with_period(period));
        Ok(())
    }

    /// Execute one step and return the updated environment.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Agent`] if an actor fails (the step counter
    /// does not advance), or [`GameError::StepOverflow`].
    pub fn step(&mut self) -> Result<&Environment, GameError> {
        self.execute_step()?;
        Ok(&self.env)
    }

    /// Run `steps` steps (or the configured default), then finalize.
    ///
    /// There is no early exit: the caller chooses a step count large
    /// enough for the policies to settle.
    ///
    /// # Errors
    ///
    /// Returns the first [`GameError`] raised by a step.
    pub fn run(&mut self, steps: Option<u64>) -> Result<&Environment, GameError> {
        self.run_observed(steps, &mut NoOpObserver)
    }

    /// Like [`Game::run`], notifying `observer` after every step
    /// (finalize steps included).
    ///
    /// # Errors
    ///
    /// Returns the first [`GameError`] raised by a step.
    pub fn run_observed(
        &mut self,
        steps: Option<u64>,
        observer: &mut dyn StepObserver,
    ) -> Result<&Environment, GameError> {
        let steps = steps.unwrap_or(self.options.default_run_steps);
        info!(
            game = %self.name,
            steps,
            agents = self.agents.len(),
            independent_update = self.options.independent_update,
            "Run starting"
        );

        self.advance(steps, observer)?;
        self.finalize_observed(observer)?;

        info!(game = %self.name, total_steps = self.step, "Run finished");
        Ok(&self.env)
    }

    /// Run `max_period` further steps so every agent fires at least once
    /// more, then return the environment.
    ///
    /// The finalizing flag is set for the duration and cleared on every
    /// exit path, including failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`GameError`] raised by a step. The environment
    /// contents are then unspecified.
    pub fn finalize(&mut self) -> Result<&Environment, GameError> {
        self.finalize_observed(&mut NoOpObserver)
    }

    /// Like [`Game::finalize`], notifying `observer` after every step.
    ///
    /// # Errors
    ///
    /// Returns the first [`GameError`] raised by a step.
    pub fn finalize_observed(
        &mut self,
        observer: &mut dyn StepObserver,
    ) -> Result<&Environment, GameError> {
        let extra = self.max_period();
        debug!(game = %self.name, extra_steps = extra, "Finalizing");

        self.env.set_finalizing(true);
        let outcome = self.advance(extra, observer);
        self.env.set_finalizing(false);

        outcome?;
        Ok(&self.env)
    }

    /// Largest period among registered agents, or 0 with no agents.
    pub fn max_period(&self) -> u64 {
        self.agents
            .iter()
            .map(|agent| agent.period().get())
            .max()
            .unwrap_or(0)
    }

    /// The game's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The live environment.
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Number of completed steps.
    pub const fn step_count(&self) -> u64 {
        self.step
    }

    /// Whether the game is currently finalizing.
    pub const fn is_finalizing(&self) -> bool {
        self.env.is_finalizing()
    }

    /// Whether agents are evaluated independently.
    pub const fn is_independent(&self) -> bool {
        self.options.independent_update
    }

    /// Steps executed by [`Game::run`] when no count is given.
    pub const fn default_run_steps(&self) -> u64 {
        self.options.default_run_steps
    }

    /// Registered agents in evaluation order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Append an agent, seeding its default if its variable is unset.
    fn register(&mut self, agent: Agent) {
        if let (Some(name), Some(default)) = (agent.name(), agent.default_value()) {
            if !self.env.seed(name, default) {
                trace!(variable = name, "Default skipped, variable already set");
            }
        }
        self.agents.push(agent);
    }

    /// Execute `steps` steps, notifying the observer after each.
    fn advance(&mut self, steps: u64, observer: &mut dyn StepObserver) -> Result<(), GameError> {
        for _ in 0..steps {
            let summary = self.execute_step()?;
            observer.on_step(&summary, &self.env);
        }
        Ok(())
    }

    /// One step: fire due agents, commit their outputs, advance the counter.
    fn execute_step(&mut self) -> Result<StepSummary, GameError> {
        let step = self.step;
        let next = step.checked_add(1).ok_or(GameError::StepOverflow)?;
        let independent = self.options.independent_update;
        self.env.set_step(step);

        let mut batch: BTreeMap<String, Value> = BTreeMap::new();
        let mut fired: usize = 0;
        let mut written: usize = 0;

        for (index, agent) in self.agents.iter().enumerate() {
            if !agent.fires_at(step) {
                continue;
            }

            // Always evaluated against the live environment; in
            // independent mode it holds none of this step's writes.
            let value = agent.invoke(&self.env).map_err(|source| GameError::Agent {
                agent: agent_label(agent, index),
                step,
                source,
            })?;
            fired = fired.saturating_add(1);

            let Some(name) = agent.name() else {
                continue;
            };
            trace!(step, variable = name, %value, "Agent fired");
            if independent {
                batch.insert(name.to_owned(), value);
            } else {
                self.env.insert(name, value);
            }
            written = written.saturating_add(1);
        }

        if independent {
            self.env.merge(batch);
        }
        self.step = next;

        let summary = StepSummary {
            step,
            fired,
            written,
            finalizing: self.env.is_finalizing(),
        };
        debug!(
            step,
            fired,
            written,
            finalizing = summary.finalizing,
            "Step complete"
        );
        Ok(summary)
    }
}

/// Reject empty variable names.
fn check_name(name: &str) -> Result<(), GameError> {
    if name.trim().is_empty() {
        return Err(GameError::InvalidRegistration {
            reason: "variable name must not be empty".to_owned(),
        });
    }
    Ok(())
}

/// Human-readable label for error messages.
fn agent_label(agent: &Agent, index: usize) -> String {
    agent
        .name()
        .map_or_else(|| format!("<observer #{index}>"), str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn period(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    fn constant(name: &str, value: f64) -> Agent {
        Agent::new(name, move |_env: &Environment| Ok(Value::Float(value)))
    }

    fn copy_of(name: &str, source: &'static str) -> Agent {
        Agent::new(name, move |env: &Environment| env.get(source))
    }

    #[test]
    fn options_default_to_sequential_thousand_steps() {
        let options = GameOptions::default();
        assert!(!options.independent_update);
        assert_eq!(options.default_run_steps, 1000);
    }

    #[test]
    fn constants_are_written_immediately() {
        let mut game = Game::new("g");
        game.add_constant("k", 2).unwrap();
        assert_eq!(game.environment().int("k").unwrap(), 2);
        game.add_constant("k", 3).unwrap();
        assert_eq!(game.environment().int("k").unwrap(), 3);
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut game = Game::new("g");
        assert!(matches!(
            game.add_constant("", 1),
            Err(GameError::InvalidRegistration { .. })
        ));
        assert!(game.add_agent(constant("", 1.0)).is_err());
        assert!(game.add_named_agent(" ", &constant("x", 1.0)).is_err());
        assert!(game.agents().is_empty());
    }

    #[test]
    fn malformed_batch_leaves_game_unchanged() {
        let mut game = Game::new("g");
        let batch = Registrations::new()
            .constant("k", 2)
            .agent(constant("a", 1.0))
            .keyword("", Value::Int(1));
        assert!(game.add_agents(batch).is_err());
        assert!(game.environment().is_empty());
        assert!(game.agents().is_empty());
    }

    #[test]
    fn keyword_entries_follow_positional_ones() {
        let mut game = Game::new("g");
        let batch = Registrations::new()
            .keyword("z", constant("ignored", 1.0))
            .keyword("b", constant("ignored", 2.0))
            .agent(constant("first", 0.0))
            .pair("second", constant("ignored", 0.0))
            .keyword("m", Value::Int(100));
        assert_eq!(batch.len(), 5);
        game.add_agents(batch).unwrap();

        let names: Vec<_> = game.agents().iter().filter_map(Agent::name).collect();
        assert_eq!(names, vec!["first", "second", "b", "z"]);
        assert_eq!(game.environment().int("m").unwrap(), 100);
    }

    #[test]
    fn defaults_seed_but_never_overwrite() {
        let mut game = Game::new("g");
        game.add_agent(constant("v", 5.0).with_default(1.0)).unwrap();
        assert_eq!(game.environment().float("v").unwrap(), 1.0);

        game.add_agent(constant("v", 5.0).with_default(2.0)).unwrap();
        assert_eq!(game.environment().float("v").unwrap(), 1.0);
    }

    #[test]
    fn attach_does_not_seed_defaults() {
        let mut game = Game::new("g");
        let agent = constant("v", 5.0).with_default(1.0);
        game.attach(&agent, period(3), Some("w")).unwrap();

        assert!(!game.environment().contains_key("w"));
        assert_eq!(game.agents().first().unwrap().period(), period(3));
        assert_eq!(game.agents().first().unwrap().name(), Some("w"));
        assert_eq!(agent.period(), period(1));
    }

    #[test]
    fn sequential_agents_see_same_step_writes() {
        let mut game = Game::new("g");
        game.add_constant("x", 0.0).unwrap();
        game.add_agent(constant("x", 7.0)).unwrap();
        game.add_agent(copy_of("y", "x")).unwrap();

        let env = game.step().unwrap();
        assert_eq!(env.float("y").unwrap(), 7.0);
    }

    #[test]
    fn independent_agents_see_pre_step_state() {
        let options = GameOptions {
            independent_update: true,
            ..GameOptions::default()
        };
        let mut game = Game::with_options("g", options);
        game.add_constant("x", 0.0).unwrap();
        game.add_agent(constant("x", 7.0)).unwrap();
        game.add_agent(copy_of("y", "x")).unwrap();

        let env = game.step().unwrap();
        assert_eq!(env.float("x").unwrap(), 7.0);
        assert_eq!(env.float("y").unwrap(), 0.0);

        let env = game.step().unwrap();
        assert_eq!(env.float("y").unwrap(), 7.0);
    }

    #[test]
    fn failing_step_keeps_partial_writes_when_sequential() {
        let mut game = Game::new("g");
        game.add_agent(constant("x", 7.0)).unwrap();
        game.add_agent(copy_of("y", "missing")).unwrap();

        let err = game.step().unwrap_err();
        assert!(matches!(
            err,
            GameError::Agent { ref agent, step: 0, source: AgentError::MissingKey { .. } }
                if agent == "y"
        ));
        assert_eq!(game.environment().float("x").unwrap(), 7.0);
        assert_eq!(game.step_count(), 0);
    }

    #[test]
    fn failing_step_discards_batch_when_independent() {
        let options = GameOptions {
            independent_update: true,
            ..GameOptions::default()
        };
        let mut game = Game::with_options("g", options);
        game.add_agent(constant("x", 7.0)).unwrap();
        game.add_agent(copy_of("y", "missing")).unwrap();

        assert!(game.step().is_err());
        assert!(!game.environment().contains_key("x"));
        assert_eq!(game.step_count(), 0);
    }

    #[test]
    fn observers_write_nothing() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut game = Game::new("g");
        game.add_constant("k", 1).unwrap();
        game.add_agent(Agent::observer(move |env: &Environment| {
            sink.borrow_mut().push(env.step());
            Ok(Value::Float(99.0))
        }))
        .unwrap();

        game.step().unwrap();
        game.step().unwrap();
        assert_eq!(game.environment().len(), 1);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn attach_fn_runs_on_its_period() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut game = Game::new("g");
        game.attach_fn(
            move |env: &Environment| {
                sink.borrow_mut().push(env.step());
                Ok(Value::Unit)
            },
            period(4),
            None,
        )
        .unwrap();

        for _ in 0..9 {
            game.step().unwrap();
        }
        assert_eq!(*seen.borrow(), vec![0, 4, 8]);
    }

    #[test]
    fn max_period_is_zero_without_agents() {
        let mut game = Game::new("g");
        assert_eq!(game.max_period(), 0);
        game.finalize().unwrap();
        assert_eq!(game.step_count(), 0);
    }

    #[test]
    fn finalize_flag_is_visible_to_agents_and_cleared_after() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut game = Game::new("g");
        game.add_agent(Agent::observer(move |env: &Environment| {
            sink.borrow_mut().push(env.is_finalizing());
            Ok(Value::Unit)
        }))
        .unwrap();

        game.run(Some(2)).unwrap();
        assert_eq!(*seen.borrow(), vec![false, false, true]);
        assert!(!game.is_finalizing());
    }

    #[test]
    fn finalize_flag_is_cleared_after_failure() {
        let mut game = Game::new("g");
        game.add_agent(Agent::new("boom", |env: &Environment| {
            if env.is_finalizing() {
                Err(AgentError::domain("log of a non-positive number"))
            } else {
                Ok(Value::Float(1.0))
            }
        }))
        .unwrap();

        game.step().unwrap();
        assert!(game.finalize().is_err());
        assert!(!game.is_finalizing());
        assert_eq!(game.step_count(), 1);
    }

    #[test]
    fn run_uses_default_step_count() {
        let options = GameOptions {
            default_run_steps: 7,
            ..GameOptions::default()
        };
        let mut game = Game::with_options("g", options);
        game.add_agent(constant("x", 1.0).with_period(period(3))).unwrap();
        game.run(None).unwrap();
        assert_eq!(game.step_count(), 10);
    }

    #[test]
    fn observer_sees_every_step_including_finalize() {
        struct Recorder {
            summaries: Vec<StepSummary>,
        }
        impl StepObserver for Recorder {
            fn on_step(&mut self, summary: &StepSummary, _env: &Environment) {
                self.summaries.push(*summary);
            }
        }

        let mut game = Game::new("g");
        game.add_agent(constant("x", 1.0)).unwrap();
        game.add_agent(constant("y", 1.0).with_period(period(2))).unwrap();
        let mut recorder = Recorder {
            summaries: Vec::new(),
        };
        game.run_observed(Some(3), &mut recorder).unwrap();

        let steps: Vec<u64> = recorder.summaries.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 1, 2, 3, 4]);
        let fired: Vec<usize> = recorder.summaries.iter().map(|s| s.fired).collect();
        assert_eq!(fired, vec![2, 1, 2, 1, 2]);
        let finalizing: Vec<bool> = recorder.summaries.iter().map(|s| s.finalizing).collect();
        assert_eq!(finalizing, vec![false, false, false, true, true]);
    }
}
