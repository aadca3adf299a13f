//! The absent-minded driver games.
//!
//! An agent is trained for `n` episodes, of which a fraction `p_mod` are
//! modelled, then deployed for `m` episodes. It defects with probability
//! `1 - p` per episode and catastrophe happens after `d` defections. The
//! training budget, the optimal defection probability, and the resulting
//! probability of catastrophe `PC` all depend on each other, so each is a
//! policy and the game iterates them to a fixed point.
//!
//! Two variants are provided:
//!
//! - [`Scenario::SequentialDefection`]: catastrophe after `d` defections
//!   in a row.
//! - [`Scenario::NonSequentialTwoDefection`]: catastrophe on the second
//!   defection anywhere in deployment.

use std::num::NonZeroU64;

use clap::ValueEnum;
use equilibria_agents::{debug_agent, policy, probability_policy};
use equilibria_core::numeric::real_pow;
use equilibria_core::{Agent, AgentError, Environment, Game, Registrations, Value};
use tracing::debug;

use crate::config::{DriverParams, EngineConfig};
use crate::error::EngineError;

/// Which driver game to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Catastrophe after `d` sequential defections.
    #[value(name = "seq-d")]
    SequentialDefection,
    /// Catastrophe upon the second defection during deployment.
    #[value(name = "nonseq-2d")]
    NonSequentialTwoDefection,
}

impl Scenario {
    /// Every scenario, in the order the engine runs them.
    pub const ALL: [Self; 2] = [Self::SequentialDefection, Self::NonSequentialTwoDefection];

    /// Name given to the game (and its environment).
    pub const fn game_name(self) -> &'static str {
        match self {
            Self::SequentialDefection => "seq_d_game",
            Self::NonSequentialTwoDefection => "nonseq_2d_game",
        }
    }
}

/// Build the game for `scenario` from the engine configuration.
///
/// # Errors
///
/// Returns [`EngineError::Strategy`] if the debug template is malformed,
/// or [`EngineError::Game`] if registration fails.
pub fn build(scenario: Scenario, config: &EngineConfig) -> Result<Game, EngineError> {
    let params = &config.driver;
    let mut registrations = match scenario {
        Scenario::SequentialDefection => Registrations::new()
            .agent(conservative_n(params))
            .agent(seq_d_pc())
            .agent(seq_d_p()),
        Scenario::NonSequentialTwoDefection => Registrations::new()
            .agent(conservative_n(params))
            .agent(nonseq_2d_p())
            .agent(nonseq_2d_pc()),
    };

    if let Some(period) = NonZeroU64::new(config.debug.period) {
        registrations = registrations.agent(debug_agent(&config.debug.template, period)?);
    }

    let registrations = registrations
        .keyword("m", Value::Int(i64::from(params.m)))
        .keyword("eps", Value::Float(params.eps))
        .keyword("p_mod", Value::Float(params.p_mod))
        .keyword("r_n", Value::Float(params.r_n))
        .keyword("r_m", Value::Float(params.r_m))
        .keyword("r_f", Value::Float(params.r_f))
        .keyword("d", Value::Int(i64::from(params.d)));

    debug!(
        scenario = scenario.game_name(),
        registrations = registrations.len(),
        "Building game"
    );
    Ok(Game::from_registrations(
        scenario.game_name(),
        config.game,
        registrations,
    )?)
}

/// Conservative estimate of the required training episodes:
/// `n = m / p_mod * (1 - eps) / eps`.
pub fn conservative_n(params: &DriverParams) -> Agent {
    policy("n", |env| {
        let m = env.float("m")?;
        let eps = env.float("eps")?;
        let p_mod = env.float("p_mod")?;
        finite("n", m / p_mod * (1.0 - eps) / eps, env)
    })
    .with_default(i64::from(params.m))
}

/// Probability of catastrophe in the sequential defection game:
/// `PC = (1-p)^(d-1) * (1 - p^(m-d+1))`.
#[allow(clippy::suboptimal_flops)]
pub fn seq_d_pc() -> Agent {
    probability_policy("PC", |env| {
        let p = env.float("p")?;
        let m = env.float("m")?;
        let d = env.float("d")?;
        Ok((1.0 - p).powf(d - 1.0) * (1.0 - p.powf(m - d + 1.0)))
    })
    .with_default(0.1)
}

/// Optimal cooperation probability in the sequential defection game.
///
/// The formula refers to `p` itself, which is why it has to be iterated.
#[allow(clippy::suboptimal_flops)]
pub fn seq_d_p() -> Agent {
    probability_policy("p", |env| {
        let n = env.float("n")?;
        let p_mod = env.float("p_mod")?;
        let m = env.float("m")?;
        let d = env.float("d")?;
        let p = env.float("p")?;
        let stake = reward_ratio(env)?;

        let lag = (d - 1.0) / (1.0 - p);
        let base = (n * p_mod - lag) / (n * p_mod + m - lag) * stake;
        Ok(real_pow(base, 1.0 / (m - d)))
    })
    .with_default(0.9)
}

/// Optimal cooperation probability in the non-sequential two defection
/// game.
#[allow(clippy::suboptimal_flops)]
pub fn nonseq_2d_p() -> Agent {
    probability_policy("p", |env| {
        let n = env.float("n")?;
        let p_mod = env.float("p_mod")?;
        let m = env.float("m")?;
        let stake = reward_ratio(env)?;

        let base = (n * p_mod) / (n * p_mod + m * (m - 1.0)) * stake;
        Ok(real_pow(base, 1.0 / (m - 1.0)))
    })
    .with_default(0.9)
}

/// Probability of catastrophe in the non-sequential two defection game:
/// `PC = 1 - p^m - m(1-p)p^(m-1)`.
#[allow(clippy::suboptimal_flops)]
pub fn nonseq_2d_pc() -> Agent {
    probability_policy("PC", |env| {
        let p = env.float("p")?;
        let m = env.float("m")?;
        Ok(1.0 - p.powf(m) - m * (1.0 - p) * p.powf(m - 1.0))
    })
    .with_default(0.1)
}

/// `(r_m - r_n) / (r_m - r_f)`, the relative payoff of defecting.
fn reward_ratio(env: &Environment) -> Result<f64, AgentError> {
    let r_n = env.float("r_n")?;
    let r_m = env.float("r_m")?;
    let r_f = env.float("r_f")?;
    finite("reward ratio", (r_m - r_n) / (r_m - r_f), env)
}

fn finite(what: &str, x: f64, env: &Environment) -> Result<f64, AgentError> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(AgentError::domain(format!(
            "{what} evaluated to {x} on step {}",
            env.step()
        )))
    }
}
