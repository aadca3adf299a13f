//! Closed-form numeric policies.
//!
//! A policy is the common case: a variable defined as a formula over
//! other variables. [`policy`] wraps such a formula as a named agent;
//! [`probability_policy`] additionally keeps the result strictly inside
//! the unit interval.

use equilibria_core::numeric::clamp;
use equilibria_core::{Agent, AgentError, Environment, Value};

/// A named agent computing a real number from the environment.
pub fn policy<F>(name: &str, formula: F) -> Agent
where
    F: Fn(&Environment) -> Result<f64, AgentError> + 'static,
{
    Agent::new(name, move |env: &Environment| formula(env).map(Value::Float))
}

/// A named agent computing a probability.
///
/// The result is clamped into `[eps, 1 - eps]` with `eps = f64::EPSILON`.
/// A non-finite result is a domain error rather than a silent clamp.
pub fn probability_policy<F>(name: &str, formula: F) -> Agent
where
    F: Fn(&Environment) -> Result<f64, AgentError> + 'static,
{
    let variable = name.to_owned();
    Agent::new(name, move |env: &Environment| {
        let raw = formula(env)?;
        if !raw.is_finite() {
            return Err(AgentError::domain(format!(
                "{variable} evaluated to {raw} on step {}",
                env.step()
            )));
        }
        Ok(Value::Float(clamp(raw)))
    })
}

/// A named agent that always yields `value`.
pub fn constant_agent(name: &str, value: impl Into<Value>) -> Agent {
    let value = value.into();
    Agent::new(name, move |_env: &Environment| Ok(value))
}
