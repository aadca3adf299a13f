//! Debug observers that log the environment on a fixed cadence.
//!
//! A debug agent is unnamed, so it never writes to the environment. Each
//! time it fires it renders a `minijinja` template against the current
//! bindings and emits the result as a `tracing` event:
//!
//! ```text
//! n = {{ n }}; p = {{ p }}; PC = {{ PC }}
//! ```
//!
//! Besides the variables, templates can reference `step`, `game`, and
//! `finalizing`. Referencing an unbound variable is a render error, the
//! same way a policy reading a missing key fails.

use std::collections::BTreeMap;
use std::num::NonZeroU64;
use std::rc::Rc;

use equilibria_core::{Agent, AgentError, Environment, Value};
use minijinja::UndefinedBehavior;
use serde::Serialize;
use tracing::info;

use crate::error::StrategyError;

/// Name under which the template is registered.
const TEMPLATE_NAME: &str = "debug";

/// Render context: step metadata plus every binding.
#[derive(Serialize)]
struct DebugContext<'a> {
    step: u64,
    game: &'a str,
    finalizing: bool,
    #[serde(flatten)]
    vars: &'a BTreeMap<String, Value>,
}

/// Build an observer that logs `template` every `period` steps.
///
/// # Errors
///
/// Returns [`StrategyError::Template`] if the template does not compile.
pub fn debug_agent(template: &str, period: NonZeroU64) -> Result<Agent, StrategyError> {
    let mut templates = minijinja::Environment::new();
    templates.set_undefined_behavior(UndefinedBehavior::Strict);
    templates.add_template_owned(TEMPLATE_NAME, template.to_owned())?;
    let templates = Rc::new(templates);

    let agent = Agent::observer(move |env: &Environment| {
        let line = render(&templates, env)?;
        info!(game = env.game_name(), step = env.step(), "{line}");
        Ok(Value::Unit)
    });
    Ok(agent.with_period(period))
}

/// Render the registered template against `env`.
fn render(
    templates: &minijinja::Environment<'static>,
    env: &Environment,
) -> Result<String, AgentError> {
    let context = DebugContext {
        step: env.step(),
        game: env.game_name(),
        finalizing: env.is_finalizing(),
        vars: env.vars(),
    };
    templates
        .get_template(TEMPLATE_NAME)
        .and_then(|template| template.render(context))
        .map_err(|err| AgentError::Render {
            message: err.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use equilibria_core::Game;

    use super::*;

    fn templates(source: &str) -> minijinja::Environment<'static> {
        let mut templates = minijinja::Environment::new();
        templates.set_undefined_behavior(UndefinedBehavior::Strict);
        templates
            .add_template_owned(TEMPLATE_NAME, source.to_owned())
            .unwrap();
        templates
    }

    #[test]
    fn renders_bindings_and_metadata() {
        let mut env = Environment::new("driver");
        env.insert("n", 100);
        env.insert("p", 0.5);
        let line = render(&templates("{{ game }}@{{ step }}: n = {{ n }}; p = {{ p }}"), &env)
            .unwrap();
        assert_eq!(line, "driver@0: n = 100; p = 0.5");
    }

    #[test]
    fn unbound_variable_is_a_render_error() {
        let env = Environment::new("driver");
        let err = render(&templates("PC = {{ PC }}"), &env).unwrap_err();
        assert!(matches!(err, AgentError::Render { .. }));
    }

    #[test]
    fn malformed_template_is_rejected_up_front() {
        let result = debug_agent("{{ n ", NonZeroU64::MIN);
        assert!(matches!(result, Err(StrategyError::Template { .. })));
    }

    #[test]
    fn debug_agent_is_an_unnamed_periodic_observer() {
        let period = NonZeroU64::new(100).unwrap();
        let agent = debug_agent("k = {{ k }}", period).unwrap();
        assert_eq!(agent.name(), None);
        assert_eq!(agent.period(), period);

        let mut game = Game::new("g");
        game.add_constant("k", 2).unwrap();
        game.add_agent(agent).unwrap();
        let env = game.run(Some(5)).unwrap();
        assert_eq!(env.len(), 1);
    }
}
