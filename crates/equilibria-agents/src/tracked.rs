//! Wrap an agent to record which steps it fired on.

use std::cell::RefCell;
use std::rc::Rc;

use equilibria_core::{Agent, AgentError, Environment, Value};

/// Steps on which a tracked agent fired successfully.
///
/// Cloning shares the underlying log.
#[derive(Debug, Clone, Default)]
pub struct FiringLog(Rc<RefCell<Vec<u64>>>);

impl FiringLog {
    /// Snapshot of the recorded steps, in firing order.
    pub fn steps(&self) -> Vec<u64> {
        self.0.borrow().clone()
    }

    /// Number of recorded firings.
    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }

    /// Most recent firing step.
    pub fn last(&self) -> Option<u64> {
        self.0.borrow().last().copied()
    }

    fn record(&self, step: u64) {
        self.0.borrow_mut().push(step);
    }
}

/// Wrap `agent` so that every successful firing is logged.
///
/// The returned agent keeps the name, period, and default of the
/// original.
pub fn tracked(agent: &Agent) -> (Agent, FiringLog) {
    let log = FiringLog::default();
    let sink = log.clone();
    let inner = agent.clone();
    let actor = move |env: &Environment| -> Result<Value, AgentError> {
        let value = inner.invoke(env)?;
        sink.record(env.step());
        Ok(value)
    };

    let mut wrapped = match agent.name() {
        Some(name) => Agent::new(name, actor),
        None => Agent::observer(actor),
    }
    .with_period(agent.period());
    if let Some(default) = agent.default_value() {
        wrapped = wrapped.with_default(default);
    }
    (wrapped, log)
}
