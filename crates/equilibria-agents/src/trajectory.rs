//! Record how selected variables evolve over a run.
//!
//! The engine never decides on its own that a game has converged. A
//! [`TrajectoryRecorder`] lets the caller look at the numbers instead:
//! attach it with `Game::run_observed` and inspect the last change of
//! each variable once the run returns.

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use equilibria_core::numeric::real_part;
use equilibria_core::{Environment, StepObserver, StepSummary};

/// One sampled row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Step the sample was taken after.
    pub step: u64,
    /// Real values of the tracked variables that were bound at the time.
    pub values: BTreeMap<String, f64>,
}

/// A step observer sampling a fixed set of variables.
#[derive(Debug, Clone)]
pub struct TrajectoryRecorder {
    keys: Vec<String>,
    every: NonZeroU64,
    samples: Vec<Sample>,
}

impl TrajectoryRecorder {
    /// Record `keys` after every step.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            every: NonZeroU64::MIN,
            samples: Vec::new(),
        }
    }

    /// Only sample steps whose index is a multiple of `every`. Finalize
    /// steps are always sampled.
    #[must_use]
    pub fn sampling_every(mut self, every: NonZeroU64) -> Self {
        self.every = every;
        self
    }

    /// All samples taken so far.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Values of `key` across the samples where it was bound.
    pub fn series(&self, key: &str) -> Vec<(u64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| s.values.get(key).map(|&v| (s.step, v)))
            .collect()
    }

    /// Absolute change of `key` between its last two recorded values.
    pub fn last_change(&self, key: &str) -> Option<f64> {
        let mut recent = self
            .samples
            .iter()
            .rev()
            .filter_map(|s| s.values.get(key).copied());
        let last = recent.next()?;
        let previous = recent.next()?;
        Some((last - previous).abs())
    }
}

impl StepObserver for TrajectoryRecorder {
    fn on_step(&mut self, summary: &StepSummary, env: &Environment) {
        let due = matches!(summary.step.checked_rem(self.every.get()), Some(0));
        if !due && !summary.finalizing {
            return;
        }
        let values = self
            .keys
            .iter()
            .filter_map(|key| {
                let value = env.try_get(key).and_then(real_part)?;
                Some((key.clone(), value))
            })
            .collect();
        self.samples.push(Sample {
            step: summary.step,
            values,
        });
    }
}
