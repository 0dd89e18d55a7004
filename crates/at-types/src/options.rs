//! Search configuration.
//!
//! [`SearchOptions`] enumerates every option a caller may set; unset fields
//! fall back to the default registry when the options are resolved into an
//! immutable [`SearchSettings`] at the start of a search. Settings are then
//! passed by reference through the whole call chain and never mutated.

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateValue;

/// How a short training session is condensed into one comparable scalar.
/// Lower is always better; `f64::INFINITY` marks a failed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    /// Mean training loss of the final epoch.
    LastLoss,
    /// Normalized loss improvement per epoch; needs at least 2 epochs, and
    /// the evaluator raises the epoch count to 2 when given fewer.
    RelativeImprovementEpoch,
}

impl Default for MetricMode {
    fn default() -> Self {
        Self::LastLoss
    }
}

/// Caller-facing options for one search invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Explicit candidate values; when absent, the default interval for the
    /// parameter is used.
    pub candidate_values: Option<Vec<CandidateValue>>,
    /// Epochs per trial training session.
    pub epochs: Option<usize>,
    pub metric_mode: Option<MetricMode>,
    /// Decimal precision candidates are rounded to.
    pub decimals: Option<u32>,
    /// Maximum number of samples drawn from the training set per trial.
    pub sample_cap: Option<usize>,
    /// RNG seed reset before every evaluation.
    pub seed: Option<u64>,
    /// Return the rebuilt winning model (`true`, the default) or the raw
    /// ordered results.
    pub return_finalized_model: Option<bool>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(mut self, values: Vec<CandidateValue>) -> Self {
        self.candidate_values = Some(values);
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = Some(epochs);
        self
    }

    pub fn with_metric_mode(mut self, mode: MetricMode) -> Self {
        self.metric_mode = Some(mode);
        self
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn with_sample_cap(mut self, cap: usize) -> Self {
        self.sample_cap = Some(cap);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn raw_results(mut self) -> Self {
        self.return_finalized_model = Some(false);
        self
    }
}

/// Fully-resolved, immutable settings for one search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub epochs: usize,
    pub metric_mode: MetricMode,
    pub decimals: u32,
    pub sample_cap: usize,
    pub seed: u64,
    pub return_finalized_model: bool,
}

impl SearchSettings {
    /// Effective epoch count for the evaluator: `RelativeImprovementEpoch`
    /// needs two epochs to measure a slope.
    pub fn effective_epochs(&self) -> usize {
        match self.metric_mode {
            MetricMode::RelativeImprovementEpoch => self.epochs.max(2),
            MetricMode::LastLoss => self.epochs,
        }
    }
}
