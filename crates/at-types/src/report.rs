//! Search run tracking.
//!
//! A [`SearchReport`] captures the lifecycle of one parameter search: what was
//! evaluated, in what order, with what outcome. It is the raw-results payload
//! callers get when they ask for results instead of a finalized model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidate::CandidateValue;
use crate::params::ParameterSpec;

/// One evaluated candidate: `(value, metric)`. Lower metric is better;
/// `f64::INFINITY` means the trial failed or was structurally invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub value: CandidateValue,
    pub metric: f64,
}

impl ResultRecord {
    pub fn new(value: CandidateValue, metric: f64) -> Self {
        Self { value, metric }
    }

    pub fn failed(&self) -> bool {
        self.metric.is_infinite()
    }
}

/// Lifecycle state for a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Pending,
    Running,
    Completed,
    /// Aborted before any evaluation (configuration mismatch, no candidates).
    Aborted,
}

/// Aggregate record of one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub id: Uuid,
    pub spec: ParameterSpec,
    pub state: RunState,
    /// Records in ledger order (sorted by value), fixed at completion.
    pub records: Vec<ResultRecord>,
    pub best: Option<ResultRecord>,
    pub trials: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub diagnostic: Option<String>,
}

impl SearchReport {
    pub fn new(spec: ParameterSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
            state: RunState::Pending,
            records: Vec::new(),
            best: None,
            trials: 0,
            started_at: None,
            finished_at: None,
            diagnostic: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.state = RunState::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self, records: Vec<ResultRecord>, best: Option<ResultRecord>) {
        self.state = RunState::Completed;
        self.finished_at = Some(Utc::now());
        self.trials = records.len();
        self.records = records;
        self.best = best;
    }

    pub fn mark_aborted(&mut self, diagnostic: String) {
        self.state = RunState::Aborted;
        self.finished_at = Some(Utc::now());
        self.diagnostic = Some(diagnostic);
    }
}
