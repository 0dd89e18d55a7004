//! Ordered result bookkeeping for one search.

use serde::{Deserialize, Serialize};

use at_types::{CandidateValue, ResultRecord, TuneError, TuneResult};

/// One ledger slot: the record plus its arrival number, which breaks metric
/// ties stably (earliest evaluated wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    record: ResultRecord,
    seq: usize,
}

/// The ordered sequence of evaluated candidates.
///
/// Records are kept sorted by candidate value under the total order where the
/// `Remove` sentinel is least, so the refinement policy can scan neighbors
/// directly. A value can be inserted at most once per search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultLedger {
    entries: Vec<Entry>,
    next_seq: usize,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_value(&self, value: &CandidateValue) -> bool {
        self.position(value).is_ok()
    }

    fn position(&self, value: &CandidateValue) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|e| e.record.value.total_cmp(value))
    }

    /// Order-preserving insertion. A non-finite (NaN) metric is recorded as
    /// `INFINITY` so it can never win; a duplicate value is an internal
    /// invariant violation (the queue must not hand one out).
    pub fn insert(&mut self, value: CandidateValue, metric: f64) -> TuneResult<()> {
        let metric = if metric.is_nan() { f64::INFINITY } else { metric };
        match self.position(&value) {
            Ok(_) => Err(TuneError::Internal(format!(
                "candidate {value} evaluated twice"
            ))),
            Err(at) => {
                self.entries.insert(
                    at,
                    Entry {
                        record: ResultRecord::new(value, metric),
                        seq: self.next_seq,
                    },
                );
                self.next_seq += 1;
                Ok(())
            }
        }
    }

    /// Records in value order.
    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn to_vec(&self) -> Vec<ResultRecord> {
        self.iter().cloned().collect()
    }

    /// The record with minimal metric; metric ties go to the earliest
    /// evaluated record.
    pub fn best(&self) -> Option<&ResultRecord> {
        self.entries
            .iter()
            .min_by(|a, b| {
                a.record
                    .metric
                    .total_cmp(&b.record.metric)
                    .then(a.seq.cmp(&b.seq))
            })
            .map(|e| &e.record)
    }

    /// The numeric slice of the ledger as `(value, metric)` pairs in value
    /// order. `Remove` and text records don't participate in grid narrowing.
    pub fn numeric_points(&self) -> Vec<(f64, f64)> {
        self.iter()
            .filter_map(|r| r.value.as_f64().map(|v| (v, r.metric)))
            .collect()
    }

    /// Whether every numeric record carries an integer value (`Int` variant).
    pub fn numeric_all_int(&self) -> bool {
        self.iter()
            .filter(|r| r.value.is_numeric())
            .all(|r| r.value.as_int().is_some())
    }
}
