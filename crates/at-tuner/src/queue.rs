//! The mutable set of candidates still to be evaluated.

use serde::{Deserialize, Serialize};

use at_types::CandidateValue;

use crate::ledger::ResultLedger;

/// Not-yet-tried candidate values, deduplicated and drained in ascending
/// order (the `Remove` sentinel first). Values already present in the result
/// ledger are silently dropped on entry, so nothing is evaluated twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateQueue {
    values: Vec<CandidateValue>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize from caller-supplied or default values. Values are rounded
    /// to `decimals` before dedup, so near-identical floats collapse.
    pub fn seed(values: Vec<CandidateValue>, decimals: u32) -> Self {
        let mut queue = Self::new();
        for value in values {
            queue.push(value.rounded(decimals));
        }
        queue
    }

    /// Merge refinement proposals, dropping anything already tested.
    pub fn extend(&mut self, values: Vec<CandidateValue>, ledger: &ResultLedger, decimals: u32) {
        for value in values {
            let value = value.rounded(decimals);
            if !ledger.contains_value(&value) {
                self.push(value);
            }
        }
    }

    fn push(&mut self, value: CandidateValue) {
        match self
            .values
            .binary_search_by(|existing| existing.total_cmp(&value))
        {
            Ok(_) => {} // already queued
            Err(at) => self.values.insert(at, value),
        }
    }

    /// Remove and return the smallest remaining candidate.
    pub fn pop_next(&mut self) -> Option<CandidateValue> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.remove(0))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_sorts_and_dedups() {
        let mut queue = CandidateQueue::seed(
            vec![
                CandidateValue::Float(0.1),
                CandidateValue::Float(0.001),
                CandidateValue::Float(0.1),
                CandidateValue::Remove,
                CandidateValue::Float(0.01),
            ],
            5,
        );
        assert_eq!(queue.len(), 4);
        assert!(queue.pop_next().unwrap().is_remove());
        assert_eq!(queue.pop_next(), Some(CandidateValue::Float(0.001)));
        assert_eq!(queue.pop_next(), Some(CandidateValue::Float(0.01)));
        assert_eq!(queue.pop_next(), Some(CandidateValue::Float(0.1)));
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn rounding_collapses_near_duplicates() {
        let queue = CandidateQueue::seed(
            vec![CandidateValue::Float(0.12341), CandidateValue::Float(0.12339)],
            3,
        );
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn extend_skips_tested_values() {
        let mut ledger = ResultLedger::new();
        ledger.insert(CandidateValue::Float(0.01), 0.2).unwrap();

        let mut queue = CandidateQueue::new();
        queue.extend(
            vec![
                CandidateValue::Float(0.01),  // already tested
                CandidateValue::Float(0.055), // new
                CandidateValue::Float(0.055), // duplicate proposal
            ],
            &ledger,
            5,
        );
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_next(), Some(CandidateValue::Float(0.055)));
        assert!(queue.is_empty());
    }
}
