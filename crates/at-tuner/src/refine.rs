//! Adaptive grid narrowing over the sorted result ledger.

use tracing::debug;

use at_types::{CandidateValue, ParamDomain};

use crate::ledger::ResultLedger;

/// Proposes new candidates bracketing the best region found so far, or an
/// empty set to signal convergence.
///
/// Only numeric parameters refine; categorical searches are one-shot scans
/// and never construct a policy at all.
#[derive(Debug, Clone)]
pub struct RefinementPolicy {
    domain: ParamDomain,
    decimals: u32,
}

impl RefinementPolicy {
    pub fn new(domain: ParamDomain, decimals: u32) -> Self {
        Self { domain, decimals }
    }

    /// Inspect the ledger and propose the next round of candidates.
    ///
    /// An empty proposal is the termination signal. Proposals never repeat a
    /// value already recorded in the ledger and never leave the parameter
    /// domain.
    pub fn propose(&self, ledger: &ResultLedger) -> Vec<CandidateValue> {
        let points = ledger.numeric_points();
        if points.len() < 2 {
            return Vec::new();
        }

        let Some(min_idx) = first_local_minimum(&points) else {
            debug!("no local minimum in tested range; converged");
            return Vec::new();
        };

        let raw = if min_idx > 0 && min_idx < points.len() - 1 {
            // Interior minimum: bisect toward it from both sides.
            let (prev, _) = points[min_idx - 1];
            let (here, _) = points[min_idx];
            let (next, _) = points[min_idx + 1];
            vec![(prev + here) / 2.0, (here + next) / 2.0]
        } else if min_idx == 0 {
            self.extend_past(points[0].0, points[1].0)
        } else {
            self.extend_past(points[min_idx].0, points[min_idx - 1].0)
        };

        let as_int = ledger.numeric_all_int();
        let mut proposed = Vec::new();
        for v in raw {
            if !v.is_finite() || !self.domain.contains(v) {
                continue;
            }
            let candidate = self.to_candidate(v, as_int);
            if ledger.contains_value(&candidate)
                || proposed
                    .iter()
                    .any(|p: &CandidateValue| p.same_value(&candidate))
            {
                continue;
            }
            proposed.push(candidate);
        }
        debug!(count = proposed.len(), "refinement proposal");
        proposed
    }

    /// One step outward past an edge minimum, mirroring the gap to its
    /// neighbor. Nothing to propose when the edge already sits on a domain
    /// limit.
    fn extend_past(&self, edge: f64, neighbor: f64) -> Vec<f64> {
        if self.domain.at_limit(edge) {
            return Vec::new();
        }
        let outward = edge + (edge - neighbor);
        let clamped = self.domain.clamp(outward);
        if (clamped - edge).abs() < f64::EPSILON {
            return Vec::new();
        }
        vec![clamped]
    }

    fn to_candidate(&self, v: f64, as_int: bool) -> CandidateValue {
        if as_int {
            CandidateValue::Int(v.round() as i64)
        } else {
            CandidateValue::Float(v).rounded(self.decimals)
        }
    }
}

/// Index of the first record whose metric beats both neighbors (edges need
/// only beat their single neighbor). `None` means the curve is flat or
/// noisy with no strict dip.
fn first_local_minimum(points: &[(f64, f64)]) -> Option<usize> {
    let last = points.len() - 1;
    (0..points.len()).find(|&i| {
        let below_prev = i == 0 || points[i].1 < points[i - 1].1;
        let below_next = i == last || points[i].1 < points[i + 1].1;
        below_prev && below_next
    })
}
