//! Candidate values for a single-parameter search.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One concrete setting of the parameter under search.
///
/// `Remove` is the sentinel meaning "omit the target layer entirely" rather
/// than setting a value. In the ledger's total order it sorts before every
/// other value, so degenerate candidates always sit at the front of the
/// scanned range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CandidateValue {
    Remove,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CandidateValue {
    /// Numeric view of the value, if it has one. `Remove` and `Text` don't.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// Round a float value to `decimals` places; other variants pass through.
    ///
    /// Candidates are rounded before dedup and insertion, so refinement
    /// terminates once proposed midpoints collapse onto tested values.
    pub fn rounded(&self, decimals: u32) -> Self {
        match self {
            Self::Float(v) => {
                let scale = 10f64.powi(decimals as i32);
                Self::Float((v * scale).round() / scale)
            }
            other => other.clone(),
        }
    }

    /// Total order used by the ledger and queue: `Remove` sorts least,
    /// numerics compare as f64 (so `Int(8)` and `Float(8.0)` are equal),
    /// text sorts after all numerics, lexicographically among itself.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        use CandidateValue::*;
        match (self, other) {
            (Remove, Remove) => Ordering::Equal,
            (Remove, _) => Ordering::Less,
            (_, Remove) => Ordering::Greater,
            (Text(a), Text(b)) => a.cmp(b),
            (Text(_), _) => Ordering::Greater,
            (_, Text(_)) => Ordering::Less,
            (a, b) => {
                // Both numeric here by elimination.
                let a = a.as_f64().unwrap_or(f64::NEG_INFINITY);
                let b = b.as_f64().unwrap_or(f64::NEG_INFINITY);
                a.total_cmp(&b)
            }
        }
    }

    /// Equality under the ledger's total order.
    pub fn same_value(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl From<f64> for CandidateValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for CandidateValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for CandidateValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl std::fmt::Display for CandidateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remove => write!(f, "<remove>"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_sorts_first() {
        let mut values = vec![
            CandidateValue::Float(0.1),
            CandidateValue::Remove,
            CandidateValue::Int(-3),
        ];
        values.sort_by(|a, b| a.total_cmp(b));
        assert!(values[0].is_remove());
        assert_eq!(values[1], CandidateValue::Int(-3));
    }

    #[test]
    fn int_and_float_compare_as_numbers() {
        let a = CandidateValue::Int(8);
        let b = CandidateValue::Float(8.0);
        assert!(a.same_value(&b));
        assert_eq!(
            CandidateValue::Int(8).total_cmp(&CandidateValue::Float(8.5)),
            Ordering::Less
        );
    }

    #[test]
    fn text_sorts_after_numerics() {
        let a = CandidateValue::Float(1e9);
        let b = CandidateValue::Text("relu".into());
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(
            CandidateValue::Text("elu".into()).total_cmp(&CandidateValue::Text("relu".into())),
            Ordering::Less
        );
    }

    #[test]
    fn rounding_to_decimals() {
        let v = CandidateValue::Float(0.055_499_9);
        assert_eq!(v.rounded(4), CandidateValue::Float(0.0555));
        // Non-float variants are untouched
        assert_eq!(CandidateValue::Int(16).rounded(2), CandidateValue::Int(16));
        assert!(CandidateValue::Remove.rounded(2).is_remove());
    }

    #[test]
    fn serialization_roundtrip() {
        let v = CandidateValue::Text("tanh".into());
        let json = serde_json::to_string(&v).unwrap();
        let back: CandidateValue = serde_json::from_str(&json).unwrap();
        assert!(v.same_value(&back));
    }
}
