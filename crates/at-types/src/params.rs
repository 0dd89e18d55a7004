//! Parameter identification and numeric domains.

use serde::{Deserialize, Serialize};

/// Which configuration slot a search targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterTarget {
    /// A parameter on the compiled optimizer (e.g. "learning_rate").
    OptimizerParam,
    /// A parameter on one layer of the model (e.g. "units" at index 1).
    LayerParam { index: usize },
    /// The loss function itself; candidates are loss identities.
    LossFunction,
}

/// Identifies the parameter under search. Immutable for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub target: ParameterTarget,
    /// Numeric domain limits, when the parameter has any.
    pub domain: ParamDomain,
}

impl ParameterSpec {
    pub fn optimizer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: ParameterTarget::OptimizerParam,
            domain: ParamDomain::unbounded(),
        }
    }

    pub fn layer(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            target: ParameterTarget::LayerParam { index },
            domain: ParamDomain::unbounded(),
        }
    }

    pub fn loss() -> Self {
        Self {
            name: "loss".to_string(),
            target: ParameterTarget::LossFunction,
            domain: ParamDomain::unbounded(),
        }
    }

    pub fn with_domain(mut self, domain: ParamDomain) -> Self {
        self.domain = domain;
        self
    }
}

/// Inclusive numeric bounds for a parameter. Refinement never proposes
/// candidates outside these, and a tested boundary sitting exactly on a limit
/// is not extended past it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamDomain {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ParamDomain {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn at_least(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lower.map_or(true, |lo| v >= lo) && self.upper.map_or(true, |hi| v <= hi)
    }

    /// Clamp `v` into the domain.
    pub fn clamp(&self, v: f64) -> f64 {
        let v = self.lower.map_or(v, |lo| v.max(lo));
        self.upper.map_or(v, |hi| v.min(hi))
    }

    /// Whether `v` sits exactly on one of the limits.
    pub fn at_limit(&self, v: f64) -> bool {
        self.lower == Some(v) || self.upper == Some(v)
    }
}
