//! Regression loss functions: per-sample value and gradient.

use serde::{Deserialize, Serialize};

/// Huber transition point between quadratic and linear regions.
const HUBER_DELTA: f64 = 1.0;

/// Loss function identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossKind {
    Mse,
    MeanAbsoluteError,
    MeanSquaredLogarithmicError,
    Huber,
}

impl LossKind {
    /// The regression losses a loss-function search scans by default.
    pub const REGRESSION: [LossKind; 4] = [
        LossKind::Mse,
        LossKind::MeanAbsoluteError,
        LossKind::MeanSquaredLogarithmicError,
        LossKind::Huber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mse => "mse",
            Self::MeanAbsoluteError => "mean_absolute_error",
            Self::MeanSquaredLogarithmicError => "mean_squared_logarithmic_error",
            Self::Huber => "huber",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::REGRESSION.iter().copied().find(|l| l.name() == name)
    }

    /// Mean loss over the components of one prediction/target pair.
    pub fn value(&self, pred: &[f64], target: &[f64]) -> f64 {
        debug_assert_eq!(pred.len(), target.len());
        let n = pred.len().max(1) as f64;
        pred.iter()
            .zip(target)
            .map(|(&p, &t)| self.elementwise(p, t))
            .sum::<f64>()
            / n
    }

    /// Gradient of [`value`](Self::value) with respect to each prediction.
    pub fn gradient(&self, pred: &[f64], target: &[f64]) -> Vec<f64> {
        debug_assert_eq!(pred.len(), target.len());
        let n = pred.len().max(1) as f64;
        pred.iter()
            .zip(target)
            .map(|(&p, &t)| self.elementwise_grad(p, t) / n)
            .collect()
    }

    fn elementwise(&self, p: f64, t: f64) -> f64 {
        match self {
            Self::Mse => {
                let e = p - t;
                e * e
            }
            Self::MeanAbsoluteError => (p - t).abs(),
            Self::MeanSquaredLogarithmicError => {
                let e = (1.0 + p).max(1e-12).ln() - (1.0 + t).max(1e-12).ln();
                e * e
            }
            Self::Huber => {
                let e = p - t;
                if e.abs() <= HUBER_DELTA {
                    0.5 * e * e
                } else {
                    HUBER_DELTA * (e.abs() - 0.5 * HUBER_DELTA)
                }
            }
        }
    }

    fn elementwise_grad(&self, p: f64, t: f64) -> f64 {
        match self {
            Self::Mse => 2.0 * (p - t),
            Self::MeanAbsoluteError => (p - t).signum(),
            Self::MeanSquaredLogarithmicError => {
                let sp = (1.0 + p).max(1e-12);
                let st = (1.0 + t).max(1e-12);
                2.0 * (sp.ln() - st.ln()) / sp
            }
            Self::Huber => {
                let e = p - t;
                if e.abs() <= HUBER_DELTA {
                    e
                } else {
                    HUBER_DELTA * e.signum()
                }
            }
        }
    }
}

impl std::fmt::Display for LossKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
