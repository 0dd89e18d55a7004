//! Optimizer configurations and materialized update state.
//!
//! An [`OptimizerConfig`] is a pure value: the search engine snapshots it,
//! mutates one parameter, and rebuilds a fresh [`Optimizer`] from it — the
//! same config/instance split the backend training stacks use.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use at_types::{CandidateValue, ModelError};

/// Optimizer configuration with a typed tunable-parameter descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd {
        learning_rate: f64,
        momentum: f64,
        decay: f64,
    },
    Adam {
        learning_rate: f64,
        beta_1: f64,
        beta_2: f64,
        epsilon: f64,
    },
    Rmsprop {
        learning_rate: f64,
        rho: f64,
        epsilon: f64,
    },
}

impl OptimizerConfig {
    pub fn sgd(learning_rate: f64) -> Self {
        Self::Sgd {
            learning_rate,
            momentum: 0.0,
            decay: 0.0,
        }
    }

    pub fn adam(learning_rate: f64) -> Self {
        Self::Adam {
            learning_rate,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-7,
        }
    }

    pub fn rmsprop(learning_rate: f64) -> Self {
        Self::Rmsprop {
            learning_rate,
            rho: 0.9,
            epsilon: 1e-7,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sgd { .. } => "SGD",
            Self::Adam { .. } => "Adam",
            Self::Rmsprop { .. } => "RMSprop",
        }
    }

    /// Tunable parameter names for this optimizer kind.
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            Self::Sgd { .. } => &["learning_rate", "momentum", "decay"],
            Self::Adam { .. } => &["learning_rate", "beta_1", "beta_2", "epsilon"],
            Self::Rmsprop { .. } => &["learning_rate", "rho", "epsilon"],
        }
    }

    pub fn supports_param(&self, name: &str) -> bool {
        self.param_names().contains(&name)
    }

    pub fn get_param(&self, name: &str) -> Option<CandidateValue> {
        let v = match (self, name) {
            (Self::Sgd { learning_rate, .. }, "learning_rate") => *learning_rate,
            (Self::Sgd { momentum, .. }, "momentum") => *momentum,
            (Self::Sgd { decay, .. }, "decay") => *decay,
            (Self::Adam { learning_rate, .. }, "learning_rate") => *learning_rate,
            (Self::Adam { beta_1, .. }, "beta_1") => *beta_1,
            (Self::Adam { beta_2, .. }, "beta_2") => *beta_2,
            (Self::Adam { epsilon, .. }, "epsilon") => *epsilon,
            (Self::Rmsprop { learning_rate, .. }, "learning_rate") => *learning_rate,
            (Self::Rmsprop { rho, .. }, "rho") => *rho,
            (Self::Rmsprop { epsilon, .. }, "epsilon") => *epsilon,
            _ => return None,
        };
        Some(CandidateValue::Float(v))
    }

    pub fn set_param(&mut self, name: &str, value: &CandidateValue) -> Result<(), ModelError> {
        let v = value.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
            ModelError::InvalidParameterValue {
                name: name.to_string(),
                value: value.to_string(),
                message: "optimizer parameters must be finite numbers".to_string(),
            }
        })?;

        let slot = match (&mut *self, name) {
            (Self::Sgd { learning_rate, .. }, "learning_rate") => learning_rate,
            (Self::Sgd { momentum, .. }, "momentum") => momentum,
            (Self::Sgd { decay, .. }, "decay") => decay,
            (Self::Adam { learning_rate, .. }, "learning_rate") => learning_rate,
            (Self::Adam { beta_1, .. }, "beta_1") => beta_1,
            (Self::Adam { beta_2, .. }, "beta_2") => beta_2,
            (Self::Adam { epsilon, .. }, "epsilon") => epsilon,
            (Self::Rmsprop { learning_rate, .. }, "learning_rate") => learning_rate,
            (Self::Rmsprop { rho, .. }, "rho") => rho,
            (Self::Rmsprop { epsilon, .. }, "epsilon") => epsilon,
            _ => {
                return Err(ModelError::UnknownParameter {
                    name: name.to_string(),
                    target: self.kind_name().to_string(),
                })
            }
        };
        *slot = v;
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::sgd(0.01)
    }
}

/// Per-tensor optimizer state: first/second moment (or velocity) buffers.
#[derive(Debug, Clone, Default)]
struct Slot {
    m: Vec<f64>,
    v: Vec<f64>,
    t: usize,
}

/// A materialized optimizer: config plus accumulated update state.
///
/// State buffers are keyed by tensor id and sized lazily on first update, so
/// the optimizer doesn't need to know the network shape up front.
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: OptimizerConfig,
    iterations: usize,
    slots: HashMap<usize, Slot>,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            iterations: 0,
            slots: HashMap::new(),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Advance the global iteration counter (once per training step).
    pub fn step(&mut self) {
        self.iterations += 1;
    }

    /// Apply one gradient update to the tensor identified by `tensor`.
    pub fn update(&mut self, tensor: usize, params: &mut [f64], grads: &[f64]) {
        debug_assert_eq!(params.len(), grads.len());
        let slot = self.slots.entry(tensor).or_default();
        if slot.m.len() != params.len() {
            slot.m = vec![0.0; params.len()];
            slot.v = vec![0.0; params.len()];
            slot.t = 0;
        }

        match self.config {
            OptimizerConfig::Sgd {
                learning_rate,
                momentum,
                decay,
            } => {
                let lr = learning_rate / (1.0 + decay * self.iterations as f64);
                for i in 0..params.len() {
                    slot.m[i] = momentum * slot.m[i] - lr * grads[i];
                    params[i] += slot.m[i];
                }
            }
            OptimizerConfig::Adam {
                learning_rate,
                beta_1,
                beta_2,
                epsilon,
            } => {
                slot.t += 1;
                let t = slot.t as i32;
                let correction_1 = 1.0 - beta_1.powi(t);
                let correction_2 = 1.0 - beta_2.powi(t);
                for i in 0..params.len() {
                    slot.m[i] = beta_1 * slot.m[i] + (1.0 - beta_1) * grads[i];
                    slot.v[i] = beta_2 * slot.v[i] + (1.0 - beta_2) * grads[i] * grads[i];
                    let m_hat = slot.m[i] / correction_1;
                    let v_hat = slot.v[i] / correction_2;
                    params[i] -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
                }
            }
            OptimizerConfig::Rmsprop {
                learning_rate,
                rho,
                epsilon,
            } => {
                for i in 0..params.len() {
                    slot.v[i] = rho * slot.v[i] + (1.0 - rho) * grads[i] * grads[i];
                    params[i] -= learning_rate * grads[i] / (slot.v[i].sqrt() + epsilon);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_descriptor_membership() {
        let sgd = OptimizerConfig::sgd(0.01);
        assert!(sgd.supports_param("learning_rate"));
        assert!(sgd.supports_param("momentum"));
        assert!(!sgd.supports_param("beta_1"));

        let adam = OptimizerConfig::adam(0.001);
        assert!(adam.supports_param("beta_1"));
        assert!(!adam.supports_param("momentum"));
    }

    #[test]
    fn get_set_roundtrip() {
        let mut cfg = OptimizerConfig::sgd(0.01);
        cfg.set_param("learning_rate", &CandidateValue::Float(0.055))
            .unwrap();
        assert_eq!(
            cfg.get_param("learning_rate"),
            Some(CandidateValue::Float(0.055))
        );
        assert!(cfg
            .set_param("learning_rate", &CandidateValue::Float(f64::INFINITY))
            .is_err());
        assert!(matches!(
            cfg.set_param("rho", &CandidateValue::Float(0.9)),
            Err(ModelError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn sgd_moves_against_gradient() {
        let mut opt = Optimizer::new(OptimizerConfig::sgd(0.1));
        let mut params = vec![1.0, -1.0];
        opt.update(0, &mut params, &[1.0, -1.0]);
        assert!((params[0] - 0.9).abs() < 1e-12);
        assert!((params[1] + 0.9).abs() < 1e-12);
    }

    #[test]
    fn sgd_momentum_accumulates() {
        let mut opt = Optimizer::new(OptimizerConfig::Sgd {
            learning_rate: 0.1,
            momentum: 0.9,
            decay: 0.0,
        });
        let mut params = vec![0.0];
        opt.update(0, &mut params, &[1.0]);
        let first_step = params[0];
        opt.update(0, &mut params, &[1.0]);
        // Second step includes the velocity carried from the first.
        assert!((params[0] - first_step).abs() > first_step.abs());
    }

    #[test]
    fn decay_shrinks_learning_rate() {
        let mut opt = Optimizer::new(OptimizerConfig::Sgd {
            learning_rate: 0.1,
            momentum: 0.0,
            decay: 1.0,
        });
        let mut params = vec![0.0];
        opt.update(0, &mut params, &[1.0]);
        let undecayed_step = params[0].abs();
        opt.step();
        params[0] = 0.0;
        opt.update(0, &mut params, &[1.0]);
        assert!((params[0].abs() - undecayed_step / 2.0).abs() < 1e-12);
    }

    #[test]
    fn adam_first_update_approaches_learning_rate() {
        let mut opt = Optimizer::new(OptimizerConfig::adam(0.001));
        let mut params = vec![0.0];
        opt.update(0, &mut params, &[0.5]);
        // With bias correction the first step magnitude is ~learning_rate.
        assert!((params[0].abs() - 0.001).abs() < 1e-5);
    }

    #[test]
    fn separate_tensors_keep_separate_state() {
        let mut opt = Optimizer::new(OptimizerConfig::rmsprop(0.01));
        let mut a = vec![0.0];
        let mut b = vec![0.0];
        opt.update(0, &mut a, &[1.0]);
        opt.update(1, &mut b, &[1.0]);
        // Same gradient, fresh state for each tensor: identical first steps.
        assert!((a[0] - b[0]).abs() < 1e-12);
    }
}
