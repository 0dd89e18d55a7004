//! Layer configurations and their tunable-parameter descriptors.

use serde::{Deserialize, Serialize};

use at_types::{CandidateValue, ModelError};

/// Pointwise activation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Elu,
}

impl Activation {
    pub const ALL: [Activation; 5] = [
        Activation::Linear,
        Activation::Relu,
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::Elu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Relu => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
            Self::Elu => "elu",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }

    pub fn apply(&self, z: f64) -> f64 {
        match self {
            Self::Linear => z,
            Self::Relu => z.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-z).exp()),
            Self::Tanh => z.tanh(),
            Self::Elu => {
                if z >= 0.0 {
                    z
                } else {
                    z.exp() - 1.0
                }
            }
        }
    }

    /// Derivative with respect to the pre-activation `z`.
    pub fn derivative(&self, z: f64) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::Relu => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Sigmoid => {
                let s = self.apply(z);
                s * (1.0 - s)
            }
            Self::Tanh => {
                let t = z.tanh();
                1.0 - t * t
            }
            Self::Elu => {
                if z >= 0.0 {
                    1.0
                } else {
                    z.exp()
                }
            }
        }
    }
}

/// Configuration of one layer in a sequential model.
///
/// Every variant carries a capability descriptor: [`param_names`] lists the
/// tunable parameters, and [`get_param`]/[`set_param`] are the typed
/// accessor/mutator pair the search engine uses. Whether a layer supports a
/// parameter is a membership test, not reflection.
///
/// [`param_names`]: LayerConfig::param_names
/// [`get_param`]: LayerConfig::get_param
/// [`set_param`]: LayerConfig::set_param
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerConfig {
    Dense { units: usize, activation: Activation },
    Dropout { rate: f64 },
}

impl LayerConfig {
    pub fn dense(units: usize, activation: Activation) -> Self {
        Self::Dense { units, activation }
    }

    pub fn dropout(rate: f64) -> Self {
        Self::Dropout { rate }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Dense { .. } => "Dense",
            Self::Dropout { .. } => "Dropout",
        }
    }

    /// Tunable parameter names for this layer kind.
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            Self::Dense { .. } => &["units", "activation"],
            Self::Dropout { .. } => &["rate"],
        }
    }

    pub fn supports_param(&self, name: &str) -> bool {
        self.param_names().contains(&name)
    }

    pub fn get_param(&self, name: &str) -> Option<CandidateValue> {
        match (self, name) {
            (Self::Dense { units, .. }, "units") => Some(CandidateValue::Int(*units as i64)),
            (Self::Dense { activation, .. }, "activation") => {
                Some(CandidateValue::Text(activation.name().to_string()))
            }
            (Self::Dropout { rate }, "rate") => Some(CandidateValue::Float(*rate)),
            _ => None,
        }
    }

    pub fn set_param(&mut self, name: &str, value: &CandidateValue) -> Result<(), ModelError> {
        let reject = |message: &str| ModelError::InvalidParameterValue {
            name: name.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        };

        match (&mut *self, name) {
            (Self::Dense { units, .. }, "units") => {
                let v = value
                    .as_f64()
                    .filter(|v| v.fract() == 0.0 && *v >= 0.0)
                    .ok_or_else(|| reject("units must be a non-negative integer"))?;
                *units = v as usize;
                Ok(())
            }
            (Self::Dense { activation, .. }, "activation") => {
                let text = value
                    .as_text()
                    .ok_or_else(|| reject("activation must be a function name"))?;
                *activation = Activation::from_name(text)
                    .ok_or_else(|| reject("unknown activation function"))?;
                Ok(())
            }
            (Self::Dropout { rate }, "rate") => {
                let v = value
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| reject("rate must be a finite number"))?;
                *rate = v;
                Ok(())
            }
            _ => Err(ModelError::UnknownParameter {
                name: name.to_string(),
                target: self.kind_name().to_string(),
            }),
        }
    }
}
