//! # at-model
//!
//! Trainable sequential-model backend for ArcTune.
//!
//! Provides layer and optimizer configurations with typed capability
//! descriptors, regression loss functions, and a small dense network with
//! seeded short-run training (`train_and_score`). The tuner crate consumes
//! this through a narrow interface: configure, build, compile, train, score.

pub mod layers;
pub mod loss;
pub mod model;
pub mod optimizer;

pub use layers::{Activation, LayerConfig};
pub use loss::LossKind;
pub use model::{SequentialModel, TrainReport, TrainSpec};
pub use optimizer::{Optimizer, OptimizerConfig};
