//! Sequential model: build, compile, and short-run seeded training.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use at_types::ModelError;

use crate::layers::{Activation, LayerConfig};
use crate::loss::LossKind;
use crate::optimizer::{Optimizer, OptimizerConfig};

/// Parameters of one short training session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainSpec {
    pub epochs: usize,
    /// Maximum number of samples drawn from the training set.
    pub sample_cap: usize,
    /// All randomness (weight init, shuffling, dropout masks) flows from here.
    pub seed: u64,
}

/// Outcome of a training session: the per-epoch mean loss curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub epoch_losses: Vec<f64>,
}

impl TrainReport {
    pub fn first_loss(&self) -> f64 {
        self.epoch_losses.first().copied().unwrap_or(f64::INFINITY)
    }

    pub fn last_loss(&self) -> f64 {
        self.epoch_losses.last().copied().unwrap_or(f64::INFINITY)
    }

    pub fn epochs(&self) -> usize {
        self.epoch_losses.len()
    }
}

/// A layer materialized with its dimensions. Weights are (re)initialized from
/// the seed at the start of every training session, so two sessions with the
/// same spec produce identical curves regardless of what ran in between.
#[derive(Debug, Clone)]
enum BuiltLayer {
    Dense {
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        weights: Vec<f64>,
        bias: Vec<f64>,
    },
    Dropout {
        rate: f64,
    },
}

/// Per-layer forward trace kept for backpropagation.
enum Trace {
    Dense { input: Vec<f64>, pre: Vec<f64> },
    Dropout { mask: Vec<f64> },
}

/// A sequential stack of layers with an optimizer and a loss function.
///
/// The layer list, optimizer config, and loss are plain values the search
/// engine can snapshot and mutate; `build` validates structure and fixes
/// dimensions, `train_and_score` runs the seeded session.
#[derive(Debug, Clone)]
pub struct SequentialModel {
    layers: Vec<LayerConfig>,
    optimizer: OptimizerConfig,
    loss: LossKind,
    input_dim: Option<usize>,
    built: Option<Vec<BuiltLayer>>,
}

impl SequentialModel {
    pub fn new(layers: Vec<LayerConfig>) -> Self {
        Self {
            layers,
            optimizer: OptimizerConfig::default(),
            loss: LossKind::Mse,
            input_dim: None,
            built: None,
        }
    }

    pub fn layers(&self) -> &[LayerConfig] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_config(&self, index: usize) -> Option<&LayerConfig> {
        self.layers.get(index)
    }

    pub fn set_layer_config(&mut self, index: usize, config: LayerConfig) -> Result<(), ModelError> {
        let slot = self
            .layers
            .get_mut(index)
            .ok_or_else(|| Self::index_error(index))?;
        *slot = config;
        self.built = None;
        Ok(())
    }

    pub fn remove_layer(&mut self, index: usize) -> Result<LayerConfig, ModelError> {
        if index >= self.layers.len() {
            return Err(Self::index_error(index));
        }
        self.built = None;
        Ok(self.layers.remove(index))
    }

    pub fn insert_layer(&mut self, index: usize, config: LayerConfig) -> Result<(), ModelError> {
        if index > self.layers.len() {
            return Err(Self::index_error(index));
        }
        self.layers.insert(index, config);
        self.built = None;
        Ok(())
    }

    fn index_error(index: usize) -> ModelError {
        ModelError::InvalidLayer {
            index,
            message: "layer index out of range".to_string(),
        }
    }

    pub fn optimizer_config(&self) -> &OptimizerConfig {
        &self.optimizer
    }

    /// Replace the optimizer config; accumulated optimizer state is discarded
    /// (a fresh instance is materialized per training session anyway).
    pub fn rebuild_optimizer(&mut self, config: OptimizerConfig) {
        self.optimizer = config;
    }

    pub fn loss_kind(&self) -> LossKind {
        self.loss
    }

    pub fn compile(&mut self, optimizer: OptimizerConfig, loss: LossKind) {
        self.optimizer = optimizer;
        self.loss = loss;
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }

    /// Width of the model's output, once built.
    pub fn output_dim(&self) -> Option<usize> {
        let built = self.built.as_ref()?;
        let mut dim = self.input_dim?;
        for layer in built {
            if let BuiltLayer::Dense { out_dim, .. } = layer {
                dim = *out_dim;
            }
        }
        Some(dim)
    }

    /// Validate the layer stack and materialize dimensions for `input_dim`
    /// wide samples. Structural problems (empty model, zero-width dense
    /// layers, out-of-range dropout) surface here.
    pub fn build(&mut self, input_dim: usize) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if input_dim == 0 {
            return Err(ModelError::ShapeMismatch {
                message: "input width must be at least 1".to_string(),
            });
        }

        let mut built = Vec::with_capacity(self.layers.len());
        let mut dim = input_dim;
        for (index, layer) in self.layers.iter().enumerate() {
            match layer {
                LayerConfig::Dense { units, activation } => {
                    if *units == 0 {
                        return Err(ModelError::InvalidLayer {
                            index,
                            message: "dense layer must have at least 1 unit".to_string(),
                        });
                    }
                    built.push(BuiltLayer::Dense {
                        in_dim: dim,
                        out_dim: *units,
                        activation: *activation,
                        weights: vec![0.0; units * dim],
                        bias: vec![0.0; *units],
                    });
                    dim = *units;
                }
                LayerConfig::Dropout { rate } => {
                    if !(0.0..1.0).contains(rate) {
                        return Err(ModelError::InvalidLayer {
                            index,
                            message: format!("dropout rate {rate} outside [0, 1)"),
                        });
                    }
                    built.push(BuiltLayer::Dropout { rate: *rate });
                }
            }
        }

        self.input_dim = Some(input_dim);
        self.built = Some(built);
        debug!(
            layers = self.layers.len(),
            input_dim, output_dim = dim, "model built"
        );
        Ok(())
    }

    /// Run the model forward in inference mode (dropout disabled).
    pub fn predict(&self, sample: &[f64]) -> Result<Vec<f64>, ModelError> {
        let built = self.built.as_ref().ok_or_else(|| ModelError::NotBuilt {
            operation: "predict".to_string(),
        })?;
        self.check_input_width(sample.len())?;

        let mut activations = sample.to_vec();
        for layer in built {
            match layer {
                BuiltLayer::Dense {
                    in_dim,
                    out_dim,
                    activation,
                    weights,
                    bias,
                } => {
                    let mut next = vec![0.0; *out_dim];
                    for j in 0..*out_dim {
                        let mut z = bias[j];
                        for i in 0..*in_dim {
                            z += weights[j * in_dim + i] * activations[i];
                        }
                        next[j] = activation.apply(z);
                    }
                    activations = next;
                }
                BuiltLayer::Dropout { .. } => {}
            }
        }
        Ok(activations)
    }

    /// Train for `spec.epochs` over at most `spec.sample_cap` samples and
    /// return the per-epoch mean loss curve. Weights are re-initialized from
    /// `spec.seed` first, so the call is a pure function of (model config,
    /// data, spec).
    pub fn train_and_score(
        &mut self,
        x: &[Vec<f64>],
        y: &[Vec<f64>],
        spec: &TrainSpec,
    ) -> Result<TrainReport, ModelError> {
        if self.built.is_none() {
            return Err(ModelError::NotBuilt {
                operation: "train".to_string(),
            });
        }
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::ShapeMismatch {
                message: "training set is empty".to_string(),
            });
        }
        self.check_input_width(x[0].len())?;
        let output_dim = self.output_dim().unwrap_or(0);
        if y[0].len() != output_dim {
            return Err(ModelError::ShapeMismatch {
                message: format!(
                    "model produces {output_dim} outputs but targets have width {}",
                    y[0].len()
                ),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
        self.init_weights(&mut rng);
        let mut optimizer = Optimizer::new(self.optimizer.clone());

        let sample_count = x.len().min(y.len()).min(spec.sample_cap.max(1));
        let mut indices: Vec<usize> = (0..sample_count).collect();
        let epochs = spec.epochs.max(1);
        let loss = self.loss;

        let mut epoch_losses = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            indices.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            for &idx in &indices {
                let (prediction, traces) = self.forward_training(&x[idx], &mut rng);
                epoch_loss += loss.value(&prediction, &y[idx]);
                let delta = loss.gradient(&prediction, &y[idx]);
                self.backward(delta, traces, &mut optimizer);
                optimizer.step();
            }
            let mean = epoch_loss / sample_count as f64;
            if !mean.is_finite() {
                return Err(ModelError::Diverged { epoch });
            }
            epoch_losses.push(mean);
        }

        debug!(
            first = epoch_losses.first(),
            last = epoch_losses.last(),
            epochs,
            samples = sample_count,
            "training session finished"
        );
        Ok(TrainReport { epoch_losses })
    }

    fn check_input_width(&self, width: usize) -> Result<(), ModelError> {
        match self.input_dim {
            Some(dim) if dim == width => Ok(()),
            Some(dim) => Err(ModelError::ShapeMismatch {
                message: format!("model was built for width {dim} but samples have width {width}"),
            }),
            None => Err(ModelError::NotBuilt {
                operation: "forward pass".to_string(),
            }),
        }
    }

    /// Glorot-uniform initialization of every dense layer.
    fn init_weights(&mut self, rng: &mut ChaCha8Rng) {
        let built = self.built.as_mut().expect("checked by caller");
        for layer in built {
            if let BuiltLayer::Dense {
                in_dim,
                out_dim,
                weights,
                bias,
                ..
            } = layer
            {
                let limit = (6.0 / (*in_dim + *out_dim) as f64).sqrt();
                for w in weights.iter_mut() {
                    *w = rng.gen_range(-limit..limit);
                }
                for b in bias.iter_mut() {
                    *b = 0.0;
                }
            }
        }
    }

    /// Forward pass in training mode, recording the traces backprop needs.
    fn forward_training(&self, sample: &[f64], rng: &mut ChaCha8Rng) -> (Vec<f64>, Vec<Trace>) {
        let built = self.built.as_ref().expect("checked by caller");
        let mut activations = sample.to_vec();
        let mut traces = Vec::with_capacity(built.len());

        for layer in built {
            match layer {
                BuiltLayer::Dense {
                    in_dim,
                    out_dim,
                    activation,
                    weights,
                    bias,
                } => {
                    let mut pre = vec![0.0; *out_dim];
                    for j in 0..*out_dim {
                        let mut z = bias[j];
                        for i in 0..*in_dim {
                            z += weights[j * in_dim + i] * activations[i];
                        }
                        pre[j] = z;
                    }
                    let input = std::mem::replace(
                        &mut activations,
                        pre.iter().map(|&z| activation.apply(z)).collect(),
                    );
                    traces.push(Trace::Dense { input, pre });
                }
                BuiltLayer::Dropout { rate } => {
                    // Inverted dropout: surviving units are scaled up so the
                    // expected activation is unchanged.
                    let keep = 1.0 - rate;
                    let mask: Vec<f64> = activations
                        .iter()
                        .map(|_| {
                            if rng.gen::<f64>() < keep {
                                1.0 / keep
                            } else {
                                0.0
                            }
                        })
                        .collect();
                    for (a, m) in activations.iter_mut().zip(&mask) {
                        *a *= m;
                    }
                    traces.push(Trace::Dropout { mask });
                }
            }
        }

        (activations, traces)
    }

    /// Backpropagate `delta` (dLoss/dOutput) and apply optimizer updates.
    fn backward(&mut self, mut delta: Vec<f64>, traces: Vec<Trace>, optimizer: &mut Optimizer) {
        let built = self.built.as_mut().expect("checked by caller");

        for (layer_index, (layer, trace)) in built.iter_mut().zip(traces).enumerate().rev() {
            match (layer, trace) {
                (
                    BuiltLayer::Dense {
                        in_dim,
                        out_dim,
                        activation,
                        weights,
                        bias,
                    },
                    Trace::Dense { input, pre },
                ) => {
                    let mut dz = vec![0.0; *out_dim];
                    for j in 0..*out_dim {
                        dz[j] = delta[j] * activation.derivative(pre[j]);
                    }

                    let mut grad_w = vec![0.0; weights.len()];
                    for j in 0..*out_dim {
                        for i in 0..*in_dim {
                            grad_w[j * *in_dim + i] = dz[j] * input[i];
                        }
                    }

                    // Propagate before the weights are updated.
                    let mut next_delta = vec![0.0; *in_dim];
                    for i in 0..*in_dim {
                        let mut sum = 0.0;
                        for j in 0..*out_dim {
                            sum += dz[j] * weights[j * *in_dim + i];
                        }
                        next_delta[i] = sum;
                    }

                    optimizer.update(layer_index * 2, weights, &grad_w);
                    optimizer.update(layer_index * 2 + 1, bias, &dz);
                    delta = next_delta;
                }
                (BuiltLayer::Dropout { .. }, Trace::Dropout { mask }) => {
                    for (d, m) in delta.iter_mut().zip(&mask) {
                        *d *= m;
                    }
                }
                _ => unreachable!("trace kind always matches layer kind"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_dataset(n: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        // y = 2a - b + 0.5, scaled into a small range
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let a = (i as f64 / n as f64) - 0.5;
            let b = ((i * 7 % n) as f64 / n as f64) - 0.5;
            x.push(vec![a, b]);
            y.push(vec![2.0 * a - b + 0.5]);
        }
        (x, y)
    }

    fn small_model() -> SequentialModel {
        let mut model = SequentialModel::new(vec![
            LayerConfig::dense(8, Activation::Tanh),
            LayerConfig::dense(1, Activation::Linear),
        ]);
        model.compile(OptimizerConfig::sgd(0.05), LossKind::Mse);
        model
    }

    fn spec(epochs: usize) -> TrainSpec {
        TrainSpec {
            epochs,
            sample_cap: 5000,
            seed: 42,
        }
    }

    #[test]
    fn build_validates_structure() {
        let mut empty = SequentialModel::new(vec![]);
        assert!(matches!(empty.build(2), Err(ModelError::EmptyModel)));

        let mut zero_units = SequentialModel::new(vec![LayerConfig::dense(0, Activation::Relu)]);
        assert!(matches!(
            zero_units.build(2),
            Err(ModelError::InvalidLayer { index: 0, .. })
        ));

        let mut bad_dropout = SequentialModel::new(vec![
            LayerConfig::dense(4, Activation::Relu),
            LayerConfig::dropout(1.5),
        ]);
        assert!(matches!(
            bad_dropout.build(2),
            Err(ModelError::InvalidLayer { index: 1, .. })
        ));

        let mut model = small_model();
        model.build(2).unwrap();
        assert!(model.is_built());
        assert_eq!(model.output_dim(), Some(1));
    }

    #[test]
    fn train_requires_build() {
        let mut model = small_model();
        let (x, y) = linear_dataset(16);
        assert!(matches!(
            model.train_and_score(&x, &y, &spec(1)),
            Err(ModelError::NotBuilt { .. })
        ));
    }

    #[test]
    fn target_width_mismatch_is_shape_error() {
        let mut model = small_model();
        model.build(2).unwrap();
        let (x, _) = linear_dataset(16);
        let wide_y: Vec<Vec<f64>> = (0..16).map(|_| vec![0.0, 0.0]).collect();
        assert!(matches!(
            model.train_and_score(&x, &wide_y, &spec(1)),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn training_reduces_loss_on_linear_data() {
        let mut model = small_model();
        model.build(2).unwrap();
        let (x, y) = linear_dataset(64);
        let report = model.train_and_score(&x, &y, &spec(10)).unwrap();
        assert_eq!(report.epochs(), 10);
        assert!(report.last_loss() < report.first_loss());
    }

    #[test]
    fn training_is_deterministic_for_a_seed() {
        let (x, y) = linear_dataset(32);
        let mut a = small_model();
        a.build(2).unwrap();
        let first = a.train_and_score(&x, &y, &spec(3)).unwrap();

        let mut b = small_model();
        b.build(2).unwrap();
        // Perturb RNG history with an unrelated session first.
        let _ = b.train_and_score(&x, &y, &spec(2)).unwrap();
        let second = b.train_and_score(&x, &y, &spec(3)).unwrap();

        assert_eq!(first.epoch_losses, second.epoch_losses);
    }

    #[test]
    fn sample_cap_limits_training_set() {
        let (x, y) = linear_dataset(64);
        let mut model = small_model();
        model.build(2).unwrap();
        let capped = TrainSpec {
            sample_cap: 8,
            ..spec(2)
        };
        // Just asserts the capped run completes; the cap path is exercised.
        let report = model.train_and_score(&x, &y, &capped).unwrap();
        assert_eq!(report.epochs(), 2);
    }

    #[test]
    fn dropout_model_trains() {
        let mut model = SequentialModel::new(vec![
            LayerConfig::dense(8, Activation::Relu),
            LayerConfig::dropout(0.25),
            LayerConfig::dense(1, Activation::Linear),
        ]);
        model.compile(OptimizerConfig::sgd(0.05), LossKind::Mse);
        model.build(2).unwrap();
        let (x, y) = linear_dataset(32);
        let report = model.train_and_score(&x, &y, &spec(4)).unwrap();
        assert!(report.epoch_losses.iter().all(|l| l.is_finite()));
    }

    #[test]
    fn predict_runs_without_dropout() {
        let mut model = SequentialModel::new(vec![
            LayerConfig::dense(4, Activation::Tanh),
            LayerConfig::dropout(0.5),
            LayerConfig::dense(1, Activation::Linear),
        ]);
        model.compile(OptimizerConfig::sgd(0.05), LossKind::Mse);
        model.build(2).unwrap();
        let (x, y) = linear_dataset(16);
        model.train_and_score(&x, &y, &spec(2)).unwrap();
        // Inference is deterministic: dropout is inactive.
        let a = model.predict(&x[0]).unwrap();
        let b = model.predict(&x[0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn layer_list_edits_invalidate_build() {
        let mut model = small_model();
        model.build(2).unwrap();
        model
            .set_layer_config(0, LayerConfig::dense(16, Activation::Relu))
            .unwrap();
        assert!(!model.is_built());
        assert!(model.set_layer_config(5, LayerConfig::dropout(0.1)).is_err());

        let removed = model.remove_layer(0).unwrap();
        assert_eq!(removed, LayerConfig::dense(16, Activation::Relu));
        model.insert_layer(0, removed).unwrap();
        assert_eq!(model.layer_count(), 2);
    }
}
