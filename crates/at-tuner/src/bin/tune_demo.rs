//! End-to-end demo: tune a small regression model's learning rate, layer
//! sizes, and loss function against a synthetic dataset.
//!
//! ```text
//! RUST_LOG=debug cargo run --bin tune-demo
//! ```

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use at_model::{Activation, LayerConfig, LossKind, OptimizerConfig, SequentialModel};
use at_tuner::{
    optimize_all_layers, optimize_loss_function, optimize_optimizer_parameter, TuneOutcome,
};
use at_types::SearchOptions;

/// Noiseless nonlinear regression target: y = sin(3a) * 0.5 + b^2.
fn synthetic_dataset(samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    (0..samples)
        .map(|i| {
            let a = i as f64 / samples as f64;
            let b = 1.0 - a;
            (vec![a, b], vec![(3.0 * a).sin() * 0.5 + b * b])
        })
        .unzip()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (x, y) = synthetic_dataset(256);

    let mut model = SequentialModel::new(vec![
        LayerConfig::dense(16, Activation::Tanh),
        LayerConfig::dense(8, Activation::Relu),
        LayerConfig::dense(1, Activation::Linear),
    ]);
    model.compile(OptimizerConfig::sgd(0.01), LossKind::Mse);

    let options = SearchOptions::new().with_epochs(3).with_seed(42);

    info!("step 1: learning rate");
    let model = match optimize_optimizer_parameter(&model, "learning_rate", &x, &y, &options)? {
        TuneOutcome::Model(m) => m,
        TuneOutcome::Report(_) => unreachable!("finalized model requested"),
    };
    info!(optimizer = ?model.optimizer_config(), "learning rate settled");

    info!("step 2: layer sizes");
    let model = optimize_all_layers(&model, "units", &x, &y, &options)?;
    info!(layers = ?model.layers(), "layer sizes settled");

    info!("step 3: loss function");
    let model = match optimize_loss_function(&model, &x, &y, &options)? {
        TuneOutcome::Model(m) => m,
        TuneOutcome::Report(_) => unreachable!("finalized model requested"),
    };
    info!(loss = model.loss_kind().name(), "loss settled");

    info!(
        layers = model.layer_count(),
        loss = model.loss_kind().name(),
        "tuning finished"
    );
    println!("{}", serde_json::to_string_pretty(model.layers())?);
    Ok(())
}
