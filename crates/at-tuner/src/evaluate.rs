//! Metric evaluation: one candidate in, one comparable scalar out.

use tracing::warn;

use at_model::{SequentialModel, TrainReport, TrainSpec};
use at_types::{CandidateValue, MetricMode, ModelError, SearchSettings};

/// Materializes a model snapshot with a candidate applied.
///
/// Appliers never mutate the base model: each evaluation works on a fresh
/// copy, so a degenerate candidate (layer removal included) leaves the
/// working snapshot intact for the candidates after it.
pub trait CandidateApplier {
    /// Human-readable description of the slot being searched, for logs.
    fn describe(&self) -> String;

    fn materialize(
        &self,
        base: &SequentialModel,
        value: &CandidateValue,
    ) -> Result<SequentialModel, ModelError>;
}

/// Wraps the training backend and converts its outcome into the search
/// engine's metric space. A candidate that cannot be built, compiled, or
/// trained scores `f64::INFINITY` — a penalty, not a fatal condition, so the
/// rest of the candidates still get ranked.
pub struct MetricEvaluator<'a> {
    x: &'a [Vec<f64>],
    y: &'a [Vec<f64>],
    settings: SearchSettings,
}

impl<'a> MetricEvaluator<'a> {
    pub fn new(x: &'a [Vec<f64>], y: &'a [Vec<f64>], settings: SearchSettings) -> Self {
        Self { x, y, settings }
    }

    /// Evaluate one candidate against a copy of `base`.
    pub fn evaluate(
        &self,
        base: &SequentialModel,
        applier: &dyn CandidateApplier,
        value: &CandidateValue,
    ) -> f64 {
        match self.try_evaluate(base, applier, value) {
            Ok(metric) if metric.is_nan() => f64::INFINITY,
            Ok(metric) => metric,
            Err(error) => {
                warn!(
                    target_slot = %applier.describe(),
                    candidate = %value,
                    %error,
                    "evaluation failed; penalizing candidate"
                );
                f64::INFINITY
            }
        }
    }

    fn try_evaluate(
        &self,
        base: &SequentialModel,
        applier: &dyn CandidateApplier,
        value: &CandidateValue,
    ) -> Result<f64, ModelError> {
        let mut model = applier.materialize(base, value)?;
        model.build(self.x[0].len())?;
        let spec = TrainSpec {
            epochs: self.settings.effective_epochs(),
            sample_cap: self.settings.sample_cap,
            seed: self.settings.seed,
        };
        let report = model.train_and_score(self.x, self.y, &spec)?;
        Ok(score_report(&report, self.settings.metric_mode))
    }
}

/// Condense a loss curve into the configured scalar. Lower is better.
pub fn score_report(report: &TrainReport, mode: MetricMode) -> f64 {
    match mode {
        MetricMode::LastLoss => report.last_loss(),
        MetricMode::RelativeImprovementEpoch => {
            let first = report.first_loss();
            let last = report.last_loss();
            let span = report.epochs().saturating_sub(1);
            if span == 0 || first.abs() < f64::EPSILON || !first.is_finite() {
                // Nothing learnable or measurable: neutral slope.
                return 0.0;
            }
            // Negative when the loss is falling, so minimization prefers the
            // steepest descent.
            (last - first) / first / span as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_model::{Activation, LayerConfig, LossKind, OptimizerConfig};

    fn settings(mode: MetricMode) -> SearchSettings {
        SearchSettings {
            epochs: 3,
            metric_mode: mode,
            decimals: 5,
            sample_cap: 100,
            seed: 42,
            return_finalized_model: true,
        }
    }

    struct IdentityApplier;

    impl CandidateApplier for IdentityApplier {
        fn describe(&self) -> String {
            "identity".into()
        }

        fn materialize(
            &self,
            base: &SequentialModel,
            _value: &CandidateValue,
        ) -> Result<SequentialModel, ModelError> {
            Ok(base.clone())
        }
    }

    struct BrokenApplier;

    impl CandidateApplier for BrokenApplier {
        fn describe(&self) -> String {
            "broken".into()
        }

        fn materialize(
            &self,
            _base: &SequentialModel,
            _value: &CandidateValue,
        ) -> Result<SequentialModel, ModelError> {
            Err(ModelError::EmptyModel)
        }
    }

    fn dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (0..24)
            .map(|i| {
                let a = i as f64 / 24.0;
                (vec![a, 1.0 - a], vec![a * 0.5])
            })
            .unzip()
    }

    fn model() -> SequentialModel {
        let mut m = SequentialModel::new(vec![
            LayerConfig::dense(4, Activation::Tanh),
            LayerConfig::dense(1, Activation::Linear),
        ]);
        m.compile(OptimizerConfig::sgd(0.05), LossKind::Mse);
        m
    }

    #[test]
    fn last_loss_scoring() {
        let report = TrainReport {
            epoch_losses: vec![0.9, 0.5, 0.2],
        };
        assert_eq!(score_report(&report, MetricMode::LastLoss), 0.2);
    }

    #[test]
    fn relative_improvement_is_negative_when_learning() {
        let report = TrainReport {
            epoch_losses: vec![1.0, 0.75, 0.5],
        };
        let metric = score_report(&report, MetricMode::RelativeImprovementEpoch);
        assert!((metric - (-0.25)).abs() < 1e-12);
    }

    #[test]
    fn degenerate_curves_score_neutral() {
        let flat = TrainReport {
            epoch_losses: vec![0.4],
        };
        assert_eq!(score_report(&flat, MetricMode::RelativeImprovementEpoch), 0.0);
        let zero_start = TrainReport {
            epoch_losses: vec![0.0, 0.0],
        };
        assert_eq!(
            score_report(&zero_start, MetricMode::RelativeImprovementEpoch),
            0.0
        );
    }

    #[test]
    fn successful_evaluation_is_finite() {
        let (x, y) = dataset();
        let evaluator = MetricEvaluator::new(&x, &y, settings(MetricMode::LastLoss));
        let metric = evaluator.evaluate(&model(), &IdentityApplier, &CandidateValue::Int(0));
        assert!(metric.is_finite());
    }

    #[test]
    fn failed_materialization_is_penalized_not_fatal() {
        let (x, y) = dataset();
        let evaluator = MetricEvaluator::new(&x, &y, settings(MetricMode::LastLoss));
        let metric = evaluator.evaluate(&model(), &BrokenApplier, &CandidateValue::Int(0));
        assert!(metric.is_infinite());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let (x, y) = dataset();
        let evaluator = MetricEvaluator::new(&x, &y, settings(MetricMode::LastLoss));
        let a = evaluator.evaluate(&model(), &IdentityApplier, &CandidateValue::Int(0));
        let b = evaluator.evaluate(&model(), &IdentityApplier, &CandidateValue::Int(0));
        assert_eq!(a, b);
    }
}
