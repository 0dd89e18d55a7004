//! Search controller and the entry operations.
//!
//! One search optimizes exactly one parameter dimension: an optimizer
//! parameter, one layer's parameter (removal included), or the loss function.
//! The controller drains the candidate queue, records every evaluation in the
//! ledger, consults the refinement policy whenever the queue runs dry, and
//! finally applies the winning value back onto a copy of the input model.

use tracing::{debug, info, warn};

use at_model::{LossKind, SequentialModel};
use at_types::{
    invalid_input, CandidateValue, MetricMode, ModelError, ParameterSpec,
    ResultRecord, SearchOptions, SearchReport, SearchSettings, TuneResult,
};

use crate::defaults::{default_interval, domain_for, resolve_settings};
use crate::evaluate::{CandidateApplier, MetricEvaluator};
use crate::ledger::ResultLedger;
use crate::queue::CandidateQueue;
use crate::refine::RefinementPolicy;
use crate::report::plot_results;

// --- appliers ---

/// Rewrites one optimizer parameter on a model copy.
struct OptimizerParamApplier {
    param: String,
}

impl CandidateApplier for OptimizerParamApplier {
    fn describe(&self) -> String {
        format!("optimizer.{}", self.param)
    }

    fn materialize(
        &self,
        base: &SequentialModel,
        value: &CandidateValue,
    ) -> Result<SequentialModel, ModelError> {
        let mut model = base.clone();
        let mut config = model.optimizer_config().clone();
        config.set_param(&self.param, value)?;
        model.rebuild_optimizer(config);
        Ok(model)
    }
}

/// Rewrites one layer parameter, or excises the layer for the `Remove`
/// sentinel. Removal is only final if it wins; every candidate works on a
/// fresh copy, so the working snapshot keeps the layer.
struct LayerParamApplier {
    param: String,
    index: usize,
}

impl CandidateApplier for LayerParamApplier {
    fn describe(&self) -> String {
        format!("layer[{}].{}", self.index, self.param)
    }

    fn materialize(
        &self,
        base: &SequentialModel,
        value: &CandidateValue,
    ) -> Result<SequentialModel, ModelError> {
        let mut model = base.clone();
        if value.is_remove() {
            model.remove_layer(self.index)?;
            return Ok(model);
        }
        let mut layer = model
            .layer_config(self.index)
            .cloned()
            .ok_or_else(|| ModelError::InvalidLayer {
                index: self.index,
                message: "no such layer".to_string(),
            })?;
        layer.set_param(&self.param, value)?;
        model.set_layer_config(self.index, layer)?;
        Ok(model)
    }
}

/// Recompiles a model copy with a candidate loss function, named by a text
/// candidate.
struct LossApplier;

impl CandidateApplier for LossApplier {
    fn describe(&self) -> String {
        "loss".to_string()
    }

    fn materialize(
        &self,
        base: &SequentialModel,
        value: &CandidateValue,
    ) -> Result<SequentialModel, ModelError> {
        let reject = |message: &str| ModelError::InvalidParameterValue {
            name: "loss".to_string(),
            value: value.to_string(),
            message: message.to_string(),
        };
        let name = value
            .as_text()
            .ok_or_else(|| reject("loss candidates must be loss-function names"))?;
        let kind = LossKind::from_name(name).ok_or_else(|| reject("unknown loss function"))?;
        let mut model = base.clone();
        let optimizer = model.optimizer_config().clone();
        model.compile(optimizer, kind);
        Ok(model)
    }
}

// --- controller ---

/// Drives one search: pop, evaluate, record, refine, repeat until the queue
/// stays empty.
struct SearchController<'a, 'b> {
    evaluator: &'b MetricEvaluator<'a>,
    refinement: Option<RefinementPolicy>,
    decimals: u32,
}

impl SearchController<'_, '_> {
    fn run(
        &self,
        base: &SequentialModel,
        applier: &dyn CandidateApplier,
        mut queue: CandidateQueue,
    ) -> TuneResult<ResultLedger> {
        let mut ledger = ResultLedger::new();
        let mut round = 0usize;
        while let Some(value) = queue.pop_next() {
            let metric = self.evaluator.evaluate(base, applier, &value);
            info!(
                target_slot = %applier.describe(),
                candidate = %value,
                metric,
                "candidate evaluated"
            );
            ledger.insert(value, metric)?;

            // The queue just ran dry: ask the refinement policy whether the
            // grid should narrow. An empty proposal ends the search.
            if queue.is_empty() {
                if let Some(policy) = &self.refinement {
                    let proposed = policy.propose(&ledger);
                    if !proposed.is_empty() {
                        round += 1;
                        debug!(round, proposed = proposed.len(), "narrowing search grid");
                        queue.extend(proposed, &ledger, self.decimals);
                    }
                }
            }
        }
        Ok(ledger)
    }
}

/// What a search hands back: the finalized winning model (the default), or
/// the raw run report when the caller asked for results instead.
#[derive(Debug, Clone)]
pub enum TuneOutcome {
    Model(SequentialModel),
    Report(SearchReport),
}

impl TuneOutcome {
    pub fn into_model(self) -> Option<SequentialModel> {
        match self {
            Self::Model(model) => Some(model),
            Self::Report(_) => None,
        }
    }

    pub fn into_report(self) -> Option<SearchReport> {
        match self {
            Self::Model(_) => None,
            Self::Report(report) => Some(report),
        }
    }
}

// --- shared plumbing ---

fn validate_dataset(x: &[Vec<f64>], y: &[Vec<f64>]) -> TuneResult<usize> {
    if x.is_empty() || y.is_empty() {
        return Err(invalid_input!("training set is empty"));
    }
    if x.len() != y.len() {
        return Err(invalid_input!("x has {} rows but y has {}", x.len(), y.len()));
    }
    let width = x[0].len();
    if width == 0 {
        return Err(invalid_input!("training samples have zero features"));
    }
    Ok(width)
}

/// Candidate values for a search: caller-supplied, or the default interval
/// for the parameter. `None` when neither exists; the search must then abort
/// with the model unchanged, not error out.
fn seed_values(options: &SearchOptions, param: &str) -> Option<Vec<CandidateValue>> {
    match &options.candidate_values {
        Some(values) => Some(values.clone()),
        None => default_interval(param),
    }
}

/// Numeric grids refine; any text candidate makes the search a one-shot scan.
fn refinement_for(
    seeded: &[CandidateValue],
    spec: &ParameterSpec,
    decimals: u32,
) -> Option<RefinementPolicy> {
    seeded
        .iter()
        .all(|c| c.is_remove() || c.is_numeric())
        .then(|| RefinementPolicy::new(spec.domain, decimals))
}

fn push_if_absent(values: &mut Vec<CandidateValue>, value: CandidateValue) {
    if !values.iter().any(|c| c.same_value(&value)) {
        values.push(value);
    }
}

fn abort(
    mut report: SearchReport,
    original: &SequentialModel,
    settings: &SearchSettings,
    diagnostic: String,
) -> TuneResult<TuneOutcome> {
    warn!(%diagnostic, "search aborted; model returned unchanged");
    report.mark_aborted(diagnostic);
    Ok(if settings.return_finalized_model {
        TuneOutcome::Model(original.clone())
    } else {
        TuneOutcome::Report(report)
    })
}

/// Apply the best record to a fresh copy of the original model and build it.
/// Without a finite best there is nothing worth applying, so the original
/// configuration is kept.
fn finalize(
    original: &SequentialModel,
    applier: &dyn CandidateApplier,
    best: Option<&ResultRecord>,
    width: usize,
) -> TuneResult<SequentialModel> {
    match best {
        Some(record) if !record.failed() => {
            info!(
                target_slot = %applier.describe(),
                winner = %record.value,
                metric = record.metric,
                "applying winning candidate"
            );
            let mut winner = applier.materialize(original, &record.value)?;
            winner.build(width)?;
            Ok(winner)
        }
        _ => {
            warn!(
                target_slot = %applier.describe(),
                "no candidate produced a finite metric; keeping the original configuration"
            );
            Ok(original.clone())
        }
    }
}

fn conclude(
    mut report: SearchReport,
    ledger: ResultLedger,
    original: &SequentialModel,
    applier: &dyn CandidateApplier,
    width: usize,
    settings: &SearchSettings,
) -> TuneResult<TuneOutcome> {
    let records = ledger.to_vec();
    plot_results(&records);
    let best = ledger.best().cloned();
    if settings.return_finalized_model {
        let finalized = finalize(original, applier, best.as_ref(), width)?;
        report.mark_completed(records, best);
        Ok(TuneOutcome::Model(finalized))
    } else {
        report.mark_completed(records, best);
        Ok(TuneOutcome::Report(report))
    }
}

fn run_to_outcome(
    report: SearchReport,
    model: &SequentialModel,
    applier: &dyn CandidateApplier,
    seeded: Vec<CandidateValue>,
    spec: &ParameterSpec,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    width: usize,
    settings: SearchSettings,
) -> TuneResult<TuneOutcome> {
    let queue = CandidateQueue::seed(seeded.clone(), settings.decimals);
    let evaluator = MetricEvaluator::new(x, y, settings);
    let controller = SearchController {
        evaluator: &evaluator,
        refinement: refinement_for(&seeded, spec, settings.decimals),
        decimals: settings.decimals,
    };
    let ledger = controller.run(model, applier, queue)?;
    conclude(report, ledger, model, applier, width, &settings)
}

// --- entry operations ---

/// Search one optimizer parameter (e.g. `"learning_rate"`).
///
/// Aborts, returning the model unchanged, when the compiled optimizer does
/// not carry the parameter or no candidates are available.
pub fn optimize_optimizer_parameter(
    model: &SequentialModel,
    param: &str,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    options: &SearchOptions,
) -> TuneResult<TuneOutcome> {
    let width = validate_dataset(x, y)?;
    let settings = resolve_settings(options, MetricMode::default());
    let spec = ParameterSpec::optimizer(param).with_domain(domain_for(param));
    let mut report = SearchReport::new(spec.clone());
    report.mark_running();
    info!(param, optimizer = model.optimizer_config().kind_name(), "optimizer parameter search");

    if !model.optimizer_config().supports_param(param) {
        return abort(
            report,
            model,
            &settings,
            format!(
                "optimizer '{}' has no parameter '{}'",
                model.optimizer_config().kind_name(),
                param
            ),
        );
    }

    let Some(seeded) = seed_values(options, param) else {
        return abort(
            report,
            model,
            &settings,
            format!("no default interval for '{param}'; supply candidate values"),
        );
    };
    if seeded.is_empty() {
        return abort(report, model, &settings, "no candidate values".to_string());
    }

    let applier = OptimizerParamApplier {
        param: param.to_string(),
    };
    run_to_outcome(report, model, &applier, seeded, &spec, x, y, width, settings)
}

/// Search one parameter of one layer (e.g. `"units"` of layer 1).
///
/// The candidate set may include the `Remove` sentinel, meaning the layer is
/// optional and should also be tried absent. The layer's current value joins
/// the candidates, so the search can never regress below the starting point.
pub fn optimize_layer_parameter(
    model: &SequentialModel,
    param: &str,
    index: usize,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    options: &SearchOptions,
) -> TuneResult<TuneOutcome> {
    let width = validate_dataset(x, y)?;
    let settings = resolve_settings(options, MetricMode::default());
    let spec = ParameterSpec::layer(param, index).with_domain(domain_for(param));
    let mut report = SearchReport::new(spec.clone());
    report.mark_running();
    info!(param, index, "layer parameter search");

    let Some(layer) = model.layer_config(index) else {
        return abort(
            report,
            model,
            &settings,
            format!(
                "layer index {} out of range for a {}-layer model",
                index,
                model.layer_count()
            ),
        );
    };
    if !layer.supports_param(param) {
        return abort(
            report,
            model,
            &settings,
            format!("{} layer has no parameter '{}'", layer.kind_name(), param),
        );
    }

    let Some(mut seeded) = seed_values(options, param) else {
        return abort(
            report,
            model,
            &settings,
            format!("no default interval for '{param}'; supply candidate values"),
        );
    };
    if seeded.is_empty() {
        return abort(report, model, &settings, "no candidate values".to_string());
    }
    if let Some(current) = layer.get_param(param) {
        push_if_absent(&mut seeded, current);
    }

    let applier = LayerParamApplier {
        param: param.to_string(),
        index,
    };
    run_to_outcome(report, model, &applier, seeded, &spec, x, y, width, settings)
}

/// One-shot exhaustive scan over candidate loss functions.
///
/// Defaults to the regression losses plus the model's current loss, scored by
/// `RelativeImprovementEpoch` (a final-epoch loss is not comparable across
/// loss functions; the improvement slope is). If every candidate fails, the
/// original loss is kept.
pub fn optimize_loss_function(
    model: &SequentialModel,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    options: &SearchOptions,
) -> TuneResult<TuneOutcome> {
    let width = validate_dataset(x, y)?;
    let settings = resolve_settings(options, MetricMode::RelativeImprovementEpoch);
    let spec = ParameterSpec::loss();
    let mut report = SearchReport::new(spec.clone());
    report.mark_running();
    info!(current = model.loss_kind().name(), "loss function search");

    let mut seeded = match &options.candidate_values {
        Some(values) => values.clone(),
        None => LossKind::REGRESSION
            .iter()
            .map(|kind| CandidateValue::Text(kind.name().to_string()))
            .collect(),
    };
    if seeded.is_empty() {
        return abort(report, model, &settings, "no candidate values".to_string());
    }
    push_if_absent(
        &mut seeded,
        CandidateValue::Text(model.loss_kind().name().to_string()),
    );

    run_to_outcome(report, model, &LossApplier, seeded, &spec, x, y, width, settings)
}

/// Sweep one parameter across every layer except the output layer, running a
/// full search per layer and feeding each winner into the next.
///
/// Indices shift as the model shrinks when a `Remove` candidate wins, so the
/// sweep tracks the offset between the original and the current layer list.
/// Layers without the parameter are skipped.
pub fn optimize_all_layers(
    model: &SequentialModel,
    param: &str,
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    options: &SearchOptions,
) -> TuneResult<SequentialModel> {
    validate_dataset(x, y)?;
    let original_count = model.layer_count();
    if original_count == 0 {
        return Err(invalid_input!("model has no layers"));
    }
    info!(param, layers = original_count, "whole-model layer sweep");

    let mut options = options.clone();
    options.return_finalized_model = Some(true);

    let mut working = model.clone();
    for original_index in 0..original_count.saturating_sub(1) {
        let offset = working.layer_count() as i64 - original_count as i64;
        let index = original_index as i64 + offset;
        let Ok(index) = usize::try_from(index) else {
            continue;
        };
        let supported = working
            .layer_config(index)
            .map(|layer| layer.supports_param(param))
            .unwrap_or(false);
        if !supported {
            debug!(index, param, "layer skipped in sweep");
            continue;
        }
        match optimize_layer_parameter(&working, param, index, x, y, &options)? {
            TuneOutcome::Model(next) => working = next,
            // Unreachable: the sweep always requests a finalized model.
            TuneOutcome::Report(_) => {}
        }
    }
    Ok(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_model::{Activation, LayerConfig, OptimizerConfig};
    use at_types::RunState;

    fn dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        (0..16)
            .map(|i| {
                let a = i as f64 / 16.0;
                (vec![a, 1.0 - a], vec![0.5 * a + 0.1])
            })
            .unzip()
    }

    fn model() -> SequentialModel {
        let mut m = SequentialModel::new(vec![
            LayerConfig::dense(3, Activation::Tanh),
            LayerConfig::dense(1, Activation::Linear),
        ]);
        m.compile(OptimizerConfig::sgd(0.05), LossKind::Mse);
        m
    }

    fn quick_options() -> SearchOptions {
        SearchOptions::new()
            .with_epochs(1)
            .with_sample_cap(16)
            .with_seed(7)
    }

    #[test]
    fn learning_rate_search_records_are_sorted_and_best_is_minimal() {
        let (x, y) = dataset();
        let options = quick_options()
            .with_candidates(vec![
                CandidateValue::Float(0.1),
                CandidateValue::Float(0.01),
                CandidateValue::Float(0.001),
            ])
            .raw_results();
        let report = optimize_optimizer_parameter(&model(), "learning_rate", &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();

        assert_eq!(report.state, RunState::Completed);
        assert!(report.records.len() >= 3);
        let best = report.best.as_ref().unwrap();
        for pair in report.records.windows(2) {
            assert!(pair[0].value.total_cmp(&pair[1].value).is_lt());
        }
        for record in &report.records {
            assert!(best.metric <= record.metric);
        }
    }

    #[test]
    fn no_candidate_is_evaluated_twice() {
        let (x, y) = dataset();
        let options = quick_options()
            .with_candidates(vec![
                CandidateValue::Float(0.01),
                CandidateValue::Float(0.01),
                CandidateValue::Float(0.02),
            ])
            .raw_results();
        let report = optimize_optimizer_parameter(&model(), "learning_rate", &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();

        for (i, a) in report.records.iter().enumerate() {
            for b in &report.records[i + 1..] {
                assert!(!a.value.same_value(&b.value));
            }
        }
    }

    #[test]
    fn search_is_deterministic() {
        let (x, y) = dataset();
        let options = quick_options()
            .with_candidates(vec![CandidateValue::Float(0.05), CandidateValue::Float(0.01)])
            .raw_results();
        let first = optimize_optimizer_parameter(&model(), "learning_rate", &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();
        let second = optimize_optimizer_parameter(&model(), "learning_rate", &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();
        assert_eq!(first.records, second.records);
        assert_eq!(first.best, second.best);
    }

    #[test]
    fn unsupported_optimizer_parameter_aborts() {
        let (x, y) = dataset();
        let options = quick_options().raw_results();
        // SGD has no beta_1.
        let report = optimize_optimizer_parameter(&model(), "beta_1", &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();
        assert_eq!(report.state, RunState::Aborted);
        assert!(report.records.is_empty());
        assert_eq!(report.trials, 0);
    }

    #[test]
    fn empty_candidate_list_aborts_with_zero_records() {
        let (x, y) = dataset();
        let options = quick_options().with_candidates(Vec::new()).raw_results();
        let report = optimize_optimizer_parameter(&model(), "learning_rate", &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();
        assert_eq!(report.state, RunState::Aborted);
        assert!(report.records.is_empty());
    }

    #[test]
    fn missing_default_interval_aborts_with_the_model_unchanged() {
        // Adam carries epsilon, but no generic default interval exists for
        // it; without caller candidates the search must hand the model back
        // untouched instead of erroring.
        let (x, y) = dataset();
        let mut adam = model();
        adam.compile(OptimizerConfig::adam(0.001), LossKind::Mse);

        let outcome = optimize_optimizer_parameter(&adam, "epsilon", &x, &y, &quick_options())
            .unwrap()
            .into_model()
            .unwrap();
        assert_eq!(outcome.optimizer_config(), adam.optimizer_config());

        let report = optimize_optimizer_parameter(
            &adam,
            "epsilon",
            &x,
            &y,
            &quick_options().raw_results(),
        )
        .unwrap()
        .into_report()
        .unwrap();
        assert_eq!(report.state, RunState::Aborted);
        assert!(report.records.is_empty());
        assert_eq!(report.trials, 0);
    }

    #[test]
    fn mismatched_dataset_is_rejected() {
        let (x, mut y) = dataset();
        y.pop();
        let result =
            optimize_optimizer_parameter(&model(), "learning_rate", &x, &y, &quick_options());
        assert!(result.is_err());
    }

    #[test]
    fn removing_the_output_layer_fails_but_the_search_survives() {
        // Removing layer 1 leaves a 3-wide output against 1-wide targets, so
        // the Remove trial scores infinite while units=1 stays finite.
        let (x, y) = dataset();
        let options = quick_options()
            .with_candidates(vec![CandidateValue::Remove, CandidateValue::Int(1)])
            .raw_results();
        let report = optimize_layer_parameter(&model(), "units", 1, &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();

        assert_eq!(report.state, RunState::Completed);
        let remove_record = report
            .records
            .iter()
            .find(|r| r.value.is_remove())
            .unwrap();
        assert!(remove_record.failed());
        let best = report.best.as_ref().unwrap();
        assert!(!best.failed());
        assert!(best.value.same_value(&CandidateValue::Int(1)));
    }

    #[test]
    fn winning_layer_value_is_applied_to_the_returned_model() {
        let (x, y) = dataset();
        let options = quick_options().with_candidates(vec![
            CandidateValue::Int(2),
            CandidateValue::Int(4),
        ]);
        let tuned = optimize_layer_parameter(&model(), "units", 0, &x, &y, &options)
            .unwrap()
            .into_model()
            .unwrap();

        assert_eq!(tuned.layer_count(), 2);
        // Refinement may settle anywhere in the units domain, but the winner
        // must be a valid applied integer and the model must come back built.
        let units = tuned.layer_config(0).unwrap().get_param("units").unwrap();
        assert!(units.as_int().unwrap() >= 1);
        assert!(tuned.is_built());
    }

    #[test]
    fn current_layer_value_joins_the_candidates() {
        let (x, y) = dataset();
        let options = quick_options()
            .with_candidates(vec![CandidateValue::Int(4)])
            .raw_results();
        let report = optimize_layer_parameter(&model(), "units", 0, &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();
        assert!(report
            .records
            .iter()
            .any(|r| r.value.same_value(&CandidateValue::Int(3))));
    }

    #[test]
    fn out_of_range_layer_index_returns_the_original_model() {
        let (x, y) = dataset();
        let original = model();
        let options = quick_options().raw_results();
        let report = optimize_layer_parameter(&original, "units", 5, &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();
        assert_eq!(report.state, RunState::Aborted);
        assert!(report.records.is_empty());

        let outcome = optimize_layer_parameter(&original, "units", 5, &x, &y, &quick_options())
            .unwrap()
            .into_model()
            .unwrap();
        assert_eq!(outcome.layers(), original.layers());
    }

    #[test]
    fn loss_search_scans_every_candidate_once() {
        let (x, y) = dataset();
        let options = quick_options().raw_results();
        let report = optimize_loss_function(&model(), &x, &y, &options)
            .unwrap()
            .into_report()
            .unwrap();

        assert_eq!(report.state, RunState::Completed);
        // One-shot scan over the regression losses; no refinement rounds.
        assert_eq!(report.records.len(), LossKind::REGRESSION.len());
        assert!(!report.best.as_ref().unwrap().failed());
    }

    #[test]
    fn loss_search_applies_a_known_loss() {
        let (x, y) = dataset();
        let tuned = optimize_loss_function(&model(), &x, &y, &quick_options())
            .unwrap()
            .into_model()
            .unwrap();
        assert!(LossKind::REGRESSION.contains(&tuned.loss_kind()));
    }

    #[test]
    fn all_failing_loss_candidates_keep_the_original_loss() {
        // A zero-unit layer cannot be built, so every trial fails.
        let mut broken = SequentialModel::new(vec![LayerConfig::dense(0, Activation::Linear)]);
        broken.compile(OptimizerConfig::sgd(0.01), LossKind::Huber);
        let (x, y) = dataset();
        let tuned = optimize_loss_function(&broken, &x, &y, &quick_options())
            .unwrap()
            .into_model()
            .unwrap();
        assert_eq!(tuned.loss_kind(), LossKind::Huber);
    }

    #[test]
    fn layer_sweep_leaves_the_output_layer_alone() {
        let (x, y) = dataset();
        let mut m = SequentialModel::new(vec![
            LayerConfig::dense(6, Activation::Relu),
            LayerConfig::dropout(0.1),
            LayerConfig::dense(1, Activation::Linear),
        ]);
        m.compile(OptimizerConfig::sgd(0.05), LossKind::Mse);

        let options = quick_options().with_candidates(vec![
            CandidateValue::Int(2),
            CandidateValue::Int(4),
        ]);
        let tuned = optimize_all_layers(&m, "units", &x, &y, &options).unwrap();

        assert_eq!(tuned.layer_count(), 3);
        // The dropout layer has no "units" and is skipped untouched.
        assert_eq!(tuned.layer_config(1), Some(&LayerConfig::dropout(0.1)));
        let out_units = tuned
            .layer_config(2)
            .unwrap()
            .get_param("units")
            .unwrap()
            .as_int()
            .unwrap();
        assert_eq!(out_units, 1);
        let hidden = tuned
            .layer_config(0)
            .unwrap()
            .get_param("units")
            .unwrap()
            .as_int()
            .unwrap();
        assert!(hidden >= 1);
    }
}
