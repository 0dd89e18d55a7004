//! # at-tuner
//!
//! Adaptive single-parameter search for ArcTune.
//!
//! Provides the candidate queue, the ordered result ledger, the metric
//! evaluator adapter, the grid-narrowing refinement policy, and the search
//! controller with its entry operations: optimizer-parameter search,
//! layer-parameter search (including layer removal), loss-function search,
//! and the whole-model layer sweep.

pub mod defaults;
pub mod evaluate;
pub mod ledger;
pub mod queue;
pub mod refine;
pub mod report;
pub mod search;

pub use defaults::{default_interval, domain_for, resolve_settings};
pub use evaluate::{CandidateApplier, MetricEvaluator};
pub use ledger::ResultLedger;
pub use queue::CandidateQueue;
pub use refine::RefinementPolicy;
pub use search::{
    optimize_all_layers, optimize_layer_parameter, optimize_loss_function,
    optimize_optimizer_parameter, TuneOutcome,
};
