//! Parameter-default registry.
//!
//! Default candidate intervals, numeric domains, and miscellaneous search
//! defaults, looked up by parameter name. This is an explicit registry rather
//! than process-wide mutable globals: callers resolve a [`SearchOptions`] into
//! an immutable [`SearchSettings`] once, at the start of a search.

use at_types::{CandidateValue, MetricMode, ParamDomain, SearchOptions, SearchSettings};

pub const DEFAULT_EPOCHS: usize = 5;
pub const DEFAULT_SAMPLE_CAP: usize = 5000;
pub const DEFAULT_DECIMALS: u32 = 5;
pub const DEFAULT_SEED: u64 = 42;

/// Default candidate interval for a parameter, when one is known.
///
/// Parameters without an entry (e.g. `beta_1`) have no sensible generic
/// interval; searching them requires caller-supplied candidates.
pub fn default_interval(param: &str) -> Option<Vec<CandidateValue>> {
    let values = match param {
        "learning_rate" => vec![
            CandidateValue::Float(0.1),
            CandidateValue::Float(0.01),
            CandidateValue::Float(0.001),
        ],
        "decay" => vec![
            CandidateValue::Float(0.0),
            CandidateValue::Float(0.001),
            CandidateValue::Float(0.01),
            CandidateValue::Float(0.1),
        ],
        "momentum" => vec![
            CandidateValue::Float(0.0),
            CandidateValue::Float(0.5),
            CandidateValue::Float(0.9),
        ],
        "rho" => vec![
            CandidateValue::Float(0.8),
            CandidateValue::Float(0.9),
            CandidateValue::Float(0.99),
        ],
        "units" => vec![
            CandidateValue::Remove,
            CandidateValue::Int(4),
            CandidateValue::Int(8),
            CandidateValue::Int(16),
            CandidateValue::Int(32),
            CandidateValue::Int(64),
        ],
        "rate" => vec![
            CandidateValue::Remove,
            CandidateValue::Float(0.1),
            CandidateValue::Float(0.2),
            CandidateValue::Float(0.3),
            CandidateValue::Float(0.5),
        ],
        "activation" => vec![
            CandidateValue::Text("linear".into()),
            CandidateValue::Text("relu".into()),
            CandidateValue::Text("sigmoid".into()),
            CandidateValue::Text("tanh".into()),
            CandidateValue::Text("elu".into()),
        ],
        _ => return None,
    };
    Some(values)
}

/// Numeric domain limits for a parameter. Refinement never steps past these.
pub fn domain_for(param: &str) -> ParamDomain {
    match param {
        "learning_rate" => ParamDomain::at_least(0.0),
        "decay" | "momentum" | "rho" | "rate" => ParamDomain::between(0.0, 1.0),
        "beta_1" | "beta_2" => ParamDomain::between(0.0, 1.0),
        "units" => ParamDomain::at_least(1.0),
        _ => ParamDomain::unbounded(),
    }
}

/// Resolve caller options against the registry defaults.
pub fn resolve_settings(options: &SearchOptions, default_metric: MetricMode) -> SearchSettings {
    SearchSettings {
        epochs: options.epochs.unwrap_or(DEFAULT_EPOCHS),
        metric_mode: options.metric_mode.unwrap_or(default_metric),
        decimals: options.decimals.unwrap_or(DEFAULT_DECIMALS),
        sample_cap: options.sample_cap.unwrap_or(DEFAULT_SAMPLE_CAP),
        seed: options.seed.unwrap_or(DEFAULT_SEED),
        return_finalized_model: options.return_finalized_model.unwrap_or(true),
    }
}
