//! Best-effort ASCII rendering of search results into the log stream.

use tracing::info;

use at_types::ResultRecord;

const BAR_WIDTH: usize = 40;

/// Log one bar per record, scaled against the worst finite metric. Failed
/// records are labeled instead of drawn. Never panics; an empty or all-failed
/// result set simply renders nothing useful.
pub fn plot_results(records: &[ResultRecord]) {
    if records.is_empty() {
        return;
    }
    let max = records
        .iter()
        .filter(|r| r.metric.is_finite())
        .map(|r| r.metric.abs())
        .fold(0.0_f64, f64::max);

    for record in records {
        if record.failed() {
            info!("{:>14} | failed", record.value.to_string());
            continue;
        }
        let filled = if max > 0.0 {
            ((record.metric.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "#".repeat(filled.min(BAR_WIDTH));
        let line = format!(
            "{:>14} | {:<width$} {:.6}",
            record.value.to_string(),
            bar,
            record.metric,
            width = BAR_WIDTH
        );
        info!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_types::CandidateValue;

    #[test]
    fn plotting_handles_empty_failed_and_zero_metrics() {
        plot_results(&[]);
        plot_results(&[
            ResultRecord::new(CandidateValue::Remove, f64::INFINITY),
            ResultRecord::new(CandidateValue::Float(0.01), 0.0),
            ResultRecord::new(CandidateValue::Float(0.1), 0.5),
        ]);
    }
}
