use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::Aggregator;
use crate::config::AggregationConfig;
use crate::emit::ReportWriter;
use crate::constants::log::RUNNER;
use crate::errors::FeedbackError;
use crate::normalize::{NormalizationStats, Normalizer};
use crate::report::{FeedbackReport, MarketPerformance};
use crate::tracker::TrackerTable;

/// Outcome of one completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Tracker rows read.
    pub rows: usize,
    /// Entries in `config_performance.json`.
    pub configs: usize,
    /// Configs flagged `is_baseline`.
    pub baselines: usize,
    /// Entries in `cluster_yield.json`.
    pub clusters: usize,
    /// Entries in `ats_outcome_patterns.json`.
    pub ats_systems: usize,
    /// Baseline config ids in key order.
    pub baseline_configs: Vec<String>,
    /// Row-level coercion counters.
    pub normalization: NormalizationStats,
    /// Copy of the market document.
    pub market: MarketPerformance,
    /// Documents written, in emit order.
    pub written: Vec<PathBuf>,
}

/// Compute the report for an in-memory tracker table without touching disk.
pub fn build_report(
    table: &TrackerTable,
    config: &AggregationConfig,
    today: NaiveDate,
) -> Result<(FeedbackReport, NormalizationStats), FeedbackError> {
    let normalizer = Normalizer::new(config.clone(), today)?;
    let aggregator = Aggregator::new(config.clone())?;
    let (normalized, stats) = normalizer.normalize(table);
    let report = aggregator.aggregate(&normalized, today);
    Ok((report, stats))
}

/// Load `tracker_path`, compute every rollup, and write the four documents to `output_dir`.
///
/// Configuration and input problems abort before the output directory is touched.
pub fn run_pipeline(
    tracker_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &AggregationConfig,
    today: NaiveDate,
) -> Result<RunSummary, FeedbackError> {
    config.validate()?;
    let table = TrackerTable::from_path(tracker_path.as_ref())?;
    let (report, normalization) = build_report(&table, config, today)?;
    let written = ReportWriter::new(output_dir.as_ref()).write_report(&report)?;

    let baseline_configs: Vec<String> = report
        .baseline_configs()
        .into_iter()
        .map(str::to_string)
        .collect();
    let summary = RunSummary {
        rows: table.len(),
        configs: report.config_performance.len(),
        baselines: baseline_configs.len(),
        clusters: report.cluster_yield.len(),
        ats_systems: report.ats_outcome_patterns.len(),
        baseline_configs,
        normalization,
        market: report.market_performance.clone(),
        written,
    };
    info!(
        "{RUNNER} run complete: rows={} configs={} baselines={} clusters={} ats_systems={}",
        summary.rows, summary.configs, summary.baselines, summary.clusters, summary.ats_systems
    );
    Ok(summary)
}
