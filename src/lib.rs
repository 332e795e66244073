#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Weighted config, cluster, ATS, and market rollups.
pub mod aggregate;
/// Median-based baseline classification of config rollups.
pub mod baseline;
/// Command-line entry point shared by the binary.
pub mod cli;
/// Aggregation configuration types.
pub mod config;
/// Centralized constants used across loading, scoring, and output.
pub mod constants;
/// Raw and normalized record types.
pub mod data;
/// Application date parsing and elapsed-day helpers.
pub mod dates;
/// Time-decay weighting.
pub mod decay;
/// Atomic JSON document output.
pub mod emit;
/// Weighted statistic helpers.
pub mod metrics;
/// Row normalization into weighted, scored records.
pub mod normalize;
/// Output document types.
pub mod report;
/// End-to-end run orchestration.
pub mod runner;
/// Tracker CSV loading.
pub mod tracker;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregate::Aggregator;
pub use config::{AggregationConfig, StageTable};
pub use data::{ColumnSet, FailureMode, NormalizedRecord, RawRecord};
pub use decay::DecayModel;
pub use emit::ReportWriter;
pub use errors::FeedbackError;
pub use normalize::{ElapsedSource, NormalizationStats, NormalizedTable, Normalizer};
pub use report::{
    AtsOutcomePattern, ClusterYield, ConfigPerformance, FeedbackReport, MarketPerformance,
};
pub use runner::{RunSummary, build_report, run_pipeline};
pub use tracker::TrackerTable;
pub use types::{ApplicationId, AtsSystemKey, ClusterKey, ConfigId, StageLabel};
