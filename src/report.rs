//! Output documents produced by one run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::FailureMode;
use crate::types::{AtsSystemKey, ClusterKey, ConfigId};

/// Weighted performance of one resume/cover configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigPerformance {
    /// Weighted share of rows at or past the screen stage.
    pub recruiter_screen_rate: f64,
    /// Weighted mean stage score.
    pub funnel_depth: f64,
    /// Weighted mean elapsed days across every row of the config.
    pub average_rejection_speed: f64,
    /// Unweighted row count.
    pub num_applications: usize,
    /// Screen rate is at or above the cross-config median.
    pub is_baseline: bool,
}

/// Weighted performance of one role cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterYield {
    /// Weighted share of rows at or past the screen stage.
    pub recruiter_screen_rate: f64,
    /// Weighted mean stage score.
    pub funnel_depth: f64,
    /// `0.6 * rate + 0.4 * depth / 4`.
    pub cluster_yield: f64,
    /// Unweighted row count.
    pub num_applications: usize,
}

/// Weighted share of each failure mode for one applicant-tracking system.
///
/// Always holds every mode in `FailureMode::ALL` order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtsOutcomePattern {
    /// Weighted share per mode.
    pub shares: IndexMap<FailureMode, f64>,
}

impl AtsOutcomePattern {
    /// Every mode at `0.0`.
    pub fn zeroed() -> Self {
        Self {
            shares: FailureMode::ALL.into_iter().map(|mode| (mode, 0.0)).collect(),
        }
    }

    /// Share of `mode`, `0.0` if absent.
    pub fn share(&self, mode: FailureMode) -> f64 {
        self.shares.get(&mode).copied().unwrap_or(0.0)
    }
}

/// Market-wide rollup across every tracker row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketPerformance {
    /// Screen rate over every row.
    pub overall_recruiter_screen_rate: f64,
    /// Funnel depth over every row.
    pub overall_funnel_depth: f64,
    /// Blended yield of the two overall metrics.
    pub overall_cluster_yield: f64,
    /// Run date, serialized as `YYYY-MM-DD`.
    pub last_updated: NaiveDate,
}

impl MarketPerformance {
    /// All metrics at `0.0`, used when the table carries no weight.
    pub fn zeroed(last_updated: NaiveDate) -> Self {
        Self {
            overall_recruiter_screen_rate: 0.0,
            overall_funnel_depth: 0.0,
            overall_cluster_yield: 0.0,
            last_updated,
        }
    }
}

/// Config id to metrics.
pub type ConfigPerformanceMap = BTreeMap<ConfigId, ConfigPerformance>;
/// Cluster to metrics.
pub type ClusterYieldMap = BTreeMap<ClusterKey, ClusterYield>;
/// ATS system to failure-mode shares.
pub type AtsOutcomePatternMap = BTreeMap<AtsSystemKey, AtsOutcomePattern>;

/// The four documents emitted by a run.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackReport {
    /// `config_performance.json`.
    pub config_performance: ConfigPerformanceMap,
    /// `cluster_yield.json`.
    pub cluster_yield: ClusterYieldMap,
    /// `ats_outcome_patterns.json`.
    pub ats_outcome_patterns: AtsOutcomePatternMap,
    /// `market_performance.json`.
    pub market_performance: MarketPerformance,
}

impl FeedbackReport {
    /// Config ids flagged as baseline, in key order.
    pub fn baseline_configs(&self) -> Vec<&str> {
        self.config_performance
            .iter()
            .filter(|(_, metrics)| metrics.is_baseline)
            .map(|(config_id, _)| config_id.as_str())
            .collect()
    }
}
