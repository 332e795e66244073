//! Weighted rollups over a normalized table.
//!
//! The four passes are independent: each reads the same immutable table and
//! builds its own map. Only the config pass is followed by baseline
//! classification, which needs every config computed first.

use chrono::NaiveDate;
use tracing::debug;

use crate::baseline::classify_baselines;
use crate::config::AggregationConfig;
use crate::constants::log::AGGREGATE;
use crate::data::FailureMode;
use crate::errors::FeedbackError;
use crate::metrics::{FunnelStats, blended_yield, weighted_mean};
use crate::normalize::NormalizedTable;
use crate::report::{
    AtsOutcomePattern, AtsOutcomePatternMap, ClusterYield, ClusterYieldMap, ConfigPerformance,
    ConfigPerformanceMap, FeedbackReport, MarketPerformance,
};

/// Computes the config, cluster, ATS, and market rollups.
#[derive(Clone, Debug)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    /// Validate `config` up front so every pass can rely on it.
    pub fn new(config: AggregationConfig) -> Result<Self, FeedbackError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run all four passes and classify baselines.
    pub fn aggregate(&self, table: &NormalizedTable, run_date: NaiveDate) -> FeedbackReport {
        let mut config_performance = self.config_performance(table);
        if let Some(median_rate) = classify_baselines(&mut config_performance) {
            debug!("{AGGREGATE} baseline screen-rate median {:.4}", median_rate);
        }
        FeedbackReport {
            config_performance,
            cluster_yield: self.cluster_yield(table),
            ats_outcome_patterns: self.ats_outcome_patterns(table),
            market_performance: self.market_performance(table, run_date),
        }
    }

    /// Per-config rollup. Groups without weight are omitted; `is_baseline` is
    /// left `false` until `classify_baselines` runs.
    pub fn config_performance(&self, table: &NormalizedTable) -> ConfigPerformanceMap {
        let index = table.group_index(|row| row.config_id.as_str());
        let mut configs = ConfigPerformanceMap::new();
        for (config_id, rows) in &index {
            let stats = FunnelStats::collect(table.select(rows), self.config.screen_stage_threshold);
            let (Some(screen_rate), Some(funnel_depth)) =
                (stats.screen_rate(), stats.funnel_depth())
            else {
                continue;
            };
            let average_rejection_speed =
                weighted_mean(table.select(rows).map(|row| (row.days_elapsed, row.weight)))
                    .unwrap_or(0.0);
            configs.insert(
                config_id.clone(),
                ConfigPerformance {
                    recruiter_screen_rate: screen_rate,
                    funnel_depth,
                    average_rejection_speed,
                    num_applications: stats.count,
                    is_baseline: false,
                },
            );
        }
        debug!(
            "{AGGREGATE} config pass: {} groups, {} with weight",
            index.len(),
            configs.len()
        );
        configs
    }

    /// Per-cluster rollup. Groups without weight are omitted.
    pub fn cluster_yield(&self, table: &NormalizedTable) -> ClusterYieldMap {
        let index = table.group_index(|row| row.cluster.as_str());
        let mut clusters = ClusterYieldMap::new();
        for (cluster, rows) in &index {
            let stats = FunnelStats::collect(table.select(rows), self.config.screen_stage_threshold);
            let (Some(screen_rate), Some(funnel_depth)) =
                (stats.screen_rate(), stats.funnel_depth())
            else {
                continue;
            };
            clusters.insert(
                cluster.clone(),
                ClusterYield {
                    recruiter_screen_rate: screen_rate,
                    funnel_depth,
                    cluster_yield: self.blend(screen_rate, funnel_depth),
                    num_applications: stats.count,
                },
            );
        }
        debug!(
            "{AGGREGATE} cluster pass: {} groups, {} with weight",
            index.len(),
            clusters.len()
        );
        clusters
    }

    /// Per-ATS failure-mode shares. Every observed system is present; systems
    /// without weight report `0.0` for every mode.
    pub fn ats_outcome_patterns(&self, table: &NormalizedTable) -> AtsOutcomePatternMap {
        let index = table.group_index(|row| row.ats_system.as_str());
        let mut patterns = AtsOutcomePatternMap::new();
        for (ats_system, rows) in &index {
            let mut pattern = AtsOutcomePattern::zeroed();
            let mut total_weight = 0.0;
            for row in table.select(rows) {
                total_weight += row.weight;
                if let Some(share) = pattern.shares.get_mut(&row.failure_mode) {
                    *share += row.weight;
                }
            }
            for mode in FailureMode::ALL {
                if let Some(share) = pattern.shares.get_mut(&mode) {
                    *share = if total_weight > 0.0 {
                        *share / total_weight
                    } else {
                        0.0
                    };
                }
            }
            patterns.insert(ats_system.clone(), pattern);
        }
        debug!("{AGGREGATE} ats pass: {} systems", patterns.len());
        patterns
    }

    /// Market-wide rollup. Always present; zeroed when the table carries no weight.
    pub fn market_performance(
        &self,
        table: &NormalizedTable,
        run_date: NaiveDate,
    ) -> MarketPerformance {
        let stats = FunnelStats::collect(table.records(), self.config.screen_stage_threshold);
        match (stats.screen_rate(), stats.funnel_depth()) {
            (Some(screen_rate), Some(funnel_depth)) => MarketPerformance {
                overall_recruiter_screen_rate: screen_rate,
                overall_funnel_depth: funnel_depth,
                overall_cluster_yield: self.blend(screen_rate, funnel_depth),
                last_updated: run_date,
            },
            _ => MarketPerformance::zeroed(run_date),
        }
    }

    fn blend(&self, screen_rate: f64, funnel_depth: f64) -> f64 {
        blended_yield(
            screen_rate,
            funnel_depth,
            self.config.max_stage_score,
            self.config.screen_rate_blend,
            self.config.depth_blend,
        )
    }
}
