use std::collections::HashMap;

use crate::constants::decay::DEFAULT_HALF_LIFE_DAYS;
use crate::constants::scoring::{
    BLEND_SUM_TOLERANCE, DEFAULT_DEPTH_BLEND, DEFAULT_MAX_STAGE_SCORE,
    DEFAULT_SCREEN_RATE_BLEND, DEFAULT_SCREEN_STAGE_THRESHOLD, DEFAULT_STAGE_SCORES,
    UNRECOGNIZED_STAGE_SCORE,
};
use crate::errors::FeedbackError;
use crate::types::StageLabel;

/// Fixed lookup from stage label to ordinal funnel score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageTable {
    scores: HashMap<StageLabel, u8>,
}

impl StageTable {
    /// Build a table from `(label, score)` pairs. Later duplicates win.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<StageLabel>,
    {
        Self {
            scores: entries
                .into_iter()
                .map(|(label, score)| (label.into(), score))
                .collect(),
        }
    }

    /// Score for `stage` after trimming surrounding whitespace.
    ///
    /// Returns `None` for labels outside the table (including blank input).
    pub fn lookup(&self, stage: &str) -> Option<u8> {
        self.scores.get(stage.trim()).copied()
    }

    /// Score for `stage`, falling back to the unrecognized-stage score.
    pub fn score_or_default(&self, stage: Option<&str>) -> u8 {
        stage
            .and_then(|stage| self.lookup(stage))
            .unwrap_or(UNRECOGNIZED_STAGE_SCORE)
    }

    /// Number of recognized stage labels.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// `true` when no stage label is recognized.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest score present in the table.
    pub fn max_score(&self) -> Option<u8> {
        self.scores.values().copied().max()
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self::new(DEFAULT_STAGE_SCORES)
    }
}

/// Immutable settings shared by the normalizer and the aggregator.
///
/// Built once per run and passed by reference; nothing in the pipeline reads
/// ambient defaults once a config exists.
#[derive(Clone, Debug)]
pub struct AggregationConfig {
    /// Days after which an application's weight halves.
    pub half_life_days: f64,
    /// Stage label to funnel score lookup.
    pub stage_table: StageTable,
    /// Minimum stage score counted toward the recruiter-screen rate.
    pub screen_stage_threshold: u8,
    /// Top of the funnel-depth scale, used to normalize depth to `[0, 1]`.
    pub max_stage_score: f64,
    /// Blend weight applied to the recruiter-screen rate in yield scores.
    pub screen_rate_blend: f64,
    /// Blend weight applied to normalized funnel depth in yield scores.
    pub depth_blend: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
            stage_table: StageTable::default(),
            screen_stage_threshold: DEFAULT_SCREEN_STAGE_THRESHOLD,
            max_stage_score: DEFAULT_MAX_STAGE_SCORE,
            screen_rate_blend: DEFAULT_SCREEN_RATE_BLEND,
            depth_blend: DEFAULT_DEPTH_BLEND,
        }
    }
}

impl AggregationConfig {
    /// Override the decay half-life.
    pub fn with_half_life_days(mut self, half_life_days: f64) -> Self {
        self.half_life_days = half_life_days;
        self
    }

    /// Replace the stage lookup table.
    pub fn with_stage_table(mut self, stage_table: StageTable) -> Self {
        self.stage_table = stage_table;
        self
    }

    /// Override the minimum stage score counted as a recruiter screen.
    pub fn with_screen_stage_threshold(mut self, threshold: u8) -> Self {
        self.screen_stage_threshold = threshold;
        self
    }

    /// Override the yield blend weights (screen rate, normalized depth).
    pub fn with_yield_blend(mut self, screen_rate_blend: f64, depth_blend: f64) -> Self {
        self.screen_rate_blend = screen_rate_blend;
        self.depth_blend = depth_blend;
        self
    }

    /// Reject settings the pipeline cannot produce meaningful metrics from.
    pub fn validate(&self) -> Result<(), FeedbackError> {
        if !self.half_life_days.is_finite() || self.half_life_days <= 0.0 {
            return Err(FeedbackError::Configuration(format!(
                "half-life must be a finite positive number of days, got {}",
                self.half_life_days
            )));
        }
        let Some(top_score) = self.stage_table.max_score() else {
            return Err(FeedbackError::Configuration(
                "stage table must contain at least one stage".to_string(),
            ));
        };
        if self.screen_stage_threshold > top_score {
            return Err(FeedbackError::Configuration(format!(
                "screen stage threshold {} exceeds the highest stage score {}",
                self.screen_stage_threshold, top_score
            )));
        }
        if !self.max_stage_score.is_finite() || self.max_stage_score <= 0.0 {
            return Err(FeedbackError::Configuration(format!(
                "max stage score must be positive, got {}",
                self.max_stage_score
            )));
        }
        if self.screen_rate_blend < 0.0 || self.depth_blend < 0.0 {
            return Err(FeedbackError::Configuration(
                "yield blend weights must be non-negative".to_string(),
            ));
        }
        let sum = self.screen_rate_blend + self.depth_blend;
        if (sum - 1.0).abs() > BLEND_SUM_TOLERANCE {
            return Err(FeedbackError::Configuration(format!(
                "yield blend weights must sum to 1.0, got {:.6} (screen_rate={}, depth={})",
                sum, self.screen_rate_blend, self.depth_blend
            )));
        }
        Ok(())
    }
}
