//! Tracker row normalization: elapsed time, decay weight, stage score,
//! failure-mode coercion, and grouping-key defaults.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::AggregationConfig;
use crate::constants::columns::{COVER_VARIANT, RESUME_VARIANT};
use crate::constants::fallback;
use crate::constants::input::CONFIG_ID_SEPARATOR;
use crate::constants::log::NORMALIZE;
use crate::data::{ColumnSet, FailureMode, NormalizedRecord, RawRecord};
use crate::dates::{elapsed_days_from_cell, parse_days_since_apply};
use crate::decay::DecayModel;
use crate::errors::FeedbackError;
use crate::tracker::TrackerTable;
use crate::types::{ConfigId, RowIndices};

/// Where elapsed days were taken from for a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElapsedSource {
    /// The explicit `days_since_apply` column.
    DaysSinceApply,
    /// `today - applied_date`.
    AppliedDate,
}

/// Counts of cell-level coercions applied while normalizing a table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    /// Rows normalized.
    pub rows: usize,
    /// Rows whose elapsed time could not be determined (weight 0).
    pub unknown_elapsed: usize,
    /// Rows dated after the run date (weight 1).
    pub future_dated: usize,
    /// Rows whose stage was blank or outside the stage table.
    pub unrecognized_stages: usize,
    /// Rows whose failure mode was missing.
    pub missing_failure_modes: usize,
    /// Rows whose failure mode was present but outside the vocabulary.
    pub coerced_failure_modes: usize,
    /// Rows given the fallback config id.
    pub defaulted_config_ids: usize,
    /// Rows given the fallback cluster.
    pub defaulted_clusters: usize,
    /// Rows given the fallback ATS system.
    pub defaulted_ats_systems: usize,
}

/// Immutable normalized tracker rows.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedTable {
    records: Vec<NormalizedRecord>,
    elapsed_source: ElapsedSource,
}

impl NormalizedTable {
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column the elapsed days were read from.
    pub fn elapsed_source(&self) -> ElapsedSource {
        self.elapsed_source
    }

    /// Index rows by a grouping key. Keys iterate in sorted order and each
    /// list keeps the original row order.
    pub fn group_index<F>(&self, key: F) -> BTreeMap<String, RowIndices>
    where
        F: Fn(&NormalizedRecord) -> &str,
    {
        let mut index: BTreeMap<String, RowIndices> = BTreeMap::new();
        for (idx, record) in self.records.iter().enumerate() {
            match index.get_mut(key(record)) {
                Some(rows) => rows.push(idx),
                None => {
                    index.insert(key(record).to_string(), vec![idx]);
                }
            }
        }
        index
    }

    /// Borrow the rows named by `indices`.
    pub fn select<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl Iterator<Item = &'a NormalizedRecord> + 'a {
        indices.iter().map(move |&idx| &self.records[idx])
    }
}

/// Turns raw tracker rows into weighted, scored rows.
#[derive(Clone, Debug)]
pub struct Normalizer {
    config: AggregationConfig,
    decay: DecayModel,
    today: NaiveDate,
}

impl Normalizer {
    /// Validate `config` and bind the run date used for elapsed-time math.
    pub fn new(config: AggregationConfig, today: NaiveDate) -> Result<Self, FeedbackError> {
        config.validate()?;
        let decay = DecayModel::new(config.half_life_days);
        Ok(Self {
            config,
            decay,
            today,
        })
    }

    /// Normalize every row. Row count and order are preserved.
    pub fn normalize(&self, table: &TrackerTable) -> (NormalizedTable, NormalizationStats) {
        let elapsed_source = choose_elapsed_source(table);
        debug!("{NORMALIZE} elapsed days source: {:?}", elapsed_source);

        let mut stats = NormalizationStats {
            rows: table.len(),
            ..NormalizationStats::default()
        };
        let records = table
            .records
            .iter()
            .map(|raw| self.normalize_record(raw, &table.columns, elapsed_source, &mut stats))
            .collect();

        log_stats(&stats);
        (
            NormalizedTable {
                records,
                elapsed_source,
            },
            stats,
        )
    }

    fn normalize_record(
        &self,
        raw: &RawRecord,
        columns: &ColumnSet,
        elapsed_source: ElapsedSource,
        stats: &mut NormalizationStats,
    ) -> NormalizedRecord {
        let days_elapsed = match elapsed_source {
            ElapsedSource::DaysSinceApply => {
                parse_days_since_apply(raw.days_since_apply.as_deref())
            }
            ElapsedSource::AppliedDate => {
                elapsed_days_from_cell(self.today, raw.applied_date.as_deref())
            }
        };
        match days_elapsed {
            None => stats.unknown_elapsed += 1,
            Some(days) if days < 0.0 => stats.future_dated += 1,
            Some(_) => {}
        }
        let weight = self.decay.weight(days_elapsed);

        let stage_score = match raw
            .current_stage
            .as_deref()
            .and_then(|stage| self.config.stage_table.lookup(stage))
        {
            Some(score) => score,
            None => {
                stats.unrecognized_stages += 1;
                self.config
                    .stage_table
                    .score_or_default(raw.current_stage.as_deref())
            }
        };

        let failure_mode = match raw.failure_mode.as_deref() {
            None => {
                stats.missing_failure_modes += 1;
                FailureMode::Unknown
            }
            Some(value) => FailureMode::parse(value).unwrap_or_else(|| {
                stats.coerced_failure_modes += 1;
                FailureMode::Unknown
            }),
        };

        let config_id = resolve_config_id(raw, columns).unwrap_or_else(|| {
            stats.defaulted_config_ids += 1;
            fallback::CONFIG_ID.to_string()
        });
        let cluster = raw.cluster.clone().unwrap_or_else(|| {
            stats.defaulted_clusters += 1;
            fallback::CLUSTER.to_string()
        });
        let ats_system = raw.ats_system.clone().unwrap_or_else(|| {
            stats.defaulted_ats_systems += 1;
            fallback::ATS_SYSTEM.to_string()
        });

        NormalizedRecord {
            application_id: raw.application_id.clone(),
            config_id,
            cluster,
            role_family: raw.role_family.clone(),
            ats_system,
            current_stage: raw.current_stage.clone(),
            days_elapsed,
            weight,
            stage_score,
            failure_mode,
        }
    }
}

/// The explicit column wins only when it exists and holds at least one value.
fn choose_elapsed_source(table: &TrackerTable) -> ElapsedSource {
    let has_explicit_days = table.columns.has_days_since_apply()
        && table
            .records
            .iter()
            .any(|record| record.days_since_apply.is_some());
    if has_explicit_days {
        ElapsedSource::DaysSinceApply
    } else {
        ElapsedSource::AppliedDate
    }
}

/// Config id from its own column, or `resume_variant + "_" + cover_variant`
/// when the column is absent. An absent variant column contributes an empty
/// string; a missing variant cell leaves the id unresolved.
fn resolve_config_id(raw: &RawRecord, columns: &ColumnSet) -> Option<ConfigId> {
    if columns.has_config_id() {
        return raw.config_id.clone();
    }
    let resume = variant_part(raw.resume_variant.as_deref(), columns, RESUME_VARIANT)?;
    let cover = variant_part(raw.cover_variant.as_deref(), columns, COVER_VARIANT)?;
    Some(format!("{resume}{CONFIG_ID_SEPARATOR}{cover}"))
}

fn variant_part<'a>(cell: Option<&'a str>, columns: &ColumnSet, column: &str) -> Option<&'a str> {
    if columns.contains(column) {
        cell
    } else {
        Some("")
    }
}

fn log_stats(stats: &NormalizationStats) {
    info!("{NORMALIZE} normalized {} rows", stats.rows);
    if stats.unknown_elapsed > 0 {
        warn!(
            "{NORMALIZE} {} rows have unknown elapsed time and carry zero weight",
            stats.unknown_elapsed
        );
    }
    if stats.coerced_failure_modes > 0 {
        warn!(
            "{NORMALIZE} {} rows had failure modes outside the vocabulary (coerced to UNKNOWN)",
            stats.coerced_failure_modes
        );
    }
    debug!(
        "{NORMALIZE} future_dated={} unrecognized_stages={} missing_failure_modes={} defaulted config_id={} cluster={} ats_system={}",
        stats.future_dated,
        stats.unrecognized_stages,
        stats.missing_failure_modes,
        stats.defaulted_config_ids,
        stats.defaulted_clusters,
        stats.defaulted_ats_systems
    );
}
