use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::columns;
use crate::types::{
    ApplicationId, AtsSystemKey, CellValue, ClusterKey, ColumnName, ConfigId, StageLabel,
};

/// Why an application failed to advance.
///
/// Serialized in `SCREAMING_SNAKE_CASE`, which is also the tracker spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureMode {
    EligibilityGate,
    AtsPackaging,
    DomainMismatch,
    ToolingGap,
    SeniorityMismatch,
    WeakEvidence,
    ExternalNoise,
    Unknown,
}

impl FailureMode {
    /// Every failure mode, in reporting order.
    pub const ALL: [FailureMode; 8] = [
        FailureMode::EligibilityGate,
        FailureMode::AtsPackaging,
        FailureMode::DomainMismatch,
        FailureMode::ToolingGap,
        FailureMode::SeniorityMismatch,
        FailureMode::WeakEvidence,
        FailureMode::ExternalNoise,
        FailureMode::Unknown,
    ];

    /// Tracker spelling of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureMode::EligibilityGate => "ELIGIBILITY_GATE",
            FailureMode::AtsPackaging => "ATS_PACKAGING",
            FailureMode::DomainMismatch => "DOMAIN_MISMATCH",
            FailureMode::ToolingGap => "TOOLING_GAP",
            FailureMode::SeniorityMismatch => "SENIORITY_MISMATCH",
            FailureMode::WeakEvidence => "WEAK_EVIDENCE",
            FailureMode::ExternalNoise => "EXTERNAL_NOISE",
            FailureMode::Unknown => "UNKNOWN",
        }
    }

    /// Exact (case-sensitive, untrimmed) match against the fixed vocabulary.
    pub fn parse(value: &str) -> Option<FailureMode> {
        FailureMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
    }

    /// Parse a raw cell, coercing missing or out-of-vocabulary values to `Unknown`.
    pub fn coerce(value: Option<&str>) -> FailureMode {
        value
            .and_then(FailureMode::parse)
            .unwrap_or(FailureMode::Unknown)
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header columns present in a tracker export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSet {
    names: BTreeSet<ColumnName>,
}

impl ColumnSet {
    /// Build from header names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when the header carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn has_config_id(&self) -> bool {
        self.contains(columns::CONFIG_ID)
    }

    pub fn has_days_since_apply(&self) -> bool {
        self.contains(columns::DAYS_SINCE_APPLY)
    }

    pub fn has_applied_date(&self) -> bool {
        self.contains(columns::APPLIED_DATE)
    }

    /// Number of header columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` for an empty header.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One tracker row as read from disk. Every cell is optional text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    /// Row identifier, if present.
    pub application_id: Option<ApplicationId>,
    /// Explicit config id cell.
    pub config_id: Option<ConfigId>,
    /// Resume variant cell.
    pub resume_variant: Option<CellValue>,
    /// Cover-letter variant cell.
    pub cover_variant: Option<CellValue>,
    /// Role cluster cell.
    pub cluster: Option<ClusterKey>,
    /// Role family cell.
    pub role_family: Option<CellValue>,
    /// ATS cell.
    pub ats_system: Option<AtsSystemKey>,
    /// Raw application date text.
    pub applied_date: Option<CellValue>,
    /// Raw stage label.
    pub current_stage: Option<StageLabel>,
    /// Raw failure-mode label.
    pub failure_mode: Option<CellValue>,
    /// Raw elapsed-days text.
    pub days_since_apply: Option<CellValue>,
}

impl RawRecord {
    /// Assign a cell by column name. Unrecognized columns are ignored.
    pub fn set_cell(&mut self, column: &str, value: Option<CellValue>) {
        let slot = match column {
            columns::APPLICATION_ID => &mut self.application_id,
            columns::CONFIG_ID => &mut self.config_id,
            columns::RESUME_VARIANT => &mut self.resume_variant,
            columns::COVER_VARIANT => &mut self.cover_variant,
            columns::CLUSTER => &mut self.cluster,
            columns::ROLE_FAMILY => &mut self.role_family,
            columns::ATS_SYSTEM => &mut self.ats_system,
            columns::APPLIED_DATE => &mut self.applied_date,
            columns::CURRENT_STAGE => &mut self.current_stage,
            columns::FAILURE_MODE => &mut self.failure_mode,
            columns::DAYS_SINCE_APPLY => &mut self.days_since_apply,
            _ => return,
        };
        *slot = value;
    }
}

/// A tracker row with derived weighting fields and filled grouping keys.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    pub application_id: Option<ApplicationId>,
    /// Config id, explicit or synthesized; `unknown` when missing.
    pub config_id: ConfigId,
    /// Cluster, `UNKNOWN` when missing.
    pub cluster: ClusterKey,
    pub role_family: Option<CellValue>,
    /// ATS system, `UNKNOWN` when missing.
    pub ats_system: AtsSystemKey,
    pub current_stage: Option<StageLabel>,
    /// Days between the run date and the application; `None` when unknown.
    pub days_elapsed: Option<f64>,
    /// Decay weight in `[0, 1]`; exactly `0.0` when `days_elapsed` is unknown.
    pub weight: f64,
    /// Funnel score from the stage table (0 for unrecognized stages).
    pub stage_score: u8,
    /// Failure mode; unknown or missing labels become `Unknown`.
    pub failure_mode: FailureMode,
}
