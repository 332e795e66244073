//! Tracker export loading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::input::NULL_TOKENS;
use crate::constants::log::TRACKER;
use crate::data::{ColumnSet, RawRecord};
use crate::errors::FeedbackError;
use crate::types::{CellValue, ColumnName};

/// Rows and header of one tracker export, all cells kept as text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerTable {
    /// Header columns present in the file.
    pub columns: ColumnSet,
    /// Rows in file order.
    pub records: Vec<RawRecord>,
}

impl TrackerTable {
    /// Build a table directly from parsed rows (used by tests and callers that
    /// already hold tracker data in memory).
    pub fn new(columns: ColumnSet, records: Vec<RawRecord>) -> Self {
        Self { columns, records }
    }

    /// Read a tracker CSV from `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeedbackError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| FeedbackError::MalformedInput {
            path: path.to_path_buf(),
            reason: format!("cannot open tracker: {err}"),
        })?;
        let table = Self::from_reader(file, path)?;
        info!(
            "{TRACKER} loaded {} rows ({} columns) from {}",
            table.len(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// Read a tracker CSV from any reader. `origin` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, FeedbackError> {
        let malformed = |reason: String| FeedbackError::MalformedInput {
            path: PathBuf::from(origin),
            reason,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<ColumnName> = csv_reader
            .headers()?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        if headers.iter().all(|name| name.is_empty()) {
            return Err(malformed("missing header row".to_string()));
        }
        let columns = ColumnSet::new(headers.iter().cloned());
        if !columns.has_applied_date() && !columns.has_days_since_apply() {
            return Err(malformed(
                "neither 'applied_date' nor 'days_since_apply' is present".to_string(),
            ));
        }

        let mut records = Vec::new();
        for (row_idx, row) in csv_reader.records().enumerate() {
            let row = row?;
            if row.len() > headers.len() {
                return Err(malformed(format!(
                    "row {} has {} fields but the header has {}",
                    row_idx + 1,
                    row.len(),
                    headers.len()
                )));
            }
            let mut record = RawRecord::default();
            for (column, cell) in headers.iter().zip(row.iter()) {
                record.set_cell(column, cell_value(cell));
            }
            records.push(record);
        }
        debug!("{TRACKER} parsed {} data rows", records.len());

        Ok(Self { columns, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Map a raw cell to `None` when it is one of the recognized null tokens.
pub fn cell_value(raw: &str) -> Option<CellValue> {
    if NULL_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<TrackerTable, FeedbackError> {
        TrackerTable::from_reader(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn reads_cells_and_null_tokens() {
        let table = parse(
            " application_id ,config_id,cluster,applied_date,current_stage,failure_mode\n\
             a1,R1_C1,data,2026-10-01,Offer,\n\
             a2,NA,,2026-09-01,Recruiter_Screen,TOOLING_GAP\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.columns.contains("application_id"));
        assert!(table.columns.has_config_id());
        assert!(!table.columns.has_days_since_apply());

        let first = &table.records[0];
        assert_eq!(first.application_id.as_deref(), Some("a1"));
        assert_eq!(first.current_stage.as_deref(), Some("Offer"));
        assert_eq!(first.failure_mode, None);

        let second = &table.records[1];
        assert_eq!(second.config_id, None);
        assert_eq!(second.cluster, None);
        assert_eq!(second.failure_mode.as_deref(), Some("TOOLING_GAP"));
    }

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let table = parse("applied_date,cluster,ats_system\n2026-10-01,data\n").unwrap();
        assert_eq!(table.records[0].cluster.as_deref(), Some("data"));
        assert_eq!(table.records[0].ats_system, None);
    }

    #[test]
    fn long_rows_are_fatal() {
        let err = parse("applied_date,cluster\n2026-10-01,data,extra\n").unwrap_err();
        assert!(matches!(err, FeedbackError::MalformedInput { .. }));
    }

    #[test]
    fn header_only_input_is_an_empty_table() {
        let table = parse("application_id,applied_date,current_stage\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 3);
    }

    #[test]
    fn empty_input_is_fatal() {
        assert!(matches!(
            parse("").unwrap_err(),
            FeedbackError::MalformedInput { .. }
        ));
    }

    #[test]
    fn missing_elapsed_time_source_is_fatal() {
        let err = parse("application_id,cluster\na1,data\n").unwrap_err();
        assert!(err.to_string().contains("applied_date"));
    }

    #[test]
    fn unreadable_path_is_fatal() {
        let err = TrackerTable::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, FeedbackError::MalformedInput { .. }));
    }
}
