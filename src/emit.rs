//! Atomic JSON output for run reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::log::EMIT;
use crate::constants::output::{
    ATS_OUTCOME_PATTERNS_FILENAME, CLUSTER_YIELD_FILENAME, CONFIG_PERFORMANCE_FILENAME,
    MARKET_PERFORMANCE_FILENAME, TEMP_SUFFIX,
};
use crate::errors::FeedbackError;
use crate::report::FeedbackReport;

/// Writes the four report documents into one directory.
#[derive(Clone, Debug)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Writer targeting `output_dir`, created on first write.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Serialize every document, stage each as a temp file, then rename them into place.
    ///
    /// A serialization or temp-write failure leaves every existing document
    /// untouched. Renames are per file, so a rename failure partway through
    /// can leave earlier documents replaced. Returns the final document paths.
    pub fn write_report(&self, report: &FeedbackReport) -> Result<Vec<PathBuf>, FeedbackError> {
        let documents = [
            (
                CONFIG_PERFORMANCE_FILENAME,
                to_pretty_json(&report.config_performance)?,
            ),
            (CLUSTER_YIELD_FILENAME, to_pretty_json(&report.cluster_yield)?),
            (
                ATS_OUTCOME_PATTERNS_FILENAME,
                to_pretty_json(&report.ats_outcome_patterns)?,
            ),
            (
                MARKET_PERFORMANCE_FILENAME,
                to_pretty_json(&report.market_performance)?,
            ),
        ];

        fs::create_dir_all(&self.output_dir).map_err(|err| FeedbackError::Output {
            path: self.output_dir.clone(),
            reason: format!("cannot create output directory: {err}"),
        })?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(documents.len());
        for (filename, payload) in documents {
            let path = self.output_dir.join(filename);
            match stage_temp(&path, payload.as_bytes()) {
                Ok(tmp_path) => staged.push((tmp_path, path)),
                Err(err) => {
                    discard_staged(&staged);
                    return Err(err);
                }
            }
        }

        let mut written = Vec::with_capacity(staged.len());
        for (idx, (tmp_path, path)) in staged.iter().enumerate() {
            if let Err(err) = commit_temp(tmp_path, path) {
                discard_staged(&staged[idx..]);
                return Err(err);
            }
            info!("{EMIT} wrote {}", path.display());
            written.push(path.clone());
        }
        Ok(written)
    }
}

/// 2-space indented JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, FeedbackError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write `bytes` to the sibling temp file for `path` and return its location.
fn stage_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf, FeedbackError> {
    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, bytes).map_err(|err| FeedbackError::Output {
        path: tmp_path.clone(),
        reason: format!("failed writing temp file: {err}"),
    })?;
    Ok(tmp_path)
}

/// Rename a staged temp file over `path`, removing it if the rename fails.
fn commit_temp(tmp_path: &Path, path: &Path) -> Result<(), FeedbackError> {
    if let Err(err) = fs::rename(tmp_path, path) {
        let _ = fs::remove_file(tmp_path);
        return Err(FeedbackError::Output {
            path: path.to_path_buf(),
            reason: format!("failed replacing document: {err}"),
        });
    }
    debug!("{EMIT} replaced {} via {}", path.display(), tmp_path.display());
    Ok(())
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (tmp_path, _) in staged {
        let _ = fs::remove_file(tmp_path);
    }
}

/// `<path>.tmp` (the suffix is appended, not substituted for the extension).
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut raw = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(TEMP_SUFFIX);
    PathBuf::from(raw)
}
