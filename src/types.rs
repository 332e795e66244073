/// Tracker row identifier.
/// Example: `app-0142`
pub type ApplicationId = String;
/// Resume + cover-letter configuration identifier (grouping key for config rollups).
/// Examples: `R2_C1`, `unknown`
pub type ConfigId = String;
/// Role cluster label (grouping key for cluster rollups).
/// Examples: `data_platform`, `UNKNOWN`
pub type ClusterKey = String;
/// Applicant-tracking system label (grouping key for failure-mode distributions).
/// Examples: `Greenhouse`, `Workday`, `UNKNOWN`
pub type AtsSystemKey = String;
/// Raw stage label as exported by the tracker.
/// Examples: `Recruiter_Screen`, `Offer`
pub type StageLabel = String;
/// Raw tracker cell text.
/// Examples: `2024-09-15`, `12`, `TOOLING_GAP`
pub type CellValue = String;
/// Column header text.
/// Examples: `applied_date`, `days_since_apply`
pub type ColumnName = String;
/// Ordered row indices into a normalized table.
pub type RowIndices = Vec<usize>;
