/// Constants used by the time-decay weighting model.
pub mod decay {
    /// Default half-life, in days, after which an application counts half as much.
    pub const DEFAULT_HALF_LIFE_DAYS: f64 = 60.0;
    /// Weight assigned to future-dated applications (never extrapolated above full weight).
    pub const FUTURE_DATED_WEIGHT: f64 = 1.0;
    /// Weight assigned when elapsed time is unknown.
    pub const UNKNOWN_ELAPSED_WEIGHT: f64 = 0.0;
}

/// Constants used by stage scoring and blended yield scores.
pub mod scoring {
    /// Minimum stage score counted as "reached a recruiter screen".
    pub const DEFAULT_SCREEN_STAGE_THRESHOLD: u8 = 1;
    /// Highest stage score on the funnel scale (an offer).
    pub const DEFAULT_MAX_STAGE_SCORE: f64 = 4.0;
    /// Share of the blended yield contributed by the recruiter-screen rate.
    pub const DEFAULT_SCREEN_RATE_BLEND: f64 = 0.6;
    /// Share of the blended yield contributed by normalized funnel depth.
    pub const DEFAULT_DEPTH_BLEND: f64 = 0.4;
    /// Tolerance used when checking that blend weights sum to one.
    pub const BLEND_SUM_TOLERANCE: f64 = 1e-9;
    /// Stage score used for unrecognized or blank stages.
    pub const UNRECOGNIZED_STAGE_SCORE: u8 = 0;
    /// Default stage vocabulary, ordered by funnel progress.
    pub const DEFAULT_STAGE_SCORES: [(&str, u8); 6] = [
        ("Auto_Rejected", 0),
        ("Rejected_No_Response", 0),
        ("Recruiter_Screen", 1),
        ("Hiring_Manager", 2),
        ("Final_Round", 3),
        ("Offer", 4),
    ];
}

/// Column names recognized in the tracker export.
pub mod columns {
    /// Opaque per-row identifier.
    pub const APPLICATION_ID: &str = "application_id";
    /// Resume/cover configuration label.
    pub const CONFIG_ID: &str = "config_id";
    /// Resume variant, used to synthesize a config id.
    pub const RESUME_VARIANT: &str = "resume_variant";
    /// Cover-letter variant, used to synthesize a config id.
    pub const COVER_VARIANT: &str = "cover_variant";
    /// Role cluster grouping key.
    pub const CLUSTER: &str = "cluster";
    /// Role family, carried through but not aggregated.
    pub const ROLE_FAMILY: &str = "role_family";
    /// Applicant-tracking system grouping key.
    pub const ATS_SYSTEM: &str = "ats_system";
    /// ISO application date.
    pub const APPLIED_DATE: &str = "applied_date";
    /// Furthest funnel stage reached.
    pub const CURRENT_STAGE: &str = "current_stage";
    /// Failure classification label.
    pub const FAILURE_MODE: &str = "failure_mode";
    /// Precomputed elapsed days; preferred over `applied_date` when populated.
    pub const DAYS_SINCE_APPLY: &str = "days_since_apply";
}

/// Constants used while reading raw tracker cells.
pub mod input {
    /// Cell values read as missing, matching the usual spreadsheet/pandas export tokens.
    pub const NULL_TOKENS: [&str; 13] = [
        "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
        "#N/A",
    ];
    /// Separator used when synthesizing a config id from resume and cover variants.
    pub const CONFIG_ID_SEPARATOR: &str = "_";
}

/// Fallback labels substituted for missing grouping keys.
pub mod fallback {
    /// Config id used when neither the column nor its synthesized form yields a value.
    pub const CONFIG_ID: &str = "unknown";
    /// Cluster used when the value is missing.
    pub const CLUSTER: &str = "UNKNOWN";
    /// ATS system used when the value is missing.
    pub const ATS_SYSTEM: &str = "UNKNOWN";
}

/// Output document names and write behavior.
pub mod output {
    /// Per-configuration rollup document.
    pub const CONFIG_PERFORMANCE_FILENAME: &str = "config_performance.json";
    /// Per-cluster rollup document.
    pub const CLUSTER_YIELD_FILENAME: &str = "cluster_yield.json";
    /// Per-ATS failure-mode distribution document.
    pub const ATS_OUTCOME_PATTERNS_FILENAME: &str = "ats_outcome_patterns.json";
    /// Market-wide rollup document.
    pub const MARKET_PERFORMANCE_FILENAME: &str = "market_performance.json";
    /// Suffix appended to a document path while it is being written.
    pub const TEMP_SUFFIX: &str = "tmp";
    /// Output directory used when none is given.
    pub const DEFAULT_OUTPUT_DIR: &str = ".";
}

/// Component prefixes used in log lines.
pub mod log {
    /// Tracker CSV loading.
    pub const TRACKER: &str = "[market_feedback:tracker]";
    /// Row normalization.
    pub const NORMALIZE: &str = "[market_feedback:normalize]";
    /// Rollup passes.
    pub const AGGREGATE: &str = "[market_feedback:aggregate]";
    /// Document writes.
    pub const EMIT: &str = "[market_feedback:emit]";
    /// Pipeline orchestration.
    pub const RUNNER: &str = "[market_feedback:runner]";
}
