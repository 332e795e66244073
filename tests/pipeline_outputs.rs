use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value;
use tempfile::tempdir;

use market_feedback::{AggregationConfig, FeedbackError, run_pipeline};

const HEADER: &str = "application_id,config_id,resume_variant,cover_variant,cluster,role_family,ats_system,applied_date,current_stage,failure_mode";

const OUTPUTS: [&str; 4] = [
    "config_performance.json",
    "cluster_yield.json",
    "ats_outcome_patterns.json",
    "market_performance.json",
];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn write_tracker(dir: &Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).unwrap();
    path
}

fn read_json(dir: &Path, name: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join(name)).unwrap()).unwrap()
}

#[test]
fn two_row_scenario_matches_hand_computation() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &[
            "a1,R1_C1,R1,C1,data,platform,Greenhouse,2026-10-19,Recruiter_Screen,",
            "a2,R1_C1,R1,C1,data,platform,Greenhouse,2026-08-20,Auto_Rejected,ATS_PACKAGING",
        ],
    );
    let out = temp.path().join("out");
    let summary = run_pipeline(&tracker, &out, &AggregationConfig::default(), today()).unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.configs, 1);
    assert_eq!(summary.written.len(), 4);

    let configs = read_json(&out, "config_performance.json");
    let config = &configs["R1_C1"];
    let screen = config["recruiter_screen_rate"].as_f64().unwrap();
    let depth = config["funnel_depth"].as_f64().unwrap();
    assert!((screen - 0.6667).abs() < 1e-4);
    assert!((depth - 0.6667).abs() < 1e-4);
    assert!((config["average_rejection_speed"].as_f64().unwrap() - 20.0).abs() < 1e-9);
    assert_eq!(config["num_applications"], 2);
    assert_eq!(config["is_baseline"], true);

    let ats = read_json(&out, "ats_outcome_patterns.json");
    let greenhouse = ats["Greenhouse"].as_object().unwrap();
    assert_eq!(greenhouse.len(), 8);
    assert!((greenhouse["UNKNOWN"].as_f64().unwrap() - 1.0 / 1.5).abs() < 1e-9);
    assert!((greenhouse["ATS_PACKAGING"].as_f64().unwrap() - 0.5 / 1.5).abs() < 1e-9);

    let market = read_json(&out, "market_performance.json");
    assert_eq!(market["last_updated"], "2026-10-19");
    let expected_yield = 0.6 * screen + 0.4 * (depth / 4.0);
    assert!((market["overall_cluster_yield"].as_f64().unwrap() - expected_yield).abs() < 1e-12);
}

#[test]
fn empty_tracker_still_writes_every_document() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(temp.path(), "empty.csv", &[]);
    let out = temp.path().join("out");
    let summary = run_pipeline(&tracker, &out, &AggregationConfig::default(), today()).unwrap();
    assert_eq!(summary.rows, 0);

    for name in OUTPUTS {
        assert!(out.join(name).exists(), "{name} missing");
    }
    assert_eq!(read_json(&out, "config_performance.json"), serde_json::json!({}));
    assert_eq!(read_json(&out, "cluster_yield.json"), serde_json::json!({}));
    assert_eq!(read_json(&out, "ats_outcome_patterns.json"), serde_json::json!({}));
    let market = read_json(&out, "market_performance.json");
    assert_eq!(market["overall_recruiter_screen_rate"], 0.0);
    assert_eq!(market["overall_funnel_depth"], 0.0);
    assert_eq!(market["overall_cluster_yield"], 0.0);
}

#[test]
fn unknown_failure_mode_never_becomes_its_own_key() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &["a1,R1_C1,R1,C1,data,platform,Workday,2026-10-01,Auto_Rejected,NOT_A_REAL_MODE"],
    );
    let out = temp.path().join("out");
    run_pipeline(&tracker, &out, &AggregationConfig::default(), today()).unwrap();

    let ats = read_json(&out, "ats_outcome_patterns.json");
    let workday = ats["Workday"].as_object().unwrap();
    assert!(!workday.contains_key("NOT_A_REAL_MODE"));
    assert_eq!(workday["UNKNOWN"], 1.0);
}

#[test]
fn unparseable_dates_count_but_carry_no_weight() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &[
            "a1,R1_C1,R1,C1,data,platform,Lever,2026-10-19,Offer,",
            "a2,R1_C1,R1,C1,data,platform,Lever,last tuesday,Auto_Rejected,",
            "a3,R2_C1,R2,C1,infra,platform,Lever,not a date,Offer,",
        ],
    );
    let out = temp.path().join("out");
    let summary = run_pipeline(&tracker, &out, &AggregationConfig::default(), today()).unwrap();
    assert_eq!(summary.normalization.unknown_elapsed, 2);

    let configs = read_json(&out, "config_performance.json");
    assert_eq!(configs["R1_C1"]["num_applications"], 2);
    assert_eq!(configs["R1_C1"]["recruiter_screen_rate"], 1.0);
    assert_eq!(configs["R1_C1"]["funnel_depth"], 4.0);
    // The only R2_C1 row has zero weight, so the config is omitted.
    assert!(configs.get("R2_C1").is_none());

    let clusters = read_json(&out, "cluster_yield.json");
    assert!(clusters.get("infra").is_none());
}

#[test]
fn explicit_days_since_apply_column_is_used() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("tracker.csv");
    fs::write(
        &path,
        "config_id,cluster,ats_system,applied_date,current_stage,failure_mode,days_since_apply\n\
         A,data,Lever,2020-01-01,Recruiter_Screen,,0\n\
         A,data,Lever,2020-01-01,Auto_Rejected,,120\n",
    )
    .unwrap();
    let out = temp.path().join("out");
    run_pipeline(&path, &out, &AggregationConfig::default(), today()).unwrap();
    let configs = read_json(&out, "config_performance.json");
    let rate = configs["A"]["recruiter_screen_rate"].as_f64().unwrap();
    assert!((rate - 1.0 / 1.25).abs() < 1e-9);
}

#[test]
fn missing_grouping_columns_fall_back_to_defaults() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("tracker.csv");
    fs::write(
        &path,
        "application_id,resume_variant,cover_variant,applied_date,current_stage\n\
         a1,R3,C2,2026-10-19,Hiring_Manager\n\
         a2,R3,,2026-10-19,Offer\n",
    )
    .unwrap();
    let out = temp.path().join("out");
    run_pipeline(&path, &out, &AggregationConfig::default(), today()).unwrap();

    let configs = read_json(&out, "config_performance.json");
    assert!(configs.get("R3_C2").is_some());
    assert!(configs.get("unknown").is_some());
    let clusters = read_json(&out, "cluster_yield.json");
    assert_eq!(clusters["UNKNOWN"]["num_applications"], 2);
    let ats = read_json(&out, "ats_outcome_patterns.json");
    assert_eq!(ats["UNKNOWN"]["UNKNOWN"], 1.0);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &[
            "a1,R1_C1,R1,C1,data,platform,Greenhouse,2026-10-19,Recruiter_Screen,",
            "a2,R2_C1,R2,C1,infra,platform,Workday,2026-07-01,Final_Round,",
            "a3,R1_C1,R1,C1,data,platform,Workday,2026-03-14,Auto_Rejected,TOOLING_GAP",
            "a4,R3_C2,R3,C2,ml,research,Lever,2026-11-02,Offer,",
        ],
    );
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    run_pipeline(&tracker, &first, &AggregationConfig::default(), today()).unwrap();
    run_pipeline(&tracker, &second, &AggregationConfig::default(), today()).unwrap();
    for name in OUTPUTS {
        assert_eq!(
            fs::read(first.join(name)).unwrap(),
            fs::read(second.join(name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn malformed_tracker_aborts_before_any_output() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("broken.csv");
    fs::write(
        &path,
        "config_id,applied_date,current_stage\nA,2026-10-19,Offer,unexpected\n",
    )
    .unwrap();
    let out = temp.path().join("out");
    let err = run_pipeline(&path, &out, &AggregationConfig::default(), today()).unwrap_err();
    assert!(matches!(err, FeedbackError::MalformedInput { .. }));
    assert!(!out.exists());
}

#[test]
fn invalid_config_aborts_before_reading_input() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let config = AggregationConfig::default().with_half_life_days(-1.0);
    let err = run_pipeline(temp.path().join("absent.csv"), &out, &config, today()).unwrap_err();
    assert!(matches!(err, FeedbackError::Configuration(_)));
    assert!(!out.exists());
}

#[test]
fn existing_documents_are_replaced_without_leftover_temp_files() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("config_performance.json"), "stale").unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &["a1,R1_C1,R1,C1,data,platform,Lever,2026-10-19,Offer,"],
    );
    run_pipeline(&tracker, &out, &AggregationConfig::default(), today()).unwrap();

    let configs = read_json(&out, "config_performance.json");
    assert_eq!(configs["R1_C1"]["funnel_depth"], 4.0);
    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn cli_writes_documents_with_pinned_date() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &["a1,R1_C1,R1,C1,data,platform,Lever,2026-09-19,Recruiter_Screen,"],
    );
    let out = temp.path().join("cli_out");
    market_feedback::cli::run_market_feedback(
        [
            tracker.display().to_string(),
            "--output-dir".to_string(),
            out.display().to_string(),
            "--today".to_string(),
            "2026-10-19".to_string(),
            "--half-life-days".to_string(),
            "30".to_string(),
        ]
        .into_iter(),
    )
    .unwrap();

    let market = read_json(&out, "market_performance.json");
    assert_eq!(market["last_updated"], "2026-10-19");
    let configs = read_json(&out, "config_performance.json");
    assert!((configs["R1_C1"]["average_rejection_speed"].as_f64().unwrap() - 30.0).abs() < 1e-9);
}

#[test]
fn non_finite_days_since_apply_is_unknown_and_output_stays_numeric() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("tracker.csv");
    fs::write(
        &path,
        "config_id,cluster,ats_system,current_stage,failure_mode,days_since_apply\n\
         A,data,Lever,Recruiter_Screen,,0\n\
         A,data,Lever,Auto_Rejected,,inf\n\
         A,data,Lever,Auto_Rejected,,-inf\n\
         A,data,Lever,Auto_Rejected,,1e400\n",
    )
    .unwrap();
    let out = temp.path().join("out");
    let summary = run_pipeline(&path, &out, &AggregationConfig::default(), today()).unwrap();
    assert_eq!(summary.normalization.unknown_elapsed, 3);

    let configs = read_json(&out, "config_performance.json");
    let config = &configs["A"];
    assert_eq!(config["num_applications"], 4);
    assert_eq!(config["average_rejection_speed"].as_f64(), Some(0.0));
    assert_eq!(config["recruiter_screen_rate"].as_f64(), Some(1.0));
    let ats = read_json(&out, "ats_outcome_patterns.json");
    assert!(ats["Lever"]["UNKNOWN"].is_number());
}

#[test]
fn applied_dates_with_utc_offsets_carry_weight() {
    let temp = tempdir().unwrap();
    let tracker = write_tracker(
        temp.path(),
        "tracker.csv",
        &[
            "a1,R1_C1,R1,C1,data,platform,Lever,2026-10-19T10:00:00+00:00,Offer,",
            "a2,R1_C1,R1,C1,data,platform,Lever,2026-09-19T08:30:00Z,Auto_Rejected,",
        ],
    );
    let out = temp.path().join("out");
    let summary = run_pipeline(&tracker, &out, &AggregationConfig::default(), today()).unwrap();
    assert_eq!(summary.normalization.unknown_elapsed, 0);

    let configs = read_json(&out, "config_performance.json");
    let weight_old = 0.5f64.powf(30.0 / 60.0);
    let expected_speed = 30.0 * weight_old / (1.0 + weight_old);
    let speed = configs["R1_C1"]["average_rejection_speed"].as_f64().unwrap();
    assert!((speed - expected_speed).abs() < 1e-9);
}
