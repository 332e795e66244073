use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, error::ErrorKind};

use crate::config::AggregationConfig;
use crate::constants::output::DEFAULT_OUTPUT_DIR;
use crate::runner::{RunSummary, run_pipeline};

#[derive(Debug, Parser)]
#[command(
    name = "market_feedback",
    disable_help_subcommand = true,
    about = "Compute time-decayed market feedback rollups",
    long_about = "Read a job-application tracker CSV, weight every application by age, and write config, cluster, ATS, and market rollups as JSON.",
    after_help = "Outputs: config_performance.json, cluster_yield.json, ats_outcome_patterns.json, market_performance.json"
)]
/// CLI for `market_feedback`.
///
/// Common usage:
/// - Write next to the current directory: `market_feedback tracker.csv`
/// - Pick a directory: `market_feedback tracker.csv -o memory/`
/// - Pin the run date for reproducible output: `--today 2026-10-19`
struct MarketFeedbackCli {
    #[arg(value_name = "TRACKER_CSV", help = "Path to the job application tracker CSV")]
    tracker_csv: PathBuf,
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory to write the JSON documents into (created if missing)"
    )]
    output_dir: PathBuf,
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_today_arg,
        help = "Run date used for elapsed days and last_updated (defaults to the local date)"
    )]
    today: Option<NaiveDate>,
    #[arg(
        long = "half-life-days",
        value_name = "DAYS",
        value_parser = parse_half_life_arg,
        help = "Days after which an application's weight halves"
    )]
    half_life_days: Option<f64>,
}

/// Parse `args_iter` (without the program name), run the pipeline, and print a summary.
pub fn run_market_feedback<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<MarketFeedbackCli, _>(
        std::iter::once("market_feedback".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let mut config = AggregationConfig::default();
    if let Some(half_life_days) = cli.half_life_days {
        config = config.with_half_life_days(half_life_days);
    }
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let summary = run_pipeline(&cli.tracker_csv, &cli.output_dir, &config, today)?;
    print_summary(&summary);
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_today_arg(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid --today value '{}': expected YYYY-MM-DD", raw))
}

fn parse_half_life_arg(raw: &str) -> Result<f64, String> {
    let parsed = raw.trim().parse::<f64>().map_err(|_| {
        format!(
            "Could not parse --half-life-days value '{}' as a number",
            raw
        )
    })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err("--half-life-days must be a positive number".to_string());
    }
    Ok(parsed)
}

fn print_summary(summary: &RunSummary) {
    println!("Market feedback run completed.");
    println!(
        "Updated {} configuration metrics, {} cluster metrics, {} ATS patterns.",
        summary.configs, summary.clusters, summary.ats_systems
    );
    println!(
        "market: screen_rate={:.4} funnel_depth={:.4} cluster_yield={:.4} (as of {})",
        summary.market.overall_recruiter_screen_rate,
        summary.market.overall_funnel_depth,
        summary.market.overall_cluster_yield,
        summary.market.last_updated
    );
    if !summary.baseline_configs.is_empty() {
        println!("baselines: {}", summary.baseline_configs.join(", "));
    }
    let stats = &summary.normalization;
    if stats.unknown_elapsed > 0 || stats.coerced_failure_modes > 0 {
        println!(
            "coerced: unknown_elapsed={} failure_modes={} (of {} rows)",
            stats.unknown_elapsed, stats.coerced_failure_modes, stats.rows
        );
    }
}
