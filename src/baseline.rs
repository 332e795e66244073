use crate::metrics::median;
use crate::report::ConfigPerformanceMap;

/// Flag configs whose screen rate is at or above the cross-config median.
///
/// Runs only once every config rollup exists. Returns the median used, or
/// `None` (and leaves the map untouched) when there are no configs.
pub fn classify_baselines(configs: &mut ConfigPerformanceMap) -> Option<f64> {
    let rates: Vec<f64> = configs
        .values()
        .map(|metrics| metrics.recruiter_screen_rate)
        .collect();
    let median_rate = median(&rates)?;
    for metrics in configs.values_mut() {
        metrics.is_baseline = metrics.recruiter_screen_rate >= median_rate;
    }
    Some(median_rate)
}
