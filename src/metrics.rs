use crate::data::NormalizedRecord;

/// `Σ(v·w) / Σw`, or `None` when the total weight is not positive.
///
/// Pairs whose value is `None` are skipped entirely (they contribute to
/// neither sum); the normalizer only produces such values at weight zero.
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (Option<f64>, f64)>,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (value, weight) in pairs {
        let Some(value) = value else {
            continue;
        };
        weighted_sum += value * weight;
        total_weight += weight;
    }
    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

/// Weighted funnel statistics for one group of rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FunnelStats {
    /// Number of rows in the group, regardless of weight.
    pub count: usize,
    /// `Σweight`.
    pub total_weight: f64,
    /// `Σweight` over rows at or past the screen threshold.
    pub screened_weight: f64,
    /// `Σ(stage_score·weight)`.
    pub weighted_stage_sum: f64,
}

impl FunnelStats {
    /// Fold `rows` into weighted sums. `screen_threshold` is the minimum stage
    /// score counted as a recruiter screen.
    pub fn collect<'a, I>(rows: I, screen_threshold: u8) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedRecord>,
    {
        let mut stats = FunnelStats {
            count: 0,
            total_weight: 0.0,
            screened_weight: 0.0,
            weighted_stage_sum: 0.0,
        };
        for row in rows {
            stats.count += 1;
            stats.total_weight += row.weight;
            if row.stage_score >= screen_threshold {
                stats.screened_weight += row.weight;
            }
            stats.weighted_stage_sum += f64::from(row.stage_score) * row.weight;
        }
        stats
    }

    /// True when the group carries weight and its ratios are defined.
    pub fn has_weight(&self) -> bool {
        self.total_weight > 0.0
    }

    /// Weighted share of volume that reached at least a recruiter screen.
    pub fn screen_rate(&self) -> Option<f64> {
        self.ratio(self.screened_weight)
    }

    /// Weighted mean stage score.
    pub fn funnel_depth(&self) -> Option<f64> {
        self.ratio(self.weighted_stage_sum)
    }

    fn ratio(&self, numerator: f64) -> Option<f64> {
        if self.has_weight() {
            Some(numerator / self.total_weight)
        } else {
            None
        }
    }
}

/// Blend breadth (screen rate) and normalized depth into one score.
pub fn blended_yield(
    screen_rate: f64,
    funnel_depth: f64,
    max_stage_score: f64,
    screen_rate_blend: f64,
    depth_blend: f64,
) -> f64 {
    screen_rate_blend * screen_rate + depth_blend * (funnel_depth / max_stage_score)
}

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
