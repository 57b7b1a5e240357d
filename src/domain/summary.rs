//! Box-plot statistics for one time bucket.
//!
//! Quartiles use linear interpolation between closest ranks. A value is an
//! outlier when it lies strictly outside
//! `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]`; whiskers end at the most extreme
//! values still inside those fences.

use serde::Serialize;

pub const OUTLIER_IQR_FACTOR: f64 = 1.5;
const NOTCH_FACTOR: f64 = 1.57;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucketSummary {
    pub bucket: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub notch_low: f64,
    pub notch_high: f64,
    pub outliers: Vec<f64>,
}

impl TimeBucketSummary {
    /// Returns `None` for an empty bucket.
    pub fn from_values(bucket: impl Into<String>, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - OUTLIER_IQR_FACTOR * iqr;
        let upper_fence = q3 + OUTLIER_IQR_FACTOR * iqr;

        let inside = sorted
            .iter()
            .copied()
            .filter(|v| *v >= lower_fence && *v <= upper_fence);
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);

        // Storage order is kept so the chart can place points as recorded.
        let outliers = values
            .iter()
            .copied()
            .filter(|v| *v < lower_fence || *v > upper_fence)
            .collect();

        let notch = NOTCH_FACTOR * iqr / (sorted.len() as f64).sqrt();

        Some(Self {
            bucket: bucket.into(),
            count: sorted.len(),
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            notch_low: median - notch,
            notch_high: median + notch,
            outliers,
        })
    }
}

/// Linear-interpolated quantile of ascending `sorted`, `q` in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
