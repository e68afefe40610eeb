use crate::processing::statistics::SeriesStats;
use crate::state::series::HistogramConfig;

/// One bar of a computed histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

/// Bin `values` according to `config`.
///
/// The range is the data min..max, narrowed to the Tukey fences when outliers
/// are excluded; values outside the range are left out of counts and
/// normalization. Density scales each bar so the total area is 1; cumulative
/// bars carry a running total (ending at 1 when density is also set).
pub fn compute_bins(values: &[f64], config: &HistogramConfig) -> Vec<HistogramBin> {
    let Some(stats) = SeriesStats::compute(values) else {
        return Vec::new();
    };
    let bins = config.bins.max(1);

    let (mut lo, mut hi) = (stats.min, stats.max);
    if config.exclude_outliers {
        let (fence_lo, fence_hi) = stats.outlier_fences();
        lo = lo.max(fence_lo);
        hi = hi.min(fence_hi);
    }

    // Degenerate range: widen around the value, at least one unit and
    // enough to stay resolvable at large magnitudes.
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        let half = (lo.abs() * 1e-9).max(0.5);
        lo -= half;
        hi += half;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        if v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let total: usize = counts.iter().sum();

    let mut running = 0usize;
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            running += count;
            let n = (if config.cumulative { running } else { count }) as f64;
            let height = match (config.density, config.cumulative) {
                (true, true) if total > 0 => n / total as f64,
                (true, false) if total > 0 => n / (total as f64 * width),
                _ => n,
            };
            HistogramBin {
                center: lo + width * (i as f64 + 0.5),
                width,
                height,
            }
        })
        .collect()
}
