/// Statistics for a data series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// First and third quartiles (linear interpolation between ranks).
    pub q1: f64,
    pub q3: f64,
}

impl SeriesStats {
    /// Compute statistics from values, filtering out NaN and infinities.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let min = vals[0];
        let max = vals[count - 1];
        let mean = vals.iter().sum::<f64>() / count as f64;
        let median = quantile_sorted(&vals, 0.5);

        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let std_dev = variance.sqrt();

        Some(SeriesStats {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
            q1: quantile_sorted(&vals, 0.25),
            q3: quantile_sorted(&vals, 0.75),
        })
    }

    /// Tukey fences: values outside `[q1 - 1.5 IQR, q3 + 1.5 IQR]` are outliers.
    pub fn outlier_fences(&self) -> (f64, f64) {
        let iqr = self.q3 - self.q1;
        (self.q1 - 1.5 * iqr, self.q3 + 1.5 * iqr)
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{}:\n  Count: {}\n  Min: {:.3}\n  Max: {:.3}\n  Mean: {:.3}\n  Median: {:.3}\n  Std Dev: {:.3}",
            label, self.count, self.min, self.max, self.mean, self.median, self.std_dev
        )
    }
}

/// Quantile of already-sorted, non-empty data.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_stats() {
        let stats = SeriesStats::compute(&[4.0, 1.0, 3.0, 2.0, f64::NAN]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn empty_has_no_stats() {
        assert!(SeriesStats::compute(&[]).is_none());
        assert!(SeriesStats::compute(&[f64::NAN]).is_none());
    }

    #[test]
    fn fences_from_quartiles() {
        let stats = SeriesStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!((stats.q1, stats.q3), (2.0, 4.0));
        assert_eq!(stats.outlier_fences(), (-1.0, 7.0));
    }

    #[test]
    fn report_mentions_label() {
        let stats = SeriesStats::compute(&[1.0]).unwrap();
        assert!(stats.report("temp").starts_with("temp:"));
    }
}
