use crate::domain::entities::series::DailySeries;

/// Replace every value strictly below `vol_abs_min` with exactly
/// `vol_abs_min`. Missing entries pass through. Pure: the input series is
/// left untouched.
///
/// Guards downstream consumers against division by near-zero volatility.
pub fn apply_min_vol(vol: &DailySeries, vol_abs_min: f64) -> DailySeries {
    vol.map_values(|v| if v < vol_abs_min { vol_abs_min } else { v })
}

/// Rolling low-quantile volatility floor.
///
/// Keeps the volatility estimate from collapsing below its own long-run low
/// tail during unusually quiet regimes, which would understate risk for
/// consumers such as position sizing.
#[derive(Debug, Clone)]
pub struct QuantileFloor {
    /// Quantile of the trailing window used as the floor reference.
    pub quantile: f64,
    /// Non-missing values required in the window before a reference exists.
    pub min_periods: usize,
    /// Trailing window width in days, current day included.
    pub window: usize,
}

impl QuantileFloor {
    pub fn new(quantile: f64, min_periods: usize, window: usize) -> Self {
        QuantileFloor {
            quantile,
            min_periods,
            window,
        }
    }

    /// Raise each value of `vol` to at least the trailing quantile
    /// reference. Missing entries stay missing; the floor never invents an
    /// estimate where none exists.
    pub fn apply(&self, vol: &DailySeries) -> DailySeries {
        let reference = self.floor_reference(vol);
        let values = vol
            .values()
            .iter()
            .zip(reference.values().iter())
            .map(|(v, r)| match (v, r) {
                (Some(v), Some(r)) => Some(v.max(*r)),
                (Some(v), None) => Some(*v),
                (None, _) => None,
            })
            .collect();
        DailySeries::new(vol.first_day(), values)
    }

    /// The trailing quantile reference on the same index as `vol`.
    ///
    /// A day gets a real quantile once its trailing window holds at least
    /// `min_periods` non-missing values. Day 0 is forced to `0.0` even when
    /// the window rule would yield nothing, and gaps are forward-filled from
    /// the most recent reference, so a non-empty input always produces a
    /// gap-free reference.
    pub fn floor_reference(&self, vol: &DailySeries) -> DailySeries {
        let n = vol.len();
        let mut references: Vec<Option<f64>> = Vec::with_capacity(n);
        // non-missing values of the trailing window, kept sorted
        let mut window: Vec<f64> = Vec::new();

        for i in 0..n {
            if i >= self.window {
                if let Some(expired) = vol.get(i - self.window) {
                    let pos = window.partition_point(|&v| v < expired);
                    window.remove(pos);
                }
            }
            if let Some(x) = vol.get(i) {
                let pos = window.partition_point(|&v| v < x);
                window.insert(pos, x);
            }
            if window.len() >= self.min_periods && !window.is_empty() {
                references.push(Some(interpolated_quantile(&window, self.quantile)));
            } else {
                references.push(None);
            }
        }

        if !references.is_empty() {
            references[0] = Some(0.0);
            let mut last = references[0];
            for entry in references.iter_mut().skip(1) {
                match entry {
                    Some(v) => last = Some(*v),
                    None => *entry = last,
                }
            }
        }

        DailySeries::new(vol.first_day(), references)
    }
}

/// Quantile of an ascending-sorted non-empty slice, linearly interpolated
/// between order statistics.
fn interpolated_quantile(sorted: &[f64], quantile: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * quantile;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<Option<f64>>) -> DailySeries {
        DailySeries::new(0, values)
    }

    #[test]
    fn test_min_vol_clamps_only_below_floor() {
        let vol = series(vec![Some(0.0), Some(1e-11), Some(1e-10), Some(0.2), None]);
        let clamped = apply_min_vol(&vol, 1e-10);
        assert_eq!(clamped.get(0), Some(1e-10));
        assert_eq!(clamped.get(1), Some(1e-10));
        assert_eq!(clamped.get(2), Some(1e-10));
        assert_eq!(clamped.get(3), Some(0.2));
        assert_eq!(clamped.get(4), None);
        // input untouched
        assert_eq!(vol.get(0), Some(0.0));
    }

    #[test]
    fn test_interpolated_quantile() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        // h = 99 * 0.05 = 4.95
        assert!((interpolated_quantile(&values, 0.05) - 4.95).abs() < 1e-12);
        assert_eq!(interpolated_quantile(&values, 0.0), 0.0);
        assert_eq!(interpolated_quantile(&values, 1.0), 99.0);
        assert_eq!(interpolated_quantile(&[7.0], 0.5), 7.0);
    }

    #[test]
    fn test_reference_first_day_is_zero() {
        let floor = QuantileFloor::new(0.05, 100, 500);
        let vol = series(vec![Some(0.5); 10]);
        let reference = floor.floor_reference(&vol);
        assert_eq!(reference.get(0), Some(0.0));
    }

    #[test]
    fn test_reference_is_gap_free_after_forward_fill() {
        let floor = QuantileFloor::new(0.05, 100, 500);
        let vol = series((0..150).map(|i| Some(0.1 + i as f64 * 0.001)).collect());
        let reference = floor.floor_reference(&vol);
        assert!(reference.values().iter().all(|r| r.is_some()));
        // warm-up gap is filled with day 0's forced zero
        assert_eq!(reference.get(50), Some(0.0));
        // once min_periods is reached, the real quantile takes over
        assert!(reference.get(99).unwrap() > 0.0);
    }

    #[test]
    fn test_reference_quantile_value() {
        let floor = QuantileFloor::new(0.05, 100, 500);
        let vol = series((1..=100).map(|i| Some(i as f64)).collect());
        let reference = floor.floor_reference(&vol);
        // window at the last day holds 1..=100; 5th percentile = 5.95
        assert!((reference.get(99).unwrap() - 5.95).abs() < 1e-12);
    }

    #[test]
    fn test_window_expiry_drops_old_values() {
        let floor = QuantileFloor::new(0.0, 2, 3);
        // quantile 0.0 = window minimum, window of 3 days
        let vol = series(vec![Some(1.0), Some(5.0), Some(6.0), Some(7.0)]);
        let reference = floor.floor_reference(&vol);
        assert_eq!(reference.get(2), Some(1.0));
        // day 0's value has left the window by day 3
        assert_eq!(reference.get(3), Some(5.0));
    }

    #[test]
    fn test_missing_values_do_not_count_toward_min_periods() {
        let floor = QuantileFloor::new(0.05, 3, 10);
        let vol = series(vec![Some(1.0), None, Some(2.0), None, Some(3.0)]);
        let reference = floor.floor_reference(&vol);
        // only two valid values up to index 3
        assert_eq!(reference.get(3), Some(0.0)); // forward-filled day-0 zero
        assert!(reference.get(4).is_some());
        assert!(reference.get(4).unwrap() > 0.0);
    }

    #[test]
    fn test_apply_raises_values_to_reference() {
        let floor = QuantileFloor::new(0.05, 100, 500);
        let vol = series((0..200).map(|i| Some(1.0 + (i as f64 * 0.3).sin().abs())).collect());
        let clamped = apply_min_vol(&vol, 1e-10);
        let reference = floor.floor_reference(&clamped);
        let floored = floor.apply(&clamped);
        for i in 0..200 {
            let out = floored.get(i).unwrap();
            assert!(out >= clamped.get(i).unwrap());
            assert!(out >= reference.get(i).unwrap());
        }
    }

    #[test]
    fn test_apply_keeps_missing_entries_missing() {
        let floor = QuantileFloor::new(0.05, 2, 10);
        let vol = series(vec![None, Some(0.5), Some(0.6), None, Some(0.7)]);
        let floored = floor.apply(&vol);
        assert_eq!(floored.get(0), None);
        assert_eq!(floored.get(3), None);
        assert!(floored.get(4).is_some());
    }

    #[test]
    fn test_empty_series_never_fails() {
        let floor = QuantileFloor::new(0.05, 100, 500);
        assert!(floor.apply(&DailySeries::empty()).is_empty());
        assert!(floor.floor_reference(&DailySeries::empty()).is_empty());
    }
}
