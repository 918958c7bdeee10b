use crate::domain::entities::observation::RawObservation;
use crate::domain::entities::series::DailySeries;

/// Resample irregular raw observations to one value per UTC calendar day.
///
/// Same-day observations are averaged with a plain arithmetic mean (no
/// weighting by intraday frequency). The output index runs gap-free from the
/// first to the last observed day; days with no observation stay `None`.
/// Input order does not matter. Empty input yields an empty series.
pub fn aggregate_to_daily(observations: &[RawObservation]) -> DailySeries {
    if observations.is_empty() {
        return DailySeries::empty();
    }

    let mut first_day = i64::MAX;
    let mut last_day = i64::MIN;
    for obs in observations {
        let day = DailySeries::epoch_day(obs.timestamp);
        first_day = first_day.min(day);
        last_day = last_day.max(day);
    }

    let len = (last_day - first_day + 1) as usize;
    let mut sums = vec![0.0_f64; len];
    let mut counts = vec![0_u32; len];
    for obs in observations {
        let index = (DailySeries::epoch_day(obs.timestamp) - first_day) as usize;
        sums[index] += obs.price;
        counts[index] += 1;
    }

    let values = sums
        .iter()
        .zip(counts.iter())
        .map(|(&sum, &count)| {
            if count > 0 {
                Some(sum / count as f64)
            } else {
                None
            }
        })
        .collect();

    DailySeries::new(first_day, values)
}
