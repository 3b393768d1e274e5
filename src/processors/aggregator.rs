use crate::models::{CityAggregate, DailyMeasurement};
use crate::utils::constants::{MEAN_PRECISION, MIN_OBSERVATION_DAYS};
use rayon::prelude::*;
use std::collections::HashMap;

/// Rows per rayon chunk when building partial sums
const AGGREGATION_CHUNK_SIZE: usize = 50_000;

type GroupKey = (String, String);
type GroupTotals = HashMap<GroupKey, (f64, u64)>;

/// Round half away from zero at `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Groups filtered measurements by (state, city) and summarizes each
/// group: mean of the daily arithmetic means rounded to two decimals,
/// plus the measurement-day count. Groups below the day threshold are
/// dropped; the threshold is inclusive.
pub struct CityAggregator {
    min_days: u64,
    precision: u32,
}

impl CityAggregator {
    pub fn new() -> Self {
        Self {
            min_days: MIN_OBSERVATION_DAYS,
            precision: MEAN_PRECISION,
        }
    }

    pub fn with_min_days(mut self, min_days: u64) -> Self {
        self.min_days = min_days;
        self
    }

    /// The upstream filter guarantees every row carries a measurement, so
    /// the group count equals the number of valid measurement days.
    pub fn aggregate(&self, measurements: &[DailyMeasurement]) -> Vec<CityAggregate> {
        let partials: Vec<GroupTotals> = measurements
            .par_chunks(AGGREGATION_CHUNK_SIZE)
            .map(|chunk| {
                let mut totals: GroupTotals = HashMap::new();
                for m in chunk {
                    if let Some(value) = m.arithmetic_mean {
                        let entry = totals
                            .entry((m.state_name.clone(), m.city_name.clone()))
                            .or_insert((0.0, 0));
                        entry.0 += value;
                        entry.1 += 1;
                    }
                }
                totals
            })
            .collect();

        let mut totals: GroupTotals = HashMap::new();
        for partial in partials {
            for (key, (sum, count)) in partial {
                let entry = totals.entry(key).or_insert((0.0, 0));
                entry.0 += sum;
                entry.1 += count;
            }
        }

        let mut aggregates: Vec<CityAggregate> = totals
            .into_iter()
            .filter(|(_, (_, count))| *count >= self.min_days)
            .map(|((state_name, city_name), (sum, count))| {
                CityAggregate::new(
                    state_name,
                    city_name,
                    round_to(sum / count as f64, self.precision),
                    count,
                )
            })
            .collect();

        // deterministic order for downstream consumers
        aggregates.sort_by(|a, b| {
            a.state_name
                .cmp(&b.state_name)
                .then_with(|| a.city_name.cmp(&b.city_name))
        });

        aggregates
    }
}

impl Default for CityAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::PM25_PARAMETER_NAME;
    use chrono::NaiveDate;

    fn days_of(city: &str, values: &[f64]) -> Vec<DailyMeasurement> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let mut m = DailyMeasurement::new(
                    NaiveDate::from_ymd_opt(2021, 1, 1)
                        .unwrap()
                        .checked_add_days(chrono::Days::new(i as u64)),
                    PM25_PARAMETER_NAME.to_string(),
                    Some(*value),
                    "Wyoming".to_string(),
                    city.to_string(),
                );
                m.derive_calendar_fields();
                m
            })
            .collect()
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(35.444, 2), 35.44);
        assert_eq!(round_to(35.446, 2), 35.45);
        assert_eq!(round_to(5.0, 2), 5.0);
    }

    #[test]
    fn test_aggregate_mean_and_count() {
        let measurements = days_of("Riverton", &[10.0, 20.0, 30.0]);

        let aggregates = CityAggregator::new()
            .with_min_days(1)
            .aggregate(&measurements);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].city_name, "Riverton");
        assert_eq!(aggregates[0].avg_pm25, 20.0);
        assert_eq!(aggregates[0].days, 3);
    }

    #[test]
    fn test_threshold_is_inclusive_at_boundary() {
        let mut measurements = days_of("Riverton", &vec![12.0; 100]);
        measurements.extend(days_of("Brookdale", &vec![5.0; 99]));

        let aggregates = CityAggregator::new().aggregate(&measurements);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].city_name, "Riverton");
        assert_eq!(aggregates[0].days, 100);
    }

    #[test]
    fn test_cities_in_different_states_stay_separate() {
        let mut measurements = days_of("Springfield", &[10.0, 10.0]);
        for m in &mut measurements[..1] {
            m.state_name = "Illinois".to_string();
        }

        let aggregates = CityAggregator::new()
            .with_min_days(1)
            .aggregate(&measurements);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].state_name, "Illinois");
        assert_eq!(aggregates[1].state_name, "Wyoming");
    }

    #[test]
    fn test_output_sorted_by_state_then_city() {
        let mut measurements = days_of("Casper", &[8.0]);
        measurements.extend(days_of("Riverton", &[9.0]));

        let aggregates = CityAggregator::new()
            .with_min_days(1)
            .aggregate(&measurements);

        let cities: Vec<_> = aggregates.iter().map(|a| a.city_name.as_str()).collect();
        assert_eq!(cities, vec!["Casper", "Riverton"]);
    }
}
