use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-city PM2.5 summary produced by the aggregation stage: mean of the
/// daily arithmetic means rounded to two decimals, and the number of
/// measurement days behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CityAggregate {
    pub state_name: String,
    pub city_name: String,

    // Daily means can dip slightly below zero from instrument drift
    #[validate(range(min = -10.0, max = 1000.0))]
    pub avg_pm25: f64,

    pub days: u64,
}

impl CityAggregate {
    pub fn new(state_name: String, city_name: String, avg_pm25: f64, days: u64) -> Self {
        Self {
            state_name,
            city_name,
            avg_pm25,
            days,
        }
    }

    pub fn meets_threshold(&self, min_days: u64) -> bool {
        self.days >= min_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let aggregate =
            CityAggregate::new("Wyoming".to_string(), "Riverton".to_string(), 35.4, 100);
        assert!(aggregate.meets_threshold(100));
        assert!(!aggregate.meets_threshold(101));
    }

    #[test]
    fn test_validation_bounds() {
        let ok = CityAggregate::new("Wyoming".to_string(), "Riverton".to_string(), 35.4, 120);
        assert!(ok.validate().is_ok());

        let bogus =
            CityAggregate::new("Wyoming".to_string(), "Riverton".to_string(), 5000.0, 120);
        assert!(bogus.validate().is_err());
    }
}
