use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One pollutant measurement for a monitoring site and day, as reported in
/// EPA AQS daily summary files. Only the governed columns are kept; rows
/// with an unparseable date or measurement carry None rather than being
/// dropped at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMeasurement {
    pub date: Option<NaiveDate>,
    pub parameter_name: String,
    pub arithmetic_mean: Option<f64>,
    pub state_name: String,
    pub city_name: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl DailyMeasurement {
    pub fn new(
        date: Option<NaiveDate>,
        parameter_name: String,
        arithmetic_mean: Option<f64>,
        state_name: String,
        city_name: String,
    ) -> Self {
        Self {
            date,
            parameter_name,
            arithmetic_mean,
            state_name,
            city_name,
            year: None,
            month: None,
        }
    }

    /// Populate the derived calendar fields from the measurement date.
    /// A null date leaves both fields null; the row is kept either way.
    pub fn derive_calendar_fields(&mut self) {
        self.year = self.date.map(|d| d.year());
        self.month = self.date.map(|d| d.month());
    }

    pub fn is_parameter(&self, parameter: &str) -> bool {
        self.parameter_name == parameter
    }

    pub fn has_measurement(&self) -> bool {
        self.arithmetic_mean.is_some()
    }
}
