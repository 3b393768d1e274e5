use crate::error::{PipelineError, Result};
use crate::models::DailyMeasurement;
use crate::utils::constants::{
    AQS_DATE_FORMAT, COL_ARITHMETIC_MEAN, COL_CITY_NAME, COL_DATE_LOCAL, COL_PARAMETER_NAME,
    COL_STATE_NAME, DEFAULT_BUFFER_SIZE,
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Strip leading and trailing whitespace from every header name.
pub fn normalize_headers(raw: &StringRecord) -> Vec<String> {
    raw.iter().map(|h| h.trim().to_string()).collect()
}

/// Positions of the governed columns within one daily summary file,
/// resolved from the normalized header row. Files may order their columns
/// freely; a missing governed column is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchema {
    pub date_local: usize,
    pub parameter_name: usize,
    pub arithmetic_mean: usize,
    pub state_name: usize,
    pub city_name: usize,
}

impl DailySchema {
    pub fn resolve(headers: &[String], file: &str) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| PipelineError::MissingColumn {
                    column: column.to_string(),
                    file: file.to_string(),
                })
        };

        Ok(Self {
            date_local: find(COL_DATE_LOCAL)?,
            parameter_name: find(COL_PARAMETER_NAME)?,
            arithmetic_mean: find(COL_ARITHMETIC_MEAN)?,
            state_name: find(COL_STATE_NAME)?,
            city_name: find(COL_CITY_NAME)?,
        })
    }
}

pub struct DailyReader {
    use_mmap: bool,
}

impl DailyReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read every row of a daily summary CSV. Governed fields that fail to
    /// parse become None; rows are never dropped here.
    pub fn read_measurements(&self, path: &Path) -> Result<Vec<DailyMeasurement>> {
        if self.use_mmap {
            self.read_measurements_mmap(path)
        } else {
            self.read_measurements_buffered(path)
        }
    }

    fn read_measurements_buffered(&self, path: &Path) -> Result<Vec<DailyMeasurement>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        self.read_from(reader, path)
    }

    /// Memory-mapped read path for large files.
    fn read_measurements_mmap(&self, path: &Path) -> Result<Vec<DailyMeasurement>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        self.read_from(&mmap[..], path)
    }

    fn read_from<R: Read>(&self, reader: R, path: &Path) -> Result<Vec<DailyMeasurement>> {
        let file_label = path.display().to_string();

        // flexible: short rows surface as null fields, not errors
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = normalize_headers(csv_reader.headers()?);
        let schema = DailySchema::resolve(&headers, &file_label)?;

        let mut measurements = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            measurements.push(Self::parse_record(&record, &schema));
        }

        Ok(measurements)
    }

    fn parse_record(record: &StringRecord, schema: &DailySchema) -> DailyMeasurement {
        let field = |index: usize| record.get(index).unwrap_or("").trim();

        let date = NaiveDate::parse_from_str(field(schema.date_local), AQS_DATE_FORMAT).ok();
        let arithmetic_mean = field(schema.arithmetic_mean).parse::<f64>().ok();

        DailyMeasurement::new(
            date,
            field(schema.parameter_name).to_string(),
            arithmetic_mean,
            field(schema.state_name).to_string(),
            field(schema.city_name).to_string(),
        )
    }
}

impl Default for DailyReader {
    fn default() -> Self {
        Self::new()
    }
}
