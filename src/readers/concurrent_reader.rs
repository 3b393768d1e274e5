use crate::error::{PipelineError, Result};
use crate::models::DailyMeasurement;
use crate::readers::DailyReader;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// One CSV to parse, after any archive extraction has happened.
#[derive(Debug, Clone)]
pub struct ReadJob {
    pub source: String,
    pub year: Option<i32>,
    pub csv_path: PathBuf,
}

/// Parsed rows for one yearly file, with the row count retained for the
/// run report.
#[derive(Debug)]
pub struct FileReadResult {
    pub source: String,
    pub year: Option<i32>,
    pub rows: usize,
    pub measurements: Vec<DailyMeasurement>,
}

pub struct ConcurrentReader {
    max_workers: usize,
}

impl ConcurrentReader {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    /// Parse every yearly CSV on a bounded worker pool. Results come back
    /// in job order, so concatenating them preserves the union order.
    pub fn read_all(&self, jobs: Vec<ReadJob>) -> Result<Vec<FileReadResult>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let reader = DailyReader::new();
                    let measurements = reader.read_measurements(&job.csv_path)?;

                    debug!(
                        source = %job.source,
                        rows = measurements.len(),
                        "parsed daily summary file"
                    );

                    Ok(FileReadResult {
                        source: job.source.clone(),
                        year: job.year,
                        rows: measurements.len(),
                        measurements,
                    })
                })
                .collect()
        })
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(rows: &[&str]) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "Date Local,Parameter Name,Arithmetic Mean,State Name,City Name"
        )?;
        for row in rows {
            writeln!(file, "{}", row)?;
        }
        Ok(file)
    }

    #[test]
    fn test_read_all_preserves_job_order() -> Result<()> {
        let first = write_csv(&[
            "2021-01-01,PM2.5 - Local Conditions,10.0,Wyoming,Riverton",
            "2021-01-02,PM2.5 - Local Conditions,11.0,Wyoming,Riverton",
        ])?;
        let second = write_csv(&["2022-01-01,PM2.5 - Local Conditions,12.0,Wyoming,Riverton"])?;

        let jobs = vec![
            ReadJob {
                source: "daily_88101_2021.zip".to_string(),
                year: Some(2021),
                csv_path: first.path().to_path_buf(),
            },
            ReadJob {
                source: "daily_88101_2022.zip".to_string(),
                year: Some(2022),
                csv_path: second.path().to_path_buf(),
            },
        ];

        let reader = ConcurrentReader::new(2);
        let results = reader.read_all(jobs)?;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, "daily_88101_2021.zip");
        assert_eq!(results[0].rows, 2);
        assert_eq!(results[1].source, "daily_88101_2022.zip");
        assert_eq!(results[1].rows, 1);

        Ok(())
    }

    #[test]
    fn test_read_all_missing_file_is_fatal() {
        let jobs = vec![ReadJob {
            source: "daily_88101_2021.zip".to_string(),
            year: Some(2021),
            csv_path: PathBuf::from("/nonexistent/daily_88101_2021.csv"),
        }];

        let reader = ConcurrentReader::new(1);
        assert!(reader.read_all(jobs).is_err());
    }
}
