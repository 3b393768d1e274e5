use crate::archive::{TempFileManager, YearlyInput};
use crate::error::Result;
use crate::models::{CityAggregate, DailyMeasurement};
use crate::processors::{CityAggregator, RankingQuery};
use crate::readers::{ConcurrentReader, ReadJob};
use crate::utils::constants::PM25_PARAMETER_NAME;
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use tracing::{debug, info};

/// Rows observed for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRowCount {
    pub source: String,
    pub year: Option<i32>,
    pub rows: usize,
}

/// Row counts at each pipeline stage. The union total always equals the
/// sum of the per-file counts; nothing is deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub file_rows: Vec<FileRowCount>,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub qualifying_cities: usize,
}

impl RunReport {
    pub fn summary(&self) -> String {
        let mut summary = String::from("Run Report:\n");
        for file in &self.file_rows {
            summary.push_str(&format!("  {} -> {} rows\n", file.source, file.rows));
        }
        summary.push_str(&format!("  Unified rows: {}\n", self.total_rows));
        summary.push_str(&format!("  PM2.5 rows: {}\n", self.filtered_rows));
        summary.push_str(&format!("  Qualifying cities: {}", self.qualifying_cities));
        summary
    }
}

/// Output of one full analysis run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub aggregates: Vec<CityAggregate>,
    pub most_polluted: Vec<CityAggregate>,
    pub cleanest: Vec<CityAggregate>,
    pub report: RunReport,
}

/// Orchestrates the full run: extract, read, union, enrich, filter,
/// aggregate, rank. The extraction workspace is scoped to the run and
/// released on every exit path (explicitly on success, via Drop on
/// failure).
pub struct AnalysisPipeline {
    max_workers: usize,
}

impl AnalysisPipeline {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub async fn run(
        &self,
        inputs: Vec<YearlyInput>,
        progress: Option<&ProgressReporter>,
    ) -> Result<AnalysisOutcome> {
        let mut workspace = TempFileManager::new()?;
        let outcome = self.run_stages(&inputs, &mut workspace, progress).await;
        workspace.cleanup()?;
        outcome
    }

    async fn run_stages(
        &self,
        inputs: &[YearlyInput],
        workspace: &mut TempFileManager,
        progress: Option<&ProgressReporter>,
    ) -> Result<AnalysisOutcome> {
        if let Some(p) = progress {
            p.set_message("Extracting yearly archives...");
        }

        // Extract archived inputs up front so the parse fan-out only sees
        // plain CSV paths
        let mut jobs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let csv_path = if input.is_archived() {
                workspace.extract_csv(&input.path)?
            } else {
                input.path.clone()
            };
            jobs.push(ReadJob {
                source: input.path.display().to_string(),
                year: input.year,
                csv_path,
            });
        }

        if let Some(p) = progress {
            p.set_message("Reading daily summary files...");
        }

        let max_workers = self.max_workers;
        let file_results =
            tokio::task::spawn_blocking(move || ConcurrentReader::new(max_workers).read_all(jobs))
                .await??;

        let file_rows: Vec<FileRowCount> = file_results
            .iter()
            .map(|r| FileRowCount {
                source: r.source.clone(),
                year: r.year,
                rows: r.rows,
            })
            .collect();
        let total_rows: usize = file_rows.iter().map(|f| f.rows).sum();

        // Union by name: each file was already decoded against its own
        // resolved schema, so ordered concatenation is the whole merge.
        // Duplicate rows across years are preserved.
        let mut measurements: Vec<DailyMeasurement> = Vec::with_capacity(total_rows);
        for result in file_results {
            measurements.extend(result.measurements);
        }
        info!(
            files = file_rows.len(),
            rows = measurements.len(),
            "loaded daily summaries"
        );

        if let Some(p) = progress {
            p.set_message("Deriving calendar fields...");
        }
        for measurement in &mut measurements {
            measurement.derive_calendar_fields();
        }

        if let Some(p) = progress {
            p.set_message("Filtering PM2.5 measurements...");
        }
        let filtered: Vec<DailyMeasurement> = measurements
            .into_iter()
            .filter(|m| m.is_parameter(PM25_PARAMETER_NAME) && m.has_measurement())
            .collect();
        debug!(rows = filtered.len(), "retained PM2.5 rows");

        if let Some(p) = progress {
            p.set_message("Aggregating by city...");
        }
        let aggregates = CityAggregator::new().aggregate(&filtered);
        info!(cities = aggregates.len(), "aggregated qualifying cities");

        let most_polluted = RankingQuery::most_polluted().execute(&aggregates);
        let cleanest = RankingQuery::cleanest().execute(&aggregates);

        let report = RunReport {
            file_rows,
            total_rows,
            filtered_rows: filtered.len(),
            qualifying_cities: aggregates.len(),
        };

        Ok(AnalysisOutcome {
            aggregates,
            most_polluted,
            cleanest,
            report,
        })
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
