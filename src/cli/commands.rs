use crate::archive::discover_inputs;
use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::CityAggregate;
use crate::processors::AnalysisPipeline;
use crate::utils::constants::{CLEANEST_CITIES_FILE, POLLUTED_CITIES_FILE};
use crate::utils::progress::ProgressReporter;
use crate::utils::Settings;
use crate::writers::ParquetWriter;
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input_dir,
            output_dir,
            compression,
            file_pattern,
            validate_only,
            report_file,
            max_workers,
        } => {
            let input_dir = input_dir.unwrap_or(settings.input_dir);
            let output_dir = output_dir.unwrap_or(settings.output_dir);
            let compression = compression.unwrap_or(settings.compression);
            let max_workers = max_workers.unwrap_or(settings.max_workers);

            println!("Analyzing PM2.5 daily summaries...");
            println!("Input directory: {}", input_dir.display());
            println!("Output directory: {}", output_dir.display());

            let inputs = discover_inputs(&input_dir, &file_pattern)?;
            println!("Found {} yearly input files:", inputs.len());
            for input in &inputs {
                match input.year {
                    Some(year) => println!("  • {} ({})", input.path.display(), year),
                    None => println!("  • {}", input.path.display()),
                }
            }

            let progress = ProgressReporter::new_spinner("Running analysis...", false);

            let pipeline = AnalysisPipeline::new(max_workers);
            let outcome = pipeline.run(inputs, Some(&progress)).await?;

            progress.finish_with_message(&format!(
                "Analyzed {} rows across {} cities",
                outcome.report.total_rows, outcome.report.qualifying_cities
            ));

            println!("\n{}", outcome.report.summary());

            print_ranking("Top 10 most polluted cities", &outcome.most_polluted);
            print_ranking("Top 10 cleanest cities", &outcome.cleanest);

            if let Some(path) = report_file {
                let json = serde_json::to_string_pretty(&outcome.report)
                    .map_err(|e| crate::error::PipelineError::InvalidFormat(e.to_string()))?;
                std::fs::write(&path, json)?;
                println!("\nRun report written to {}", path.display());
            }

            if validate_only {
                println!("\nValidation complete - no output files written");
                return Ok(());
            }

            std::fs::create_dir_all(&output_dir)?;

            let writer = ParquetWriter::new().with_compression(&compression)?;
            let polluted_path = output_dir.join(POLLUTED_CITIES_FILE);
            let cleanest_path = output_dir.join(CLEANEST_CITIES_FILE);

            writer.write_rankings(&outcome.most_polluted, &polluted_path)?;
            writer.write_rankings(&outcome.cleanest, &cleanest_path)?;

            println!("\nWrote {}", polluted_path.display());
            println!("Wrote {}", cleanest_path.display());

            println!("Analysis complete!");
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                let rankings = writer.read_rankings(&file)?;
                println!("\nSample records (showing up to {}):", sample);
                for (i, record) in rankings.iter().take(sample).enumerate() {
                    println!(
                        "{:2}. {}, {}: avg={:.2} over {} days",
                        i + 1,
                        record.city_name,
                        record.state_name,
                        record.avg_pm25,
                        record.days
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // ignore the error when a test harness installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

fn print_ranking(title: &str, rankings: &[CityAggregate]) {
    println!("\n{}", title);
    println!(
        "    {:<20} {:<25} {:>9} {:>6}",
        "State", "City", "Avg PM2.5", "Days"
    );
    for (i, city) in rankings.iter().enumerate() {
        println!(
            "{:2}. {:<20} {:<25} {:>9.2} {:>6}",
            i + 1,
            city.state_name,
            city.city_name,
            city.avg_pm25,
            city.days
        );
    }
}
