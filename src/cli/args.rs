use crate::utils::constants::DEFAULT_FILE_PATTERN;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqs-processor")]
#[command(about = "EPA Air Quality System daily-summary processor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Settings file path")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the PM2.5 city-ranking analysis over yearly daily-summary files
    Analyze {
        #[arg(short, long, help = "Directory containing yearly AQS files (zip or csv)")]
        input_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory for the ranking Parquet files")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Parquet compression codec")]
        compression: Option<String>,

        #[arg(
            long,
            default_value = DEFAULT_FILE_PATTERN,
            help = "Filter input files to this filename pattern"
        )]
        file_pattern: String,

        #[arg(long, default_value = "false", help = "Run the pipeline without writing output files")]
        validate_only: bool,

        #[arg(long, help = "Write the run report as JSON to this path")]
        report_file: Option<PathBuf>,

        #[arg(long, help = "Worker threads for reading input files")]
        max_workers: Option<usize>,
    },

    /// Display information about a ranking Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
