use crate::error::{PipelineError, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime defaults for the analyze command, loadable from an optional
/// settings file and AQS_* environment variables. CLI flags take
/// precedence over anything loaded here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub compression: String,
    pub max_workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/epa_raw"),
            output_dir: PathBuf::from("data"),
            compression: "snappy".to_string(),
            max_workers: num_cpus::get(),
        }
    }
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        // e.g. AQS_OUTPUT_DIR=/tmp/rankings
        builder = builder.add_source(Environment::with_prefix("AQS"));

        let config = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))
    }
}
