pub mod temp_manager;

pub use temp_manager::TempFileManager;

use crate::error::{PipelineError, Result};
use crate::utils::filename::extract_year_from_filename;
use std::fs;
use std::path::{Path, PathBuf};

/// One yearly AQS input file: either a zip containing a single CSV, or a
/// bare CSV.
#[derive(Debug, Clone)]
pub struct YearlyInput {
    pub path: PathBuf,
    pub year: Option<i32>,
}

impl YearlyInput {
    pub fn from_path(path: PathBuf) -> Self {
        let year = extract_year_from_filename(&path);
        Self { path, year }
    }

    pub fn is_archived(&self) -> bool {
        self.path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"))
    }
}

/// Scan a directory for yearly input files whose names contain `pattern`,
/// sorted by filename so the union order is deterministic. Zero matches
/// is fatal.
pub fn discover_inputs(dir: &Path, pattern: &str) -> Result<Vec<YearlyInput>> {
    let mut inputs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let supported = path.extension().map_or(false, |ext| {
            ext.eq_ignore_ascii_case("zip") || ext.eq_ignore_ascii_case("csv")
        });
        if !supported {
            continue;
        }

        if !pattern.is_empty() {
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if name.contains(pattern) => {}
                _ => continue,
            }
        }

        inputs.push(YearlyInput::from_path(path));
    }

    if inputs.is_empty() {
        return Err(PipelineError::InvalidFormat(format!(
            "No AQS input files matching '{}' found in directory: {}",
            pattern,
            dir.display()
        )));
    }

    inputs.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    Ok(inputs)
}
