use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// Scoped extraction workspace for archived inputs. Every extracted CSV
/// lives under one temporary directory owned by the pipeline run; the
/// directory is released explicitly on success and by Drop on failure.
pub struct TempFileManager {
    temp_dir: TempDir,
    extracted_files: HashMap<PathBuf, PathBuf>,
}

impl TempFileManager {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create temporary directory: {}", e),
            ))
        })?;

        Ok(Self {
            temp_dir,
            extracted_files: HashMap::new(),
        })
    }

    pub fn temp_dir_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Extract the CSV entry of a yearly archive into the workspace and
    /// return its path. Each archive is extracted at most once.
    pub fn extract_csv(&mut self, zip_path: &Path) -> Result<PathBuf> {
        if let Some(path) = self.extracted_files.get(zip_path) {
            return Ok(path.clone());
        }

        let file = File::open(zip_path)?;
        let mut archive = ZipArchive::new(file)?;

        let entry_name = Self::find_csv_entry(&mut archive).ok_or_else(|| {
            PipelineError::InvalidFormat(format!(
                "No CSV entry found in archive '{}'",
                zip_path.display()
            ))
        })?;

        let mut zip_file = archive.by_name(&entry_name)?;

        // Flatten the entry name so nested archive paths cannot collide
        // with or escape the workspace
        let flat_name = entry_name.replace(['/', '\\'], "_");
        let dest_path = self.temp_dir.path().join(flat_name);

        let mut dest_file = File::create(&dest_path)?;
        let mut writer = BufWriter::new(&mut dest_file);
        std::io::copy(&mut zip_file, &mut writer)?;
        writer.flush()?;

        self.extracted_files
            .insert(zip_path.to_path_buf(), dest_path.clone());

        Ok(dest_path)
    }

    fn find_csv_entry(archive: &mut ZipArchive<File>) -> Option<String> {
        for i in 0..archive.len() {
            if let Ok(entry) = archive.by_index(i) {
                let name = entry.name().to_string();
                if name.to_ascii_lowercase().ends_with(".csv") {
                    return Some(name);
                }
            }
        }
        None
    }

    pub fn extracted_count(&self) -> usize {
        self.extracted_files.len()
    }

    pub fn cleanup(&mut self) -> Result<()> {
        self.extracted_files.clear();

        // TempDir removes the directory tree when dropped; clearing the
        // cache here is enough for an explicit release point
        Ok(())
    }
}

impl Drop for TempFileManager {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            eprintln!("Warning: Failed to cleanup temporary files: {}", e);
        }
    }
}
