use crate::error::{PipelineError, Result};
use crate::models::CityAggregate;
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::{Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(PipelineError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write a ranking to a Parquet file, fully replacing any prior
    /// contents at the path. An empty ranking still produces a zero-row
    /// file so stale output never survives a run.
    pub fn write_rankings(&self, rankings: &[CityAggregate], path: &Path) -> Result<()> {
        let schema = Self::ranking_schema();

        // File::create truncates: overwrite means full replacement
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        if !rankings.is_empty() {
            let batch = Self::rankings_to_batch(rankings, schema)?;
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    fn ranking_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("state_name", DataType::Utf8, false),
            Field::new("city_name", DataType::Utf8, false),
            Field::new("avg_pm25", DataType::Float64, false),
            Field::new("days", DataType::UInt64, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn rankings_to_batch(rankings: &[CityAggregate], schema: Arc<Schema>) -> Result<RecordBatch> {
        let state_names: Vec<String> = rankings.iter().map(|r| r.state_name.clone()).collect();
        let city_names: Vec<String> = rankings.iter().map(|r| r.city_name.clone()).collect();
        let averages: Vec<f64> = rankings.iter().map(|r| r.avg_pm25).collect();
        let days: Vec<u64> = rankings.iter().map(|r| r.days).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(state_names)),
                Arc::new(StringArray::from(city_names)),
                Arc::new(Float64Array::from(averages)),
                Arc::new(UInt64Array::from(days)),
            ],
        )?;

        Ok(batch)
    }

    /// Read a ranking file back into memory, preserving row order.
    pub fn read_rankings(&self, path: &Path) -> Result<Vec<CityAggregate>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut rankings = Vec::new();

        for batch_result in reader {
            let batch = batch_result?;

            let state_names = downcast::<StringArray>(&batch, 0, "state_name")?;
            let city_names = downcast::<StringArray>(&batch, 1, "city_name")?;
            let averages = downcast::<Float64Array>(&batch, 2, "avg_pm25")?;
            let days = downcast::<UInt64Array>(&batch, 3, "days")?;

            for i in 0..batch.num_rows() {
                rankings.push(CityAggregate::new(
                    state_names.value(i).to_string(),
                    city_names.value(i).to_string(),
                    averages.value(i),
                    days.value(i),
                ));
            }
        }

        Ok(rankings)
    }

    /// Get file statistics for a written ranking file.
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| PipelineError::InvalidFormat(format!("Invalid {} column type", name)))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Rows: {}\nRow groups: {}\nFile size: {} bytes",
            self.total_rows, self.row_groups, self.file_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_rankings() -> Vec<CityAggregate> {
        vec![
            CityAggregate::new("Wyoming".to_string(), "Riverton".to_string(), 35.4, 120),
            CityAggregate::new("Colorado".to_string(), "Denver".to_string(), 12.75, 365),
        ]
    }

    #[test]
    fn test_write_and_read_rankings() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("top10_polluted_cities.parquet");

        let writer = ParquetWriter::new();
        writer.write_rankings(&sample_rankings(), &path)?;

        let read_back = writer.read_rankings(&path)?;
        assert_eq!(read_back, sample_rankings());

        let info = writer.get_file_info(&path)?;
        assert_eq!(info.total_rows, 2);

        Ok(())
    }

    #[test]
    fn test_overwrite_fully_replaces_prior_contents() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("top10_cleanest_cities.parquet");

        let writer = ParquetWriter::new();
        writer.write_rankings(&sample_rankings(), &path)?;

        let shorter = vec![CityAggregate::new(
            "Montana".to_string(),
            "Helena".to_string(),
            4.1,
            200,
        )];
        writer.write_rankings(&shorter, &path)?;

        let read_back = writer.read_rankings(&path)?;
        assert_eq!(read_back, shorter);

        Ok(())
    }

    #[test]
    fn test_empty_ranking_writes_zero_row_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("top10_polluted_cities.parquet");

        let writer = ParquetWriter::new();
        writer.write_rankings(&sample_rankings(), &path)?;
        writer.write_rankings(&[], &path)?;

        assert!(path.exists());
        let read_back = writer.read_rankings(&path)?;
        assert!(read_back.is_empty());

        Ok(())
    }

    #[test]
    fn test_unsupported_compression_is_config_error() {
        let result = ParquetWriter::new().with_compression("brotli9000");
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }
}
