/// Pollutant label selected by the filter stage
pub const PM25_PARAMETER_NAME: &str = "PM2.5 - Local Conditions";

/// Minimum measurement days for a city to be ranked (inclusive)
pub const MIN_OBSERVATION_DAYS: u64 = 100;

/// Number of cities kept by each ranking query
pub const RANKING_LIMIT: usize = 10;

/// Decimal places kept on the mean concentration
pub const MEAN_PRECISION: u32 = 2;

/// Governed column names in AQS daily summary files
pub const COL_DATE_LOCAL: &str = "Date Local";
pub const COL_PARAMETER_NAME: &str = "Parameter Name";
pub const COL_ARITHMETIC_MEAN: &str = "Arithmetic Mean";
pub const COL_STATE_NAME: &str = "State Name";
pub const COL_CITY_NAME: &str = "City Name";

/// Date format used by AQS daily summaries (e.g. 2021-03-14)
pub const AQS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Output file names
pub const POLLUTED_CITIES_FILE: &str = "top10_polluted_cities.parquet";
pub const CLEANEST_CITIES_FILE: &str = "top10_cleanest_cities.parquet";

/// Default input filename pattern (PM2.5 FRM/FEM parameter code 88101)
pub const DEFAULT_FILE_PATTERN: &str = "daily_88101_";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
