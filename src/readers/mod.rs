pub mod concurrent_reader;
pub mod daily_reader;

pub use concurrent_reader::{ConcurrentReader, FileReadResult, ReadJob};
pub use daily_reader::{normalize_headers, DailyReader, DailySchema};
