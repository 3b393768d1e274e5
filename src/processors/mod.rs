pub mod aggregator;
pub mod pipeline;
pub mod ranking;

pub use aggregator::{round_to, CityAggregator};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, FileRowCount, RunReport};
pub use ranking::{RankingQuery, SortDirection};
