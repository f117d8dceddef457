pub mod storm_analyzer;

pub use storm_analyzer::{DstIntensity, IndexKind, KpLevel, SeriesStatistics, StormAnalyzer};
