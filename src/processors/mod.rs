pub mod series_extractor;

pub use series_extractor::{ExtractionReport, LineOutcome, SeriesExtractor};
