pub mod dst;
pub mod extractor_config;
pub mod glm;
pub mod kp;
pub mod series;

pub use dst::DstMonth;
pub use extractor_config::{ExtractorConfig, Settings};
pub use glm::{BoundingBox, FlashGrid, FlashPoint, GlmFile};
pub use kp::{GeoIndex, KpRequest, KpSeries, StatusFilter};
pub use series::{Series, SeriesPoint, TimedSeries};
