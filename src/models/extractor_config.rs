use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_OUTPUT_DIR, DST_LEADING_TRIM, DST_MAGNITUDE_THRESHOLD, DST_SENTINEL,
    DST_TRAILING_TRIM, ENV_PREFIX, FOOTER_MARKER,
};

/// Rules for turning one line-oriented feed into a series.
///
/// The trim counts are feed specific: they describe summary fields that sit
/// around the samples of a record, after the leading identifier token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Token that always means "no measurement"
    pub sentinel_value: i64,

    /// Tokens with an absolute value above this are treated as missing
    #[validate(range(min = 0))]
    pub magnitude_threshold: i64,

    pub leading_trim: usize,

    pub trailing_trim: usize,

    /// Substring identifying a trailing non-data line
    #[validate(length(min = 1))]
    pub footer_marker: Option<String>,
}

impl ExtractorConfig {
    pub fn new(
        sentinel_value: i64,
        magnitude_threshold: i64,
        leading_trim: usize,
        trailing_trim: usize,
        footer_marker: Option<String>,
    ) -> Self {
        Self {
            sentinel_value,
            magnitude_threshold,
            leading_trim,
            trailing_trim,
            footer_marker,
        }
    }

    /// Kyoto real-time Dst layout: day, version/century and base value lead
    /// the 24 hourly samples, the daily mean trails them.
    pub fn dst() -> Self {
        Self::new(
            DST_SENTINEL,
            DST_MAGNITUDE_THRESHOLD,
            DST_LEADING_TRIM,
            DST_TRAILING_TRIM,
            Some(FOOTER_MARKER.to_string()),
        )
    }

    /// Same cleaning rules as [`ExtractorConfig::dst`] but keeps every token
    /// after the identifier.
    pub fn raw() -> Self {
        Self::new(
            DST_SENTINEL,
            DST_MAGNITUDE_THRESHOLD,
            0,
            0,
            Some(FOOTER_MARKER.to_string()),
        )
    }

    pub fn with_trim(mut self, leading_trim: usize, trailing_trim: usize) -> Self {
        self.leading_trim = leading_trim;
        self.trailing_trim = trailing_trim;
        self
    }

    pub fn with_footer_marker(mut self, marker: Option<String>) -> Self {
        self.footer_marker = marker;
        self
    }

    /// Number of tokens a record needs after its identifier to yield any value.
    /// Saturates, so an oversized trim only ever makes lines too short.
    pub fn trim_window(&self) -> usize {
        self.leading_trim.saturating_add(self.trailing_trim)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::dst()
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Layered runtime settings: optional config file, then `SWX_*` environment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub extractor: ExtractorConfig,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl Settings {
    /// Load settings, e.g. `SWX_EXTRACTOR__LEADING_TRIM=0` overrides the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}
