use chrono::{DateTime, Datelike, Local, Utc};
use std::path::{Path, PathBuf};

use crate::models::DstMonth;

/// Output format of a written series
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Default Dst output path: {dir}/dst-{YYMM}.{ext}
pub fn generate_default_dst_filename(dir: &Path, month: DstMonth, format: OutputFormat) -> PathBuf {
    dir.join(format!("dst-{}.{}", month.short_code(), format.extension()))
}

/// Default index output path: {dir}/{index}-{YYMMDD}.{ext}, dated today
pub fn generate_default_index_filename(dir: &Path, index: &str, format: OutputFormat) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year

    let filename = format!(
        "{}-{:02}{:02}{:02}.{}",
        index.to_lowercase(),
        year,
        now.month(),
        now.day(),
        format.extension()
    );
    dir.join(filename)
}

/// Default GLM flash output path: {dir}/glm-{YYYYMMDDHHMM}.csv
pub fn generate_default_glm_filename(dir: &Path, observed: DateTime<Utc>) -> PathBuf {
    dir.join(format!("glm-{}.csv", observed.format("%Y%m%d%H%M")))
}
