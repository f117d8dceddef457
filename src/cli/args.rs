use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{DST_MAGNITUDE_THRESHOLD, DST_SENTINEL, KP_DEFAULT_INDEX};
use crate::utils::OutputFormat;

#[derive(Parser)]
#[command(name = "spaceweather-processor")]
#[command(about = "Fetch and clean geomagnetic index feeds (Dst, Kp) for charting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and parse the monthly real-time Dst feed
    Dst {
        #[arg(short, long, help = "Year of the feed [default: current]")]
        year: Option<i32>,

        #[arg(short, long, help = "Month of the feed [default: current]")]
        month: Option<u32>,

        #[arg(
            short,
            long,
            help = "Parse a local feed file instead of downloading"
        )]
        input: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output file path [default: {output_dir}/dst-{YYMM}.{ext}]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "parquet")]
        format: OutputFormat,

        #[arg(long, help = "Keep a copy of the downloaded feed body")]
        save_raw: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,
    },

    /// Fetch an index series from the GFZ Potsdam API
    Kp {
        #[arg(short, long, help = "Start, YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ [default: 5 days ago]")]
        start: Option<String>,

        #[arg(short, long, help = "End, YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ [default: now]")]
        end: Option<String>,

        #[arg(long, default_value = KP_DEFAULT_INDEX)]
        index: String,

        #[arg(long, default_value = "all", help = "Status filter: all or def")]
        status: String,

        #[arg(short, long, help = "Parse a saved JSON response instead of downloading")]
        input: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output file path [default: {output_dir}/{index}-{YYMMDD}.{ext}]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "parquet")]
        format: OutputFormat,

        #[arg(short, long, default_value = "snappy")]
        compression: String,
    },

    /// Extract a series from any line-oriented integer feed
    Extract {
        #[arg(short, long, help = "Input feed file")]
        input: PathBuf,

        #[arg(long, default_value_t = DST_SENTINEL)]
        sentinel: i64,

        #[arg(long, default_value_t = DST_MAGNITUDE_THRESHOLD)]
        threshold: i64,

        #[arg(long, default_value = "0")]
        leading_trim: usize,

        #[arg(long, default_value = "0")]
        trailing_trim: usize,

        #[arg(long, help = "Marker of a trailing footer line to drop")]
        footer: Option<String>,

        #[arg(short, long, help = "Write the series to this file")]
        output_file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,
    },

    /// Find the newest GLM lightning accumulation and extract flash points
    Glm {
        #[arg(short, long, help = "Year of the listing [default: current]")]
        year: Option<i32>,

        #[arg(short, long, help = "Month of the listing [default: current]")]
        month: Option<u32>,

        #[arg(long, help = "Use a saved directory listing instead of downloading")]
        listing: Option<PathBuf>,

        #[arg(long, help = "Download the newest NetCDF file to this path")]
        save: Option<PathBuf>,

        #[arg(long, help = "Flash grid exported as JSON (lat, lon, flash, duration_flash)")]
        grid: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Flash points CSV [default: {output_dir}/glm-{YYYYMMDDHHMM}.csv]"
        )]
        output_file: Option<PathBuf>,
    },

    /// Display information about a written Parquet series
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, default_value = "dst", help = "Index held in the file: dst, kp or other")]
        kind: String,
    },
}
