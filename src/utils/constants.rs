/// Dst feed layout (Kyoto WDC real-time request format)
pub const DST_BASE_URL: &str = "https://wdc.kugi.kyoto-u.ac.jp/dst_realtime";
pub const DST_SENTINEL: i64 = 9_999_999_999;
pub const DST_MAGNITUDE_THRESHOLD: i64 = 999;
pub const DST_LEADING_TRIM: usize = 3;
pub const DST_TRAILING_TRIM: usize = 1;
pub const DST_HOURS_PER_DAY: usize = 24;
pub const FOOTER_MARKER: &str = "Created at";

/// The monthly file is not published before this day of the month
pub const DST_AVAILABLE_FROM_DAY: u32 = 5;

/// Kp feed (GFZ Potsdam JSON API)
pub const KP_BASE_URL: &str = "https://kp.gfz-potsdam.de/app/json/";
pub const KP_DEFAULT_INDEX: &str = "Kp";
pub const KP_DEFAULT_WINDOW_DAYS: i64 = 5;
pub const KP_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const KP_VALID_INDICES: &[&str] = &[
    "Kp", "ap", "Ap", "Cp", "C9", "Hp30", "Hp60", "ap30", "ap60", "SN", "Fobs", "Fadj",
];
/// Indices the API publishes without a definitive/nowcast status
pub const KP_INDICES_WITHOUT_STATUS: &[&str] = &["Hp30", "Hp60", "ap30", "ap60", "Fobs", "Fadj"];

/// GLM lightning accumulations (CPTEC/INPE GOES-16 mirror, one directory per month)
pub const GLM_BASE_URL: &str = "http://ftp.cptec.inpe.br/goes/goes16/goes16_web/glm_acumulado_nc";
pub const GLM_FILE_EXTENSION: &str = ".nc";
/// Byte range of the `YYYYMMDDHHMM` stamp in a GLM file name
pub const GLM_TIMESTAMP_START: usize = 10;
pub const GLM_TIMESTAMP_END: usize = 22;
pub const GLM_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";
/// Peru local time, UTC-5 all year
pub const GLM_LOCAL_OFFSET_HOURS: i32 = -5;

/// Region of interest for flash points (degrees)
pub const GLM_LAT_MIN: f64 = -19.2;
pub const GLM_LAT_MAX: f64 = 0.7;
pub const GLM_LON_MIN: f64 = -82.1;
pub const GLM_LON_MAX: f64 = -68.10;

/// Dst storm intensity bands (nT)
pub const DST_WEAK: f64 = -30.0;
pub const DST_MODERATE: f64 = -50.0;
pub const DST_INTENSE: f64 = -100.0;
pub const DST_VERY_INTENSE: f64 = -250.0;

/// Kp geomagnetic storm threshold (G1)
pub const KP_STORM_THRESHOLD: f64 = 5.0;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Environment prefix for layered configuration
pub const ENV_PREFIX: &str = "SWX";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
