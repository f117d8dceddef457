use crate::error::{ProcessingError, Result};
use crate::models::{DstMonth, ExtractorConfig, TimedSeries};
use crate::processors::{ExtractionReport, SeriesExtractor};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Reads monthly Dst feeds into hourly series
pub struct DstReader {
    extractor: SeriesExtractor,
    use_mmap: bool,
}

impl DstReader {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::dst())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            extractor: SeriesExtractor::new(config),
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Parse a downloaded feed body for `month`
    pub fn parse_feed(&self, body: &[u8], month: DstMonth) -> Result<(TimedSeries, ExtractionReport)> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ProcessingError::EmptyFeed(month.file_name()));
        }

        let (series, report) = self.extractor.extract_with_report(body)?;
        info!(
            month = %month.short_code(),
            slots = series.len(),
            missing = series.missing_count(),
            "parsed Dst feed"
        );

        if series.len() > month.expected_slots() {
            warn!(
                slots = series.len(),
                expected = month.expected_slots(),
                "Dst feed has more hourly values than the month has hours"
            );
        }

        Ok((TimedSeries::hourly(series, month.start())?, report))
    }

    /// Read a feed file from disk
    pub fn read_file(&self, path: &Path, month: DstMonth) -> Result<(TimedSeries, ExtractionReport)> {
        if self.use_mmap {
            self.read_file_mmap(path, month)
        } else {
            self.read_file_buffered(path, month)
        }
    }

    fn read_file_buffered(&self, path: &Path, month: DstMonth) -> Result<(TimedSeries, ExtractionReport)> {
        let mut body = Vec::new();
        File::open(path)?.read_to_end(&mut body)?;
        self.parse_feed(&body, month)
    }

    fn read_file_mmap(&self, path: &Path, month: DstMonth) -> Result<(TimedSeries, ExtractionReport)> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(ProcessingError::EmptyFeed(path.display().to_string()));
        }
        let mmap = unsafe { Mmap::map(&file)? };
        self.parse_feed(&mmap, month)
    }

    /// Infer the month from a feed file name such as `dst2405.for.request`.
    /// Two-digit years are taken to be in the 2000s.
    pub fn month_from_path(&self, path: &Path) -> Result<DstMonth> {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| ProcessingError::InvalidFormat("Invalid file path".to_string()))?;

        let code = filename
            .strip_prefix("dst")
            .and_then(|s| s.get(..4))
            .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Filename does not match expected pattern: {}",
                    filename
                ))
            })?;

        let year = 2000 + code[..2].parse::<i32>().unwrap_or_default();
        let month = code[2..].parse::<u32>().unwrap_or_default();
        DstMonth::new(year, month)
    }
}

impl Default for DstReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn day_line(day: u32, hourly: &[i32], mean: i32) -> String {
        let values: String = hourly.iter().map(|v| format!("{:4}", v)).collect();
        format!("DST2405*{:02}RRX020   0{}{:4}", day, values, mean)
    }

    #[test]
    fn test_parse_kyoto_layout() {
        let mut hourly = vec![-5; 24];
        hourly[3] = -112;
        hourly[23] = -1200;
        let body = format!(
            "{}\n{}\nCreated at 2024-05-03T10:00:00Z\n",
            day_line(1, &hourly, -10),
            day_line(2, &[3; 24], 3)
        );

        let month = DstMonth::new(2024, 5).unwrap();
        let (timed, report) = DstReader::new().parse_feed(body.as_bytes(), month).unwrap();
        let series = timed.series();

        assert_eq!(series.len(), 48);
        assert_eq!(series.get(0), Some(-5.0));
        assert_eq!(series.get(3), Some(-112.0));
        assert_eq!(series.get(23), None);
        assert_eq!(series.get(24), Some(3.0));
        assert!(report.footer_dropped);
        assert_eq!(
            timed.timestamp_at(24).map(|t| t.to_rfc3339()),
            Some("2024-05-02T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_empty_feed() {
        let month = DstMonth::new(2024, 5).unwrap();
        let result = DstReader::new().parse_feed(b"  \n\n", month);

        assert!(matches!(result, Err(ProcessingError::EmptyFeed(_))));
    }

    #[test]
    fn test_read_file_both_ways() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("dst2405.for.request");
        let mut file = File::create(&path)?;
        writeln!(file, "{}", day_line(1, &[-20; 24], -20))?;
        writeln!(file, "Created at 2024-05-02")?;

        let reader = DstReader::new();
        let month = reader.month_from_path(&path)?;
        assert_eq!(month, DstMonth::new(2024, 5)?);

        let (buffered, _) = reader.read_file(&path, month)?;
        let (mapped, _) = DstReader::new().with_mmap(true).read_file(&path, month)?;

        assert_eq!(buffered.series().len(), 24);
        assert_eq!(buffered, mapped);
        Ok(())
    }

    #[test]
    fn test_month_from_bad_path() {
        let reader = DstReader::new();
        assert!(reader.month_from_path(Path::new("kp.json")).is_err());
        assert!(reader.month_from_path(Path::new("dstXX05.for.request")).is_err());
    }
}
