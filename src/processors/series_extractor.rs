use crate::error::{ProcessingError, Result};
use crate::models::{ExtractorConfig, Series};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    // ASCII digits only, the set `i64::from_str` accepts
    static ref INTEGER_TOKEN: Regex = Regex::new(r"-?[0-9]+").unwrap();
}

/// What a single input line contributed to the series
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// No integer token on the line
    Skipped,
    /// Fewer tokens after the identifier than the trim window needs
    TooShort { tokens: usize },
    /// Values were appended, some of them possibly missing
    Values { count: usize, missing: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub lines_read: usize,
    pub footer_dropped: bool,
    pub skipped_lines: usize,
    pub short_lines: usize,
    pub records: usize,
    pub values: usize,
    pub missing_values: usize,
}

impl ExtractionReport {
    fn record(&mut self, outcome: &LineOutcome) {
        match outcome {
            LineOutcome::Skipped => self.skipped_lines += 1,
            LineOutcome::TooShort { .. } => self.short_lines += 1,
            LineOutcome::Values { count, missing } => {
                self.records += 1;
                self.values += count;
                self.missing_values += missing;
            }
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Lines: {} ({} records, {} skipped, {} too short{})\nValues: {} ({} missing)",
            self.lines_read,
            self.records,
            self.skipped_lines,
            self.short_lines,
            if self.footer_dropped {
                ", footer dropped"
            } else {
                ""
            },
            self.values,
            self.missing_values
        )
    }
}

/// Turns a line-oriented integer feed into a flat series.
///
/// Every line is one record: the first integer token identifies it, the
/// configured trim window is removed around the samples and each remaining
/// token becomes one slot. Tokens equal to the sentinel or above the
/// magnitude threshold become missing slots.
pub struct SeriesExtractor {
    config: ExtractorConfig,
}

impl SeriesExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract from the raw feed body. Fails only when the body is not text.
    pub fn extract(&self, raw: &[u8]) -> Result<Series> {
        self.extract_with_report(raw).map(|(series, _)| series)
    }

    pub fn extract_with_report(&self, raw: &[u8]) -> Result<(Series, ExtractionReport)> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| ProcessingError::Decode(format!("Invalid UTF-8: {}", e)))?;
        Ok(self.extract_str_with_report(text))
    }

    pub fn extract_str(&self, text: &str) -> Series {
        self.extract_str_with_report(text).0
    }

    pub fn extract_str_with_report(&self, text: &str) -> (Series, ExtractionReport) {
        let mut lines: Vec<&str> = text.lines().collect();
        let mut report = ExtractionReport::default();

        // Blank lines carry no tokens, so the footer is the last non-blank one
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if let Some(marker) = self.config.footer_marker.as_deref() {
            if lines.last().is_some_and(|line| line.contains(marker)) {
                lines.pop();
                report.footer_dropped = true;
            }
        }

        let mut series = Series::default();
        for (line_no, line) in lines.iter().enumerate() {
            report.lines_read += 1;
            let outcome = self.extract_line(line, &mut series);
            if !matches!(outcome, LineOutcome::Values { .. }) {
                debug!(line = line_no + 1, ?outcome, "line contributed no values");
            }
            report.record(&outcome);
        }

        debug!(
            records = report.records,
            values = report.values,
            missing = report.missing_values,
            "extraction finished"
        );
        (series, report)
    }

    /// Clean one line, appending its retained values to `series`
    pub fn extract_line(&self, line: &str, series: &mut Series) -> LineOutcome {
        let mut tokens = INTEGER_TOKEN.find_iter(line).map(|m| m.as_str());

        // The identifier is never a sample
        if tokens.next().is_none() {
            return LineOutcome::Skipped;
        }

        let rest: Vec<&str> = tokens.collect();
        if rest.len() < self.config.trim_window() {
            return LineOutcome::TooShort { tokens: rest.len() };
        }

        let samples = &rest[self.config.leading_trim..rest.len() - self.config.trailing_trim];
        let mut missing = 0;
        for token in samples {
            let value = self.clean_token(token);
            if value.is_none() {
                missing += 1;
            }
            series.push(value);
        }

        LineOutcome::Values {
            count: samples.len(),
            missing,
        }
    }

    /// Map one integer token to a sample, `None` for sentinel or out-of-range.
    pub fn clean_token(&self, token: &str) -> Option<f64> {
        // Digit runs beyond i64 are necessarily above any threshold
        let value = token.parse::<i64>().ok()?;

        if value == self.config.sentinel_value
            || value.unsigned_abs() > self.config.magnitude_threshold.unsigned_abs()
        {
            None
        } else {
            Some(value as f64)
        }
    }
}

impl Default for SeriesExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
