use crate::error::{ProcessingError, Result};
use crate::models::{GeoIndex, KpSeries, Series};
use crate::utils::constants::KP_TIME_FORMAT;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// Decodes GFZ index API responses.
///
/// A response carries a `datetime` array, one array keyed by the index name
/// and, for indices that have one, a `status` array of the same length.
pub struct KpReader {
    index: GeoIndex,
}

impl KpReader {
    pub fn new(index: GeoIndex) -> Self {
        Self { index }
    }

    pub fn parse_json(&self, body: &str) -> Result<KpSeries> {
        let data: Value = serde_json::from_str(body)?;

        let timestamps = self
            .array(&data, "datetime")?
            .iter()
            .map(parse_timestamp)
            .collect::<Result<Vec<_>>>()?;

        let values: Series = self
            .array(&data, self.index.as_str())?
            .iter()
            .map(Value::as_f64)
            .collect();

        if values.len() != timestamps.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "{} has {} values for {} timestamps",
                self.index,
                values.len(),
                timestamps.len()
            )));
        }

        let status = if self.index.has_status() {
            let status = self
                .array(&data, "status")?
                .iter()
                .map(|s| {
                    s.as_str().map(str::to_string).ok_or_else(|| {
                        ProcessingError::InvalidFormat(format!("Invalid status: {}", s))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            if status.len() != timestamps.len() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "status has {} entries for {} timestamps",
                    status.len(),
                    timestamps.len()
                )));
            }
            Some(status)
        } else {
            None
        };

        info!(index = %self.index, points = timestamps.len(), "parsed index response");

        Ok(KpSeries {
            index: self.index,
            timestamps,
            values,
            status,
        })
    }

    pub fn read_file(&self, path: &Path) -> Result<KpSeries> {
        let body = fs::read_to_string(path)?;
        self.parse_json(&body)
    }

    fn array<'a>(&self, data: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
        data.get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| ProcessingError::MissingData(format!("'{}' array in response", key)))
    }
}

fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    let text = value
        .as_str()
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid timestamp: {}", value)))?;

    NaiveDateTime::parse_from_str(text, KP_TIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid timestamp: '{}'", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KP_RESPONSE: &str = r#"{
        "meta": {"source": "GFZ Potsdam"},
        "datetime": ["2024-05-10T00:00:00Z", "2024-05-10T03:00:00Z", "2024-05-10T06:00:00Z"],
        "Kp": [4.333, 8.667, null],
        "status": ["def", "now", "now"]
    }"#;

    #[test]
    fn test_parse_kp_response() {
        let series = KpReader::new(GeoIndex::Kp).parse_json(KP_RESPONSE).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.timestamps[1],
            Utc.with_ymd_and_hms(2024, 5, 10, 3, 0, 0).unwrap()
        );
        assert_eq!(series.values.get(1), Some(8.667));
        assert_eq!(series.values.get(2), None);
        assert_eq!(series.definitive_count(), 1);
    }

    #[test]
    fn test_index_without_status() {
        let body = r#"{"datetime": ["2024-05-10T00:00:00Z"], "Hp30": [2.0]}"#;
        let series = KpReader::new(GeoIndex::Hp30).parse_json(body).unwrap();

        assert!(series.status.is_none());
        assert_eq!(series.values.get(0), Some(2.0));
    }

    #[test]
    fn test_missing_keys() {
        let reader = KpReader::new(GeoIndex::Kp);

        let no_values = r#"{"datetime": [], "status": []}"#;
        assert!(matches!(
            reader.parse_json(no_values),
            Err(ProcessingError::MissingData(_))
        ));

        let no_status = r#"{"datetime": [], "Kp": []}"#;
        assert!(matches!(
            reader.parse_json(no_status),
            Err(ProcessingError::MissingData(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = KpReader::new(GeoIndex::Kp).parse_json("{\"datetime\": [");
        assert!(matches!(result, Err(ProcessingError::Json(_))));
    }

    #[test]
    fn test_status_must_match_timestamps() {
        let reader = KpReader::new(GeoIndex::Kp);

        let short = r#"{"datetime": ["2024-05-10T00:00:00Z", "2024-05-10T03:00:00Z"], "Kp": [1.0, 2.0], "status": ["def"]}"#;
        assert!(matches!(
            reader.parse_json(short),
            Err(ProcessingError::InvalidFormat(_))
        ));

        let not_text = r#"{"datetime": ["2024-05-10T00:00:00Z"], "Kp": [1.0], "status": [1]}"#;
        assert!(matches!(
            reader.parse_json(not_text),
            Err(ProcessingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let body = r#"{"datetime": ["2024-05-10T00:00:00Z"], "Kp": [1.0, 2.0], "status": ["def"]}"#;
        let result = KpReader::new(GeoIndex::Kp).parse_json(body);

        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }
}
