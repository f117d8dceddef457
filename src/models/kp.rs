use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::models::series::{Series, SeriesPoint};
use crate::utils::constants::{
    KP_BASE_URL, KP_DEFAULT_WINDOW_DAYS, KP_INDICES_WITHOUT_STATUS, KP_TIME_FORMAT,
    KP_VALID_INDICES,
};

/// Geomagnetic and solar indices served by the GFZ Potsdam API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoIndex {
    Kp,
    /// Three-hourly ap, distinct from the daily `Ap`
    ApThreeHourly,
    Ap,
    Cp,
    C9,
    Hp30,
    Hp60,
    Ap30,
    Ap60,
    /// Sunspot number
    Sn,
    Fobs,
    Fadj,
}

impl GeoIndex {
    /// Name as used in the API query and as the JSON key of the values
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoIndex::Kp => "Kp",
            GeoIndex::ApThreeHourly => "ap",
            GeoIndex::Ap => "Ap",
            GeoIndex::Cp => "Cp",
            GeoIndex::C9 => "C9",
            GeoIndex::Hp30 => "Hp30",
            GeoIndex::Hp60 => "Hp60",
            GeoIndex::Ap30 => "ap30",
            GeoIndex::Ap60 => "ap60",
            GeoIndex::Sn => "SN",
            GeoIndex::Fobs => "Fobs",
            GeoIndex::Fadj => "Fadj",
        }
    }

    /// Whether the API reports a definitive/nowcast status for this index
    pub fn has_status(&self) -> bool {
        !KP_INDICES_WITHOUT_STATUS.contains(&self.as_str())
    }
}

impl FromStr for GeoIndex {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Kp" => Ok(GeoIndex::Kp),
            "ap" => Ok(GeoIndex::ApThreeHourly),
            "Ap" => Ok(GeoIndex::Ap),
            "Cp" => Ok(GeoIndex::Cp),
            "C9" => Ok(GeoIndex::C9),
            "Hp30" => Ok(GeoIndex::Hp30),
            "Hp60" => Ok(GeoIndex::Hp60),
            "ap30" => Ok(GeoIndex::Ap30),
            "ap60" => Ok(GeoIndex::Ap60),
            "SN" => Ok(GeoIndex::Sn),
            "Fobs" => Ok(GeoIndex::Fobs),
            "Fadj" => Ok(GeoIndex::Fadj),
            _ => Err(ProcessingError::InvalidIndex {
                name: s.to_string(),
                allowed: KP_VALID_INDICES.join(", "),
            }),
        }
    }
}

impl fmt::Display for GeoIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Definitive and nowcast values
    #[default]
    All,
    /// Definitive values only
    Def,
}

impl FromStr for StatusFilter {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(StatusFilter::All),
            "def" => Ok(StatusFilter::Def),
            _ => Err(ProcessingError::InvalidStatus {
                name: s.to_string(),
            }),
        }
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SSZ`, or a bare `YYYY-MM-DD` expanded with
/// `day_time` (`00:00:00` for a start bound, `23:59:00` for an end bound).
fn parse_bound(value: &str, day_time: &str) -> Result<DateTime<Utc>> {
    let full = if value.len() == 10 {
        format!("{}T{}Z", value, day_time)
    } else {
        value.to_string()
    };

    NaiveDateTime::parse_from_str(&full, KP_TIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| ProcessingError::InvalidDate {
            value: value.to_string(),
        })
}

/// A validated query against the GFZ index API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub index: GeoIndex,
    pub status: StatusFilter,
}

impl KpRequest {
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        index: GeoIndex,
        status: StatusFilter,
    ) -> Result<Self> {
        if start > end {
            return Err(ProcessingError::InvalidDateRange {
                start: start.format(KP_TIME_FORMAT).to_string(),
                end: end.format(KP_TIME_FORMAT).to_string(),
            });
        }
        Ok(Self {
            start,
            end,
            index,
            status,
        })
    }

    /// Build a request from user-supplied strings, checking each part.
    pub fn parse(start: &str, end: &str, index: &str, status: &str) -> Result<Self> {
        let start = parse_bound(start, "00:00:00")?;
        let end = parse_bound(end, "23:59:00")?;
        Self::new(start, end, index.parse()?, status.parse()?)
    }

    /// The `days` leading up to `now`
    pub fn recent(now: DateTime<Utc>, days: i64, index: GeoIndex) -> Result<Self> {
        Self::new(now - Duration::days(days), now, index, StatusFilter::All)
    }

    pub fn last_days(index: GeoIndex) -> Result<Self> {
        Self::recent(Utc::now(), KP_DEFAULT_WINDOW_DAYS, index)
    }

    pub fn url(&self) -> String {
        let mut url = format!(
            "{}?start={}&end={}&index={}",
            KP_BASE_URL,
            self.start.format(KP_TIME_FORMAT),
            self.end.format(KP_TIME_FORMAT),
            self.index
        );
        if self.index.has_status() && self.status == StatusFilter::Def {
            url.push_str("&status=def");
        }
        url
    }
}

/// Values of one index with their own timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct KpSeries {
    pub index: GeoIndex,
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Series,
    pub status: Option<Vec<String>>,
}

impl KpSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.timestamps
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .map(|(slot, (timestamp, value))| SeriesPoint {
                slot,
                timestamp: Some(*timestamp),
                value,
            })
    }

    /// Number of slots whose status is definitive
    pub fn definitive_count(&self) -> usize {
        self.status
            .as_ref()
            .map(|status| status.iter().filter(|s| s.as_str() == "def").count())
            .unwrap_or(0)
    }
}
