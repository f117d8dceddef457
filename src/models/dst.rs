use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DST_AVAILABLE_FROM_DAY, DST_BASE_URL, DST_HOURS_PER_DAY};

/// One monthly Dst feed of the Kyoto real-time service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstMonth {
    pub year: i32,
    pub month: u32,
}

impl DstMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ProcessingError::InvalidDate {
                value: format!("{}-{:02}", year, month),
            });
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// `YYMM` as used by the feed in its file names and record identifiers
    pub fn short_code(&self) -> String {
        format!("{:02}{:02}", self.year.rem_euclid(100), self.month)
    }

    pub fn file_name(&self) -> String {
        format!("dst{}.for.request", self.short_code())
    }

    pub fn url(&self) -> String {
        format!(
            "{}/{}{:02}/{}",
            DST_BASE_URL,
            self.year,
            self.month,
            self.file_name()
        )
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated in the constructor; from_date always yields a real month
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .map(|next| (next - self.first_day()).num_days() as u32)
            .unwrap_or(31)
    }

    /// Hourly slots for a complete month
    pub fn expected_slots(&self) -> usize {
        self.days_in_month() as usize * DST_HOURS_PER_DAY
    }

    /// Start of the first hourly slot (00:00 UT on day one)
    pub fn start(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.first_day().and_time(chrono::NaiveTime::MIN))
    }

    /// The service only publishes a month once a few days of it have passed.
    pub fn check_available(&self, today: NaiveDate) -> Result<()> {
        if Self::from_date(today) == *self && today.day() < DST_AVAILABLE_FROM_DAY {
            return Err(ProcessingError::DataNotYetAvailable {
                year: self.year,
                month: self.month,
                available_from: DST_AVAILABLE_FROM_DAY,
            });
        }
        Ok(())
    }

    /// Month name for chart titles
    pub fn label(&self) -> String {
        format!("{} {}", self.first_day().format("%B"), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url() {
        let month = DstMonth::new(2024, 5).unwrap();

        assert_eq!(month.file_name(), "dst2405.for.request");
        assert_eq!(
            month.url(),
            "https://wdc.kugi.kyoto-u.ac.jp/dst_realtime/202405/dst2405.for.request"
        );
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            DstMonth::new(2024, 13),
            Err(ProcessingError::InvalidDate { .. })
        ));
        assert!(DstMonth::new(2024, 0).is_err());
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(DstMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(DstMonth::new(2023, 2).unwrap().expected_slots(), 28 * 24);
        assert_eq!(DstMonth::new(2023, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn test_availability() {
        let month = DstMonth::new(2024, 5).unwrap();

        let early = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        assert!(matches!(
            month.check_available(early),
            Err(ProcessingError::DataNotYetAvailable { .. })
        ));

        let later = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        assert!(month.check_available(later).is_ok());

        // Past months are always complete
        let next_month = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(month.check_available(next_month).is_ok());
    }

    #[test]
    fn test_start_and_label() {
        let month = DstMonth::new(2024, 5).unwrap();

        assert_eq!(month.start().to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(month.label(), "May 2024");
    }
}
