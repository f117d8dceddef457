use crate::error::{ProcessingError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Ordered samples, one per sub-period slot. Missing samples stay in place
/// so that a slot index always maps to the same point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn push(&mut self, value: Option<f64>) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.values.get(slot).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<f64>> {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }

    /// Present values with their slot index
    pub fn present(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.map(|v| (slot, v)))
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    pub fn present_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// Slots without a time anchor
    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.iter().enumerate().map(|(slot, value)| SeriesPoint {
            slot,
            timestamp: None,
            value,
        })
    }

    /// Flatten to plain floats with `NaN` in the gaps, the form most plotting
    /// layers accept.
    pub fn to_nan_vec(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }
}

impl Extend<Option<f64>> for Series {
    fn extend<I: IntoIterator<Item = Option<f64>>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::new(values)
    }
}

/// One slot of a time-anchored series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub slot: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub value: Option<f64>,
}

/// A series whose slots are evenly spaced from a start instant.
///
/// Every slot up to and including [`TimedSeries::end`] is checked to have a
/// representable timestamp when the series is built.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSeries {
    series: Series,
    start: DateTime<Utc>,
    step: Duration,
    end: DateTime<Utc>,
}

impl TimedSeries {
    pub fn new(series: Series, start: DateTime<Utc>, step: Duration) -> Result<Self> {
        let end = offset(start, step, series.len()).ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "{} slots of {}s from {} run past the supported time range",
                series.len(),
                step.num_seconds(),
                start
            ))
        })?;

        Ok(Self {
            series,
            start,
            step,
            end,
        })
    }

    pub fn hourly(series: Series, start: DateTime<Utc>) -> Result<Self> {
        Self::new(series, start, Duration::hours(1))
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// `None` only for slots far past the end of the series
    pub fn timestamp_at(&self, slot: usize) -> Option<DateTime<Utc>> {
        offset(self.start, self.step, slot)
    }

    /// Start of the slot after the last one
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.series
            .iter()
            .enumerate()
            .map(move |(slot, value)| SeriesPoint {
                slot,
                timestamp: self.timestamp_at(slot),
                value,
            })
    }
}

fn offset(start: DateTime<Utc>, step: Duration, slot: usize) -> Option<DateTime<Utc>> {
    let slot = i32::try_from(slot).ok()?;
    start.checked_add_signed(step.checked_mul(slot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_slots_keep_position() {
        let series = Series::new(vec![Some(5.0), None, Some(-10.0), None]);

        assert_eq!(series.len(), 4);
        assert_eq!(series.missing_count(), 2);
        assert_eq!(series.present_count(), 2);
        assert_eq!(series.get(2), Some(-10.0));
        assert_eq!(series.get(1), None);
        assert_eq!(
            series.present().collect::<Vec<_>>(),
            vec![(0, 5.0), (2, -10.0)]
        );
    }

    #[test]
    fn test_nan_vec() {
        let series: Series = vec![Some(1.0), None].into();
        let flat = series.to_nan_vec();

        assert_eq!(flat[0], 1.0);
        assert!(flat[1].is_nan());
    }

    #[test]
    fn test_hourly_timestamps() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let timed = TimedSeries::hourly(Series::new(vec![Some(1.0); 48]), start).unwrap();

        assert_eq!(
            timed.timestamp_at(25),
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 1, 0, 0).unwrap())
        );
        assert_eq!(timed.end(), Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap());

        let points: Vec<_> = timed.points().collect();
        assert_eq!(points.len(), 48);
        assert_eq!(points[47].slot, 47);
        assert!(points.iter().all(|p| p.timestamp.is_some()));
    }

    #[test]
    fn test_slot_offsets_do_not_wrap() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let hourly = TimedSeries::hourly(Series::new(vec![Some(1.0); 2]), start).unwrap();
        assert_eq!(hourly.timestamp_at(i32::MAX as usize + 1), None);

        // 100M days lands past the last representable year
        let daily = TimedSeries::new(Series::new(vec![Some(1.0); 2]), start, Duration::days(1)).unwrap();
        assert_eq!(daily.timestamp_at(100_000_000), None);
        assert!(daily.timestamp_at(1).is_some());
    }

    #[test]
    fn test_unrepresentable_span_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let result = TimedSeries::new(Series::new(vec![None; 4]), start, Duration::days(100_000_000));

        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }
}
