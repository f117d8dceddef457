use crate::models::Series;
use crate::utils::constants::{
    DST_INTENSE, DST_MODERATE, DST_VERY_INTENSE, DST_WEAK, KP_STORM_THRESHOLD,
};
use std::fmt;

/// Geomagnetic storm intensity from the hourly Dst index (nT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DstIntensity {
    Quiet,
    /// -30 to -50 nT
    Weak,
    /// -50 to -100 nT
    Moderate,
    /// -100 to -250 nT
    Intense,
    /// below -250 nT
    VeryIntense,
}

impl DstIntensity {
    pub fn classify(dst: f64) -> Self {
        if dst < DST_VERY_INTENSE {
            DstIntensity::VeryIntense
        } else if dst <= DST_INTENSE {
            DstIntensity::Intense
        } else if dst <= DST_MODERATE {
            DstIntensity::Moderate
        } else if dst <= DST_WEAK {
            DstIntensity::Weak
        } else {
            DstIntensity::Quiet
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DstIntensity::Quiet => "quiet",
            DstIntensity::Weak => "weak",
            DstIntensity::Moderate => "moderate",
            DstIntensity::Intense => "intense",
            DstIntensity::VeryIntense => "very intense",
        }
    }
}

impl fmt::Display for DstIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// NOAA G-scale level from the planetary Kp index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KpLevel {
    Quiet,
    /// G1, Kp 5
    Minor,
    /// G2, Kp 6
    Moderate,
    /// G3, Kp 7
    Strong,
    /// G4, Kp 8
    Severe,
    /// G5, Kp 9
    Extreme,
}

impl KpLevel {
    pub fn classify(kp: f64) -> Self {
        match kp.floor() as i64 {
            i64::MIN..=4 => KpLevel::Quiet,
            5 => KpLevel::Minor,
            6 => KpLevel::Moderate,
            7 => KpLevel::Strong,
            8 => KpLevel::Severe,
            _ => KpLevel::Extreme,
        }
    }

    pub fn is_storm(&self) -> bool {
        *self != KpLevel::Quiet
    }

    pub fn label(&self) -> &'static str {
        match self {
            KpLevel::Quiet => "quiet",
            KpLevel::Minor => "G1 minor",
            KpLevel::Moderate => "G2 moderate",
            KpLevel::Strong => "G3 strong",
            KpLevel::Severe => "G4 severe",
            KpLevel::Extreme => "G5 extreme",
        }
    }
}

impl fmt::Display for KpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which index a series holds, deciding how its values are banded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Dst,
    Kp,
    /// Any other index, not banded
    Other,
}

impl IndexKind {
    pub fn level_label(&self, value: f64) -> &'static str {
        match self {
            IndexKind::Dst => DstIntensity::classify(value).label(),
            IndexKind::Kp => KpLevel::classify(value).label(),
            IndexKind::Other => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStatistics {
    pub total_slots: usize,
    pub present_slots: usize,
    pub missing_slots: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Slot of the strongest disturbance: lowest Dst, highest otherwise
    pub peak_slot: Option<usize>,
    pub storm_slots: usize,
}

impl SeriesStatistics {
    pub fn missing_percentage(&self) -> f64 {
        if self.total_slots == 0 {
            return 0.0;
        }
        (self.missing_slots as f64 / self.total_slots as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        let fmt_opt = |v: Option<f64>| v.map_or("n/a".to_string(), |v| format!("{:.1}", v));
        format!(
            "Slots: {} ({} present, {} missing, {:.1}% missing)\nRange: {} to {}, mean {}\nPeak slot: {}\nStorm slots: {}",
            self.total_slots,
            self.present_slots,
            self.missing_slots,
            self.missing_percentage(),
            fmt_opt(self.min),
            fmt_opt(self.max),
            fmt_opt(self.mean),
            self.peak_slot.map_or("n/a".to_string(), |s| s.to_string()),
            self.storm_slots
        )
    }
}

pub struct StormAnalyzer {
    kind: IndexKind,
}

impl StormAnalyzer {
    pub fn new(kind: IndexKind) -> Self {
        Self { kind }
    }

    pub fn analyze(&self, series: &Series) -> SeriesStatistics {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut min_slot = None;
        let mut max_slot = None;
        let mut sum = 0.0;
        let mut storm_slots = 0;

        for (slot, value) in series.present() {
            if min.map_or(true, |m| value < m) {
                min = Some(value);
                min_slot = Some(slot);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
                max_slot = Some(slot);
            }
            sum += value;
            if self.is_storm(value) {
                storm_slots += 1;
            }
        }

        let present_slots = series.present_count();
        SeriesStatistics {
            total_slots: series.len(),
            present_slots,
            missing_slots: series.missing_count(),
            min,
            max,
            mean: (present_slots > 0).then(|| sum / present_slots as f64),
            peak_slot: match self.kind {
                IndexKind::Dst => min_slot,
                _ => max_slot,
            },
            storm_slots,
        }
    }

    fn is_storm(&self, value: f64) -> bool {
        match self.kind {
            IndexKind::Dst => DstIntensity::classify(value) != DstIntensity::Quiet,
            IndexKind::Kp => value >= KP_STORM_THRESHOLD,
            IndexKind::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dst_band_edges() {
        assert_eq!(DstIntensity::classify(-29.0), DstIntensity::Quiet);
        assert_eq!(DstIntensity::classify(-30.0), DstIntensity::Weak);
        assert_eq!(DstIntensity::classify(-50.0), DstIntensity::Moderate);
        assert_eq!(DstIntensity::classify(-100.0), DstIntensity::Intense);
        assert_eq!(DstIntensity::classify(-250.0), DstIntensity::Intense);
        assert_eq!(DstIntensity::classify(-251.0), DstIntensity::VeryIntense);
        assert_eq!(DstIntensity::classify(40.0), DstIntensity::Quiet);
    }

    #[test]
    fn test_kp_levels() {
        assert_eq!(KpLevel::classify(4.667), KpLevel::Quiet);
        assert_eq!(KpLevel::classify(5.0), KpLevel::Minor);
        assert_eq!(KpLevel::classify(8.667), KpLevel::Severe);
        assert_eq!(KpLevel::classify(9.0), KpLevel::Extreme);
        assert!(!KpLevel::classify(0.0).is_storm());
        assert!(KpLevel::classify(6.333).is_storm());
    }

    #[test]
    fn test_dst_statistics() {
        let series = Series::new(vec![Some(-10.0), None, Some(-120.0), Some(20.0), None]);
        let stats = StormAnalyzer::new(IndexKind::Dst).analyze(&series);

        assert_eq!(stats.total_slots, 5);
        assert_eq!(stats.missing_slots, 2);
        assert_eq!(stats.min, Some(-120.0));
        assert_eq!(stats.max, Some(20.0));
        assert_eq!(stats.mean, Some(-110.0 / 3.0));
        assert_eq!(stats.peak_slot, Some(2));
        assert_eq!(stats.storm_slots, 1);
        assert_eq!(stats.missing_percentage(), 40.0);
    }

    #[test]
    fn test_kp_peak_is_highest() {
        let series = Series::new(vec![Some(2.0), Some(7.333), Some(5.0)]);
        let stats = StormAnalyzer::new(IndexKind::Kp).analyze(&series);

        assert_eq!(stats.peak_slot, Some(1));
        assert_eq!(stats.storm_slots, 2);
    }

    #[test]
    fn test_all_missing() {
        let series = Series::new(vec![None, None]);
        let stats = StormAnalyzer::new(IndexKind::Dst).analyze(&series);

        assert_eq!(stats.mean, None);
        assert_eq!(stats.peak_slot, None);
        assert_eq!(stats.missing_percentage(), 100.0);
    }
}
