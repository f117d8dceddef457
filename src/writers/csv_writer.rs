use crate::analyzers::IndexKind;
use crate::error::Result;
use crate::models::{FlashPoint, SeriesPoint};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct CsvRow<'a> {
    slot: usize,
    timestamp: Option<String>,
    value: Option<f64>,
    level: Option<&'a str>,
}

/// Writes series points as `slot,timestamp,value,level` rows.
/// Missing values are written as empty cells.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_points(&self, points: &[SeriesPoint], kind: IndexKind, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(points, kind, file)?;
        info!(path = %path.display(), rows = points.len(), "wrote csv series");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, points: &[SeriesPoint], kind: IndexKind, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        for point in points {
            writer.serialize(CsvRow {
                slot: point.slot,
                timestamp: point.timestamp.map(|t| t.to_rfc3339()),
                value: point.value,
                level: point.value.map(|v| kind.level_label(v)),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes flash points as `time_step,lat,lon,flashes,duration` rows
    pub fn write_flashes(&self, flashes: &[FlashPoint], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for flash in flashes {
            writer.serialize(flash)?;
        }
        writer.flush()?;
        info!(path = %path.display(), rows = flashes.len(), "wrote csv flash points");
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
