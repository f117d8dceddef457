use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    GLM_BASE_URL, GLM_LAT_MAX, GLM_LAT_MIN, GLM_LOCAL_OFFSET_HOURS, GLM_LON_MAX, GLM_LON_MIN,
    GLM_TIMESTAMP_END, GLM_TIMESTAMP_FORMAT, GLM_TIMESTAMP_START,
};

/// Directory listing the GLM accumulation files of one month
pub fn glm_directory_url(year: i32, month: u32) -> String {
    format!("{}/{}/{:02}/", GLM_BASE_URL, year, month)
}

/// Observation time encoded in a GLM file name, e.g.
/// `S11232290_202405101230.nc` -> 2024-05-10 12:30 UTC
pub fn parse_glm_timestamp(file_name: &str) -> Result<DateTime<Utc>> {
    let stamp = file_name
        .get(GLM_TIMESTAMP_START..GLM_TIMESTAMP_END)
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("GLM file name too short: {}", file_name))
        })?;

    NaiveDateTime::parse_from_str(stamp, GLM_TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| {
            ProcessingError::InvalidFormat(format!(
                "No {} timestamp in GLM file name: {}",
                GLM_TIMESTAMP_FORMAT, file_name
            ))
        })
}

/// One published GLM accumulation file
#[derive(Debug, Clone, PartialEq)]
pub struct GlmFile {
    pub url: String,
    pub name: String,
    pub observed: DateTime<Utc>,
}

impl GlmFile {
    pub fn from_url(url: &str) -> Result<Self> {
        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        let observed = parse_glm_timestamp(&name)?;

        Ok(Self {
            url: url.to_string(),
            name,
            observed,
        })
    }

    pub fn local_time(&self) -> Result<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(GLM_LOCAL_OFFSET_HOURS * 3600).ok_or_else(|| {
            ProcessingError::Config(format!("Invalid UTC offset: {}h", GLM_LOCAL_OFFSET_HOURS))
        })?;
        Ok(self.observed.with_timezone(&offset))
    }
}

/// Inclusive latitude/longitude window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self> {
        if !(lat_min <= lat_max && lon_min <= lon_max) {
            return Err(ProcessingError::Config(format!(
                "Empty bounding box: lat {}..{}, lon {}..{}",
                lat_min, lat_max, lon_min, lon_max
            )));
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    pub fn peru() -> Self {
        Self {
            lat_min: GLM_LAT_MIN,
            lat_max: GLM_LAT_MAX,
            lon_min: GLM_LON_MIN,
            lon_max: GLM_LON_MAX,
        }
    }

    pub fn contains_lat(&self, lat: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max
    }

    pub fn contains_lon(&self, lon: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.contains_lat(lat) && self.contains_lon(lon)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::peru()
    }
}

/// A grid cell with at least one flash in it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlashPoint {
    pub time_step: usize,
    pub lat: f64,
    pub lon: f64,
    pub flashes: f64,
    /// Accumulated flash duration in seconds
    pub duration: f64,
}

/// Accumulated GLM grids, indexed `[time][lat][lon]` on the `lat`/`lon` axes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlashGrid {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub flash: Vec<Vec<Vec<f64>>>,
    pub duration_flash: Vec<Vec<Vec<f64>>>,
}

impl FlashGrid {
    /// Both grids must match the axes in every dimension
    pub fn check_shape(&self) -> Result<()> {
        if self.flash.len() != self.duration_flash.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "flash has {} time steps, duration_flash has {}",
                self.flash.len(),
                self.duration_flash.len()
            )));
        }

        for (name, grid) in [("flash", &self.flash), ("duration_flash", &self.duration_flash)] {
            for (t, rows) in grid.iter().enumerate() {
                if rows.len() != self.lat.len() || rows.iter().any(|row| row.len() != self.lon.len()) {
                    return Err(ProcessingError::InvalidFormat(format!(
                        "{} step {} does not match the {}x{} lat/lon axes",
                        name,
                        t,
                        self.lat.len(),
                        self.lon.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Cells inside `bbox` with a positive flash count, in time, latitude,
    /// longitude order.
    pub fn flashes_within(&self, bbox: &BoundingBox) -> Result<Vec<FlashPoint>> {
        self.check_shape()?;

        let lat_inds: Vec<usize> = (0..self.lat.len())
            .filter(|&i| bbox.contains_lat(self.lat[i]))
            .collect();
        let lon_inds: Vec<usize> = (0..self.lon.len())
            .filter(|&j| bbox.contains_lon(self.lon[j]))
            .collect();

        let mut points = Vec::new();
        for (t, (flash, duration)) in self.flash.iter().zip(&self.duration_flash).enumerate() {
            for &i in &lat_inds {
                for &j in &lon_inds {
                    let flashes = flash[i][j];
                    if flashes > 0.0 {
                        points.push(FlashPoint {
                            time_step: t,
                            lat: self.lat[i],
                            lon: self.lon[j],
                            flashes,
                            duration: duration[i][j],
                        });
                    }
                }
            }
        }
        Ok(points)
    }
}
