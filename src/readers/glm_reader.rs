use crate::error::{ProcessingError, Result};
use crate::models::{FlashGrid, GlmFile};
use crate::utils::constants::GLM_FILE_EXTENSION;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

lazy_static! {
    static ref HREF: Regex = Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap();
}

/// Reads GLM directory listings and exported flash grids
pub struct GlmReader;

impl GlmReader {
    pub fn new() -> Self {
        Self
    }

    /// Links to `.nc` files in a directory listing page, in page order
    pub fn file_links<'a>(&self, listing: &'a str) -> Vec<&'a str> {
        HREF.captures_iter(listing)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|href| href.ends_with(GLM_FILE_EXTENSION))
            .collect()
    }

    /// The last `.nc` link of the listing, resolved against `directory_url`.
    /// The listing is sorted by name, so this is the newest accumulation.
    pub fn latest_file(&self, listing: &str, directory_url: &str) -> Result<Option<GlmFile>> {
        let links = self.file_links(listing);
        debug!(files = links.len(), "scanned GLM listing");

        let Some(href) = links.last() else {
            return Ok(None);
        };

        let url = if href.contains("://") {
            href.to_string()
        } else {
            format!("{}{}", directory_url, href)
        };
        GlmFile::from_url(&url).map(Some)
    }

    /// Decode a flash grid exported as JSON with `lat`, `lon`, `flash` and
    /// `duration_flash` keys.
    pub fn parse_grid(&self, body: &str) -> Result<FlashGrid> {
        let grid: FlashGrid = serde_json::from_str(body)?;
        grid.check_shape()?;

        if grid.flash.is_empty() {
            return Err(ProcessingError::MissingData("GLM grid has no time steps".to_string()));
        }

        info!(
            steps = grid.flash.len(),
            lat = grid.lat.len(),
            lon = grid.lon.len(),
            "parsed GLM grid"
        );
        Ok(grid)
    }

    pub fn read_grid(&self, path: &Path) -> Result<FlashGrid> {
        let body = fs::read_to_string(path)?;
        self.parse_grid(&body)
    }
}

impl Default for GlmReader {
    fn default() -> Self {
        Self::new()
    }
}
