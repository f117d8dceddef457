//! Fetches raw feed bodies over HTTP.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::HTTP_TIMEOUT_SECS;
use crate::utils::progress::ProgressReporter;

fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?)
}

/// Downloads the body at `url`, failing on any non-success status.
pub async fn fetch_bytes(url: &str, progress: Option<&ProgressReporter>) -> Result<Vec<u8>> {
    info!(%url, "fetching feed");
    if let Some(progress) = progress {
        progress.set_message(&format!("Downloading {}", url));
    }

    let response = client()?.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;

    debug!(bytes = body.len(), "feed downloaded");
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ProcessingError::EmptyFeed(url.to_string()));
    }

    Ok(body.to_vec())
}

pub async fn fetch_text(url: &str, progress: Option<&ProgressReporter>) -> Result<String> {
    let body = fetch_bytes(url, progress).await?;
    String::from_utf8(body).map_err(|e| ProcessingError::Decode(format!("Invalid UTF-8: {}", e)))
}

/// Downloads `url` and keeps a copy of the raw body at `file_path`.
pub async fn fetch_to_file(
    url: &str,
    file_path: &Path,
    progress: Option<&ProgressReporter>,
) -> Result<Vec<u8>> {
    let body = fetch_bytes(url, progress).await?;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, &body)?;
    info!(path = %file_path.display(), "saved raw feed");
    Ok(body)
}
