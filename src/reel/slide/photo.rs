use std::time::Duration;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::reel::error::{ReelError, ReelResult};
use crate::reel::request::ImageSource;

/// Loads product photos from disk or over HTTP. A fetch that does not come
/// back 2xx fails the whole render.
pub struct PhotoFetcher {
    client: reqwest::blocking::Client,
}

impl PhotoFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for photo fetching")?;
        Ok(Self { client })
    }

    pub fn load(&self, source: &ImageSource) -> ReelResult<RgbaImage> {
        match source {
            ImageSource::Local(path) => {
                if !path.is_file() {
                    return Err(ReelError::ImageNotFound(path.clone()));
                }
                let decoded = image::open(path)
                    .with_context(|| format!("Failed to decode photo {}", path.display()))?;
                Ok(decoded.to_rgba8())
            }
            ImageSource::Remote(url) => {
                let response = self.client.get(url).send().map_err(|e| {
                    ReelError::ImageFetch {
                        url: url.clone(),
                        reason: e.to_string(),
                    }
                })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ReelError::ImageFetch {
                        url: url.clone(),
                        reason: format!("HTTP {status}"),
                    });
                }
                let bytes = response.bytes().map_err(|e| ReelError::ImageFetch {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
                let decoded = image::load_from_memory(&bytes)
                    .with_context(|| format!("Failed to decode fetched photo {url}"))?;
                Ok(decoded.to_rgba8())
            }
        }
    }
}
