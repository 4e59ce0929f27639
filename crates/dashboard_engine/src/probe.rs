use std::io::Cursor;

use dashboard_core::ImageDimensions;
use dashboard_logging::dash_debug;
use futures_util::future::join_all;
use image::ImageReader;
use url::Url;

use crate::client::{build_client, get_bytes};
use crate::{ClientError, ClientSettings, FailureKind};

/// Reads image dimensions from downloaded image headers.
#[derive(Debug, Clone)]
pub struct ImageProber {
    client: reqwest::Client,
    max_bytes: u64,
}

impl ImageProber {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(settings)?,
            max_bytes: settings.max_bytes,
        })
    }

    pub async fn probe(&self, url: &str) -> Result<ImageDimensions, ClientError> {
        let parsed =
            Url::parse(url).map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let bytes = get_bytes(&self.client, parsed, self.max_bytes).await?;
        dimensions_of(&bytes)
    }

    /// Probes every URL concurrently; failures become `None`.
    pub async fn probe_all(&self, urls: Vec<String>) -> Vec<(String, Option<ImageDimensions>)> {
        let probes = urls.iter().map(|url| self.probe(url));
        let results = join_all(probes).await;
        urls.into_iter()
            .zip(results)
            .map(|(url, result)| {
                let dimensions = result
                    .inspect_err(|err| dash_debug!("probe of {url} failed: {err}"))
                    .ok();
                (url, dimensions)
            })
            .collect()
    }
}

pub fn dimensions_of(bytes: &[u8]) -> Result<ImageDimensions, ClientError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?
        .into_dimensions()
        .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
    Ok(ImageDimensions { width, height })
}
