use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::clients::{
    catalog::ArtworkSource,
    entities::Artwork,
    errors::Result,
};

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Downloads album art over HTTP into memory
#[derive(Debug, Clone)]
pub struct HttpArtwork {
    client: reqwest::Client,
}

impl HttpArtwork {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtworkSource for HttpArtwork {
    async fn fetch(&self, url: &str) -> Result<Artwork> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("image/"))
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes of artwork from {url}", bytes.len());
        Ok(Artwork::new(content_type, bytes.to_vec()))
    }
}
