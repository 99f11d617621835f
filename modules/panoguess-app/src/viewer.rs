//! Terminal stand-in for the panorama viewer widget: a load attempt probes
//! the image id against the Graph API and surfaces the preview URL. Ready
//! means the id resolved; an unknown id errors, which the engine treats as
//! a discard-and-retry.

use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;

use mapillary_client::MapillaryClient;
use panoguess_engine::PanoramaViewer;

pub struct PanoProbe {
    client: MapillaryClient,
    /// Preview URL of the most recently loaded panorama.
    current_url: Mutex<Option<String>>,
}

impl PanoProbe {
    pub fn new(client: MapillaryClient) -> Self {
        Self {
            client,
            current_url: Mutex::new(None),
        }
    }

    pub fn current_url(&self) -> Option<String> {
        self.current_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl PanoramaViewer for PanoProbe {
    async fn load(&self, id: &str) -> Result<()> {
        let meta = self
            .client
            .image_meta(id)
            .await
            .with_context(|| format!("image {id} did not resolve"))?;
        *self.current_url.lock().unwrap() = meta.thumb_1024_url;
        Ok(())
    }
}
