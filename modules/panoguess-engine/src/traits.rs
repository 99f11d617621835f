// Trait abstractions for the external collaborators of the game core.
//
// LocationLookup — remote metadata service returning geotagged asset ids
//   for a bounding box.
// PanoramaViewer — the street-level viewer widget: load by id, report
//   ready or fail. Must resolve at most once per load attempt.
// StatsStore — persistent lifetime counters, read once at startup and
//   written at most once per session end.
//
// These enable deterministic testing with MockLookup, MockViewer and
// MockStatsStore: no network, no filesystem.

use anyhow::Result;
use async_trait::async_trait;

use mapillary_client::MapillaryClient;
use panoguess_common::{GeoPoint, LifetimeStats, Location, Region};

// ---------------------------------------------------------------------------
// LocationLookup
// ---------------------------------------------------------------------------

#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// Fetch up to `limit` geotagged panorama candidates inside the region's
    /// bounding box. Candidates without coordinates are already filtered out.
    async fn locations_in(&self, region: &Region, limit: u32) -> Result<Vec<Location>>;
}

#[async_trait]
impl LocationLookup for MapillaryClient {
    async fn locations_in(&self, region: &Region, limit: u32) -> Result<Vec<Location>> {
        let images = self.images_in_bbox(&region.bbox, limit).await?;
        Ok(images
            .into_iter()
            .filter_map(|img| {
                let (lat, lng) = img.lat_lng()?;
                Some(Location {
                    id: img.id,
                    point: GeoPoint { lat, lng },
                    region_name: region.name.clone(),
                })
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// PanoramaViewer
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PanoramaViewer: Send + Sync {
    /// Load the panorama for an asset id; resolves once the viewer reports
    /// ready, errors on an invalid or unloadable id. The engine wraps this in
    /// a bounded timeout, so implementations may block indefinitely.
    async fn load(&self, id: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// StatsStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Read persisted lifetime stats; defaults when nothing is stored.
    async fn read(&self) -> Result<LifetimeStats>;

    /// Overwrite the persisted lifetime stats.
    async fn write(&self, stats: &LifetimeStats) -> Result<()>;
}
