// Test mocks for the game core.
//
// Three mocks matching the three trait boundaries:
// - MockLookup (LocationLookup) — HashMap-based region→locations
// - MockViewer (PanoramaViewer) — per-id ready/fail/hang behavior
// - MockStatsStore (StatsStore) — in-memory LifetimeStats with a write log
//
// Plus helpers for constructing Location and Region values.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use panoguess_common::{GeoPoint, LifetimeStats, Location, Region};

use crate::traits::{LocationLookup, PanoramaViewer, StatsStore};

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

/// Paris, France coordinates.
pub const PARIS: (f64, f64) = (48.8566, 2.3522);
/// London, UK coordinates.
pub const LONDON: (f64, f64) = (51.5074, -0.1278);

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

pub fn loc(id: &str, lat: f64, lng: f64, region_name: &str) -> Location {
    Location {
        id: id.to_string(),
        point: GeoPoint { lat, lng },
        region_name: region_name.to_string(),
    }
}

/// A region with a throwaway bounding box; mocks key on the name only.
pub fn region(name: &str) -> Region {
    Region {
        name: name.to_string(),
        bbox: [0.0, 0.0, 1.0, 1.0],
    }
}

// ---------------------------------------------------------------------------
// MockLookup
// ---------------------------------------------------------------------------

/// HashMap-based location lookup. Returns `Err` for unregistered regions.
/// Builder pattern: `.on_region()`, `.failing_region()`.
pub struct MockLookup {
    regions: HashMap<String, Vec<Location>>,
    failing: Vec<String>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self {
            regions: HashMap::new(),
            failing: Vec::new(),
        }
    }

    pub fn on_region(mut self, name: &str, locations: Vec<Location>) -> Self {
        self.regions.insert(name.to_string(), locations);
        self
    }

    pub fn failing_region(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationLookup for MockLookup {
    async fn locations_in(&self, region: &Region, _limit: u32) -> Result<Vec<Location>> {
        if self.failing.contains(&region.name) {
            return Err(anyhow!("MockLookup: simulated fetch failure for {}", region.name));
        }
        self.regions
            .get(&region.name)
            .cloned()
            .ok_or_else(|| anyhow!("MockLookup: no locations registered for {}", region.name))
    }
}

// ---------------------------------------------------------------------------
// MockViewer
// ---------------------------------------------------------------------------

enum LoadBehavior {
    Ready,
    Fail,
    /// Never resolves — exercises the engine's bounded timeout.
    Hang,
}

/// Per-id viewer behavior with a log of attempted loads.
/// Builder pattern: `.ready()`, `.failing()`, `.hanging()`.
pub struct MockViewer {
    behaviors: HashMap<String, LoadBehavior>,
    loads: Mutex<Vec<String>>,
}

impl MockViewer {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            loads: Mutex::new(Vec::new()),
        }
    }

    pub fn ready(mut self, id: &str) -> Self {
        self.behaviors.insert(id.to_string(), LoadBehavior::Ready);
        self
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.behaviors.insert(id.to_string(), LoadBehavior::Fail);
        self
    }

    pub fn hanging(mut self, id: &str) -> Self {
        self.behaviors.insert(id.to_string(), LoadBehavior::Hang);
        self
    }

    /// Ids the engine attempted to load, in order.
    pub fn load_attempts(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }
}

impl Default for MockViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PanoramaViewer for MockViewer {
    async fn load(&self, id: &str) -> Result<()> {
        self.loads.lock().unwrap().push(id.to_string());
        match self.behaviors.get(id) {
            Some(LoadBehavior::Ready) => Ok(()),
            Some(LoadBehavior::Fail) => Err(anyhow!("MockViewer: load failure for {id}")),
            Some(LoadBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(anyhow!("MockViewer: no behavior registered for {id}")),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStatsStore
// ---------------------------------------------------------------------------

/// In-memory stats store recording every write.
pub struct MockStatsStore {
    stats: Mutex<LifetimeStats>,
    writes: Mutex<Vec<LifetimeStats>>,
}

impl MockStatsStore {
    pub fn new(initial: LifetimeStats) -> Self {
        Self {
            stats: Mutex::new(initial),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<LifetimeStats> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsStore for MockStatsStore {
    async fn read(&self) -> Result<LifetimeStats> {
        Ok(*self.stats.lock().unwrap())
    }

    async fn write(&self, stats: &LifetimeStats) -> Result<()> {
        *self.stats.lock().unwrap() = *stats;
        self.writes.lock().unwrap().push(*stats);
        Ok(())
    }
}
