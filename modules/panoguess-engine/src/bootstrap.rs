//! Pool construction at game start: fan out one lookup per region, tolerate
//! per-region failures, dedupe, and gate on the minimum viable pool size.

use futures::future::join_all;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use panoguess_common::Region;

use crate::pool::LocationPool;
use crate::round::EngineError;
use crate::traits::LocationLookup;

/// Fetch candidates for every region and assemble the session pool.
///
/// All region lookups run concurrently and are awaited collectively — one
/// region failing (network error, empty coverage, bad bbox) is logged and
/// skipped without aborting the others. Fails only when the surviving pool
/// is below `min_pool_size`.
pub async fn build_pool(
    lookup: &dyn LocationLookup,
    regions: &[Region],
    fetch_limit: u32,
    min_pool_size: usize,
    rng: &mut impl Rng,
) -> Result<LocationPool, EngineError> {
    let mut order: Vec<&Region> = regions.iter().collect();
    order.shuffle(rng);

    let fetches = order
        .iter()
        .map(|&region| async move { (region, lookup.locations_in(region, fetch_limit).await) });
    let results = join_all(fetches).await;

    let mut all = Vec::new();
    for (region, result) in results {
        match result {
            Ok(locations) => {
                debug!(
                    region = region.name.as_str(),
                    count = locations.len(),
                    "Region lookup complete"
                );
                all.extend(locations);
            }
            Err(e) => {
                warn!(
                    region = region.name.as_str(),
                    error = %e,
                    "Region lookup failed, skipping"
                );
            }
        }
    }

    let mut pool = LocationPool::dedupe(all);
    if pool.len() < min_pool_size {
        return Err(EngineError::InsufficientLocations {
            found: pool.len(),
            needed: min_pool_size,
        });
    }

    pool.shuffle(rng);
    info!(candidates = pool.len(), regions = regions.len(), "Location pool ready");
    Ok(pool)
}
