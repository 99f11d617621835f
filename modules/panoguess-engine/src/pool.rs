//! Candidate-location pool for one game session.
//!
//! The pool is built once at game start, shrinks as candidates are consumed
//! or discarded, and is never regrown. No two elements share an id.

use rand::seq::SliceRandom;
use rand::Rng;

use panoguess_common::{haversine_km, Location};

#[derive(Debug, Clone, Default)]
pub struct LocationPool {
    locations: Vec<Location>,
}

impl LocationPool {
    /// Build a pool from raw lookup results, keeping one instance per id.
    /// Later entries win, matching insertion-overwrite map semantics.
    pub fn dedupe(locations: Vec<Location>) -> Self {
        let mut unique: Vec<Location> = Vec::with_capacity(locations.len());
        for loc in locations {
            if let Some(existing) = unique.iter_mut().find(|l| l.id == loc.id) {
                *existing = loc;
            } else {
                unique.push(loc);
            }
        }
        Self { locations: unique }
    }

    /// Uniformly random permutation of the remaining candidates.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.locations.shuffle(rng);
    }

    /// Pick one candidate at least `min_distance_km` from `previous`, in a
    /// freshly randomized order so qualifying candidates are equally likely.
    /// Falls back to the first post-shuffle candidate when nothing qualifies
    /// (including `previous = None`, which qualifies everything). The chosen
    /// candidate is removed from the pool. Returns `None` only on exhaustion.
    pub fn pick_far_from(
        &mut self,
        previous: Option<&Location>,
        min_distance_km: f64,
        rng: &mut impl Rng,
    ) -> Option<Location> {
        if self.locations.is_empty() {
            return None;
        }

        let mut order: Vec<usize> = (0..self.locations.len()).collect();
        order.shuffle(rng);

        let chosen = order
            .iter()
            .copied()
            .find(|&i| distance_from_previous(previous, &self.locations[i]) >= min_distance_km)
            .unwrap_or(order[0]);

        Some(self.locations.swap_remove(chosen))
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Remaining candidate ids, for inspection in tests and logs.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|l| l.id.as_str())
    }
}

/// Distance from the previous round's target, with `+inf` standing in for
/// "no prior round" so every candidate trivially qualifies.
pub fn distance_from_previous(previous: Option<&Location>, candidate: &Location) -> f64 {
    match previous {
        Some(prev) => haversine_km(prev.point, candidate.point),
        None => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::loc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn dedupe_keeps_one_instance_per_id() {
        let pool = LocationPool::dedupe(vec![
            loc("a", 0.0, 0.0, "X"),
            loc("b", 10.0, 10.0, "Y"),
            loc("a", 5.0, 5.0, "Z"),
        ]);
        assert_eq!(pool.len(), 2);
        let ids: BTreeSet<&str> = pool.ids().collect();
        assert_eq!(ids, BTreeSet::from(["a", "b"]));
    }

    #[test]
    fn dedupe_last_seen_wins() {
        let pool = LocationPool::dedupe(vec![
            loc("a", 0.0, 0.0, "X"),
            loc("a", 5.0, 5.0, "Z"),
        ]);
        assert_eq!(pool.locations[0].region_name, "Z");
    }

    #[test]
    fn dedupe_is_idempotent() {
        let pool = LocationPool::dedupe(vec![
            loc("a", 0.0, 0.0, "X"),
            loc("b", 10.0, 10.0, "Y"),
            loc("a", 5.0, 5.0, "Z"),
        ]);
        let again = LocationPool::dedupe(pool.locations.clone());
        assert_eq!(again.locations, pool.locations);
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let original = vec![
            loc("a", 0.0, 0.0, "X"),
            loc("b", 10.0, 10.0, "Y"),
            loc("c", 20.0, 20.0, "Z"),
            loc("d", 30.0, 30.0, "W"),
        ];
        let mut pool = LocationPool::dedupe(original.clone());
        pool.shuffle(&mut rng());
        assert_eq!(pool.len(), original.len());
        let before: BTreeSet<String> = original.iter().map(|l| l.id.clone()).collect();
        let after: BTreeSet<String> = pool.ids().map(str::to_string).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn pick_honors_min_distance_when_satisfiable() {
        // "near" is ~1.6 km from prev, "far" is ~1568 km — over many draws
        // only "far" may come out.
        let prev = loc("prev", 0.0, 0.0, "P");
        for seed in 0..50 {
            let mut pool = LocationPool::dedupe(vec![
                loc("near", 0.01, 0.01, "X"),
                loc("far", 10.0, 10.0, "Y"),
            ]);
            let mut r = StdRng::seed_from_u64(seed);
            let picked = pool.pick_far_from(Some(&prev), 50.0, &mut r).unwrap();
            assert_eq!(picked.id, "far", "seed {seed} picked a too-close candidate");
            assert_eq!(pool.len(), 1);
        }
    }

    #[test]
    fn pick_falls_back_when_nothing_qualifies() {
        let prev = loc("prev", 0.0, 0.0, "P");
        let mut pool = LocationPool::dedupe(vec![
            loc("near1", 0.01, 0.01, "X"),
            loc("near2", 0.02, 0.02, "Y"),
        ]);
        let picked = pool.pick_far_from(Some(&prev), 50.0, &mut rng());
        assert!(picked.is_some());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pick_without_previous_returns_any_candidate() {
        let mut pool = LocationPool::dedupe(vec![
            loc("a", 0.0, 0.0, "X"),
            loc("b", 10.0, 10.0, "Y"),
        ]);
        let picked = pool.pick_far_from(None, 50.0, &mut rng()).unwrap();
        assert!(picked.id == "a" || picked.id == "b");
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pick_signals_exhaustion_on_empty_pool() {
        let mut pool = LocationPool::default();
        assert!(pool.pick_far_from(None, 50.0, &mut rng()).is_none());
    }

    #[test]
    fn distance_sentinel_for_missing_previous() {
        let candidate = loc("a", 0.0, 0.0, "X");
        assert_eq!(distance_from_previous(None, &candidate), f64::INFINITY);
    }
}
