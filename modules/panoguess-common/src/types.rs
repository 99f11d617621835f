use serde::{Deserialize, Serialize};

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A single geotagged panorama candidate. Immutable once constructed;
/// unique by `id` within a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub point: GeoPoint,
    pub region_name: String,
}

/// A named geographic bounding box used to query candidate locations.
/// Bbox order is `[min_lng, min_lat, max_lng, max_lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub bbox: [f64; 4],
}

/// Counters that survive across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub games_played: u32,
    pub total_score: u32,
}

impl LifetimeStats {
    /// Mean session score, rounded. Zero when no games have been played.
    pub fn average_score(&self) -> u32 {
        if self.games_played == 0 {
            0
        } else {
            (self.total_score as f64 / self.games_played as f64).round() as u32
        }
    }
}

// --- Scoring ---

/// Maximum score for a perfect guess.
pub const MAX_SCORE: u32 = 5000;

/// Haversine great-circle distance between two points in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Score for a guess at the given distance from the target:
/// `max(0, 5000 - round(distance))`. Saturates to 0 at 5000 km and beyond,
/// including the infinity sentinel.
pub fn score_for(distance_km: f64) -> u32 {
    (MAX_SCORE as f64 - distance_km.round()).max(0.0) as u32
}
