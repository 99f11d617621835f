use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

/// Application configuration loaded from environment variables.
///
/// `MAPILLARY_TOKEN` is the only required variable; everything else has a
/// sensible default. Loading fails (rather than panicking) so the binary can
/// show the missing-credential message before touching the network.
#[derive(Debug, Clone)]
pub struct Config {
    /// Mapillary Graph API access token.
    pub mapillary_token: String,

    /// Path to the region file (named bounding boxes).
    pub regions_path: PathBuf,

    /// Path to the persisted lifetime-stats file.
    pub stats_path: PathBuf,

    /// Minimum viable pool size; below this the game refuses to start.
    pub min_pool_size: usize,

    /// Per-region image fetch limit.
    pub fetch_limit: u32,

    /// Bounded wait for a panorama to become ready, in seconds.
    pub asset_timeout_secs: u64,

    /// Minimum distance between consecutive round targets, in kilometers.
    pub min_round_distance_km: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mapillary_token: required_env("MAPILLARY_TOKEN")?,
            regions_path: env::var("REGIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("regions.json")),
            stats_path: env::var("STATS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".panoguess_stats.json")),
            min_pool_size: parsed_env("MIN_POOL_SIZE", 5, "a positive integer")?,
            fetch_limit: parsed_env("FETCH_LIMIT", 100, "a positive integer")?,
            asset_timeout_secs: parsed_env("ASSET_TIMEOUT_SECS", 8, "a number of seconds")?,
            min_round_distance_km: parsed_env("MIN_ROUND_DISTANCE_KM", 50.0, "a distance in km")?,
        })
    }
}

fn required_env(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn parsed_env<T: FromStr>(
    key: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            var: key,
            expected,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
