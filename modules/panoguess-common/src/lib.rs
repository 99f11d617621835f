pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{
    haversine_km, score_for, GeoPoint, LifetimeStats, Location, Region, MAX_SCORE,
};
