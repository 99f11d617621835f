//! File-backed lifetime stats with a one-year expiry, standing in for the
//! browser cookie pair (`gamesPlayed`/`totalScore`, `expires: 365`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use panoguess_common::LifetimeStats;
use panoguess_engine::StatsStore;

/// How long a saved record stays valid.
const EXPIRY_DAYS: i64 = 365;

#[derive(Debug, Serialize, Deserialize)]
struct StatsRecord {
    #[serde(flatten)]
    stats: LifetimeStats,
    saved_at: DateTime<Utc>,
}

pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<LifetimeStats> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LifetimeStats::default())
            }
            Err(e) => return Err(e).context("reading stats file"),
        };

        // A corrupt or expired record starts the player fresh rather than
        // failing startup.
        let record: StatsRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Stats file unreadable, starting fresh");
                return Ok(LifetimeStats::default());
            }
        };
        if Utc::now() - record.saved_at > Duration::days(EXPIRY_DAYS) {
            debug!("Stats record expired, starting fresh");
            return Ok(LifetimeStats::default());
        }
        Ok(record.stats)
    }

    fn save(&self, stats: LifetimeStats) -> Result<()> {
        let record = StatsRecord { stats, saved_at: Utc::now() };
        let raw = serde_json::to_string_pretty(&record)?;
        std::fs::write(&self.path, raw).context("writing stats file")
    }
}

#[async_trait]
impl StatsStore for FileStatsStore {
    async fn read(&self) -> Result<LifetimeStats> {
        self.load()
    }

    async fn write(&self, stats: &LifetimeStats) -> Result<()> {
        self.save(*stats)
    }
}
