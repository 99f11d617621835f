//! Per-round lifecycle: candidate selection, bounded asset loading, single
//! guess scoring, advance or end.
//!
//! The engine exclusively owns the pool, the current round and the session
//! counters, so no two rounds can ever be active at once. Abandoning the
//! engine drops any in-flight load future, which is the stale-callback
//! protection: a dropped future can never run its completion paths.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{info, warn};

use panoguess_common::{haversine_km, score_for, GeoPoint, Location};

use crate::pool::LocationPool;
use crate::session::{SessionSummary, SessionTracker};
use crate::traits::PanoramaViewer;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum viable pool size at game start.
    pub min_pool_size: usize,

    /// Bounded wait for the viewer to become ready per load attempt.
    pub asset_timeout: Duration,

    /// Minimum distance between consecutive round targets.
    pub min_round_distance_km: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_pool_size: 5,
            asset_timeout: Duration::from_secs(8),
            min_round_distance_km: 50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EngineError {
    /// The pool never reached the minimum viable size. Fatal for the session.
    #[error("not enough locations to start a game: found {found}, need {needed}")]
    InsufficientLocations { found: usize, needed: usize },

    /// A round was started from a phase that does not allow it.
    #[error("cannot start a round while {phase:?}")]
    RoundInProgress { phase: Phase },
}

/// Why a guess was not accepted. The round state is unchanged in either case;
/// the caller prompts the user instead of overwriting anything.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessRejected {
    #[error("no round is accepting guesses right now")]
    NotAcceptingGuesses,

    #[error("this round has already been scored")]
    AlreadyGuessed,
}

// ---------------------------------------------------------------------------
// Round state
// ---------------------------------------------------------------------------

/// Engine phase. One round flows `AssetLoading -> Playing -> Scored`; from
/// `Scored` the caller either starts the next round or ends the session.
/// Exhaustion during `AssetLoading` goes straight to `SessionOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AssetLoading,
    Playing,
    Scored,
    SessionOver,
}

/// One play cycle. `guess` and `result` are each populated exactly once,
/// in that order.
#[derive(Debug, Clone)]
pub struct Round {
    pub index: u32,
    pub target: Location,
    pub guess: Option<GeoPoint>,
    pub result: Option<RoundResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundResult {
    pub distance_km: f64,
    pub score: u32,
    /// Running session total including this round.
    pub session_total: u32,
}

/// Outcome of a round-start attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundStart {
    /// A panorama is ready and the round is accepting a guess.
    Started { index: u32, region_name: String },

    /// No viable candidates remain; the session is over. Carries the
    /// accumulated score so the caller can finalize.
    PoolExhausted { final_score: u32 },
}

// ---------------------------------------------------------------------------
// GameEngine
// ---------------------------------------------------------------------------

pub struct GameEngine {
    pool: LocationPool,
    viewer: Arc<dyn PanoramaViewer>,
    config: EngineConfig,
    session: SessionTracker,
    phase: Phase,
    round: Option<Round>,
    previous_target: Option<Location>,
    next_index: u32,
    rng: StdRng,
}

impl GameEngine {
    /// Gate on the minimum viable pool size before any round starts.
    pub fn new(
        pool: LocationPool,
        viewer: Arc<dyn PanoramaViewer>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        Self::with_rng(pool, viewer, config, StdRng::from_os_rng())
    }

    /// Seeded variant for deterministic tests.
    pub fn with_rng(
        pool: LocationPool,
        viewer: Arc<dyn PanoramaViewer>,
        config: EngineConfig,
        rng: StdRng,
    ) -> Result<Self, EngineError> {
        if pool.len() < config.min_pool_size {
            return Err(EngineError::InsufficientLocations {
                found: pool.len(),
                needed: config.min_pool_size,
            });
        }
        Ok(Self {
            pool,
            viewer,
            config,
            session: SessionTracker::default(),
            phase: Phase::AssetLoading,
            round: None,
            previous_target: None,
            next_index: 1,
            rng,
        })
    }

    /// Select a candidate, load its panorama, and open the round for a guess.
    ///
    /// Load failures and timeouts discard the candidate and retry with the
    /// next pick — a bounded loop, since every attempt shrinks the pool.
    /// Exhaustion ends the session instead of erroring.
    pub async fn start_round(&mut self) -> Result<RoundStart, EngineError> {
        match self.phase {
            Phase::AssetLoading | Phase::Scored => {}
            phase => return Err(EngineError::RoundInProgress { phase }),
        }
        self.phase = Phase::AssetLoading;
        self.round = None;

        loop {
            let candidate = match self.pool.pick_far_from(
                self.previous_target.as_ref(),
                self.config.min_round_distance_km,
                &mut self.rng,
            ) {
                Some(loc) => loc,
                None => {
                    info!(
                        rounds_played = self.session.rounds_played(),
                        "No locations left to play, ending session"
                    );
                    self.phase = Phase::SessionOver;
                    return Ok(RoundStart::PoolExhausted {
                        final_score: self.session.current_total(),
                    });
                }
            };

            match tokio::time::timeout(self.config.asset_timeout, self.viewer.load(&candidate.id))
                .await
            {
                Ok(Ok(())) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    info!(round = index, id = candidate.id.as_str(), "Panorama ready");
                    let region_name = candidate.region_name.clone();
                    self.previous_target = Some(candidate.clone());
                    self.round = Some(Round {
                        index,
                        target: candidate,
                        guess: None,
                        result: None,
                    });
                    self.phase = Phase::Playing;
                    return Ok(RoundStart::Started { index, region_name });
                }
                Ok(Err(e)) => {
                    warn!(
                        id = candidate.id.as_str(),
                        error = %e,
                        remaining = self.pool.len(),
                        "Panorama load failed, discarding candidate"
                    );
                }
                Err(_) => {
                    warn!(
                        id = candidate.id.as_str(),
                        timeout_secs = self.config.asset_timeout.as_secs(),
                        remaining = self.pool.len(),
                        "Panorama load timed out, discarding candidate"
                    );
                }
            }
        }
    }

    /// Score the one guess this round accepts. The guess coordinate is an
    /// explicit parameter — there is no ambient "last map click" state.
    pub fn submit_guess(&mut self, guess: GeoPoint) -> Result<RoundResult, GuessRejected> {
        if self.phase != Phase::Playing {
            return Err(if self.phase == Phase::Scored {
                GuessRejected::AlreadyGuessed
            } else {
                GuessRejected::NotAcceptingGuesses
            });
        }
        let round = self.round.as_mut().ok_or(GuessRejected::NotAcceptingGuesses)?;

        let distance_km = haversine_km(guess, round.target.point);
        let score = score_for(distance_km);
        self.session.record_round_score(score);

        let result = RoundResult {
            distance_km,
            score,
            session_total: self.session.current_total(),
        };
        round.guess = Some(guess);
        round.result = Some(result);
        self.phase = Phase::Scored;

        info!(
            round = round.index,
            distance_km,
            score,
            total = result.session_total,
            "Round scored"
        );
        Ok(result)
    }

    /// End the session, consuming the engine. No further pool or round
    /// mutation happens; merging into lifetime stats is the caller's job.
    pub fn end_session(self) -> SessionSummary {
        self.session.finalize()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The active round, if any. The target becomes interesting to callers
    /// only after scoring, when the truth marker is revealed.
    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn rounds_played(&self) -> u32 {
        self.session.rounds_played()
    }

    pub fn session_total(&self) -> u32 {
        self.session.current_total()
    }

    pub fn remaining_candidates(&self) -> usize {
        self.pool.len()
    }
}
