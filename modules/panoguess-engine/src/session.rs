//! Session counters and the lifetime-stats merge.

use panoguess_common::LifetimeStats;

/// Running totals for one game session.
#[derive(Debug, Default)]
pub struct SessionTracker {
    rounds_played: u32,
    cumulative_score: u32,
}

impl SessionTracker {
    /// Record one scored round. Called exactly once per round.
    pub fn record_round_score(&mut self, score: u32) {
        self.rounds_played += 1;
        self.cumulative_score += score;
    }

    pub fn current_total(&self) -> u32 {
        self.cumulative_score
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn finalize(self) -> SessionSummary {
        SessionSummary {
            rounds_played: self.rounds_played,
            cumulative_score: self.cumulative_score,
            should_persist: self.cumulative_score > 0,
        }
    }
}

/// Final report handed to the caller when a session ends. Sessions that never
/// scored a point leave the lifetime stats untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds_played: u32,
    pub cumulative_score: u32,
    pub should_persist: bool,
}

impl SessionSummary {
    /// Merge this session into the lifetime counters: one game played, the
    /// whole session's score added. No-op when `should_persist` is false.
    /// Returns whether anything changed.
    pub fn apply_to(&self, stats: &mut LifetimeStats) -> bool {
        if !self.should_persist {
            return false;
        }
        stats.games_played += 1;
        stats.total_score += self.cumulative_score;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_scores_and_rounds() {
        let mut session = SessionTracker::default();
        session.record_round_score(4656);
        session.record_round_score(0);
        assert_eq!(session.current_total(), 4656);
        assert_eq!(session.rounds_played(), 2);

        let summary = session.finalize();
        assert_eq!(summary.cumulative_score, 4656);
        assert_eq!(summary.rounds_played, 2);
        assert!(summary.should_persist);
    }

    #[test]
    fn merge_adds_one_game_and_session_total() {
        let mut session = SessionTracker::default();
        session.record_round_score(4656);
        session.record_round_score(0);

        let mut stats = LifetimeStats { games_played: 2, total_score: 7000 };
        assert!(session.finalize().apply_to(&mut stats));
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.total_score, 11_656);
    }

    #[test]
    fn zero_score_session_does_not_persist() {
        let mut session = SessionTracker::default();
        session.record_round_score(0);

        let summary = session.finalize();
        assert!(!summary.should_persist);

        let mut stats = LifetimeStats { games_played: 2, total_score: 7000 };
        assert!(!summary.apply_to(&mut stats));
        assert_eq!(stats, LifetimeStats { games_played: 2, total_score: 7000 });
    }

    #[test]
    fn empty_session_does_not_persist() {
        let summary = SessionTracker::default().finalize();
        assert!(!summary.should_persist);
        assert_eq!(summary.rounds_played, 0);
    }
}
