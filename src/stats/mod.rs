//! Session analytics computed from the roster and the stored round history.
//!
//! Every view is a pure function over `(roster, rounds)`; nothing here
//! mutates or caches state. Views are keyed by player id and carry the
//! display name resolved from the roster at computation time.

pub mod calculators;
pub mod models;

pub use calculators::{
    average_points, cumulative_totals, partnership_performance, running_totals,
    session_overview, solo_stats, standings, streaks, team_dominance, win_rates,
};
pub use models::*;

use crate::scoring::{Player, RoundRecord};

/// Partnership eligibility and list lengths.
pub mod partnership_limits {
    /// Shared team-split rounds a pair needs before it is ranked
    pub const MIN_SHARED_ROUNDS: u32 = 2;
    /// Length of the best and worst lists
    pub const LIST_LEN: usize = 3;
}

/// Percentage helper shared by the rate views; zero when there is nothing to divide by.
pub(crate) fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

impl SessionStatistics {
    /// Runs every view over the same history.
    pub fn compute(roster: &[Player], rounds: &[RoundRecord]) -> Self {
        Self {
            overview: session_overview(rounds),
            standings: standings(roster, rounds),
            win_rates: win_rates(roster, rounds),
            solo: solo_stats(roster, rounds),
            streaks: streaks(roster, rounds),
            partnerships: partnership_performance(roster, rounds),
            team_dominance: team_dominance(rounds),
            average_points: average_points(rounds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score_round, RoundOutcome};

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn compute_on_empty_history_is_all_zero() {
        let roster: Vec<Player> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Player::with_id(*id, *id))
            .collect();

        let stats = SessionStatistics::compute(&roster, &[]);

        assert_eq!(stats.overview.rounds_played, 0);
        assert!(stats.standings.iter().all(|s| s.total == 0));
        assert!(stats.win_rates.iter().all(|w| w.win_rate == 0.0));
        assert!(stats.partnerships.best.is_empty());
        assert_eq!(stats.team_dominance.leader, Dominance::Balanced);
        assert_eq!(stats.average_points.normal, 0.0);
    }

    #[test]
    fn compute_reflects_recorded_rounds() {
        let roster: Vec<Player> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Player::with_id(*id, id.to_uppercase()))
            .collect();
        let outcome = RoundOutcome::new(["a", "b"], 3);
        let scored = score_round(&roster, &outcome).unwrap();
        let rounds = vec![RoundRecord::new(1, &outcome, scored)];

        let stats = SessionStatistics::compute(&roster, &rounds);

        assert_eq!(stats.overview.rounds_played, 1);
        assert_eq!(stats.standings[0].name, "A");
        assert_eq!(stats.standings[0].total, 3);
        assert_eq!(stats.team_dominance.total, 1);
    }
}
