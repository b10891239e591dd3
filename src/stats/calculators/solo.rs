use crate::scoring::{Player, RoundRecord};
use crate::stats::{percentage, SoloStats};

pub fn solo_stats(roster: &[Player], rounds: &[RoundRecord]) -> Vec<SoloStats> {
    roster
        .iter()
        .map(|player| {
            let solos = rounds
                .iter()
                .filter(|r| r.is_solo && r.solo_player.as_deref() == Some(player.id.as_str()));

            let (solo_count, solo_wins) = solos.fold((0u32, 0u32), |(count, wins), round| {
                (count + 1, wins + u32::from(round.is_winner(&player.id)))
            });

            SoloStats {
                player_id: player.id.clone(),
                name: player.name.clone(),
                solo_count,
                solo_wins,
                solo_rate: percentage(solo_wins, solo_count),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::calculators::test_support::History;

    #[test]
    fn counts_won_and_lost_solos() {
        let history = History::new(&["a", "b", "c", "d"])
            .win(&["a"], 2)
            .win(&["b", "c", "d"], 2)
            .win(&["a"], 1)
            .win(&["a", "b"], 1);

        let solos = solo_stats(&history.roster, &history.rounds);
        let a = &solos[0];

        assert_eq!(a.solo_count, 3);
        assert_eq!(a.solo_wins, 2);
        assert!((a.solo_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn no_solos_means_zero_rate() {
        let history = History::new(&["a", "b", "c", "d"]).win(&["a", "b"], 1);

        let solos = solo_stats(&history.roster, &history.rounds);
        assert!(solos.iter().all(|s| s.solo_count == 0 && s.solo_rate == 0.0));
    }
}
