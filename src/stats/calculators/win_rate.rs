use crate::scoring::{Player, RoundRecord};
use crate::stats::{percentage, PlayerWinRate};

/// Wins over rounds taken part in. Rounds a player sat out do not count.
pub fn win_rates(roster: &[Player], rounds: &[RoundRecord]) -> Vec<PlayerWinRate> {
    roster
        .iter()
        .map(|player| {
            let (wins, rounds_played) = rounds
                .iter()
                .filter(|round| round.participated(&player.id))
                .fold((0u32, 0u32), |(wins, played), round| {
                    (wins + u32::from(round.is_winner(&player.id)), played + 1)
                });

            PlayerWinRate {
                player_id: player.id.clone(),
                name: player.name.clone(),
                wins,
                rounds_played,
                win_rate: percentage(wins, rounds_played),
            }
        })
        .collect()
}
