use crate::scoring::{Player, RoundRecord};
use crate::stats::{PlayerTotal, Standing};

/// Sum of each roster player's stored deltas, in roster order.
pub fn cumulative_totals(roster: &[Player], rounds: &[RoundRecord]) -> Vec<PlayerTotal> {
    roster
        .iter()
        .map(|player| PlayerTotal {
            player_id: player.id.clone(),
            name: player.name.clone(),
            total: rounds.iter().map(|r| r.delta_for(&player.id)).sum(),
        })
        .collect()
}

/// Totals ranked highest first. The sort is stable, so equal totals keep roster order.
pub fn standings(roster: &[Player], rounds: &[RoundRecord]) -> Vec<Standing> {
    let mut totals = cumulative_totals(roster, rounds);
    totals.sort_by(|a, b| b.total.cmp(&a.total));

    totals
        .into_iter()
        .enumerate()
        .map(|(index, total)| Standing {
            rank: index + 1,
            player_id: total.player_id,
            name: total.name,
            total: total.total,
        })
        .collect()
}
