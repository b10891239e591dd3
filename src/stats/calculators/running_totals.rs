use std::collections::BTreeMap;

use crate::scoring::{Player, RoundRecord};
use crate::stats::RoundStanding;

/// Running totals after each stored round, replayed from the stored deltas in
/// stored order. Round numbers are carried through untouched, gaps included.
pub fn running_totals(roster: &[Player], rounds: &[RoundRecord]) -> Vec<RoundStanding> {
    let mut totals: BTreeMap<String, i32> =
        roster.iter().map(|p| (p.id.clone(), 0)).collect();

    rounds
        .iter()
        .map(|round| {
            let deltas: BTreeMap<String, i32> = roster
                .iter()
                .map(|p| (p.id.clone(), round.delta_for(&p.id)))
                .collect();
            for (player_id, delta) in &deltas {
                *totals.entry(player_id.clone()).or_default() += delta;
            }

            RoundStanding {
                round_id: round.id.clone(),
                round_number: round.round_number,
                deltas,
                totals: totals.clone(),
            }
        })
        .collect()
}
