use std::collections::HashMap;

use crate::scoring::{Player, RoundRecord};
use crate::stats::{
    partnership_limits::{LIST_LEN, MIN_SHARED_ROUNDS},
    Partnership, PartnershipReport,
};

#[derive(Default)]
struct PairTally {
    points: i64,
    games: u32,
}

/// Ranks pairs that shared a side in team-split rounds.
///
/// Every pair inside the winning side gains the round's base points and every
/// pair inside the losing side loses them. Solo rounds are ignored. Pairs with
/// fewer than `MIN_SHARED_ROUNDS` shared rounds are not ranked.
pub fn partnership_performance(roster: &[Player], rounds: &[RoundRecord]) -> PartnershipReport {
    let mut slots: HashMap<(usize, usize), usize> = HashMap::new();
    let mut tallies: Vec<((usize, usize), PairTally)> = Vec::new();

    for round in rounds.iter().filter(|r| !r.is_solo) {
        let (winners, losers): (Vec<usize>, Vec<usize>) = roster
            .iter()
            .enumerate()
            .filter(|(_, p)| round.participated(&p.id) && round.scores.contains_key(&p.id))
            .map(|(index, _)| index)
            .partition(|&index| round.is_winner(&roster[index].id));

        let points = i64::from(round.points);
        for (side, signed) in [(&winners, points), (&losers, -points)] {
            for (i, &first) in side.iter().enumerate() {
                for &second in &side[i + 1..] {
                    let key = (first, second);
                    let slot = *slots.entry(key).or_insert_with(|| {
                        tallies.push((key, PairTally::default()));
                        tallies.len() - 1
                    });
                    let tally = &mut tallies[slot].1;
                    tally.points += signed;
                    tally.games += 1;
                }
            }
        }
    }

    let mut ranked: Vec<Partnership> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.games >= MIN_SHARED_ROUNDS)
        .map(|((first, second), tally)| Partnership {
            first_id: roster[first].id.clone(),
            first_name: roster[first].name.clone(),
            second_id: roster[second].id.clone(),
            second_name: roster[second].name.clone(),
            points: tally.points,
            games: tally.games,
            average: tally.points as f64 / f64::from(tally.games),
        })
        .collect();

    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));

    let best = ranked.iter().take(LIST_LEN).cloned().collect();
    let worst = if ranked.len() >= LIST_LEN {
        ranked[ranked.len() - LIST_LEN..].to_vec()
    } else {
        Vec::new()
    };

    PartnershipReport { best, worst }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RoundOutcome;
    use crate::stats::calculators::test_support::History;

    fn pair(p: &Partnership) -> (&str, &str) {
        (p.first_id.as_str(), p.second_id.as_str())
    }

    #[test]
    fn pairs_need_two_shared_rounds() {
        let history = History::new(&["a", "b", "c", "d"])
            .win(&["a", "b"], 3)
            .win(&["a", "b"], 1)
            .win(&["c", "d"], 2)
            .win(&["a", "c"], 4);

        let report = partnership_performance(&history.roster, &history.rounds);

        let best: Vec<_> = report.best.iter().map(pair).collect();
        assert_eq!(best, vec![("a", "b"), ("c", "d")]);
        assert_eq!(report.best[0].games, 3);
        assert_eq!(report.best[0].points, 2);
        assert!((report.best[0].average - 2.0 / 3.0).abs() < 1e-9);
        assert!(report.worst.is_empty());
    }

    #[test]
    fn best_and_worst_overlap_with_few_pairs() {
        let history = History::new(&["a", "b", "c", "d"])
            .win(&["a", "b"], 3)
            .win(&["a", "b"], 1)
            .win(&["c", "d"], 2)
            .win(&["a", "c"], 4)
            .win(&["a", "c"], 4);

        let report = partnership_performance(&history.roster, &history.rounds);

        let best: Vec<_> = report.best.iter().map(pair).collect();
        let worst: Vec<_> = report.worst.iter().map(pair).collect();
        assert_eq!(best, vec![("a", "c"), ("a", "b"), ("c", "d")]);
        assert_eq!(worst, vec![("a", "b"), ("c", "d"), ("b", "d")]);
        assert_eq!(report.worst[2].average, -4.0);
    }

    #[test]
    fn solo_rounds_are_ignored() {
        let history = History::new(&["a", "b", "c", "d"])
            .win(&["a"], 5)
            .win(&["b", "c", "d"], 5)
            .win(&["a"], 5);

        let report = partnership_performance(&history.roster, &history.rounds);
        assert!(report.best.is_empty());
        assert!(report.worst.is_empty());
    }

    #[test]
    fn uneven_sides_count_every_pair_and_skip_sitting_out() {
        let history = History::new(&["a", "b", "c", "d", "e", "f"])
            .play(RoundOutcome::new(["a", "b"], 2).sitting_out("f"))
            .play(RoundOutcome::new(["a", "b"], 2).sitting_out("f"));

        let report = partnership_performance(&history.roster, &history.rounds);

        let best: Vec<_> = report.best.iter().map(pair).collect();
        assert_eq!(best, vec![("a", "b"), ("c", "d"), ("c", "e")]);
        let worst: Vec<_> = report.worst.iter().map(pair).collect();
        assert_eq!(worst, vec![("c", "d"), ("c", "e"), ("d", "e")]);
        assert!(report
            .best
            .iter()
            .chain(&report.worst)
            .all(|p| p.first_id != "f" && p.second_id != "f"));
    }
}
