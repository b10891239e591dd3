use crate::scoring::RoundRecord;
use crate::stats::SessionOverview;

pub fn session_overview(rounds: &[RoundRecord]) -> SessionOverview {
    rounds
        .iter()
        .fold(SessionOverview::default(), |mut overview, round| {
            overview.rounds_played += 1;
            overview.solo_rounds += u32::from(round.is_solo);
            overview.bock_rounds += u32::from(round.is_bock);
            overview.points_exchanged += round
                .scores
                .values()
                .filter(|&&delta| delta > 0)
                .map(|&delta| i64::from(delta))
                .sum::<i64>();
            overview
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RoundOutcome;
    use crate::stats::calculators::test_support::History;

    #[test]
    fn counts_round_types_and_exchanged_points() {
        let history = History::new(&["a", "b", "c", "d"])
            .win(&["a", "b"], 3)
            .win(&["a"], 2)
            .play(RoundOutcome::new(["b", "c", "d"], 1).bock());

        let overview = session_overview(&history.rounds);

        assert_eq!(overview.rounds_played, 3);
        assert_eq!(overview.solo_rounds, 2);
        assert_eq!(overview.bock_rounds, 1);
        assert_eq!(overview.points_exchanged, 6 + 6 + 3);
    }
}
