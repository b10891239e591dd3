use crate::scoring::{RoundRecord, Team};
use crate::stats::{percentage, Dominance, TeamDominance};

/// Re versus Kontra wins. Untagged rounds count for Re.
pub fn team_dominance(rounds: &[RoundRecord]) -> TeamDominance {
    let (re_wins, kontra_wins) =
        rounds
            .iter()
            .fold((0u32, 0u32), |(re, kontra), round| match round.winning_team_or_default() {
                Team::Re => (re + 1, kontra),
                Team::Kontra => (re, kontra + 1),
            });

    let total = re_wins + kontra_wins;
    let re_rate = percentage(re_wins, total);
    let kontra_rate = percentage(kontra_wins, total);

    let leader = if re_rate > kontra_rate {
        Dominance::Re {
            margin: re_rate - kontra_rate,
        }
    } else if kontra_rate > re_rate {
        Dominance::Kontra {
            margin: kontra_rate - re_rate,
        }
    } else {
        Dominance::Balanced
    };

    TeamDominance {
        re_wins,
        kontra_wins,
        total,
        re_rate,
        kontra_rate,
        leader,
    }
}
