use crate::scoring::{Player, RoundRecord};
use crate::stats::StreakStats;

#[derive(Default)]
struct Run {
    current_win: u32,
    current_loss: u32,
    longest_win: u32,
    longest_loss: u32,
}

impl Run {
    fn record(&mut self, won: bool) {
        if won {
            self.current_win += 1;
            self.current_loss = 0;
            self.longest_win = self.longest_win.max(self.current_win);
        } else {
            self.current_loss += 1;
            self.current_win = 0;
            self.longest_loss = self.longest_loss.max(self.current_loss);
        }
    }
}

/// Longest consecutive win and loss runs in stored order.
///
/// A round the player sat out is skipped: it neither breaks nor extends a run.
pub fn streaks(roster: &[Player], rounds: &[RoundRecord]) -> Vec<StreakStats> {
    roster
        .iter()
        .map(|player| {
            let mut run = Run::default();
            for round in rounds.iter().filter(|r| r.participated(&player.id)) {
                run.record(round.is_winner(&player.id));
            }

            StreakStats {
                player_id: player.id.clone(),
                name: player.name.clone(),
                longest_win_streak: run.longest_win,
                longest_loss_streak: run.longest_loss,
            }
        })
        .collect()
}
