use doko_ledger::{session::types::RecordRoundRequest, Team};

// ============================================================================
// Round Request Builder
// ============================================================================

pub struct RoundBuilder {
    request: RecordRoundRequest,
}

impl RoundBuilder {
    pub fn won_by(winners: &[&str], points: i32) -> Self {
        Self {
            request: RecordRoundRequest {
                winners: winners.iter().map(|w| w.to_string()).collect(),
                points,
                ..Default::default()
            },
        }
    }

    pub fn solo(mut self, player: &str) -> Self {
        self.request.is_solo = true;
        self.request.solo_player = Some(player.to_string());
        self
    }

    pub fn sitting_out(mut self, player: &str) -> Self {
        self.request.sitting_out = Some(player.to_string());
        self
    }

    pub fn with_rotation(mut self) -> Self {
        self.request.use_rotation = true;
        self
    }

    pub fn team(mut self, team: Team) -> Self {
        self.request.winning_team = Some(team);
        self
    }

    pub fn bock(mut self) -> Self {
        self.request.is_bock = true;
        self
    }

    pub fn build(self) -> RecordRoundRequest {
        self.request
    }
}
