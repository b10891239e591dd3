use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Roster entry. Rounds reference players by `id`; `name` is display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    /// Creates a player with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Party tag recorded with a round. Has no effect on scoring.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Team {
    #[default]
    Re,
    Kontra,
}

/// A declared round outcome as reported by the caller.
///
/// `is_solo` and `solo_player` are hints only: the engine derives the round
/// kind from the winner count and the number of active players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winners: Vec<String>,
    pub points: i32,
    #[serde(default)]
    pub is_solo: bool,
    #[serde(default)]
    pub solo_player: Option<String>,
    #[serde(default)]
    pub sitting_out: Option<String>,
    #[serde(default)]
    pub winning_team: Option<Team>,
    #[serde(default)]
    pub is_bock: bool,
}

impl RoundOutcome {
    pub fn new<I, S>(winners: I, points: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            winners: winners.into_iter().map(Into::into).collect(),
            points,
            ..Self::default()
        }
    }

    pub fn sitting_out(mut self, player_id: impl Into<String>) -> Self {
        self.sitting_out = Some(player_id.into());
        self
    }

    pub fn solo(mut self, player_id: impl Into<String>) -> Self {
        self.is_solo = true;
        self.solo_player = Some(player_id.into());
        self
    }

    pub fn winning_team(mut self, team: Team) -> Self {
        self.winning_team = Some(team);
        self
    }

    pub fn bock(mut self) -> Self {
        self.is_bock = true;
        self
    }
}

/// Round kind as derived from the winner count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundKind {
    SoloWon,
    SoloLost,
    TeamSplit,
}

impl RoundKind {
    pub fn is_solo(self) -> bool {
        matches!(self, RoundKind::SoloWon | RoundKind::SoloLost)
    }
}

/// Engine output for one validated outcome, before it is numbered and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRound {
    pub kind: RoundKind,
    pub solo_player: Option<String>,
    pub scores: BTreeMap<String, i32>,
}

/// Immutable history entry. `scores` is authoritative and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: String,
    pub round_number: u32,
    #[serde(deserialize_with = "crate::scoring::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub is_solo: bool,
    pub winners: Vec<String>,
    #[serde(default)]
    pub solo_player: Option<String>,
    #[serde(default)]
    pub sitting_out: Option<String>,
    pub points: i32,
    #[serde(default)]
    pub winning_team: Option<Team>,
    #[serde(default)]
    pub is_bock: bool,
    pub scores: BTreeMap<String, i32>,
}

impl RoundRecord {
    pub fn new(round_number: u32, outcome: &RoundOutcome, scored: ScoredRound) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            round_number,
            timestamp: Utc::now(),
            is_solo: scored.kind.is_solo(),
            winners: outcome.winners.clone(),
            solo_player: scored.solo_player,
            sitting_out: outcome.sitting_out.clone(),
            points: outcome.points,
            winning_team: outcome.winning_team,
            is_bock: outcome.is_bock,
            scores: scored.scores,
        }
    }

    /// Whether the player took part in this round (was not sitting out)
    pub fn participated(&self, player_id: &str) -> bool {
        self.sitting_out.as_deref() != Some(player_id)
    }

    pub fn is_winner(&self, player_id: &str) -> bool {
        self.winners.iter().any(|w| w == player_id)
    }

    pub fn delta_for(&self, player_id: &str) -> i32 {
        self.scores.get(player_id).copied().unwrap_or_default()
    }

    /// Untagged rounds count for Re
    pub fn winning_team_or_default(&self) -> Team {
        self.winning_team.unwrap_or_default()
    }
}
