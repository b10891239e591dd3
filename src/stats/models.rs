use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotal {
    pub player_id: String,
    pub name: String,
    pub total: i32,
}

/// Ranked entry of the standings table. Ties keep roster order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub player_id: String,
    pub name: String,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerWinRate {
    pub player_id: String,
    pub name: String,
    pub wins: u32,
    pub rounds_played: u32,
    /// Percentage, 0.0 when the player never took part
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoloStats {
    pub player_id: String,
    pub name: String,
    pub solo_count: u32,
    pub solo_wins: u32,
    pub solo_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakStats {
    pub player_id: String,
    pub name: String,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partnership {
    pub first_id: String,
    pub first_name: String,
    pub second_id: String,
    pub second_name: String,
    pub points: i64,
    pub games: u32,
    pub average: f64,
}

/// Best and worst pairs by average points per shared round.
///
/// Both lists are slices of one ranking sorted by descending average, so they
/// overlap when fewer than six pairs qualify. `worst` stays empty until at
/// least three pairs qualify.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnershipReport {
    pub best: Vec<Partnership>,
    pub worst: Vec<Partnership>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum Dominance {
    Re { margin: f64 },
    Kontra { margin: f64 },
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDominance {
    pub re_wins: u32,
    pub kontra_wins: u32,
    pub total: u32,
    pub re_rate: f64,
    pub kontra_rate: f64,
    pub leader: Dominance,
}

/// Mean base points (not deltas) per round type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragePoints {
    pub normal: f64,
    pub normal_rounds: u32,
    pub bock: f64,
    pub bock_rounds: u32,
}

/// One row of the history table: the round's deltas and everyone's running total after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStanding {
    pub round_id: String,
    pub round_number: u32,
    pub deltas: BTreeMap<String, i32>,
    pub totals: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionOverview {
    pub rounds_played: u32,
    pub solo_rounds: u32,
    pub bock_rounds: u32,
    /// Sum of all positive deltas, the points that changed hands
    pub points_exchanged: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub overview: SessionOverview,
    pub standings: Vec<Standing>,
    pub win_rates: Vec<PlayerWinRate>,
    pub solo: Vec<SoloStats>,
    pub streaks: Vec<StreakStats>,
    pub partnerships: PartnershipReport,
    pub team_dominance: TeamDominance,
    pub average_points: AveragePoints,
}
