use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{
    errors::SessionError,
    export::{SessionExport, StoredSession},
};
use crate::scoring::{
    score_round, table_size::MIN_ROSTER_FOR_SITTING_OUT, Player, RoundOutcome, RoundRecord,
};
use crate::stats::SessionStatistics;

/// Roster size limits
pub mod roster_limits {
    pub const MIN_PLAYERS_TO_START: usize = 4;
    pub const MAX_PLAYERS: usize = 6;
}

use roster_limits::{MAX_PLAYERS, MIN_PLAYERS_TO_START};

/// One game evening: the roster, the append-only round history and the
/// sitting-out rotation cursor.
///
/// The roster can only change before `start`. Rounds are appended through
/// `record_round`, which validates before touching any state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    players: Vec<Player>,
    rounds: Vec<RoundRecord>,
    started: bool,
    sitting_out_index: usize,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            players: Vec::new(),
            rounds: Vec::new(),
            started: false,
            sitting_out_index: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn sitting_out_index(&self) -> usize {
        self.sitting_out_index
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn add_player(&mut self, name: &str) -> Result<&Player, SessionError> {
        if self.started {
            return Err(SessionError::RosterFrozen);
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidPlayerName(name.to_string()));
        }
        if self.player_by_name(name).is_some() {
            return Err(SessionError::DuplicatePlayer(name.to_string()));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(SessionError::RosterFull(MAX_PLAYERS));
        }

        self.players.push(Player::new(name));
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn remove_player(&mut self, player_id: &str) -> Result<Player, SessionError> {
        if self.started {
            return Err(SessionError::RosterFrozen);
        }

        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| SessionError::NotFound(format!("player {player_id}")))?;

        Ok(self.players.remove(index))
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.started {
            return Ok(());
        }
        if self.players.len() < MIN_PLAYERS_TO_START {
            return Err(SessionError::NotEnoughPlayers {
                have: self.players.len(),
                need: MIN_PLAYERS_TO_START,
            });
        }

        self.started = true;
        Ok(())
    }

    /// Whose turn it is to sit out, for rosters large enough to rotate.
    pub fn next_sitting_out(&self) -> Option<&Player> {
        if self.players.len() < MIN_ROSTER_FOR_SITTING_OUT {
            return None;
        }
        self.players
            .get(self.sitting_out_index % self.players.len())
    }

    /// Scores the outcome and appends it as the next round.
    ///
    /// Nothing is mutated when scoring fails.
    pub fn record_round(&mut self, outcome: &RoundOutcome) -> Result<&RoundRecord, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }

        let scored = score_round(&self.players, outcome)?;
        let round_number = self.rounds.len() as u32 + 1;
        self.rounds
            .push(RoundRecord::new(round_number, outcome, scored));

        if outcome.sitting_out.is_some() {
            self.sitting_out_index = (self.sitting_out_index + 1) % self.players.len();
        }

        Ok(&self.rounds[self.rounds.len() - 1])
    }

    /// Removes a round by id. Remaining rounds keep their round numbers.
    pub fn delete_round(&mut self, round_id: &str) -> Result<RoundRecord, SessionError> {
        let index = self
            .rounds
            .iter()
            .position(|r| r.id == round_id)
            .ok_or_else(|| SessionError::NotFound(format!("round {round_id}")))?;

        Ok(self.rounds.remove(index))
    }

    pub fn statistics(&self) -> SessionStatistics {
        SessionStatistics::compute(&self.players, &self.rounds)
    }

    pub fn export(&self) -> SessionExport {
        SessionExport {
            session_id: Some(self.id.clone()),
            created_at: Some(self.created_at),
            exported_at: Some(Utc::now()),
            players: self.players.clone(),
            rounds: self.rounds.clone(),
            sitting_out_index: self.sitting_out_index,
        }
    }

    /// Rebuilds a session from an export. A missing id is replaced by `fallback_id`.
    pub fn import(data: SessionExport, fallback_id: impl FnOnce() -> String) -> Result<Self, SessionError> {
        validate_roster(&data.players)?;
        let mut rounds = data.rounds;
        rekey_by_id(&data.players, &mut rounds);

        Ok(Self {
            id: data.session_id.unwrap_or_else(fallback_id),
            created_at: data.created_at.unwrap_or_else(Utc::now),
            started: !data.players.is_empty(),
            players: data.players,
            rounds,
            sitting_out_index: data.sitting_out_index,
        })
    }

    pub fn to_stored(&self) -> StoredSession {
        StoredSession {
            players: self.players.clone(),
            rounds: self.rounds.clone(),
            session_started: self.started,
            created_at: self.created_at,
            sitting_out_index: self.sitting_out_index,
        }
    }

    pub fn from_stored(id: impl Into<String>, stored: StoredSession) -> Self {
        Self {
            id: id.into(),
            created_at: stored.created_at,
            players: stored.players,
            rounds: stored.rounds,
            started: stored.session_started,
            sitting_out_index: stored.sitting_out_index,
        }
    }
}

fn validate_roster(players: &[Player]) -> Result<(), SessionError> {
    if players.len() > MAX_PLAYERS {
        return Err(SessionError::InvalidImport(format!(
            "{} players, at most {MAX_PLAYERS} allowed",
            players.len()
        )));
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for player in players {
        if !ids.insert(player.id.as_str()) {
            return Err(SessionError::InvalidImport(format!(
                "duplicate player id {}",
                player.id
            )));
        }
        if !names.insert(player.name.as_str()) {
            return Err(SessionError::InvalidImport(format!(
                "duplicate player name {}",
                player.name
            )));
        }
    }

    Ok(())
}

/// Rewrites player references that use a display name to the roster id.
///
/// Older exports key winners and scores by name. References that already are
/// roster ids, or match nobody, are left as they are.
fn rekey_by_id(players: &[Player], rounds: &mut [RoundRecord]) {
    let ids: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
    let by_name: HashMap<&str, &str> = players
        .iter()
        .map(|p| (p.name.as_str(), p.id.as_str()))
        .collect();
    let resolve = |key: &str| -> Option<String> {
        if ids.contains(key) {
            return None;
        }
        by_name.get(key).map(|id| id.to_string())
    };

    for round in rounds {
        for winner in &mut round.winners {
            if let Some(id) = resolve(winner.as_str()) {
                *winner = id;
            }
        }
        for player in [&mut round.solo_player, &mut round.sitting_out]
            .into_iter()
            .flatten()
        {
            if let Some(id) = resolve(player.as_str()) {
                *player = id;
            }
        }
        round.scores = std::mem::take(&mut round.scores)
            .into_iter()
            .map(|(key, delta)| (resolve(&key).unwrap_or(key), delta))
            .collect();
    }
}
