use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid player name: {0:?}")]
    InvalidPlayerName(String),

    #[error("Player already exists: {0}")]
    DuplicatePlayer(String),

    #[error("Roster is full ({0} players)")]
    RosterFull(usize),

    #[error("Roster is frozen once the session has started")]
    RosterFrozen,

    #[error("Need at least {need} players to start, have {have}")]
    NotEnoughPlayers { have: usize, need: usize },

    #[error("Session has not started yet")]
    NotStarted,

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
