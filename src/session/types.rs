use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{models::Session, SessionError};
use crate::scoring::{Player, RoundOutcome, RoundRecord, ScoringError, Team};

/// Request payload for adding a player to the roster
#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub name: String,
}

/// Request payload for recording a round. Players are named by display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordRoundRequest {
    pub winners: Vec<String>,
    pub points: i32,
    #[serde(default)]
    pub is_solo: bool,
    #[serde(default)]
    pub solo_player: Option<String>,
    #[serde(default)]
    pub sitting_out: Option<String>,
    /// Let the session's rotation pick who sits out when `sitting_out` is empty
    #[serde(default)]
    pub use_rotation: bool,
    #[serde(default)]
    pub winning_team: Option<Team>,
    #[serde(default)]
    pub is_bock: bool,
}

impl RecordRoundRequest {
    /// Resolves display names against the roster.
    pub fn into_outcome(self, session: &Session) -> Result<RoundOutcome, SessionError> {
        let resolve = |name: &str| -> Result<String, SessionError> {
            session
                .player_by_name(name)
                .map(|p| p.id.clone())
                .ok_or_else(|| ScoringError::invalid(format!("unknown player {name}")).into())
        };

        let winners = self
            .winners
            .iter()
            .map(|name| resolve(name))
            .collect::<Result<Vec<_>, _>>()?;
        let solo_player = self.solo_player.as_deref().map(resolve).transpose()?;
        let sitting_out = match self.sitting_out.as_deref() {
            Some(name) => Some(resolve(name)?),
            None if self.use_rotation => session.next_sitting_out().map(|p| p.id.clone()),
            None => None,
        };

        Ok(RoundOutcome {
            winners,
            points: self.points,
            is_solo: self.is_solo,
            solo_player,
            sitting_out,
            winning_team: self.winning_team,
            is_bock: self.is_bock,
        })
    }
}

/// Snapshot of a session for the presentation layer
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub started: bool,
    pub players: Vec<Player>,
    pub rounds: Vec<RoundRecord>,
    pub next_sitting_out: Option<Player>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            created_at: session.created_at,
            started: session.is_started(),
            players: session.players().to_vec(),
            rounds: session.rounds().to_vec(),
            next_sitting_out: session.next_sitting_out().cloned(),
        }
    }
}

/// Result of a write, with whether the gateway mirror succeeded
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse<T> {
    pub data: T,
    pub synced: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub session_id: String,
    pub synced_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(names: &[&str]) -> Session {
        let mut session = Session::new("s");
        for name in names {
            session.add_player(name).unwrap();
        }
        session.start().unwrap();
        session
    }

    #[test]
    fn resolves_names_to_ids() {
        let session = session(&["Anna", "Ben", "Carl", "Dora"]);
        let request = RecordRoundRequest {
            winners: vec!["Anna".into(), "Carl".into()],
            points: 2,
            ..Default::default()
        };

        let outcome = request.into_outcome(&session).unwrap();

        assert_eq!(
            outcome.winners,
            vec![
                session.player_by_name("Anna").unwrap().id.clone(),
                session.player_by_name("Carl").unwrap().id.clone(),
            ]
        );
        assert!(outcome.sitting_out.is_none());
    }

    #[test]
    fn unknown_name_is_invalid_outcome() {
        let session = session(&["Anna", "Ben", "Carl", "Dora"]);
        let request = RecordRoundRequest {
            winners: vec!["Zoe".into()],
            points: 1,
            ..Default::default()
        };

        let result = request.into_outcome(&session);
        assert!(matches!(
            result,
            Err(SessionError::Scoring(ScoringError::InvalidOutcome(_)))
        ));
    }

    #[test]
    fn rotation_fills_sitting_out() {
        let session = session(&["Anna", "Ben", "Carl", "Dora", "Emil"]);
        let request = RecordRoundRequest {
            winners: vec!["Ben".into(), "Carl".into()],
            points: 1,
            use_rotation: true,
            ..Default::default()
        };

        let outcome = request.into_outcome(&session).unwrap();
        assert_eq!(
            outcome.sitting_out.as_deref(),
            Some(session.player_by_name("Anna").unwrap().id.as_str())
        );
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let json = r#"{"winners": ["Anna"], "points": 3, "winning_team": "Kontra"}"#;
        let request: RecordRoundRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.winning_team, Some(Team::Kontra));
        assert!(!request.is_bock);
        assert!(!request.use_rotation);
    }
}
