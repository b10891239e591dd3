use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{timestamp, Player, RoundRecord};

/// File export format. Everything but the roster and the rounds may be
/// missing on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
    #[serde(default)]
    pub sitting_out_index: usize,
}

/// Payload mirrored to the persistence gateway under the session name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
    #[serde(default)]
    pub session_started: bool,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sitting_out_index: usize,
}
