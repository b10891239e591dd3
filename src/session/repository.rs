use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::export::StoredSession;
use crate::shared::AppError;

/// Persistence gateway keyed by session name.
///
/// Payloads are opaque JSON to the store. An expired entry reads as absent.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn put(
        &self,
        session_id: &str,
        payload: &StoredSession,
        ttl: Option<Duration>,
    ) -> Result<(), AppError>;
    async fn get(&self, session_id: &str) -> Result<Option<StoredSession>, AppError>;
    async fn delete(&self, session_id: &str) -> Result<(), AppError>;
    async fn cleanup_expired(&self) -> Result<u64, AppError>;
}

#[derive(Debug, Clone)]
struct StoredRow {
    payload: String,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredRow {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// In-memory implementation of SessionRepository for development and testing
///
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    rows: RwLock<HashMap<String, StoredRow>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored rows, expired ones included
    pub async fn session_count(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn last_updated(&self, session_id: &str) -> Option<DateTime<Utc>> {
        self.rows
            .read()
            .await
            .get(session_id)
            .map(|row| row.last_updated)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, payload))]
    async fn put(
        &self,
        session_id: &str,
        payload: &StoredSession,
        ttl: Option<Duration>,
    ) -> Result<(), AppError> {
        debug!(session_id = %session_id, rounds = payload.rounds.len(), "Storing session in memory");

        let now = Utc::now();
        let serialized = serde_json::to_string(payload)?;

        let mut rows = self.rows.write().await;
        let created_at = rows
            .get(session_id)
            .map(|row| row.created_at)
            .unwrap_or(payload.created_at);
        rows.insert(
            session_id.to_string(),
            StoredRow {
                payload: serialized,
                created_at,
                last_updated: now,
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, session_id: &str) -> Result<Option<StoredSession>, AppError> {
        let rows = self.rows.read().await;
        let Some(row) = rows.get(session_id) else {
            debug!(session_id = %session_id, "Session not found in memory");
            return Ok(None);
        };

        if row.is_expired(Utc::now()) {
            debug!(session_id = %session_id, "Session in memory has expired");
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&row.payload)?))
    }

    #[instrument(skip(self))]
    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        let mut rows = self.rows.write().await;
        if rows.remove(session_id).is_none() {
            warn!(session_id = %session_id, "Session not found for deletion in memory");
            return Err(AppError::NotFound(format!("session {}", session_id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_expired(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let initial_count = rows.len();

        rows.retain(|_, row| !row.is_expired(now));

        let removed_count = initial_count - rows.len();
        debug!(
            expired_sessions_removed = removed_count,
            "Expired sessions cleaned up from memory"
        );
        Ok(removed_count as u64)
    }
}

/// PostgreSQL implementation of the persistence gateway
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the backing table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS doko_sessions (
                session_name TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                last_updated TIMESTAMPTZ NOT NULL,
                expires_at TIMESTAMPTZ
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create sessions table");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    #[instrument(skip(self, payload))]
    async fn put(
        &self,
        session_id: &str,
        payload: &StoredSession,
        ttl: Option<Duration>,
    ) -> Result<(), AppError> {
        debug!(session_id = %session_id, rounds = payload.rounds.len(), "Storing session in database");

        let now = Utc::now();
        let serialized = serde_json::to_string(payload)?;

        sqlx::query(
            "INSERT INTO doko_sessions (session_name, payload, created_at, last_updated, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (session_name) DO UPDATE
             SET payload = EXCLUDED.payload,
                 last_updated = EXCLUDED.last_updated,
                 expires_at = EXCLUDED.expires_at",
        )
        .bind(session_id)
        .bind(&serialized)
        .bind(payload.created_at)
        .bind(now)
        .bind(ttl.map(|ttl| now + ttl))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, session_id = %session_id, "Failed to store session in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, session_id: &str) -> Result<Option<StoredSession>, AppError> {
        let row = sqlx::query(
            "SELECT payload FROM doko_sessions
             WHERE session_name = $1 AND (expires_at IS NULL OR expires_at > $2)",
        )
        .bind(session_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, session_id = %session_id, "Failed to fetch session from database");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => {
                let payload: String = row.get("payload");
                debug!(session_id = %session_id, "Session found in database");
                Ok(Some(serde_json::from_str(&payload)?))
            }
            None => {
                debug!(session_id = %session_id, "Session not found in database");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM doko_sessions WHERE session_name = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, session_id = %session_id, "Failed to delete session from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(session_id = %session_id, "Session not found for deletion");
            return Err(AppError::NotFound(format!("session {}", session_id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn cleanup_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM doko_sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to cleanup expired sessions");
                AppError::DatabaseError(e.to_string())
            })?;

        let rows_affected = result.rows_affected();
        debug!(
            expired_sessions_removed = rows_affected,
            "Expired sessions cleaned up"
        );
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Player;

    fn payload() -> StoredSession {
        StoredSession {
            players: vec![Player::with_id("p1", "Anna"), Player::with_id("p2", "Ben")],
            rounds: vec![],
            session_started: false,
            created_at: Utc::now(),
            sitting_out_index: 0,
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_payload() {
        let repo = InMemorySessionRepository::new();
        let stored = payload();

        repo.put("quiet-red-fox", &stored, Some(Duration::days(365)))
            .await
            .unwrap();

        let loaded = repo.get("quiet-red-fox").await.unwrap();
        assert_eq!(loaded, Some(stored));
    }

    #[tokio::test]
    async fn get_missing_session_is_none() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_previous_payload() {
        let repo = InMemorySessionRepository::new();
        let mut stored = payload();
        repo.put("s", &stored, None).await.unwrap();

        stored.session_started = true;
        repo.put("s", &stored, None).await.unwrap();

        assert!(repo.get("s").await.unwrap().unwrap().session_started);
        assert_eq!(repo.session_count().await, 1);
    }

    #[tokio::test]
    async fn expired_sessions_read_as_absent_and_are_cleaned_up() {
        let repo = InMemorySessionRepository::new();
        repo.put("expired", &payload(), Some(Duration::days(-1)))
            .await
            .unwrap();
        repo.put("valid", &payload(), Some(Duration::days(7)))
            .await
            .unwrap();

        assert!(repo.get("expired").await.unwrap().is_none());

        let removed = repo.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.session_count().await, 1);
        assert!(repo.get("valid").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_missing_session_is_not_found() {
        let repo = InMemorySessionRepository::new();
        let result = repo.delete("nonexistent").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
