use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::session::{service::SessionService, SessionError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(session_service: Arc<SessionService>) -> Self {
        Self { session_service }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        let message = error.to_string();
        match error {
            SessionError::NotFound(msg) => AppError::NotFound(msg),
            SessionError::Scoring(_)
            | SessionError::InvalidPlayerName(_)
            | SessionError::InvalidImport(_) => AppError::BadRequest(message),
            SessionError::DuplicatePlayer(_)
            | SessionError::RosterFull(_)
            | SessionError::RosterFrozen
            | SessionError::NotEnoughPlayers { .. }
            | SessionError::NotStarted => AppError::Conflict(message),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::DatabaseError(format!("Malformed payload: {}", error))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::session::{
        export::StoredSession, generators::SessionNameGenerator, repository::SessionRepository,
        service::SyncSettings,
    };
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway that is always down - for checking best-effort mirroring
    pub struct FailingSessionRepository;

    #[async_trait]
    impl SessionRepository for FailingSessionRepository {
        async fn put(
            &self,
            _session_id: &str,
            _payload: &StoredSession,
            _ttl: Option<Duration>,
        ) -> Result<(), AppError> {
            Err(AppError::DatabaseError("gateway unavailable".to_string()))
        }
        async fn get(&self, _session_id: &str) -> Result<Option<StoredSession>, AppError> {
            Err(AppError::DatabaseError("gateway unavailable".to_string()))
        }
        async fn delete(&self, _session_id: &str) -> Result<(), AppError> {
            Err(AppError::DatabaseError("gateway unavailable".to_string()))
        }
        async fn cleanup_expired(&self) -> Result<u64, AppError> {
            Ok(0)
        }
    }

    /// Deterministic session names: `session-1`, `session-2`, ...
    #[derive(Default)]
    pub struct SequentialNameGenerator {
        next: AtomicUsize,
    }

    #[async_trait]
    impl SessionNameGenerator for SequentialNameGenerator {
        async fn generate(&self) -> String {
            format!("session-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    /// Builds an `AppState` around any repository with predictable session names
    pub fn app_state_with(repository: Arc<dyn SessionRepository>) -> AppState {
        let service = SessionService::new(repository, SyncSettings::default())
            .with_name_generator(Arc::new(SequentialNameGenerator::default()));
        AppState::new(Arc::new(service))
    }

    #[test]
    fn session_errors_map_to_status_codes() {
        let cases = [
            (SessionError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (SessionError::RosterFrozen, StatusCode::CONFLICT),
            (SessionError::NotStarted, StatusCode::CONFLICT),
            (
                SessionError::Scoring(crate::scoring::ScoringError::InvalidOutcome("x".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            let response = AppError::from(error).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
