use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::{repository::SessionRepository, service::SessionService};

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often the sweep runs
    pub cleanup_interval: Duration,
    /// How long a session may go untouched before it leaves memory
    pub idle_threshold: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(30 * 60), // 30 minutes
            idle_threshold: Duration::from_secs(2 * 60 * 60), // 2 hours
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub evicted: usize,
    /// `None` when the repository sweep failed
    pub expired: Option<u64>,
}

/// Periodically evicts idle sessions from memory and purges expired ones from
/// the repository. Runs until the task is dropped.
#[instrument(skip(service, repository))]
pub async fn start_cleanup_task(
    service: Arc<SessionService>,
    repository: Arc<dyn SessionRepository>,
    config: CleanupConfig,
) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        idle_threshold_secs = config.idle_threshold.as_secs(),
        "Starting session cleanup task"
    );

    let mut ticker = interval(config.cleanup_interval);
    loop {
        ticker.tick().await;
        run_cleanup(&service, repository.as_ref(), config.idle_threshold).await;
    }
}

async fn run_cleanup(
    service: &SessionService,
    repository: &dyn SessionRepository,
    idle_threshold: Duration,
) -> CleanupReport {
    let evicted = service.evict_idle(idle_threshold).await;

    let expired = match repository.cleanup_expired().await {
        Ok(removed) => Some(removed),
        Err(e) => {
            error!(error = %e, "Expired session cleanup failed");
            None
        }
    };

    info!(evicted, expired = ?expired, "Session cleanup completed");
    CleanupReport { evicted, expired }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Player;
    use crate::session::{
        export::StoredSession, repository::InMemorySessionRepository, service::SyncSettings,
    };
    use chrono::Utc;

    #[tokio::test]
    async fn sweep_evicts_idle_sessions_and_purges_expired_rows() {
        let repository = Arc::new(InMemorySessionRepository::new());
        let service = SessionService::new(repository.clone(), SyncSettings::default());
        let live_id = service.create_session().await.unwrap().value.id;

        let payload = StoredSession {
            players: vec![Player::with_id("p1", "Anna")],
            rounds: vec![],
            session_started: false,
            created_at: Utc::now(),
            sitting_out_index: 0,
        };
        repository
            .put("old", &payload, Some(chrono::Duration::seconds(-1)))
            .await
            .unwrap();

        let report = run_cleanup(&service, repository.as_ref(), Duration::ZERO).await;

        assert_eq!(
            report,
            CleanupReport {
                evicted: 1,
                expired: Some(1)
            }
        );
        assert_eq!(service.live_session_count().await, 0);
        // still reachable through the repository
        assert_eq!(service.get_session(&live_id).await.unwrap().id, live_id);
    }

    #[tokio::test]
    async fn recently_used_sessions_stay_live() {
        let repository = Arc::new(InMemorySessionRepository::new());
        let service = SessionService::new(repository.clone(), SyncSettings::default());
        service.create_session().await.unwrap();

        let report = run_cleanup(
            &service,
            repository.as_ref(),
            CleanupConfig::default().idle_threshold,
        )
        .await;

        assert_eq!(report.evicted, 0);
        assert_eq!(service.live_session_count().await, 1);
    }
}
