use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{
    export::SessionExport,
    generators::{PetNameSessionNameGenerator, SessionNameGenerator},
    models::Session,
    repository::SessionRepository,
    types::RecordRoundRequest,
    SessionError,
};
use crate::{
    scoring::{Player, RoundRecord},
    shared::AppError,
    stats::{self, RoundStanding, SessionStatistics, Standing},
};

/// How writes are mirrored to the persistence gateway
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub auto_sync: bool,
    pub ttl: Option<Duration>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            auto_sync: true,
            ttl: Some(Duration::days(365)),
        }
    }
}

/// Value produced by a write, plus whether the gateway accepted the mirror
#[derive(Debug, Clone, PartialEq)]
pub struct Mirrored<T> {
    pub value: T,
    pub synced: bool,
}

/// A session held in memory, with when it was last touched and whether the
/// gateway copy is behind.
struct LiveSession {
    state: AsyncMutex<Session>,
    last_activity_ms: AtomicI64,
    unsaved: AtomicBool,
}

impl LiveSession {
    fn new(session: Session, unsaved: bool) -> Arc<Self> {
        Arc::new(Self {
            state: AsyncMutex::new(session),
            last_activity_ms: AtomicI64::new(Utc::now().timestamp_millis()),
            unsaved: AtomicBool::new(unsaved),
        })
    }

    fn touch(&self) {
        self.last_activity_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.last_activity_ms.load(Ordering::Relaxed)
    }

    fn mark_saved(&self, saved: bool) {
        self.unsaved.store(!saved, Ordering::Relaxed);
    }
}

/// Owns the live sessions.
///
/// In-memory state is the source of truth while a session is live; the
/// repository is a best-effort mirror and the durable record once an idle
/// session is evicted. Each session sits behind its own mutex, so writes to
/// one session are serialised while different sessions proceed independently.
pub struct SessionService {
    sessions: RwLock<HashMap<String, Arc<LiveSession>>>,
    repository: Arc<dyn SessionRepository>,
    name_generator: Arc<dyn SessionNameGenerator>,
    settings: SyncSettings,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>, settings: SyncSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            repository,
            name_generator: Arc::new(PetNameSessionNameGenerator::new()),
            settings,
        }
    }

    pub fn with_name_generator(mut self, name_generator: Arc<dyn SessionNameGenerator>) -> Self {
        self.name_generator = name_generator;
        self
    }

    #[instrument(skip(self))]
    pub async fn create_session(&self) -> Result<Mirrored<Session>, AppError> {
        let session_id = self.unused_session_name().await?;
        let session = Session::new(session_id.clone());

        let synced = self.mirror(&session).await;
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), LiveSession::new(session.clone(), !synced));
        info!(session_id = %session_id, synced, "Session created");

        Ok(Mirrored {
            value: session,
            synced,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_session(&self, session_id: &str) -> Result<Session, AppError> {
        let live = self.session_handle(session_id).await?;
        let session = live.state.lock().await;
        Ok(session.clone())
    }

    #[instrument(skip(self))]
    pub async fn add_player(
        &self,
        session_id: &str,
        name: &str,
    ) -> Result<Mirrored<Player>, AppError> {
        self.mutate(session_id, |session| session.add_player(name).cloned())
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_player(
        &self,
        session_id: &str,
        player_id: &str,
    ) -> Result<Mirrored<Player>, AppError> {
        self.mutate(session_id, |session| session.remove_player(player_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn start_session(&self, session_id: &str) -> Result<Mirrored<Session>, AppError> {
        self.mutate(session_id, |session| {
            session.start()?;
            Ok(session.clone())
        })
        .await
    }

    #[instrument(skip(self, request))]
    pub async fn record_round(
        &self,
        session_id: &str,
        request: RecordRoundRequest,
    ) -> Result<Mirrored<RoundRecord>, AppError> {
        let recorded = self
            .mutate(session_id, |session| {
                let outcome = request.into_outcome(session)?;
                session.record_round(&outcome).cloned()
            })
            .await?;

        info!(
            session_id = %session_id,
            round_number = recorded.value.round_number,
            is_solo = recorded.value.is_solo,
            points = recorded.value.points,
            "Round recorded"
        );

        Ok(recorded)
    }

    #[instrument(skip(self))]
    pub async fn delete_round(
        &self,
        session_id: &str,
        round_id: &str,
    ) -> Result<Mirrored<RoundRecord>, AppError> {
        self.mutate(session_id, |session| session.delete_round(round_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn statistics(&self, session_id: &str) -> Result<SessionStatistics, AppError> {
        let session = self.get_session(session_id).await?;
        Ok(session.statistics())
    }

    #[instrument(skip(self))]
    pub async fn standings(&self, session_id: &str) -> Result<Vec<Standing>, AppError> {
        let session = self.get_session(session_id).await?;
        Ok(stats::standings(session.players(), session.rounds()))
    }

    #[instrument(skip(self))]
    pub async fn history(&self, session_id: &str) -> Result<Vec<RoundStanding>, AppError> {
        let session = self.get_session(session_id).await?;
        Ok(stats::running_totals(session.players(), session.rounds()))
    }

    #[instrument(skip(self))]
    pub async fn export(&self, session_id: &str) -> Result<SessionExport, AppError> {
        let session = self.get_session(session_id).await?;
        Ok(session.export())
    }

    /// Replaces any live or stored session with the same id.
    #[instrument(skip(self, data))]
    pub async fn import(&self, data: SessionExport) -> Result<Mirrored<Session>, AppError> {
        let fallback_id = match data.session_id {
            Some(_) => String::new(),
            None => self.unused_session_name().await?,
        };
        let session = Session::import(data, || fallback_id)?;

        let synced = self.mirror(&session).await;
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), LiveSession::new(session.clone(), !synced));
        info!(
            session_id = %session.id,
            players = session.players().len(),
            rounds = session.rounds().len(),
            synced,
            "Session imported"
        );

        Ok(Mirrored {
            value: session,
            synced,
        })
    }

    /// Explicit save. Unlike automatic mirroring, a gateway failure is returned.
    #[instrument(skip(self))]
    pub async fn sync(&self, session_id: &str) -> Result<(), AppError> {
        let live = self.session_handle(session_id).await?;
        let session = live.state.lock().await;

        self.repository
            .put(&session.id, &session.to_stored(), self.settings.ttl)
            .await?;
        live.mark_saved(true);
        Ok(())
    }

    /// Drops sessions nobody touched for `idle_for` from memory; they are
    /// loaded again from the repository on the next request.
    ///
    /// A session whose latest state never reached the repository is saved
    /// first and stays live if that fails. Sessions in use are skipped.
    #[instrument(skip(self))]
    pub async fn evict_idle(&self, idle_for: StdDuration) -> usize {
        let threshold_ms = i64::try_from(idle_for.as_millis()).unwrap_or(i64::MAX);
        let now_ms = Utc::now().timestamp_millis();

        let candidates: Vec<(String, Arc<LiveSession>)> = self
            .sessions
            .read()
            .await
            .iter()
            .filter(|(_, live)| live.idle_ms(now_ms) >= threshold_ms)
            .map(|(id, live)| (id.clone(), Arc::clone(live)))
            .collect();

        let mut evicted = 0;
        for (session_id, live) in candidates {
            let Ok(session) = live.state.try_lock() else {
                continue;
            };

            if live.unsaved.load(Ordering::Relaxed) {
                if let Err(err) = self
                    .repository
                    .put(&session.id, &session.to_stored(), self.settings.ttl)
                    .await
                {
                    warn!(?err, session_id = %session_id, "Keeping idle session live, final save failed");
                    continue;
                }
                live.mark_saved(true);
            }

            let mut sessions = self.sessions.write().await;
            // map entry plus `live`; anything more means a request holds it
            let untouched = sessions
                .get(&session_id)
                .is_some_and(|current| Arc::ptr_eq(current, &live))
                && Arc::strong_count(&live) == 2;
            if untouched {
                sessions.remove(&session_id);
                evicted += 1;
            }
        }

        debug!(evicted, "Idle sessions evicted");
        evicted
    }

    /// Number of sessions currently held in memory
    pub async fn live_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn mutate<T, F>(&self, session_id: &str, apply: F) -> Result<Mirrored<T>, AppError>
    where
        F: FnOnce(&mut Session) -> Result<T, SessionError>,
    {
        let live = self.session_handle(session_id).await?;
        let mut session = live.state.lock().await;

        let value = apply(&mut *session)?;
        let synced = self.mirror(&*session).await;
        live.mark_saved(synced);

        Ok(Mirrored { value, synced })
    }

    async fn mirror(&self, session: &Session) -> bool {
        if !self.settings.auto_sync {
            return false;
        }

        match self
            .repository
            .put(&session.id, &session.to_stored(), self.settings.ttl)
            .await
        {
            Ok(()) => {
                debug!(session_id = %session.id, "Session mirrored to repository");
                true
            }
            Err(err) => {
                warn!(?err, session_id = %session.id, "Failed to mirror session, keeping local state");
                false
            }
        }
    }

    async fn session_handle(&self, session_id: &str) -> Result<Arc<LiveSession>, AppError> {
        {
            let guard = self.sessions.read().await;
            if let Some(live) = guard.get(session_id) {
                live.touch();
                return Ok(Arc::clone(live));
            }
        }

        let stored = self
            .repository
            .get(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {}", session_id)))?;
        debug!(session_id = %session_id, "Session loaded from repository");

        let mut guard = self.sessions.write().await;
        let live = guard
            .entry(session_id.to_string())
            .or_insert_with(|| LiveSession::new(Session::from_stored(session_id, stored), false));
        live.touch();
        Ok(Arc::clone(live))
    }

    /// Draws names until one is neither live nor stored. When the repository
    /// cannot be asked, a name that is free locally is used.
    async fn unused_session_name(&self) -> Result<String, AppError> {
        const ATTEMPTS: usize = 8;

        for _ in 0..ATTEMPTS {
            let candidate = self.name_generator.generate().await;
            if self.sessions.read().await.contains_key(&candidate) {
                continue;
            }

            match self.repository.get(&candidate).await {
                Ok(None) => return Ok(candidate),
                Ok(Some(_)) => {
                    debug!(candidate = %candidate, "Session name already stored, drawing another");
                }
                Err(err) => {
                    warn!(?err, candidate = %candidate, "Could not check session name against repository");
                    return Ok(candidate);
                }
            }
        }

        warn!("Could not generate an unused session name");
        Err(AppError::Internal)
    }
}
