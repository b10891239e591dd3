use std::sync::Arc;

use doko_ledger::{
    session::types::RecordRoundRequest, InMemorySessionRepository, RoundRecord, Session,
    SessionService, SyncSettings,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: Arc<SessionService>,
    pub repository: Arc<InMemorySessionRepository>,
    pub session_id: String,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    start: bool,
    repository: Option<Arc<InMemorySessionRepository>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            start: true,
            repository: None,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["A", "B", "C", "D"])
    }

    pub fn with_five_players(self) -> Self {
        self.with_players(vec!["A", "B", "C", "D", "E"])
    }

    pub fn not_started(mut self) -> Self {
        self.start = false;
        self
    }

    /// Shares a repository with another setup, like a second device
    pub fn with_repository(mut self, repository: Arc<InMemorySessionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub async fn build(self) -> TestSetup {
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemorySessionRepository::new()));
        let service = Arc::new(SessionService::new(
            repository.clone(),
            SyncSettings::default(),
        ));

        let session_id = service.create_session().await.unwrap().value.id;
        for name in &self.players {
            service.add_player(&session_id, name).await.unwrap();
        }
        if self.start {
            service.start_session(&session_id).await.unwrap();
        }

        TestSetup {
            service,
            repository,
            session_id,
        }
    }
}

impl TestSetup {
    pub async fn play(&self, request: RecordRoundRequest) -> RoundRecord {
        self.service
            .record_round(&self.session_id, request)
            .await
            .unwrap()
            .value
    }

    pub async fn session(&self) -> Session {
        self.service.get_session(&self.session_id).await.unwrap()
    }

    pub async fn id_of(&self, name: &str) -> String {
        self.session()
            .await
            .player_by_name(name)
            .unwrap()
            .id
            .clone()
    }

    /// Round scores keyed by display name
    pub async fn named_scores(&self, round: &RoundRecord) -> Vec<(String, i32)> {
        let session = self.session().await;
        session
            .players()
            .iter()
            .map(|p| (p.name.clone(), round.scores[&p.id]))
            .collect()
    }
}
