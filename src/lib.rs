// Library crate for the Doppelkopf score ledger
// This file exposes the public API for integration tests

pub mod config;
pub mod scoring;
pub mod session;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ConfigError};
pub use scoring::{score_round, Player, RoundOutcome, RoundRecord, ScoringError, Team};
pub use session::{
    repository::{InMemorySessionRepository, PostgresSessionRepository, SessionRepository},
    service::{SessionService, SyncSettings},
    Session, SessionError,
};
pub use shared::{AppError, AppState};
pub use stats::SessionStatistics;
