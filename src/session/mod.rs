// Public API - what other modules can use
pub use errors::SessionError;
pub use models::Session;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::shared::AppState;

// Internal modules
pub mod cleanup_task;
mod errors;
pub mod export;
pub mod generators;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;

/// Routes for the session ledger, to be mounted at the root
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/import", post(handlers::import_session))
        .route("/sessions/:id", get(handlers::get_session))
        .route("/sessions/:id/players", post(handlers::add_player))
        .route(
            "/sessions/:id/players/:player_id",
            delete(handlers::remove_player),
        )
        .route("/sessions/:id/start", post(handlers::start_session))
        .route("/sessions/:id/rounds", post(handlers::record_round))
        .route(
            "/sessions/:id/rounds/:round_id",
            delete(handlers::delete_round),
        )
        .route("/sessions/:id/standings", get(handlers::standings))
        .route("/sessions/:id/history", get(handlers::history))
        .route("/sessions/:id/statistics", get(handlers::statistics))
        .route("/sessions/:id/export", get(handlers::export_session))
        .route("/sessions/:id/sync", post(handlers::sync_session))
}
