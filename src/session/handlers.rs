use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::{info, instrument};

use super::{
    export::SessionExport,
    service::Mirrored,
    types::{AddPlayerRequest, MutationResponse, RecordRoundRequest, SessionResponse, SyncResponse},
};
use crate::{
    scoring::{Player, RoundRecord},
    shared::{AppError, AppState},
    stats::{RoundStanding, SessionStatistics, Standing},
};

type Mutation<T> = Result<Json<MutationResponse<T>>, AppError>;

fn respond<T>(mirrored: Mirrored<T>) -> Json<MutationResponse<T>> {
    Json(MutationResponse {
        data: mirrored.value,
        synced: mirrored.synced,
    })
}

/// POST /sessions
///
/// Creates an empty session under a generated name
#[instrument(name = "create_session", skip(state))]
pub async fn create_session(State(state): State<AppState>) -> Mutation<SessionResponse> {
    let created = state.session_service.create_session().await?;
    info!(session_id = %created.value.id, "Session created successfully");

    Ok(respond(Mirrored {
        value: SessionResponse::from(&created.value),
        synced: created.synced,
    }))
}

/// GET /sessions/:id
#[instrument(name = "get_session", skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.session_service.get_session(&session_id).await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// POST /sessions/:id/players
#[instrument(name = "add_player", skip(state))]
pub async fn add_player(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AddPlayerRequest>,
) -> Mutation<Player> {
    let added = state
        .session_service
        .add_player(&session_id, &request.name)
        .await?;
    info!(player_id = %added.value.id, name = %added.value.name, "Player added");

    Ok(respond(added))
}

/// DELETE /sessions/:id/players/:player_id
#[instrument(name = "remove_player", skip(state))]
pub async fn remove_player(
    State(state): State<AppState>,
    Path((session_id, player_id)): Path<(String, String)>,
) -> Mutation<Player> {
    let removed = state
        .session_service
        .remove_player(&session_id, &player_id)
        .await?;
    Ok(respond(removed))
}

/// POST /sessions/:id/start
#[instrument(name = "start_session", skip(state))]
pub async fn start_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Mutation<SessionResponse> {
    let started = state.session_service.start_session(&session_id).await?;
    info!(players = started.value.players().len(), "Session started");

    Ok(respond(Mirrored {
        value: SessionResponse::from(&started.value),
        synced: started.synced,
    }))
}

/// POST /sessions/:id/rounds
///
/// Winners and the optional solo/sitting-out players are given by display name.
#[instrument(name = "record_round", skip(state, request))]
pub async fn record_round(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<RecordRoundRequest>,
) -> Mutation<RoundRecord> {
    let recorded = state
        .session_service
        .record_round(&session_id, request)
        .await?;
    Ok(respond(recorded))
}

/// DELETE /sessions/:id/rounds/:round_id
#[instrument(name = "delete_round", skip(state))]
pub async fn delete_round(
    State(state): State<AppState>,
    Path((session_id, round_id)): Path<(String, String)>,
) -> Mutation<RoundRecord> {
    let deleted = state
        .session_service
        .delete_round(&session_id, &round_id)
        .await?;
    info!(round_number = deleted.value.round_number, "Round deleted");

    Ok(respond(deleted))
}

/// GET /sessions/:id/standings
#[instrument(name = "standings", skip(state))]
pub async fn standings(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Standing>>, AppError> {
    Ok(Json(state.session_service.standings(&session_id).await?))
}

/// GET /sessions/:id/history
#[instrument(name = "history", skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<RoundStanding>>, AppError> {
    Ok(Json(state.session_service.history(&session_id).await?))
}

/// GET /sessions/:id/statistics
#[instrument(name = "statistics", skip(state))]
pub async fn statistics(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatistics>, AppError> {
    Ok(Json(state.session_service.statistics(&session_id).await?))
}

/// GET /sessions/:id/export
#[instrument(name = "export_session", skip(state))]
pub async fn export_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionExport>, AppError> {
    Ok(Json(state.session_service.export(&session_id).await?))
}

/// POST /sessions/import
#[instrument(name = "import_session", skip(state, data))]
pub async fn import_session(
    State(state): State<AppState>,
    Json(data): Json<SessionExport>,
) -> Mutation<SessionResponse> {
    let imported = state.session_service.import(data).await?;

    Ok(respond(Mirrored {
        value: SessionResponse::from(&imported.value),
        synced: imported.synced,
    }))
}

/// POST /sessions/:id/sync
#[instrument(name = "sync_session", skip(state))]
pub async fn sync_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SyncResponse>, AppError> {
    state.session_service.sync(&session_id).await?;
    info!("Session saved to repository");

    Ok(Json(SyncResponse {
        session_id,
        synced_at: Utc::now(),
    }))
}
