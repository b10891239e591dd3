use doko_ledger::{
    config::AppConfig,
    session::{self, cleanup_task},
    AppState, InMemorySessionRepository, PostgresSessionRepository, SessionRepository,
    SessionService,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doko_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Doppelkopf score ledger");

    let config = AppConfig::from_env()?;

    let session_repository: Arc<dyn SessionRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            let repository = PostgresSessionRepository::new(pool);
            repository.ensure_schema().await?;
            info!("Using PostgreSQL session repository");
            Arc::new(repository)
        }
        None => {
            warn!("DATABASE_URL not set, sessions are kept in memory only");
            Arc::new(InMemorySessionRepository::new())
        }
    };

    let session_service = Arc::new(SessionService::new(
        Arc::clone(&session_repository),
        config.sync_settings(),
    ));

    tokio::spawn(cleanup_task::start_cleanup_task(
        Arc::clone(&session_service),
        session_repository,
        cleanup_task::CleanupConfig::default(),
    ));

    let app_state = AppState::new(session_service);

    let app = session::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, auto_sync = config.auto_sync, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
