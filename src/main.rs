mod catalog;
mod classifier;
mod config;
mod db;
mod errors;
mod line;
mod models;
mod routes;
mod service;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

use crate::catalog::AdviceCatalog;
use crate::classifier::ClassifierClient;
use crate::config::AppConfig;
use crate::db::conversation_repository::ConversationRepository;
use crate::db::diagnosis_repository::DiagnosisRepository;
use crate::db::memory::{InMemoryConversationStore, InMemoryDiagnosisRecorder};
use crate::db::{ConversationStore, DiagnosisRecorder};
use crate::line::{LineClient, MessagingPlatform};
use crate::routes::AppState;
use crate::service::conversation_controller::ConversationController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skin_triage_bot=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    config.log_missing_secrets();

    // ── Storage ───────────────────────────────────────────────────────────────
    let (conversations, diagnoses) = connect_stores(config.database_url.as_deref()).await;

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let classifier = ClassifierClient::load(&config.model_path);
    let platform: Arc<dyn MessagingPlatform> = Arc::new(LineClient::new(
        config.channel_access_token.clone(),
        config.api_base_url.clone(),
        config.data_api_base_url.clone(),
    ));
    let controller = ConversationController::new(
        conversations,
        diagnoses,
        classifier,
        platform.clone(),
        AdviceCatalog::builtin(),
        config.precedence,
    );

    // ── Router ────────────────────────────────────────────────────────────────
    let app = routes::router(AppState {
        channel_secret: config.channel_secret.as_deref().map(Arc::from),
        controller,
        platform,
    });

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/callback");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Postgres when reachable, otherwise process-lifetime memory.
async fn connect_stores(
    database_url: Option<&str>,
) -> (Arc<dyn ConversationStore>, Arc<dyn DiagnosisRecorder>) {
    let Some(database_url) = database_url else {
        warn!("DATABASE_URL not set; conversation state and diagnoses are kept in memory only");
        return in_memory_stores();
    };

    let pool = match PgPoolOptions::new().max_connections(10).connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to PostgreSQL, falling back to memory: {e}");
            return in_memory_stores();
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("Failed to run database migrations, falling back to memory: {e}");
        return in_memory_stores();
    }
    info!("Database connection established and migrations applied");

    (
        Arc::new(ConversationRepository::new(pool.clone())),
        Arc::new(DiagnosisRepository::new(pool)),
    )
}

fn in_memory_stores() -> (Arc<dyn ConversationStore>, Arc<dyn DiagnosisRecorder>) {
    (
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(InMemoryDiagnosisRecorder::new()),
    )
}
