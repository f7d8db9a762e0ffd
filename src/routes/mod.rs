pub mod webhook_routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::line::MessagingPlatform;
use crate::service::conversation_controller::ConversationController;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the signing secret is not configured; every webhook is then rejected.
    pub channel_secret: Option<Arc<str>>,
    pub controller: ConversationController,
    pub platform: Arc<dyn MessagingPlatform>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/callback",
            get(webhook_routes::verify_handler).post(webhook_routes::webhook_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
