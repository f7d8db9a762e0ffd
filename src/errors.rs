use thiserror::Error;

/// Top-level application error.
/// All variants carry a human-readable message for display/logging.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Gateway errors ───────────────────────────────────────────────────────
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid webhook payload: {message}")]
    InvalidPayload { message: String },

    // ── Classifier errors ────────────────────────────────────────────────────
    #[error("Image model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Image could not be decoded: {message}")]
    ImageDecode { message: String },

    #[error("Inference error: {message}")]
    Inference { message: String },

    // ── Database errors ──────────────────────────────────────────────────────
    #[error("Database query failed: {message}")]
    DatabaseQueryFailed {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Stored conversation state for '{user_id}' is corrupt: {message}")]
    CorruptState { user_id: String, message: String },

    // ── Messaging platform errors ────────────────────────────────────────────
    #[error("Messaging platform request failed: {message}")]
    PlatformRequest { message: String },

    // ── System errors ────────────────────────────────────────────────────────
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn db_query(message: impl Into<String>, source: sqlx::Error) -> Self {
        AppError::DatabaseQueryFailed { message: message.into(), source }
    }

    pub fn platform(message: impl Into<String>) -> Self {
        AppError::PlatformRequest { message: message.into() }
    }

    /// Errors caused by the caller rather than by this service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidSignature | AppError::InvalidPayload { .. })
    }
}
