use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::error;

use super::ConversationStore;
use crate::errors::AppError;
use crate::models::{DiagnosisDraft, Stage, UserConversationState};

#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn corrupt(user_id: &str, message: impl Into<String>) -> AppError {
    AppError::CorruptState { user_id: user_id.to_string(), message: message.into() }
}

/// Builds a state from the stored stage string and draft JSON.
fn decode_state(
    user_id: &str,
    stage: String,
    draft: serde_json::Value,
) -> Result<UserConversationState, AppError> {
    let state = UserConversationState {
        user_id: user_id.to_string(),
        stage: Stage::try_from(stage).map_err(|e| corrupt(user_id, e))?,
        draft: serde_json::from_value(draft).map_err(|e| corrupt(user_id, e.to_string()))?,
    };
    state.validate().map_err(|e| corrupt(user_id, e))?;
    Ok(state)
}

#[async_trait]
impl ConversationStore for ConversationRepository {
    async fn get_state(&self, user_id: &str) -> Result<UserConversationState, AppError> {
        let row = sqlx::query("SELECT stage, draft FROM user_states WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch state for user {user_id}: {e}");
                AppError::db_query(format!("Failed to fetch state for user {user_id}"), e)
            })?;

        let Some(row) = row else {
            return Ok(UserConversationState::idle(user_id));
        };

        let stage: String = row
            .try_get("stage")
            .map_err(|e| AppError::db_query("Failed to read stage", e))?;
        let draft: serde_json::Value = row
            .try_get("draft")
            .map_err(|e| AppError::db_query("Failed to read draft", e))?;

        decode_state(user_id, stage, draft)
    }

    async fn set_state(&self, user_id: &str, stage: Stage, draft: &DiagnosisDraft) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_states (user_id, stage, draft, updated_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE
             SET stage = EXCLUDED.stage, draft = EXCLUDED.draft, updated_at = EXCLUDED.updated_at",
        )
        .bind(user_id)
        .bind(stage.as_str())
        .bind(Json(draft))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update state for user {user_id}: {e}");
            AppError::db_query("Failed to update user state", e)
        })?;
        Ok(())
    }
}
