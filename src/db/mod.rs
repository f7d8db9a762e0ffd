pub mod conversation_repository;
pub mod diagnosis_repository;
pub mod memory;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{DiagnosisDraft, DiagnosisRecord, NewDiagnosisRecord, Stage, UserConversationState};

/// Per-user conversation state, keyed by the platform's user id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Returns the default idle state for users never seen before.
    async fn get_state(&self, user_id: &str) -> Result<UserConversationState, AppError>;

    /// Upsert, last writer wins.
    async fn set_state(&self, user_id: &str, stage: Stage, draft: &DiagnosisDraft) -> Result<(), AppError>;
}

/// Append-only log of completed diagnoses.
#[async_trait]
pub trait DiagnosisRecorder: Send + Sync {
    async fn append(&self, record: &NewDiagnosisRecord) -> Result<DiagnosisRecord, AppError>;
}
