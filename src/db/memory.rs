//! Process-lifetime stores, used when no database is configured.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{ConversationStore, DiagnosisRecorder};
use crate::errors::AppError;
use crate::models::{DiagnosisDraft, DiagnosisRecord, NewDiagnosisRecord, Stage, UserConversationState};

#[derive(Default)]
pub struct InMemoryConversationStore {
    states: Mutex<HashMap<String, (Stage, DiagnosisDraft)>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get_state(&self, user_id: &str) -> Result<UserConversationState, AppError> {
        let states = self
            .states
            .lock()
            .map_err(|_| AppError::Unexpected("state map lock poisoned".to_string()))?;
        Ok(match states.get(user_id) {
            Some((stage, draft)) => UserConversationState {
                user_id: user_id.to_string(),
                stage: *stage,
                draft: draft.clone(),
            },
            None => UserConversationState::idle(user_id),
        })
    }

    async fn set_state(&self, user_id: &str, stage: Stage, draft: &DiagnosisDraft) -> Result<(), AppError> {
        self.states
            .lock()
            .map_err(|_| AppError::Unexpected("state map lock poisoned".to_string()))?
            .insert(user_id.to_string(), (stage, draft.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDiagnosisRecorder {
    records: Mutex<Vec<DiagnosisRecord>>,
}

impl InMemoryDiagnosisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn records(&self) -> Vec<DiagnosisRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiagnosisRecorder for InMemoryDiagnosisRecorder {
    async fn append(&self, record: &NewDiagnosisRecord) -> Result<DiagnosisRecord, AppError> {
        let stored = DiagnosisRecord::from_new(record, Utc::now());
        self.records
            .lock()
            .map_err(|_| AppError::Unexpected("record log lock poisoned".to_string()))?
            .push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassificationResult, SkinCondition};

    #[tokio::test]
    async fn unknown_user_is_idle() {
        let store = InMemoryConversationStore::new();
        let state = store.get_state("U-never-seen").await.unwrap();
        assert_eq!(state, UserConversationState::idle("U-never-seen"));
    }

    #[tokio::test]
    async fn set_state_is_idempotent() {
        let store = InMemoryConversationStore::new();
        let result = ClassificationResult { label: SkinCondition::Cut, confidence: 0.4 };
        let draft = DiagnosisDraft::from_classification(&result);

        store.set_state("U1", Stage::AwaitingLocation, &draft).await.unwrap();
        let once = store.get_state("U1").await.unwrap();
        store.set_state("U1", Stage::AwaitingLocation, &draft).await.unwrap();
        let twice = store.get_state("U1").await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.stage, Stage::AwaitingLocation);
    }

    #[tokio::test]
    async fn last_writer_wins() {
        let store = InMemoryConversationStore::new();
        let result = ClassificationResult { label: SkinCondition::Cut, confidence: 0.4 };
        store
            .set_state("U1", Stage::AwaitingLocation, &DiagnosisDraft::from_classification(&result))
            .await
            .unwrap();
        store.set_state("U1", Stage::Idle, &DiagnosisDraft::default()).await.unwrap();
        assert_eq!(store.get_state("U1").await.unwrap(), UserConversationState::idle("U1"));
    }

    #[tokio::test]
    async fn recorder_assigns_id_and_timestamp() {
        let recorder = InMemoryDiagnosisRecorder::new();
        let before = Utc::now();
        let stored = recorder
            .append(&NewDiagnosisRecord {
                user_id: "U1".into(),
                predicted_class: SkinCondition::Acne,
                confidence: 0.66,
                location: "face".into(),
                other_symptoms: "itchy".into(),
            })
            .await
            .unwrap();
        assert!(!stored.id.is_empty());
        assert!(stored.created_at >= before);
        assert_eq!(recorder.records(), vec![stored]);
    }
}
