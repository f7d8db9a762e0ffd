use std::sync::Arc;

use tracing::{error, info, warn};

use super::flow::{self, Event, KeywordPrecedence};
use crate::catalog::AdviceCatalog;
use crate::classifier::ClassifierClient;
use crate::db::{ConversationStore, DiagnosisRecorder};
use crate::errors::AppError;
use crate::line::events::IncomingContent;
use crate::line::MessagingPlatform;
use crate::models::UserConversationState;

/// Drives one user's dialogue per inbound message.
///
/// State is read and written back within a single call and never cached.
/// Persistence is best effort: failures are logged and the reply still goes out.
#[derive(Clone)]
pub struct ConversationController {
    conversations: Arc<dyn ConversationStore>,
    diagnoses: Arc<dyn DiagnosisRecorder>,
    classifier: ClassifierClient,
    platform: Arc<dyn MessagingPlatform>,
    catalog: AdviceCatalog,
    precedence: KeywordPrecedence,
}

impl ConversationController {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        diagnoses: Arc<dyn DiagnosisRecorder>,
        classifier: ClassifierClient,
        platform: Arc<dyn MessagingPlatform>,
        catalog: AdviceCatalog,
        precedence: KeywordPrecedence,
    ) -> Self {
        Self { conversations, diagnoses, classifier, platform, catalog, precedence }
    }

    /// Handles one inbound message and returns the reply text.
    pub async fn handle(&self, user_id: &str, content: IncomingContent) -> String {
        let state = self.load_state(user_id).await;

        let event = match content {
            IncomingContent::Text(text) => Event::Text(text),
            IncomingContent::Image { message_id } => self.classify_image(user_id, &message_id).await,
        };

        let transition = flow::transition(&state, event, &self.catalog, self.precedence);

        if let Some(record) = &transition.record {
            match self.diagnoses.append(record).await {
                Ok(stored) => info!("Diagnosis record {} saved for user {user_id}", stored.id),
                Err(e) => error!("Failed to save diagnosis record for user {user_id}: {e}"),
            }
        }

        if let Some(next) = &transition.next_state {
            match self.conversations.set_state(user_id, next.stage, &next.draft).await {
                Ok(()) => info!("User {user_id} state updated: {} -> {}", state.stage, next.stage),
                Err(e) => error!("Failed to update state for user {user_id}: {e}"),
            }
        }

        transition.reply.render()
    }

    /// Read failures and corrupt rows fall back to a fresh idle state.
    async fn load_state(&self, user_id: &str) -> UserConversationState {
        let state = match self.conversations.get_state(user_id).await {
            Ok(state) => state,
            Err(e @ AppError::CorruptState { .. }) => {
                warn!("{e}; treating user {user_id} as idle");
                return UserConversationState::idle(user_id);
            }
            Err(e) => {
                error!("Failed to load state for user {user_id}, treating as idle: {e}");
                return UserConversationState::idle(user_id);
            }
        };
        if let Err(reason) = state.validate() {
            warn!("Stored state for user {user_id} is inconsistent ({reason}); treating as idle");
            return UserConversationState::idle(user_id);
        }
        state
    }

    async fn classify_image(&self, user_id: &str, message_id: &str) -> Event {
        if !self.classifier.is_available() {
            warn!("Image from user {user_id} received while the image model is unavailable");
            return Event::ClassifierUnavailable;
        }

        let bytes = match self.platform.fetch_content(message_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to fetch image {message_id} for user {user_id}: {e}");
                return Event::ImageFailed(e.to_string());
            }
        };

        match self.classifier.classify_bytes(bytes).await {
            Ok(result) => {
                info!(
                    "Image from user {user_id} classified as {} ({:.2})",
                    result.label, result.confidence
                );
                Event::Classified(result)
            }
            Err(AppError::ModelUnavailable { .. }) => Event::ClassifierUnavailable,
            Err(e) => {
                error!("Error processing image {message_id} for user {user_id}: {e}");
                Event::ImageFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{SkinCondition, LABEL_COUNT};
    use crate::db::memory::{InMemoryConversationStore, InMemoryDiagnosisRecorder};
    use crate::models::{DiagnosisDraft, Stage, NO_OTHER_SYMPTOMS};
    use crate::testing::{png_bytes, CorruptRowStore, FailingStore, FixedScores, RecordingPlatform};

    struct Harness {
        controller: ConversationController,
        states: Arc<InMemoryConversationStore>,
        records: Arc<InMemoryDiagnosisRecorder>,
    }

    fn scores_for(label_index: usize) -> Vec<f32> {
        let mut scores = vec![0.01; LABEL_COUNT];
        scores[label_index] = 0.82;
        scores
    }

    fn harness(classifier: ClassifierClient, platform: RecordingPlatform) -> Harness {
        let states = Arc::new(InMemoryConversationStore::new());
        let records = Arc::new(InMemoryDiagnosisRecorder::new());
        let controller = ConversationController::new(
            states.clone(),
            records.clone(),
            classifier,
            Arc::new(platform),
            AdviceCatalog::builtin(),
            KeywordPrecedence::SymptomFirst,
        );
        Harness { controller, states, records }
    }

    fn ready_harness() -> Harness {
        harness(
            ClassifierClient::Ready(Arc::new(FixedScores(scores_for(2)))),
            RecordingPlatform::with_content("img-1", png_bytes(32, 32, [200, 150, 140])),
        )
    }

    fn image() -> IncomingContent {
        IncomingContent::Image { message_id: "img-1".into() }
    }

    fn text(t: &str) -> IncomingContent {
        IncomingContent::Text(t.into())
    }

    #[tokio::test]
    async fn full_dialogue_writes_exactly_one_record() {
        let h = ready_harness();

        let reply = h.controller.handle("U1", image()).await;
        assert!(reply.contains("Actinic Keratosis"));
        assert_eq!(h.states.get_state("U1").await.unwrap().stage, Stage::AwaitingLocation);

        h.controller.handle("U1", text("left arm")).await;
        assert_eq!(h.states.get_state("U1").await.unwrap().stage, Stage::AwaitingOtherSymptoms);

        h.controller.handle("U1", text("itchy")).await;
        assert_eq!(h.states.get_state("U1").await.unwrap(), UserConversationState::idle("U1"));

        let records = h.records.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "U1");
        assert_eq!(records[0].location, "left arm");
        assert_eq!(records[0].other_symptoms, "itchy");
        assert_eq!(records[0].predicted_class_english, "Actinic Keratosis");
        assert!((records[0].confidence - 0.82).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn none_answer_is_stored_as_sentinel() {
        let h = ready_harness();
        h.controller.handle("U1", image()).await;
        h.controller.handle("U1", text("ใบหน้า")).await;
        h.controller.handle("U1", text("ไม่มี")).await;
        assert_eq!(h.records.records()[0].other_symptoms, NO_OTHER_SYMPTOMS);
    }

    #[tokio::test]
    async fn greeting_for_new_user_keeps_idle() {
        let h = ready_harness();
        let reply = h.controller.handle("U-new", text("สวัสดี")).await;
        assert!(reply.starts_with("สวัสดีครับ"));
        assert_eq!(h.states.get_state("U-new").await.unwrap(), UserConversationState::idle("U-new"));
    }

    #[tokio::test]
    async fn unavailable_model_changes_nothing() {
        let h = harness(
            ClassifierClient::Unavailable { reason: "no model".into() },
            RecordingPlatform::with_content("img-1", png_bytes(8, 8, [0, 0, 0])),
        );
        let reply = h.controller.handle("U1", image()).await;
        assert!(reply.contains("โมเดล AI ยังไม่พร้อมให้บริการ"));
        assert_eq!(h.states.get_state("U1").await.unwrap(), UserConversationState::idle("U1"));
        assert!(h.records.records().is_empty());
    }

    #[tokio::test]
    async fn corrupt_image_reports_cause_and_keeps_stage() {
        let h = harness(
            ClassifierClient::Ready(Arc::new(FixedScores(scores_for(0)))),
            RecordingPlatform::with_content("img-1", b"GIF89a-truncated".to_vec()),
        );
        let draft = DiagnosisDraft::from_classification(&crate::classifier::ClassificationResult {
            label: SkinCondition::Cut,
            confidence: 0.3,
        });
        h.states.set_state("U1", Stage::AwaitingLocation, &draft).await.unwrap();
        let before = h.states.get_state("U1").await.unwrap();

        let reply = h.controller.handle("U1", image()).await;
        assert!(reply.starts_with("ขออภัยครับ เกิดข้อผิดพลาดในการประมวลผลรูปภาพ: Image could not be decoded"));
        assert_eq!(h.states.get_state("U1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn missing_content_is_reported_as_image_error() {
        let h = harness(
            ClassifierClient::Ready(Arc::new(FixedScores(scores_for(0)))),
            RecordingPlatform::default(),
        );
        let reply = h.controller.handle("U1", image()).await;
        assert!(reply.contains("ขออภัยครับ เกิดข้อผิดพลาดในการประมวลผลรูปภาพ"));
        assert_eq!(h.states.get_state("U1").await.unwrap().stage, Stage::Idle);
    }

    #[tokio::test]
    async fn persistence_failures_do_not_block_reply() {
        let failing = Arc::new(FailingStore);
        let controller = ConversationController::new(
            failing.clone(),
            failing,
            ClassifierClient::Ready(Arc::new(FixedScores(scores_for(5)))),
            Arc::new(RecordingPlatform::with_content("img-1", png_bytes(8, 8, [9, 9, 9]))),
            AdviceCatalog::builtin(),
            KeywordPrecedence::SymptomFirst,
        );
        let reply = controller.handle("U1", image()).await;
        assert!(reply.contains("Burns"));
        // Read failure falls back to idle, so a plain text is treated as idle text.
        let reply = controller.handle("U1", text("ขอบคุณ")).await;
        assert!(reply.starts_with("ยินดีครับ"));
    }

    #[tokio::test]
    async fn corrupt_stored_row_is_read_as_idle() {
        let store = Arc::new(CorruptRowStore::default());
        let records = Arc::new(InMemoryDiagnosisRecorder::new());
        let controller = ConversationController::new(
            store.clone(),
            records.clone(),
            ClassifierClient::Unavailable { reason: "no model".into() },
            Arc::new(RecordingPlatform::default()),
            AdviceCatalog::builtin(),
            KeywordPrecedence::SymptomFirst,
        );

        // Read as idle, so this is a greeting rather than a location answer.
        let reply = controller.handle("U1", text("hi")).await;
        assert!(reply.starts_with("สวัสดีครับ"));
        assert!(store.writes().is_empty());
        assert!(records.records().is_empty());
    }

    #[tokio::test]
    async fn inconsistent_stored_state_is_treated_as_idle() {
        let h = ready_harness();
        // Awaiting other symptoms without any prediction.
        h.states
            .set_state("U1", Stage::AwaitingOtherSymptoms, &DiagnosisDraft::default())
            .await
            .unwrap();
        let reply = h.controller.handle("U1", text("hi")).await;
        assert!(reply.starts_with("สวัสดีครับ"));
        assert!(h.records.records().is_empty());
    }

    #[tokio::test]
    async fn symptom_keyword_mid_dialogue_does_not_advance() {
        let h = ready_harness();
        h.controller.handle("U1", image()).await;
        let reply = h.controller.handle("U1", text("ปวดท้องนิดหน่อย")).await;
        assert!(reply.contains("อาการปวดท้อง"));
        assert_eq!(h.states.get_state("U1").await.unwrap().stage, Stage::AwaitingLocation);
    }
}
