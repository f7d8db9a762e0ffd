use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassificationResult, SkinCondition};

/// Stored in place of the user's text when they report no other symptoms.
pub const NO_OTHER_SYMPTOMS: &str = "ไม่มี";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    #[serde(rename = "waiting_for_location")]
    AwaitingLocation,
    #[serde(rename = "waiting_for_other_symptoms")]
    AwaitingOtherSymptoms,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::AwaitingLocation => "waiting_for_location",
            Stage::AwaitingOtherSymptoms => "waiting_for_other_symptoms",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Stage {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "idle" => Ok(Stage::Idle),
            "waiting_for_location" => Ok(Stage::AwaitingLocation),
            "waiting_for_other_symptoms" => Ok(Stage::AwaitingOtherSymptoms),
            other => Err(format!("Unknown stage: {other}")),
        }
    }
}

/// In-progress diagnosis fields accumulated across dialogue turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisDraft {
    #[serde(default, rename = "predicted_class_english", skip_serializing_if = "Option::is_none")]
    pub predicted_class: Option<SkinCondition>,
    /// Display copy of the label; records derive it from `predicted_class`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_class_thai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_symptoms: Option<String>,
}

impl DiagnosisDraft {
    pub fn from_classification(result: &ClassificationResult) -> Self {
        Self {
            predicted_class: Some(result.label),
            predicted_class_thai: Some(result.label.thai_name().to_string()),
            confidence: Some(result.confidence),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserConversationState {
    pub user_id: String,
    pub stage: Stage,
    pub draft: DiagnosisDraft,
}

impl UserConversationState {
    pub fn idle(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), stage: Stage::Idle, draft: DiagnosisDraft::default() }
    }

    pub fn awaiting_location(user_id: impl Into<String>, result: &ClassificationResult) -> Self {
        Self {
            user_id: user_id.into(),
            stage: Stage::AwaitingLocation,
            draft: DiagnosisDraft::from_classification(result),
        }
    }

    pub fn with_location(&self, location: impl Into<String>) -> Self {
        let mut draft = self.draft.clone();
        draft.location = Some(location.into());
        Self { user_id: self.user_id.clone(), stage: Stage::AwaitingOtherSymptoms, draft }
    }

    /// Checks the stage/draft invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self.stage {
            Stage::Idle if !self.draft.is_empty() => Err("idle state carries a draft".to_string()),
            Stage::AwaitingLocation | Stage::AwaitingOtherSymptoms
                if self.draft.predicted_class.is_none() || self.draft.confidence.is_none() =>
            {
                Err(format!("{} state lacks a prediction", self.stage))
            }
            Stage::AwaitingOtherSymptoms if self.draft.location.is_none() => {
                Err("waiting_for_other_symptoms state lacks a location".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// A completed dialogue, ready to append. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDiagnosisRecord {
    pub user_id: String,
    pub predicted_class: SkinCondition,
    pub confidence: f32,
    pub location: String,
    pub other_symptoms: String,
}

impl NewDiagnosisRecord {
    /// Completes the draft of a user awaiting other symptoms.
    pub fn complete(state: &UserConversationState, other_symptoms: String) -> Option<Self> {
        Some(Self {
            user_id: state.user_id.clone(),
            predicted_class: state.draft.predicted_class?,
            confidence: state.draft.confidence?,
            location: state.draft.location.clone()?,
            other_symptoms,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisRecord {
    pub id: String,
    pub user_id: String,
    pub predicted_class_english: String,
    pub predicted_class_thai: String,
    pub confidence: f32,
    pub location: String,
    pub other_symptoms: String,
    pub created_at: DateTime<Utc>,
}

impl DiagnosisRecord {
    pub fn from_new(record: &NewDiagnosisRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: record.user_id.clone(),
            predicted_class_english: record.predicted_class.english_name().to_string(),
            predicted_class_thai: record.predicted_class.thai_name().to_string(),
            confidence: record.confidence,
            location: record.location.clone(),
            other_symptoms: record.other_symptoms.clone(),
            created_at,
        }
    }
}
