//! Pure per-user dialogue transitions.
//!
//! `transition` performs no I/O: the controller classifies images first, then
//! feeds the outcome in as an [`Event`] and carries out the returned writes.

use std::str::FromStr;

use super::replies::Reply;
use crate::catalog::AdviceCatalog;
use crate::classifier::ClassificationResult;
use crate::models::{NewDiagnosisRecord, Stage, UserConversationState, NO_OTHER_SYMPTOMS};

const GREETING_KEYWORDS: &[&str] = &["สวัสดี", "hi"];
const ABOUT_KEYWORDS: &[&str] = &["คืออะไร", "ทำอะไรได้"];
const THANKS_KEYWORDS: &[&str] = &["ขอบคุณ"];
const NONE_PHRASES: &[&str] = &["ไม่มี", "none"];

/// Whether symptom keywords are checked before the dialogue stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeywordPrecedence {
    /// A recognized symptom keyword always gets symptom advice, even mid-dialogue,
    /// and the dialogue does not advance.
    #[default]
    SymptomFirst,
    /// Symptom keywords are only recognized while idle.
    StageFirst,
}

impl FromStr for KeywordPrecedence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symptom_first" => Ok(KeywordPrecedence::SymptomFirst),
            "stage_first" => Ok(KeywordPrecedence::StageFirst),
            other => Err(format!("Unknown keyword precedence: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Text(String),
    Classified(ClassificationResult),
    /// Image could not be fetched, decoded, or run through the model.
    ImageFailed(String),
    ClassifierUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub reply: Reply,
    /// `None` leaves the stored state untouched.
    pub next_state: Option<UserConversationState>,
    pub record: Option<NewDiagnosisRecord>,
}

impl Transition {
    fn reply(reply: Reply) -> Self {
        Self { reply, next_state: None, record: None }
    }

    fn to(reply: Reply, next_state: UserConversationState) -> Self {
        Self { reply, next_state: Some(next_state), record: None }
    }
}

struct TextInput<'a> {
    raw: &'a str,
    lowered: String,
}

type IdleRule = fn(&TextInput<'_>, &AdviceCatalog) -> Option<Reply>;

/// Evaluated top to bottom while idle; first match wins.
const IDLE_RULES: &[IdleRule] = &[symptom_rule, greeting_rule, about_rule, thanks_rule];

fn symptom_rule(input: &TextInput<'_>, catalog: &AdviceCatalog) -> Option<Reply> {
    catalog.symptom_advice(input.raw).map(Reply::SymptomAdvice)
}

fn greeting_rule(input: &TextInput<'_>, _: &AdviceCatalog) -> Option<Reply> {
    contains_any(&input.lowered, GREETING_KEYWORDS).then_some(Reply::Greeting)
}

fn about_rule(input: &TextInput<'_>, _: &AdviceCatalog) -> Option<Reply> {
    contains_any(&input.lowered, ABOUT_KEYWORDS).then_some(Reply::About)
}

fn thanks_rule(input: &TextInput<'_>, _: &AdviceCatalog) -> Option<Reply> {
    contains_any(&input.lowered, THANKS_KEYWORDS).then_some(Reply::Thanks)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Maps a "nothing else" answer to the stored sentinel; other answers are trimmed.
pub fn normalize_other_symptoms(text: &str) -> String {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();
    if NONE_PHRASES.iter().any(|p| lowered == *p) {
        NO_OTHER_SYMPTOMS.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn transition(
    state: &UserConversationState,
    event: Event,
    catalog: &AdviceCatalog,
    precedence: KeywordPrecedence,
) -> Transition {
    match event {
        Event::Classified(result) => Transition::to(
            Reply::Diagnosis { result, advice: catalog.class_advice(result.label) },
            UserConversationState::awaiting_location(&state.user_id, &result),
        ),
        Event::ClassifierUnavailable => Transition::reply(Reply::ModelUnavailable),
        Event::ImageFailed(reason) => Transition::reply(Reply::ImageError { reason }),
        Event::Text(text) => text_transition(state, &text, catalog, precedence),
    }
}

fn text_transition(
    state: &UserConversationState,
    text: &str,
    catalog: &AdviceCatalog,
    precedence: KeywordPrecedence,
) -> Transition {
    let input = TextInput { raw: text, lowered: text.to_lowercase() };

    if precedence == KeywordPrecedence::SymptomFirst {
        if let Some(reply) = symptom_rule(&input, catalog) {
            return Transition::reply(reply);
        }
    }

    match state.stage {
        Stage::AwaitingLocation => Transition::to(Reply::AskOtherSymptoms, state.with_location(text)),
        Stage::AwaitingOtherSymptoms => {
            let other_symptoms = normalize_other_symptoms(text);
            match NewDiagnosisRecord::complete(state, other_symptoms) {
                Some(record) => Transition {
                    reply: Reply::RecordSaved,
                    next_state: Some(UserConversationState::idle(&state.user_id)),
                    record: Some(record),
                },
                // Incomplete draft: nothing worth saving, start over.
                None => Transition::to(Reply::Unrecognized, UserConversationState::idle(&state.user_id)),
            }
        }
        Stage::Idle => Transition::reply(
            IDLE_RULES
                .iter()
                .find_map(|rule| rule(&input, catalog))
                .unwrap_or(Reply::Unrecognized),
        ),
    }
}
