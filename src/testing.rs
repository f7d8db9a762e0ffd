//! Test doubles shared across module tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::classifier::{ImageModel, PreparedImage};
use crate::db::{ConversationStore, DiagnosisRecorder};
use crate::errors::AppError;
use crate::line::MessagingPlatform;
use crate::models::{DiagnosisDraft, DiagnosisRecord, NewDiagnosisRecord, Stage, UserConversationState};

/// Returns the same scores for every image.
pub struct FixedScores(pub Vec<f32>);

impl ImageModel for FixedScores {
    fn scores(&self, _image: &PreparedImage) -> Result<Vec<f32>, AppError> {
        Ok(self.0.clone())
    }
}

pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Captures replies and serves canned message content.
#[derive(Default)]
pub struct RecordingPlatform {
    content: HashMap<String, Vec<u8>>,
    replies: Mutex<Vec<(String, String)>>,
    fail_replies: bool,
}

impl RecordingPlatform {
    pub fn with_content(message_id: &str, bytes: Vec<u8>) -> Self {
        let mut platform = Self::default();
        platform.content.insert(message_id.to_string(), bytes);
        platform
    }

    pub fn failing_replies() -> Self {
        Self { fail_replies: true, ..Self::default() }
    }

    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingPlatform for RecordingPlatform {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), AppError> {
        if self.fail_replies {
            return Err(AppError::PlatformRequest { message: "reply rejected".into() });
        }
        self.replies.lock().unwrap().push((reply_token.to_string(), text.to_string()));
        Ok(())
    }

    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, AppError> {
        self.content
            .get(message_id)
            .cloned()
            .ok_or_else(|| AppError::PlatformRequest { message: format!("no content for {message_id}") })
    }
}

/// A store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl ConversationStore for FailingStore {
    async fn get_state(&self, _user_id: &str) -> Result<UserConversationState, AppError> {
        Err(AppError::Unexpected("store offline".into()))
    }

    async fn set_state(&self, _user_id: &str, _stage: Stage, _draft: &DiagnosisDraft) -> Result<(), AppError> {
        Err(AppError::Unexpected("store offline".into()))
    }
}

#[async_trait]
impl DiagnosisRecorder for FailingStore {
    async fn append(&self, _record: &NewDiagnosisRecord) -> Result<DiagnosisRecord, AppError> {
        Err(AppError::Unexpected("store offline".into()))
    }
}

/// Reports every stored row as corrupt and accepts writes.
#[derive(Default)]
pub struct CorruptRowStore {
    writes: Mutex<Vec<(String, Stage)>>,
}

impl CorruptRowStore {
    pub fn writes(&self) -> Vec<(String, Stage)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for CorruptRowStore {
    async fn get_state(&self, user_id: &str) -> Result<UserConversationState, AppError> {
        Err(AppError::CorruptState {
            user_id: user_id.to_string(),
            message: "Unknown stage: waiting_for_photo".into(),
        })
    }

    async fn set_state(&self, user_id: &str, stage: Stage, _draft: &DiagnosisDraft) -> Result<(), AppError> {
        self.writes.lock().unwrap().push((user_id.to_string(), stage));
        Ok(())
    }
}
