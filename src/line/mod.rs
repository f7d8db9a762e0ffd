pub mod events;
pub mod signature;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::AppError;

/// Outbound side of the messaging platform.
#[async_trait]
pub trait MessagingPlatform: Send + Sync {
    /// Sends one text message addressed by a one-shot reply token.
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), AppError>;

    /// Downloads the binary content of a user-sent message.
    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, AppError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> ReplyRequest<'a> {
    fn text(reply_token: &'a str, text: &'a str) -> Self {
        Self { reply_token, messages: [TextMessage { kind: "text", text }] }
    }
}

/// Messaging API client over reqwest.
#[derive(Clone)]
pub struct LineClient {
    http: reqwest::Client,
    access_token: Option<String>,
    api_base_url: String,
    data_api_base_url: String,
}

impl LineClient {
    pub fn new(
        access_token: Option<String>,
        api_base_url: impl Into<String>,
        data_api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            data_api_base_url: data_api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn token(&self) -> Result<&str, AppError> {
        self.access_token
            .as_deref()
            .ok_or_else(|| AppError::platform("channel access token is not configured"))
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("{what} failed with {status}: {body}");
        Err(AppError::platform(format!("{what} failed with {status}: {body}")))
    }
}

#[async_trait]
impl MessagingPlatform for LineClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.api_base_url))
            .bearer_auth(self.token()?)
            .json(&ReplyRequest::text(reply_token, text))
            .send()
            .await
            .map_err(|e| AppError::platform(format!("reply request failed: {e}")))?;
        Self::check(response, "reply").await?;
        debug!("Reply sent ({} chars)", text.chars().count());
        Ok(())
    }

    async fn fetch_content(&self, message_id: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .http
            .get(format!("{}/v2/bot/message/{message_id}/content", self.data_api_base_url))
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| AppError::platform(format!("content request failed: {e}")))?;
        let bytes = Self::check(response, "content download")
            .await?
            .bytes()
            .await
            .map_err(|e| AppError::platform(format!("content body read failed: {e}")))?;
        Ok(bytes.to_vec())
    }
}
