//! Webhook payload as delivered by the platform.

use serde::Deserialize;
use tracing::{debug, warn};

/// Events stay raw until [`WebhookPayload::into_messages`] so one bad event
/// cannot sink the rest of the batch.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Absent for events delivered in standby mode.
    #[serde(default)]
    pub reply_token: Option<String>,
    pub source: EventSource,
    pub message: EventMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text { id: String, text: String },
    Image { id: String },
    #[serde(other)]
    Other,
}

/// What the conversation controller acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingContent {
    Text(String),
    Image { message_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub reply_token: String,
    pub user_id: String,
    pub content: IncomingContent,
}

impl WebhookPayload {
    /// Text and image messages from identifiable users, in delivery order.
    pub fn into_messages(self) -> Vec<InboundMessage> {
        self.events
            .into_iter()
            .filter_map(|raw| {
                let event = match serde_json::from_value::<WebhookEvent>(raw) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Skipping malformed webhook event: {e}");
                        return None;
                    }
                };
                let WebhookEvent::Message(event) = event else {
                    debug!("Ignoring non-message webhook event");
                    return None;
                };
                let Some(reply_token) = event.reply_token else {
                    debug!("Ignoring message event without a reply token");
                    return None;
                };
                let Some(user_id) = event.source.user_id else {
                    debug!("Ignoring message from {} source without a user id", event.source.kind);
                    return None;
                };
                let content = match event.message {
                    EventMessage::Text { id, text } => {
                        debug!("Text message {id} from user {user_id}");
                        IncomingContent::Text(text)
                    }
                    EventMessage::Image { id } => IncomingContent::Image { message_id: id },
                    EventMessage::Other => {
                        debug!("Ignoring unsupported message type from user {user_id}");
                        return None;
                    }
                };
                Some(InboundMessage { reply_token, user_id, content })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "destination": "Uxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
        "events": [
            {
                "type": "message",
                "mode": "active",
                "timestamp": 1462629479859,
                "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
                "deliveryContext": { "isRedelivery": false },
                "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                "source": { "type": "user", "userId": "U4af4980629" },
                "message": { "id": "444573844083572737", "type": "text", "text": "สวัสดี" }
            },
            {
                "type": "message",
                "replyToken": "b60d1f6d3b9f4b13",
                "source": { "type": "user", "userId": "U4af4980629" },
                "message": { "id": "325708", "type": "image", "contentProvider": { "type": "line" } }
            },
            {
                "type": "message",
                "replyToken": "sticker-token",
                "source": { "type": "user", "userId": "U4af4980629" },
                "message": { "id": "1", "type": "sticker", "packageId": "1", "stickerId": "1" }
            },
            {
                "type": "message",
                "replyToken": "group-token",
                "source": { "type": "group", "groupId": "Ca56f94637c" },
                "message": { "id": "2", "type": "text", "text": "hi" }
            },
            {
                "type": "follow",
                "replyToken": "follow-token",
                "source": { "type": "user", "userId": "U4af4980629" }
            }
        ]
    }"#;

    #[test]
    fn keeps_text_and_image_messages_only() {
        let payload: WebhookPayload = serde_json::from_str(PAYLOAD).unwrap();
        assert_eq!(payload.events.len(), 5);

        let messages = payload.into_messages();
        assert_eq!(
            messages,
            vec![
                InboundMessage {
                    reply_token: "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA".into(),
                    user_id: "U4af4980629".into(),
                    content: IncomingContent::Text("สวัสดี".into()),
                },
                InboundMessage {
                    reply_token: "b60d1f6d3b9f4b13".into(),
                    user_id: "U4af4980629".into(),
                    content: IncomingContent::Image { message_id: "325708".into() },
                },
            ]
        );
    }

    #[test]
    fn bad_events_are_skipped_without_losing_the_batch() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "events": [
                    {
                        "type": "message",
                        "mode": "standby",
                        "source": { "type": "user", "userId": "U2" },
                        "message": { "id": "7", "type": "text", "text": "hello" }
                    },
                    { "type": "message", "replyToken": "broken", "message": 42 },
                    {
                        "type": "message",
                        "replyToken": "r1",
                        "source": { "type": "user", "userId": "U1" },
                        "message": { "id": "8", "type": "text", "text": "ขอบคุณ" }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            payload.into_messages(),
            vec![InboundMessage {
                reply_token: "r1".into(),
                user_id: "U1".into(),
                content: IncomingContent::Text("ขอบคุณ".into()),
            }]
        );
    }

    #[test]
    fn verification_payload_has_no_messages() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"destination":"U1","events":[]}"#).unwrap();
        assert!(payload.into_messages().is_empty());
    }
}
