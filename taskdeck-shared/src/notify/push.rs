/// Push delivery through the Expo push service
///
/// One HTTP POST per notification, no retry. Expo answers `200` even for a
/// rejected message, so the per-message `status` in the response body is
/// checked as well.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Notification;

/// Expo's public push endpoint
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for push delivery
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Push service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Push rejected: {0}")]
    Rejected(String),

    #[error("Invalid push token")]
    InvalidToken,
}

/// Push settings
///
/// Only built when push is enabled. `endpoint` defaults to Expo's URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    pub endpoint: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PUSH_ENDPOINT.to_string(),
        }
    }
}

impl PushConfig {
    /// Whether the endpoint is an absolute http(s) URL
    pub fn has_valid_endpoint(&self) -> bool {
        reqwest::Url::parse(&self.endpoint)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
    }
}

/// Whether a string looks like an Expo push token
///
/// Accepts `ExponentPushToken[...]` and `ExpoPushToken[...]` with a non-empty
/// body.
pub fn is_expo_push_token(token: &str) -> bool {
    ["ExponentPushToken[", "ExpoPushToken["].iter().any(|prefix| {
        token
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(']'))
            .is_some_and(|inner| !inner.is_empty())
    })
}

/// Body sent to the push service
#[derive(Debug, Serialize)]
pub struct PushMessage<'a> {
    pub to: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub sound: &'static str,
    pub data: serde_json::Value,
}

impl<'a> PushMessage<'a> {
    pub fn new(token: &'a str, notification: &'a Notification) -> Self {
        Self {
            to: token,
            title: &notification.title,
            body: &notification.body,
            sound: "default",
            data: serde_json::json!({
                "task_id": notification.task_id,
                "kind": notification.kind,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    data: Option<PushTicket>,
}

#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
    message: Option<String>,
}

/// Sends push notifications
pub struct PushSender {
    client: reqwest::Client,
    config: PushConfig,
}

impl PushSender {
    pub fn new(config: PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    pub async fn send(&self, token: &str, notification: &Notification) -> Result<(), PushError> {
        if !is_expo_push_token(token) {
            return Err(PushError::InvalidToken);
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&PushMessage::new(token, notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushError::HttpStatus(status.as_u16()));
        }

        let parsed: PushResponse = response.json().await?;
        if let Some(ticket) = parsed.data {
            if ticket.status == "error" {
                return Err(PushError::Rejected(
                    ticket.message.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
        }

        tracing::info!(
            task_id = %notification.task_id,
            kind = notification.kind.as_str(),
            "Push notification sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use uuid::Uuid;

    #[test]
    fn test_expo_token_format() {
        assert!(is_expo_push_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_expo_push_token("ExpoPushToken[abc]"));

        assert!(!is_expo_push_token("ExponentPushToken[]"));
        assert!(!is_expo_push_token("ExponentPushToken[abc"));
        assert!(!is_expo_push_token("abc"));
        assert!(!is_expo_push_token(""));
    }

    #[test]
    fn test_push_message_body() {
        let notification = Notification {
            kind: NotificationKind::TaskCompleted,
            task_id: Uuid::nil(),
            title: "Task completed".to_string(),
            body: "\"Pay rent\" was marked as completed".to_string(),
        };

        let json = serde_json::to_value(PushMessage::new("ExpoPushToken[abc]", &notification)).unwrap();
        assert_eq!(json["to"], "ExpoPushToken[abc]");
        assert_eq!(json["title"], "Task completed");
        assert_eq!(json["sound"], "default");
        assert_eq!(json["data"]["kind"], "task_completed");
        assert_eq!(json["data"]["task_id"], Uuid::nil().to_string());
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(PushConfig::default().has_valid_endpoint());
        assert!(PushConfig { endpoint: "http://localhost:9000/push".to_string() }.has_valid_endpoint());
        assert!(!PushConfig { endpoint: "exp.host/push".to_string() }.has_valid_endpoint());
        assert!(!PushConfig { endpoint: "ftp://exp.host/push".to_string() }.has_valid_endpoint());
    }

    #[tokio::test]
    async fn test_send_rejects_malformed_token() {
        let sender = PushSender::new(PushConfig {
            endpoint: DEFAULT_PUSH_ENDPOINT.to_string(),
        })
        .unwrap();
        let notification = Notification {
            kind: NotificationKind::TaskCreated,
            task_id: Uuid::nil(),
            title: "t".to_string(),
            body: "b".to_string(),
        };

        assert!(matches!(
            sender.send("not-a-token", &notification).await,
            Err(PushError::InvalidToken)
        ));
    }
}
