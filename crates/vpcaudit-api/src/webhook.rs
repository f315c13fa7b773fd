// Chat-bot webhook client (Lark / Feishu custom-bot text messages).

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// `{"msg_type": "text", "content": {"text": …}}`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextMessage {
    pub msg_type: &'static str,
    pub content: TextContent,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextContent {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            msg_type: "text",
            content: TextContent { text: text.into() },
        }
    }
}

/// Posts plain-text messages to one webhook URL.
pub struct WebhookClient {
    http: reqwest::Client,
    url: Url,
}

impl WebhookClient {
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?, url))
    }

    pub fn with_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// POST `text` as a text message. Any non-success status is an error.
    pub async fn send_text(&self, text: &str) -> Result<(), Error> {
        debug!(host = ?self.url.host_str(), bytes = text.len(), "POST webhook");

        let resp = self
            .http
            .post(self.url.clone())
            .json(&TextMessage::new(text))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Webhook {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn text_message_wire_shape() {
        let json = serde_json::to_value(TextMessage::new("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "msg_type": "text", "content": { "text": "hello" } })
        );
    }
}
