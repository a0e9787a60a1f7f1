pub mod error;

pub use error::{Result, SlackError};

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

pub struct SlackClient {
    client: reqwest::Client,
    token: String,
}

/// Delivery receipt for a posted message.
#[derive(Debug, Clone)]
pub struct MessageReceipt {
    pub channel: String,
    pub ts: String,
}

/// Slack envelope: HTTP 200 with `ok: false` still means failure.
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

impl SlackClient {
    pub fn new(token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token: token.to_string(),
        }
    }

    /// Post a text message to a channel via chat.postMessage.
    /// See: https://api.slack.com/methods/chat.postMessage
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<MessageReceipt> {
        let body = serde_json::json!({ "channel": channel, "text": text });

        debug!(channel, bytes = text.len(), "Posting Slack message");

        let resp = self
            .client
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SlackError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PostMessageResponse = resp.json().await?;
        if !parsed.ok {
            return Err(SlackError::Api(
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(MessageReceipt {
            channel: parsed.channel.unwrap_or_default(),
            ts: parsed.ts.unwrap_or_default(),
        })
    }
}
