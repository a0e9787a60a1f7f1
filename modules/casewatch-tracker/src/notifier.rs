//! Slack-backed notifier.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use slack_client::SlackClient;

use crate::traits::{DeliveryReceipt, Notifier};

pub struct SlackNotifier {
    client: SlackClient,
}

impl SlackNotifier {
    pub fn new(token: &str) -> Self {
        info!("Using SlackNotifier");
        Self {
            client: SlackClient::new(token),
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn deliver(&self, channel: &str, text: &str) -> Result<DeliveryReceipt> {
        let receipt = self
            .client
            .post_message(channel, text)
            .await
            .context("Slack chat.postMessage failed")?;

        info!(
            channel = receipt.channel.as_str(),
            ts = receipt.ts.as_str(),
            "Message delivered"
        );

        Ok(DeliveryReceipt {
            channel: receipt.channel,
            message_id: receipt.ts,
        })
    }
}
