//! Slack chat-ops client used to route knowledge gaps to the expert channel.
//!
//! Fire-and-forget: callers log failures and move on. An unconfigured
//! deployment uses `tacit_common::NoopNotifier` instead of this client.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use tacit_common::{GapNotifier, GapTopic};

const SLACK_API_URL: &str = "https://slack.com/api";

/// Gaps listed per notification message.
const GAP_MESSAGE_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackClient {
    token: String,
    channel: String,
    http: reqwest::Client,
    base_url: String,
}

impl SlackClient {
    pub fn new(token: &str, channel: &str) -> Self {
        Self {
            token: token.to_string(),
            channel: channel.to_string(),
            http: reqwest::Client::new(),
            base_url: SLACK_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Post a message to the configured channel. Slack reports API errors in
    /// the body with HTTP 200, so both layers are checked.
    pub async fn post_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let request = PostMessageRequest {
            channel: &self.channel,
            text,
            blocks: json!([{
                "type": "section",
                "text": { "type": "mrkdwn", "text": text }
            }]),
        };

        debug!(channel = self.channel.as_str(), "Posting Slack message");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Slack API error ({}): {}", status, error_text));
        }

        let body: PostMessageResponse = response.json().await?;
        if !body.ok {
            return Err(anyhow!(
                "Slack API error: {}",
                body.error.unwrap_or_else(|| "unknown".to_string())
            ));
        }
        Ok(())
    }
}

/// Build the gap-notification message: the originating query plus up to five
/// gap topics as bullets.
pub fn gap_message(gaps: &[GapTopic], origin_query: &str) -> String {
    let gap_list = gaps
        .iter()
        .take(GAP_MESSAGE_LIMIT)
        .map(|gap| format!("• {}", gap.topic))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Knowledge Gaps Detected\nA user searched for: \"{origin_query}\"\n\n\
         The following topics need expert input:\n{gap_list}"
    )
}

#[async_trait]
impl GapNotifier for SlackClient {
    async fn notify_gaps(&self, gaps: &[GapTopic], origin_query: &str) -> Result<()> {
        self.post_message(&gap_message(gaps, origin_query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn gap(topic: &str) -> GapTopic {
        GapTopic {
            topic: topic.to_string(),
            id: Uuid::new_v4(),
        }
    }

    #[test]
    fn message_quotes_query_and_bullets_topics() {
        let gaps = vec![gap("Kubernetes Basics"), gap("Helm Charts")];
        let message = gap_message(&gaps, "k8s networking");
        assert!(message.contains("A user searched for: \"k8s networking\""));
        assert!(message.contains("• Kubernetes Basics"));
        assert!(message.contains("• Helm Charts"));
    }

    #[test]
    fn message_caps_at_five_topics() {
        let gaps: Vec<_> = (0..8).map(|i| gap(&format!("Topic {i}"))).collect();
        let message = gap_message(&gaps, "q");
        assert!(message.contains("• Topic 4"));
        assert!(!message.contains("• Topic 5"));
    }
}
