use anyhow::Result;
use async_trait::async_trait;

use crate::prompts;
use crate::traits::{SearchContext, TextOracle, TopicContext};

use super::client::{GeminiClient, DEFAULT_MODEL};

/// `TextOracle` backed by Gemini. Builds the role system prompt plus
/// formatted context for each call; returns the raw generated text.
pub struct GeminiOracle {
    client: GeminiClient,
}

impl GeminiOracle {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key, DEFAULT_MODEL),
        }
    }

    pub fn with_model(api_key: &str, model: &str) -> Self {
        Self {
            client: GeminiClient::new(api_key, model),
        }
    }
}

#[async_trait]
impl TextOracle for GeminiOracle {
    async fn search_answer(&self, query: &str, ctx: &SearchContext) -> Result<String> {
        let mut system = prompts::SEARCH_SYSTEM_PROMPT.to_string();
        system.push_str("\n\nAvailable context from knowledge base:\n");
        system.push_str(&prompts::format_search_context(&ctx.relevant_documents));

        self.client.generate(&system, query).await
    }

    async fn gap_analysis(&self, ctx: &TopicContext) -> Result<String> {
        let mut system = prompts::GAP_ANALYSIS_SYSTEM_PROMPT.to_string();
        system.push_str(&prompts::format_topic_context(ctx));

        self.client
            .generate(&system, prompts::GAP_ANALYSIS_PROMPT)
            .await
    }

    async fn topic_gap_analysis(&self, topic: &str, ctx: &TopicContext) -> Result<String> {
        let mut system = prompts::TOPIC_GAP_ANALYSIS_SYSTEM_PROMPT.to_string();
        system.push_str(&prompts::format_topic_context(ctx));
        system.push_str(&format!("\n\nAnalyzing gaps for specific topic: {topic}"));

        self.client
            .generate(&system, &prompts::topic_gap_analysis_prompt(topic))
            .await
    }
}
