use anyhow::Result;
use async_trait::async_trait;

use tacit_common::{RankedHit, TopicRow};

/// Context for the `search` role: ranked hits the answer should draw on.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    /// Flattened search results, highest score first.
    pub relevant_documents: Vec<RankedHit>,
}

/// Context for the gap-analysis roles: the distinct topics currently in the
/// knowledge base (optionally pre-filtered to one subject).
#[derive(Debug, Clone, Default)]
pub struct TopicContext {
    pub topics: Vec<TopicRow>,
}

/// Capability interface over the generative-text collaborator, one method
/// per role. Each returns the oracle's raw text; callers normalize it.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// `search` role: free-text answer grounded in the ranked context.
    async fn search_answer(&self, query: &str, ctx: &SearchContext) -> Result<String>;

    /// `gap_analysis` role: base-wide gap scan. Expected (but not trusted)
    /// to return a JSON array of `{topic, reason}` objects.
    async fn gap_analysis(&self, ctx: &TopicContext) -> Result<String>;

    /// `topic_gap_analysis` role: gap scan focused on one subject.
    async fn topic_gap_analysis(&self, topic: &str, ctx: &TopicContext) -> Result<String>;
}
