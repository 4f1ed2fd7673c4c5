//! Oracle-facing coordination: phrase search answers and gap analyses.
//!
//! The advisor treats the oracle as unreliable. Every path here resolves to
//! a usable value — a fallback answer string or the normalizer's fallback
//! records — and never returns an error to the request pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use tacit_common::{GapFinding, TacitError, TopicRow};
use tacit_oracle::normalize;
use tacit_oracle::{SearchContext, TextOracle, TopicContext};

use crate::search::GroupedResults;
use crate::GraphReader;

/// Topic rows the gap-analysis roles run over. `GraphReader` is the store
/// implementation; the seam exists so the advisor's degradation behavior can
/// be exercised without a live store.
#[async_trait]
pub trait TopicSource: Send + Sync {
    async fn list_topics(&self) -> Result<Vec<TopicRow>, TacitError>;
    async fn list_topics_matching(&self, topic: &str) -> Result<Vec<TopicRow>, TacitError>;
}

#[async_trait]
impl TopicSource for GraphReader {
    async fn list_topics(&self) -> Result<Vec<TopicRow>, TacitError> {
        GraphReader::list_topics(self).await
    }

    async fn list_topics_matching(&self, topic: &str) -> Result<Vec<TopicRow>, TacitError> {
        GraphReader::list_topics_matching(self, topic).await
    }
}

pub struct GapAdvisor {
    topics: Arc<dyn TopicSource>,
    oracle: Arc<dyn TextOracle>,
}

impl GapAdvisor {
    pub fn new(topics: Arc<dyn TopicSource>, oracle: Arc<dyn TextOracle>) -> Self {
        Self { topics, oracle }
    }

    /// Phrase a search answer from ranked results. Appends the deterministic
    /// "Related Documents" section when results exist.
    pub async fn answer_search(&self, query: &str, results: &GroupedResults) -> String {
        let hits = results.flatten();
        let ctx = SearchContext {
            relevant_documents: hits.clone(),
        };

        match self.oracle.search_answer(query, &ctx).await {
            Ok(raw) => {
                let text = normalize::dedupe_sentences(&raw);
                if text.is_empty() {
                    return normalize::EMPTY_ANSWER.to_string();
                }
                normalize::append_related_documents(&text, &hits)
            }
            Err(e) => {
                warn!(error = %e, query, "Search answer oracle call failed");
                normalize::SEARCH_FALLBACK_ANSWER.to_string()
            }
        }
    }

    /// Base-wide gap analysis over every topic in the store.
    pub async fn analyze_gaps(&self) -> Vec<GapFinding> {
        let topics = match self.topics.list_topics().await {
            Ok(topics) => topics,
            Err(e) => {
                warn!(error = %e, "Topic listing failed for gap analysis");
                return normalize::error_fallback();
            }
        };

        let ctx = TopicContext { topics };
        match self.oracle.gap_analysis(&ctx).await {
            Ok(raw) => normalize::parse_gap_findings(&raw),
            Err(e) => {
                warn!(error = %e, "Gap analysis oracle call failed");
                normalize::error_fallback()
            }
        }
    }

    /// Gap analysis focused on one subject; context is restricted to topics
    /// whose title or keywords match it.
    pub async fn analyze_topic_gaps(&self, topic: &str) -> Vec<GapFinding> {
        let topics = match self.topics.list_topics_matching(topic).await {
            Ok(topics) => topics,
            Err(e) => {
                warn!(error = %e, topic, "Topic listing failed for topic gap analysis");
                return normalize::error_fallback();
            }
        };

        let ctx = TopicContext { topics };
        match self.oracle.topic_gap_analysis(topic, &ctx).await {
            Ok(raw) => normalize::parse_gap_findings(&raw),
            Err(e) => {
                warn!(error = %e, topic, "Topic gap analysis oracle call failed");
                normalize::error_fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use uuid::Uuid;

    use tacit_common::{DocType, RankedHit};

    use crate::search::group_by_title;

    struct FailingOracle;

    #[async_trait]
    impl TextOracle for FailingOracle {
        async fn search_answer(&self, _query: &str, _ctx: &SearchContext) -> Result<String> {
            Err(anyhow!("oracle unreachable"))
        }

        async fn gap_analysis(&self, _ctx: &TopicContext) -> Result<String> {
            Err(anyhow!("oracle unreachable"))
        }

        async fn topic_gap_analysis(&self, _topic: &str, _ctx: &TopicContext) -> Result<String> {
            Err(anyhow!("oracle unreachable"))
        }
    }

    struct CannedOracle(&'static str);

    #[async_trait]
    impl TextOracle for CannedOracle {
        async fn search_answer(&self, _query: &str, _ctx: &SearchContext) -> Result<String> {
            Ok(self.0.to_string())
        }

        async fn gap_analysis(&self, _ctx: &TopicContext) -> Result<String> {
            Ok(self.0.to_string())
        }

        async fn topic_gap_analysis(&self, _topic: &str, _ctx: &TopicContext) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct NoTopics;

    #[async_trait]
    impl TopicSource for NoTopics {
        async fn list_topics(&self) -> Result<Vec<TopicRow>, TacitError> {
            Ok(vec![])
        }

        async fn list_topics_matching(&self, _topic: &str) -> Result<Vec<TopicRow>, TacitError> {
            Ok(vec![])
        }
    }

    struct BrokenTopics;

    #[async_trait]
    impl TopicSource for BrokenTopics {
        async fn list_topics(&self) -> Result<Vec<TopicRow>, TacitError> {
            Err(TacitError::Store("connection refused".to_string()))
        }

        async fn list_topics_matching(&self, _topic: &str) -> Result<Vec<TopicRow>, TacitError> {
            Err(TacitError::Store("connection refused".to_string()))
        }
    }

    fn advisor(topics: impl TopicSource + 'static, oracle: impl TextOracle + 'static) -> GapAdvisor {
        GapAdvisor::new(Arc::new(topics), Arc::new(oracle))
    }

    fn hit(title: &str, score: f64) -> RankedHit {
        RankedHit {
            id: Uuid::new_v4(),
            title: title.to_string(),
            doc_type: DocType::Document,
            file_link: Some(format!("/uploads/{title}.pdf")),
            view_link: Some(format!("/uploads/{title}.pdf")),
            keywords: vec![],
            matched_keywords: vec![],
            field: Some("devops".to_string()),
            content_type: None,
            filename: None,
            original_filename: None,
            score,
            author: None,
            created_at: None,
            summary_content: None,
        }
    }

    #[tokio::test]
    async fn oracle_failure_degrades_to_fallback_answer() {
        let advisor = advisor(NoTopics, FailingOracle);
        let results = group_by_title(vec![hit("Kubernetes Basics", 0.5)]);

        let answer = advisor.answer_search("k8s networking", &results).await;
        assert_eq!(answer, normalize::SEARCH_FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn blank_oracle_answer_becomes_empty_answer() {
        let advisor = advisor(NoTopics, CannedOracle("   "));
        let results = group_by_title(vec![hit("Kubernetes Basics", 0.5)]);

        let answer = advisor.answer_search("k8s networking", &results).await;
        assert_eq!(answer, normalize::EMPTY_ANSWER);
    }

    #[tokio::test]
    async fn successful_answer_carries_related_documents() {
        let advisor = advisor(NoTopics, CannedOracle("Here is what we know."));
        let results = group_by_title(vec![hit("Kubernetes Basics", 0.5)]);

        let answer = advisor.answer_search("k8s networking", &results).await;
        assert!(answer.starts_with("Here is what we know."));
        assert!(answer.contains("Related Documents:"));
        assert!(answer.contains("Kubernetes Basics"));
    }

    #[tokio::test]
    async fn store_failure_resolves_to_error_finding() {
        // The oracle would answer, but topic listing never gets that far.
        let advisor = advisor(BrokenTopics, CannedOracle(r#"[{"topic":"A","reason":"B"}]"#));

        assert_eq!(advisor.analyze_gaps().await, normalize::error_fallback());
        assert_eq!(
            advisor.analyze_topic_gaps("kubernetes").await,
            normalize::error_fallback()
        );
    }

    #[tokio::test]
    async fn oracle_failure_resolves_to_error_finding() {
        let advisor = advisor(NoTopics, FailingOracle);

        assert_eq!(advisor.analyze_gaps().await, normalize::error_fallback());
        assert_eq!(
            advisor.analyze_topic_gaps("kubernetes").await,
            normalize::error_fallback()
        );
    }

    #[tokio::test]
    async fn well_formed_oracle_output_is_parsed() {
        let advisor = advisor(NoTopics, CannedOracle(r#"[{"topic":"Helm","reason":"missing"}]"#));

        let findings = advisor.analyze_gaps().await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].topic, "Helm");
        assert_eq!(findings[0].reason, "missing");
    }
}
