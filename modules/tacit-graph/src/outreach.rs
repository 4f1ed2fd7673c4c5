//! Outreach workflow: turn detected gaps into pending expert requests.
//!
//! Outreach records are append-only. Repeated sweeps over the same topic
//! create new records rather than deduplicating against pending ones; see
//! DESIGN.md for why this is kept as-is.

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use tacit_common::{GapNotifier, GapTopic, OutreachReceipt, TacitError, OUTREACH_TOKEN_LEN};

use crate::{GraphClient, GraphReader, GraphWriter};

const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed-length random alphanumeric outreach token. Collisions are not
/// checked against the store; at 36^10 values the risk is accepted.
pub fn outreach_token() -> String {
    let mut rng = rand::rng();
    (0..OUTREACH_TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

pub struct OutreachWorkflow {
    reader: GraphReader,
    writer: GraphWriter,
    notifier: Arc<dyn GapNotifier>,
}

impl OutreachWorkflow {
    pub fn new(client: GraphClient, notifier: Arc<dyn GapNotifier>) -> Self {
        Self {
            reader: GraphReader::new(client.clone()),
            writer: GraphWriter::new(client),
            notifier,
        }
    }

    /// Reactive path, invoked after a search surfaced gaps: one Outreach for
    /// the whole call, CONCERNS edges to every gap document, then a
    /// best-effort notification. Notification failure is logged, never
    /// escalated; store failure propagates.
    pub async fn request_expert_input(
        &self,
        search_query: &str,
        gaps: &[GapTopic],
    ) -> Result<OutreachReceipt, TacitError> {
        let token = outreach_token();
        let doc_ids: Vec<Uuid> = gaps.iter().map(|g| g.id).collect();

        self.writer
            .create_query_outreach(&token, search_query, &doc_ids)
            .await?;

        info!(
            outreach = token.as_str(),
            gaps = gaps.len(),
            query = search_query,
            "Requested expert input"
        );

        if let Err(e) = self.notifier.notify_gaps(gaps, search_query).await {
            warn!(error = %e, outreach = token.as_str(), "Gap notification failed");
        }

        Ok(OutreachReceipt {
            message_id: token,
            status: "expert_input_requested".to_string(),
        })
    }

    /// Proactive path, run on a schedule: for every uncovered document, match
    /// experts by expertise-area substring against the document title. Gaps
    /// with no matching expert are skipped — an Outreach nobody can answer is
    /// useless. Returns the ids of the outreach records created.
    pub async fn sweep(&self) -> Result<Vec<String>, TacitError> {
        let gaps = self.reader.find_uncovered_documents().await?;

        if gaps.is_empty() {
            info!("No knowledge gaps detected");
            return Ok(Vec::new());
        }

        let mut outreach_ids = Vec::new();
        for gap in &gaps {
            let experts = self.reader.find_experts_by_area(&gap.topic).await?;

            if experts.is_empty() {
                warn!(topic = gap.topic.as_str(), "No experts found for topic");
                continue;
            }

            let token = outreach_token();
            let expert_ids: Vec<Uuid> = experts.iter().map(|e| e.id).collect();
            self.writer
                .create_topic_outreach(&token, &gap.topic, gap.id, &expert_ids)
                .await?;

            info!(
                outreach = token.as_str(),
                topic = gap.topic.as_str(),
                experts = expert_ids.len(),
                "Created outreach"
            );
            outreach_ids.push(token);
        }

        Ok(outreach_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_fixed_length_uppercase_alphanumeric() {
        for _ in 0..50 {
            let token = outreach_token();
            assert_eq!(token.len(), OUTREACH_TOKEN_LEN);
            assert!(token
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn tokens_are_not_constant() {
        let a = outreach_token();
        let b = outreach_token();
        let c = outreach_token();
        assert!(a != b || b != c);
    }
}
