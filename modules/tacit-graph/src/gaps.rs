//! Knowledge-gap detection.
//!
//! Two modes share one return shape:
//! - reactive: per search query, topics related to the query regardless of
//!   tip coverage (candidates for "related but maybe under-covered");
//! - proactive: all documents with zero expert tips, system-wide.
//!
//! Callers track which mode they invoked; the records don't encode it.
//! Store failures degrade to an empty gap list — gap detection never fails
//! a search request.

use neo4rs::query;
use tracing::warn;
use uuid::Uuid;

use tacit_common::{GapTopic, SearchTerms, TacitError, RELATED_GAP_LIMIT};

use crate::{store_err, GraphClient, GraphReader};

pub struct GapDetector {
    client: GraphClient,
    reader: GraphReader,
}

impl GapDetector {
    pub fn new(client: GraphClient) -> Self {
        Self {
            reader: GraphReader::new(client.clone()),
            client,
        }
    }

    /// Reactive mode: up to five distinct topics whose title or keywords
    /// match the query terms, deduplicated by document id.
    pub async fn related_gaps(&self, terms: &SearchTerms) -> Vec<GapTopic> {
        match self.related_gaps_inner(terms).await {
            Ok(gaps) => gaps,
            Err(e) => {
                warn!(error = %e, query = terms.raw_query(), "Gap detection degraded to empty list");
                Vec::new()
            }
        }
    }

    /// Proactive mode: every document with no HAS_TIP edge.
    pub async fn coverage_gaps(&self) -> Vec<GapTopic> {
        match self.reader.find_uncovered_documents().await {
            Ok(gaps) => gaps,
            Err(e) => {
                warn!(error = %e, "Coverage sweep degraded to empty list");
                Vec::new()
            }
        }
    }

    async fn related_gaps_inner(&self, terms: &SearchTerms) -> Result<Vec<GapTopic>, TacitError> {
        let q = query(
            "MATCH (d:Document)
             WHERE toLower(d.title) CONTAINS toLower($search_query)
                OR ANY(kw IN d.keywords
                    WHERE ANY(term IN $search_terms WHERE toLower(kw) CONTAINS term))
             RETURN DISTINCT d.title AS topic, d.id AS id
             LIMIT $limit",
        )
        .param("search_query", terms.raw_query())
        .param("search_terms", terms.terms().to_vec())
        .param("limit", RELATED_GAP_LIMIT as i64);

        let mut gaps: Vec<GapTopic> = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            let Ok(id) = Uuid::parse_str(&id_str) else {
                continue;
            };
            if gaps.iter().any(|g| g.id == id) {
                continue;
            }
            gaps.push(GapTopic {
                topic: row.get("topic").unwrap_or_default(),
                id,
            });
        }
        Ok(gaps)
    }
}
