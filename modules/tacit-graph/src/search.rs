//! Relevance ranking over documents and chat summaries.
//!
//! Scoring is a bounded containment heuristic, not a true similarity metric:
//! a title/filename match bonus plus a keyword-overlap count, normalized by
//! the size of the search-term set. The store does the cheap containment
//! filtering; scoring and grouping happen here so they stay pure and
//! unit-testable.

use neo4rs::query;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use tacit_common::{DocType, RankedHit, SearchTerms};

use crate::{store_err, GraphClient};

/// Bonus when the entity's primary text field contains the raw query.
const PRIMARY_MATCH_BONUS: f64 = 2.0;
/// Bonus when a document's original filename contains the raw query.
const SECONDARY_MATCH_BONUS: f64 = 1.5;
/// Bonus when a summary's content (but not topic) contains the raw query.
const CONTENT_MATCH_BONUS: f64 = 1.0;

/// Title/filename match bonus for a document: 2.0 for a title hit, 1.5 for a
/// filename hit, 0 otherwise. Case-insensitive substring containment.
pub fn title_match_bonus(title: &str, original_filename: Option<&str>, raw_query: &str) -> f64 {
    let q = raw_query.to_lowercase();
    if title.to_lowercase().contains(&q) {
        PRIMARY_MATCH_BONUS
    } else if original_filename
        .map(|f| f.to_lowercase().contains(&q))
        .unwrap_or(false)
    {
        SECONDARY_MATCH_BONUS
    } else {
        0.0
    }
}

/// Match bonus for a summary: 2.0 for a topic hit, 1.0 for a content hit.
/// Summaries have no secondary-filename tier and no keywords.
pub fn summary_match_bonus(topic: &str, content: &str, raw_query: &str) -> f64 {
    let q = raw_query.to_lowercase();
    if topic.to_lowercase().contains(&q) {
        PRIMARY_MATCH_BONUS
    } else if content.to_lowercase().contains(&q) {
        CONTENT_MATCH_BONUS
    } else {
        0.0
    }
}

/// Keywords that contain, as a substring, any term in the search-term set.
/// Terms are expected lowercase (see `SearchTerms::build`).
pub fn matched_keywords(keywords: &[String], terms: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|kw| {
            let kw = kw.to_lowercase();
            terms.iter().any(|term| kw.contains(term.as_str()))
        })
        .cloned()
        .collect()
}

/// The relevance heuristic: `(bonus + overlap) / (2 + |terms|)`.
/// Bounded in (0, ~1.5]; not a probability.
pub fn relevance_score(match_bonus: f64, keyword_overlap: usize, term_count: usize) -> f64 {
    (match_bonus + keyword_overlap as f64) / (2.0 + term_count as f64)
}

/// One title group in a result set. Duplicate titles across entity types
/// collapse into the same group.
#[derive(Debug, Clone, Serialize)]
pub struct ResultGroup {
    pub title: String,
    pub hits: Vec<RankedHit>,
}

/// Relevance-ordered, title-grouped results. Groups appear in order of their
/// best hit; hits within a group are ordered by descending score. Ties keep
/// the store's return order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedResults {
    pub groups: Vec<ResultGroup>,
}

impl GroupedResults {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All hits in descending-score order, for oracle context and display.
    pub fn flatten(&self) -> Vec<RankedHit> {
        let mut hits: Vec<RankedHit> = self
            .groups
            .iter()
            .flat_map(|g| g.hits.iter().cloned())
            .collect();
        sort_by_score(&mut hits);
        hits
    }
}

/// Sort hits by descending score then group by title, preserving the order
/// of first appearance. `sort_by` is stable, so equal scores keep store order.
pub fn group_by_title(mut hits: Vec<RankedHit>) -> GroupedResults {
    sort_by_score(&mut hits);

    let mut groups: Vec<ResultGroup> = Vec::new();
    for hit in hits {
        match groups.iter_mut().find(|g| g.title == hit.title) {
            Some(group) => group.hits.push(hit),
            None => groups.push(ResultGroup {
                title: hit.title.clone(),
                hits: vec![hit],
            }),
        }
    }
    GroupedResults { groups }
}

fn sort_by_score(hits: &mut [RankedHit]) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// The ranking engine. Store failures degrade to an empty result set —
/// search never hard-fails the request pipeline.
pub struct SearchEngine {
    client: GraphClient,
}

impl SearchEngine {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Rank documents and summaries against the query and its term set.
    pub async fn search(&self, terms: &SearchTerms) -> GroupedResults {
        match self.ranked_hits(terms).await {
            Ok(hits) => group_by_title(hits),
            Err(e) => {
                warn!(error = %e, query = terms.raw_query(), "Search degraded to empty results");
                GroupedResults::default()
            }
        }
    }

    async fn ranked_hits(&self, terms: &SearchTerms) -> Result<Vec<RankedHit>, tacit_common::TacitError> {
        let mut hits = self.document_hits(terms).await?;
        hits.extend(self.summary_hits(terms).await?);
        // Candidates that pass the store filter but score zero are excluded.
        hits.retain(|h| h.score > 0.0);
        Ok(hits)
    }

    async fn document_hits(
        &self,
        terms: &SearchTerms,
    ) -> Result<Vec<RankedHit>, tacit_common::TacitError> {
        let q = query(
            "MATCH (d:Document)
             WHERE toLower(d.title) CONTAINS toLower($search_query)
                OR toLower(coalesce(d.original_filename, '')) CONTAINS toLower($search_query)
                OR ANY(kw IN d.keywords
                    WHERE ANY(term IN $search_terms WHERE toLower(kw) CONTAINS term))
             RETURN d.id AS id, d.title AS title, d.file_link AS file_link,
                    d.keywords AS keywords, d.field AS field,
                    d.content_type AS content_type, d.filename AS filename,
                    d.original_filename AS original_filename,
                    d.author_name AS author,
                    toString(d.created_at) AS created_at",
        )
        .param("search_query", terms.raw_query())
        .param("search_terms", terms.terms().to_vec());

        let mut hits = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            let Ok(id) = Uuid::parse_str(&id_str) else {
                continue;
            };
            let title: String = row.get("title").unwrap_or_default();
            let original_filename: String = row.get("original_filename").unwrap_or_default();
            let keywords: Vec<String> = row.get("keywords").unwrap_or_default();
            let field: String = row.get("field").unwrap_or_default();
            let file_link: String = row.get("file_link").unwrap_or_default();

            let bonus = title_match_bonus(&title, Some(&original_filename), terms.raw_query());
            let matched = matched_keywords(&keywords, terms.terms());
            let score = relevance_score(bonus, matched.len(), terms.len());

            hits.push(RankedHit {
                id,
                title,
                doc_type: DocType::Document,
                view_link: Some(file_link.clone()),
                file_link: Some(file_link),
                keywords,
                matched_keywords: matched,
                field: if field.is_empty() { None } else { Some(field) },
                content_type: Some(row.get("content_type").unwrap_or_default()),
                filename: Some(row.get("filename").unwrap_or_default()),
                original_filename: Some(original_filename),
                score,
                author: Some(row.get("author").unwrap_or_default()),
                created_at: Some(row.get("created_at").unwrap_or_default()),
                summary_content: None,
            });
        }
        Ok(hits)
    }

    async fn summary_hits(
        &self,
        terms: &SearchTerms,
    ) -> Result<Vec<RankedHit>, tacit_common::TacitError> {
        let q = query(
            "MATCH (s:Summary)
             WHERE toLower(s.topic) CONTAINS toLower($search_query)
                OR toLower(s.content) CONTAINS toLower($search_query)
             RETURN s.id AS id, s.topic AS title, s.content AS content,
                    s.author_name AS author,
                    toString(s.created_at) AS created_at",
        )
        .param("search_query", terms.raw_query());

        let mut hits = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            let Ok(id) = Uuid::parse_str(&id_str) else {
                continue;
            };
            let title: String = row.get("title").unwrap_or_default();
            let content: String = row.get("content").unwrap_or_default();

            let bonus = summary_match_bonus(&title, &content, terms.raw_query());
            let score = relevance_score(bonus, 0, terms.len());

            hits.push(RankedHit {
                id,
                title,
                doc_type: DocType::Summary,
                file_link: None,
                view_link: None,
                keywords: vec![],
                matched_keywords: vec![],
                field: None,
                content_type: Some("text/plain".to_string()),
                filename: None,
                original_filename: Some("Chat Summary".to_string()),
                score,
                author: Some(row.get("author").unwrap_or_default()),
                created_at: Some(row.get("created_at").unwrap_or_default()),
                summary_content: Some(content),
            });
        }
        Ok(hits)
    }
}
