use neo4rs::query;
use uuid::Uuid;

use tacit_common::{
    DocumentRecord, DocumentWithTips, ExpertMatch, ExpertRecord, GapTopic, TacitError, TipRecord,
    TopicRow, RECOMMENDATION_LIMIT,
};

use crate::{store_err, GraphClient};

/// Read-side wrapper for the graph. Errors propagate; the search and gap
/// engines sit above this layer and decide whether to degrade.
pub struct GraphReader {
    client: GraphClient,
}

impl GraphReader {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Fetch one document and all of its expert tips.
    pub async fn get_document_with_tips(
        &self,
        id: Uuid,
    ) -> Result<Option<DocumentWithTips>, TacitError> {
        let q = query(
            "MATCH (d:Document {id: $id})
             OPTIONAL MATCH (d)-[:HAS_TIP]->(t:Tip)<-[:PROVIDED]-(e:Expert)
             RETURN d.id AS id, d.title AS title,
                    collect(t.id) AS tip_ids,
                    collect(t.text) AS tip_texts,
                    collect(e.name) AS tip_experts",
        )
        .param("id", id.to_string());

        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        match stream.next().await.map_err(store_err)? {
            Some(row) => Ok(row_to_document_with_tips(&row)),
            None => Ok(None),
        }
    }

    /// All documents with their tips collected.
    pub async fn list_documents(&self) -> Result<Vec<DocumentWithTips>, TacitError> {
        let q = query(
            "MATCH (d:Document)
             OPTIONAL MATCH (d)-[:HAS_TIP]->(t:Tip)<-[:PROVIDED]-(e:Expert)
             RETURN d.id AS id, d.title AS title,
                    collect(t.id) AS tip_ids,
                    collect(t.text) AS tip_texts,
                    collect(e.name) AS tip_experts
             ORDER BY d.title",
        );

        let mut docs = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            if let Some(doc) = row_to_document_with_tips(&row) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    /// All experts with their distinct tip counts.
    pub async fn list_experts(&self) -> Result<Vec<ExpertRecord>, TacitError> {
        let q = query(
            "MATCH (e:Expert)
             OPTIONAL MATCH (e)-[:PROVIDED]->(t:Tip)
             RETURN e.id AS id, e.name AS name, e.email AS email,
                    e.expertise_areas AS areas,
                    count(DISTINCT t) AS tips_count",
        );

        let mut experts = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            let Ok(id) = Uuid::parse_str(&id_str) else {
                continue;
            };
            experts.push(ExpertRecord {
                id,
                name: row.get("name").unwrap_or_default(),
                email: row.get("email").unwrap_or_default(),
                expertise_areas: row.get("areas").unwrap_or_default(),
                tips_count: row.get("tips_count").unwrap_or(0),
            });
        }
        Ok(experts)
    }

    /// Documents with zero HAS_TIP edges: the true coverage gaps. Recomputed
    /// from the store on every call, never cached.
    pub async fn find_uncovered_documents(&self) -> Result<Vec<GapTopic>, TacitError> {
        let q = query(
            "MATCH (d:Document)
             WHERE NOT (d)-[:HAS_TIP]->()
             RETURN d.id AS id, d.title AS topic",
        );

        let mut gaps = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            if let Ok(id) = Uuid::parse_str(&id_str) {
                gaps.push(GapTopic {
                    topic: row.get("topic").unwrap_or_default(),
                    id,
                });
            }
        }
        Ok(gaps)
    }

    /// Experts whose expertise areas contain the given text, case-insensitive.
    pub async fn find_experts_by_area(&self, text: &str) -> Result<Vec<ExpertMatch>, TacitError> {
        let q = query(
            "MATCH (e:Expert)
             WHERE any(area IN e.expertise_areas WHERE toLower(area) CONTAINS toLower($topic))
             RETURN e.id AS id, e.name AS name, e.email AS email, e.expertise_areas AS areas",
        )
        .param("topic", text);

        let mut experts = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            if let Ok(id) = Uuid::parse_str(&id_str) {
                experts.push(ExpertMatch {
                    id,
                    name: row.get("name").unwrap_or_default(),
                    email: row.get("email").unwrap_or_default(),
                    expertise_areas: row.get("areas").unwrap_or_default(),
                });
            }
        }
        Ok(experts)
    }

    /// Recommendations: documents whose field matches exactly or whose
    /// keywords contain the field text, most recent first.
    pub async fn find_documents_by_field(
        &self,
        field: &str,
    ) -> Result<Vec<DocumentRecord>, TacitError> {
        let q = query(
            "MATCH (d:Document)
             WHERE toLower(d.field) = toLower($field)
                OR ANY(kw IN d.keywords WHERE toLower(kw) CONTAINS toLower($field))
             RETURN d.id AS id, d.title AS title, d.filename AS filename,
                    d.original_filename AS original_filename,
                    d.author_name AS author_name, d.field AS field,
                    d.keywords AS keywords, d.file_link AS file_link,
                    d.content_type AS content_type,
                    toString(d.created_at) AS created_at
             ORDER BY d.created_at DESC
             LIMIT $limit",
        )
        .param("field", field)
        .param("limit", RECOMMENDATION_LIMIT as i64);

        let mut docs = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            let Ok(id) = Uuid::parse_str(&id_str) else {
                continue;
            };
            let field: String = row.get("field").unwrap_or_default();
            docs.push(DocumentRecord {
                id,
                title: row.get("title").unwrap_or_default(),
                filename: row.get("filename").unwrap_or_default(),
                original_filename: row.get("original_filename").unwrap_or_default(),
                author_name: row.get("author_name").unwrap_or_default(),
                field: if field.is_empty() { None } else { Some(field) },
                keywords: row.get("keywords").unwrap_or_default(),
                file_link: row.get("file_link").unwrap_or_default(),
                content_type: row.get("content_type").unwrap_or_default(),
                created_at: row.get("created_at").unwrap_or_default(),
            });
        }
        Ok(docs)
    }

    /// Distinct topic rows for base-wide gap analysis.
    pub async fn list_topics(&self) -> Result<Vec<TopicRow>, TacitError> {
        self.topic_rows(None).await
    }

    /// Topic rows whose title or keywords contain the given subject.
    pub async fn list_topics_matching(&self, topic: &str) -> Result<Vec<TopicRow>, TacitError> {
        self.topic_rows(Some(topic)).await
    }

    async fn topic_rows(&self, filter: Option<&str>) -> Result<Vec<TopicRow>, TacitError> {
        let q = match filter {
            Some(topic) => query(
                "MATCH (d:Document)
                 WHERE toLower(d.title) CONTAINS toLower($topic)
                    OR ANY(kw IN d.keywords WHERE toLower(kw) CONTAINS toLower($topic))
                 RETURN DISTINCT d.title AS topic, d.keywords AS keywords,
                        d.field AS field, d.id AS id
                 ORDER BY d.title",
            )
            .param("topic", topic),
            None => query(
                "MATCH (d:Document)
                 RETURN DISTINCT d.title AS topic, d.keywords AS keywords,
                        d.field AS field, d.id AS id
                 ORDER BY d.title",
            ),
        };

        let mut rows = Vec::new();
        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        while let Some(row) = stream.next().await.map_err(store_err)? {
            let id_str: String = row.get("id").unwrap_or_default();
            let Ok(id) = Uuid::parse_str(&id_str) else {
                continue;
            };
            let field: String = row.get("field").unwrap_or_default();
            rows.push(TopicRow {
                topic: row.get("topic").unwrap_or_default(),
                keywords: row.get("keywords").unwrap_or_default(),
                fields: if field.is_empty() { vec![] } else { vec![field] },
                id,
            });
        }
        Ok(rows)
    }
}

fn row_to_document_with_tips(row: &neo4rs::Row) -> Option<DocumentWithTips> {
    let id_str: String = row.get("id").unwrap_or_default();
    let id = Uuid::parse_str(&id_str).ok()?;

    let tip_ids: Vec<String> = row.get("tip_ids").unwrap_or_default();
    let tip_texts: Vec<String> = row.get("tip_texts").unwrap_or_default();
    let tip_experts: Vec<String> = row.get("tip_experts").unwrap_or_default();

    let tips = tip_ids
        .iter()
        .zip(tip_texts)
        .zip(tip_experts)
        .filter_map(|((tip_id, text), expert_name)| {
            let id = Uuid::parse_str(tip_id).ok()?;
            Some(TipRecord {
                id,
                text,
                expert_name,
            })
        })
        .collect();

    Some(DocumentWithTips {
        id,
        title: row.get("title").unwrap_or_default(),
        tips,
    })
}
