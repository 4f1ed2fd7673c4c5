use neo4rs::query;
use tracing::info;
use uuid::Uuid;

use tacit_common::{NewDocument, NewSummary, OutreachStatus, TacitError};

use crate::{format_datetime, store_err, GraphClient};

/// Write-side wrapper for the graph. Every multi-statement mutation runs as
/// one atomic unit so partial state is never visible to concurrent readers.
pub struct GraphWriter {
    client: GraphClient,
}

impl GraphWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Create a Document node from the upload pipeline's output. Returns the
    /// new document's id. Documents are immutable afterwards except for tip
    /// attachment.
    pub async fn create_document(&self, doc: &NewDocument) -> Result<Uuid, TacitError> {
        let id = Uuid::new_v4();
        let q = query(
            "CREATE (d:Document {
                id: $id,
                title: $title,
                filename: $filename,
                original_filename: $original_filename,
                author_id: $author_id,
                author_name: $author_name,
                field: $field,
                keywords: $keywords,
                file_link: $file_link,
                content_type: $content_type,
                is_admin_content: $is_admin_content,
                created_at: datetime($created_at)
            })",
        )
        .param("id", id.to_string())
        .param("title", doc.title.as_str())
        .param("filename", doc.filename.as_str())
        .param("original_filename", doc.original_filename.as_str())
        .param("author_id", doc.author_id.as_str())
        .param("author_name", doc.author_name.as_str())
        .param("field", doc.field.as_deref().unwrap_or(""))
        .param("keywords", doc.keywords.clone())
        .param("file_link", doc.file_link.as_str())
        .param("content_type", doc.content_type.as_str())
        .param("is_admin_content", doc.is_admin_content)
        .param("created_at", format_datetime(&doc.created_at));

        self.client.graph.run(q).await.map_err(store_err)?;
        info!(document = %id, title = doc.title.as_str(), "Created document");
        Ok(id)
    }

    /// Create a Summary node from a condensed chat conversation.
    pub async fn create_summary(&self, summary: &NewSummary) -> Result<Uuid, TacitError> {
        let id = Uuid::new_v4();
        let q = query(
            "CREATE (s:Summary {
                id: $id,
                topic: $topic,
                content: $content,
                author_id: $author_id,
                author_name: $author_name,
                type: 'chat_summary',
                created_at: datetime($created_at)
            })",
        )
        .param("id", id.to_string())
        .param("topic", summary.topic.as_str())
        .param("content", summary.content.as_str())
        .param("author_id", summary.author_id.as_str())
        .param("author_name", summary.author_name.as_str())
        .param("created_at", format_datetime(&summary.created_at));

        self.client.graph.run(q).await.map_err(store_err)?;
        info!(summary = %id, topic = summary.topic.as_str(), "Created chat summary");
        Ok(id)
    }

    /// Register an expert with their expertise areas.
    pub async fn create_expert(
        &self,
        name: &str,
        email: &str,
        expertise_areas: &[String],
    ) -> Result<Uuid, TacitError> {
        let id = Uuid::new_v4();
        let q = query(
            "CREATE (e:Expert {
                id: $id,
                name: $name,
                email: $email,
                expertise_areas: $areas,
                created_at: datetime($created_at)
            })",
        )
        .param("id", id.to_string())
        .param("name", name)
        .param("email", email)
        .param("areas", expertise_areas.to_vec())
        .param("created_at", format_datetime(&chrono::Utc::now()));

        self.client.graph.run(q).await.map_err(store_err)?;
        info!(expert = %id, name, "Created expert");
        Ok(id)
    }

    /// Create a Tip owned by one document and one expert. The tip node and
    /// both edges are created in a single statement, so a missing parent
    /// means nothing is created and `NotFound` is returned — an orphan tip
    /// cannot exist.
    pub async fn create_tip(
        &self,
        text: &str,
        document_id: Uuid,
        expert_id: Uuid,
    ) -> Result<Uuid, TacitError> {
        let id = Uuid::new_v4();
        let q = query(
            "MATCH (d:Document {id: $doc_id})
             MATCH (e:Expert {id: $expert_id})
             CREATE (t:Tip {id: $id, text: $text, created_at: datetime($created_at)})
             CREATE (d)-[:HAS_TIP]->(t)
             CREATE (e)-[:PROVIDED]->(t)
             RETURN t.id AS id",
        )
        .param("doc_id", document_id.to_string())
        .param("expert_id", expert_id.to_string())
        .param("id", id.to_string())
        .param("text", text)
        .param("created_at", format_datetime(&chrono::Utc::now()));

        let mut stream = self.client.graph.execute(q).await.map_err(store_err)?;
        match stream.next().await.map_err(store_err)? {
            Some(_) => {
                info!(tip = %id, document = %document_id, expert = %expert_id, "Created tip");
                Ok(id)
            }
            None => Err(TacitError::NotFound(format!(
                "document {document_id} or expert {expert_id} does not exist"
            ))),
        }
    }

    /// Create an Outreach record for a search query, linked via CONCERNS to
    /// every gap document. One transaction: the node and all edges commit
    /// together or not at all.
    pub async fn create_query_outreach(
        &self,
        token: &str,
        search_query: &str,
        gap_document_ids: &[Uuid],
    ) -> Result<(), TacitError> {
        let mut queries = vec![query(
            "CREATE (o:Outreach {
                id: $id,
                query: $query,
                status: $status,
                created_at: datetime($created_at)
            })",
        )
        .param("id", token)
        .param("query", search_query)
        .param("status", OutreachStatus::Pending.to_string())
        .param("created_at", format_datetime(&chrono::Utc::now()))];

        for doc_id in gap_document_ids {
            queries.push(
                query(
                    "MATCH (o:Outreach {id: $outreach_id}), (d:Document {id: $doc_id})
                     CREATE (o)-[:CONCERNS]->(d)",
                )
                .param("outreach_id", token)
                .param("doc_id", doc_id.to_string()),
            );
        }

        let mut txn = self.client.graph.start_txn().await.map_err(store_err)?;
        txn.run_queries(queries).await.map_err(store_err)?;
        txn.commit().await.map_err(store_err)
    }

    /// Create an Outreach record for a single gap topic, linked to its
    /// document and assigned to the matched experts. One transaction.
    pub async fn create_topic_outreach(
        &self,
        token: &str,
        topic: &str,
        document_id: Uuid,
        expert_ids: &[Uuid],
    ) -> Result<(), TacitError> {
        let mut queries = vec![
            query(
                "CREATE (o:Outreach {
                    id: $id,
                    topic: $topic,
                    status: $status,
                    created_at: datetime($created_at)
                })",
            )
            .param("id", token)
            .param("topic", topic)
            .param("status", OutreachStatus::Pending.to_string())
            .param("created_at", format_datetime(&chrono::Utc::now())),
            query(
                "MATCH (o:Outreach {id: $outreach_id}), (d:Document {id: $doc_id})
                 CREATE (o)-[:CONCERNS]->(d)",
            )
            .param("outreach_id", token)
            .param("doc_id", document_id.to_string()),
        ];

        for expert_id in expert_ids {
            queries.push(
                query(
                    "MATCH (o:Outreach {id: $outreach_id}), (e:Expert {id: $expert_id})
                     CREATE (o)-[:ASSIGNED_TO]->(e)",
                )
                .param("outreach_id", token)
                .param("expert_id", expert_id.to_string()),
            );
        }

        let mut txn = self.client.graph.start_txn().await.map_err(store_err)?;
        txn.run_queries(queries).await.map_err(store_err)?;
        txn.commit().await.map_err(store_err)
    }
}
