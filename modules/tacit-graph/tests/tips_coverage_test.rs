//! Integration tests for tip creation and coverage tracking.
//!
//! Requirements: Docker (for Neo4j via testcontainers)
//!
//! Run with: cargo test -p tacit-graph --features test-utils --test tips_coverage_test

#![cfg(feature = "test-utils")]

use chrono::Utc;
use uuid::Uuid;

use tacit_common::{NewDocument, TacitError};
use tacit_graph::{migrate, query, GraphClient, GraphReader, GraphWriter};

async fn setup() -> (impl std::any::Any, GraphClient) {
    let (container, client) = tacit_graph::testutil::neo4j_container().await;
    migrate::ensure_schema(&client)
        .await
        .expect("Failed to ensure schema");
    (container, client)
}

fn new_document(title: &str, keywords: &[&str]) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        filename: format!("20250101_000000_{title}.pdf"),
        original_filename: format!("{title}.pdf"),
        author_id: "user-1".to_string(),
        author_name: "Test Author".to_string(),
        field: Some("devops".to_string()),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        file_link: format!("/uploads/{title}.pdf"),
        content_type: "application/pdf".to_string(),
        is_admin_content: false,
        created_at: Utc::now(),
    }
}

async fn count(client: &GraphClient, cypher: &str) -> i64 {
    let mut stream = client.inner().execute(query(cypher)).await.unwrap();
    let row = stream.next().await.unwrap().unwrap();
    row.get::<i64>("n").unwrap()
}

#[tokio::test]
async fn tip_creation_covers_document() {
    let (_container, client) = setup().await;
    let writer = GraphWriter::new(client.clone());
    let reader = GraphReader::new(client.clone());

    let doc_id = writer
        .create_document(&new_document("Kubernetes Basics", &["k8s", "orchestration"]))
        .await
        .unwrap();
    let expert_id = writer
        .create_expert(
            "Alex Rivera",
            "alex@example.com",
            &["Kubernetes Basics".to_string()],
        )
        .await
        .unwrap();

    // Freshly created document has no tips: it is a coverage gap.
    let gaps = reader.find_uncovered_documents().await.unwrap();
    assert!(gaps.iter().any(|g| g.id == doc_id));

    let tip_id = writer
        .create_tip("Prefer namespaces per team.", doc_id, expert_id)
        .await
        .unwrap();

    // Tip and both edges are visible together.
    let doc = reader
        .get_document_with_tips(doc_id)
        .await
        .unwrap()
        .expect("document should exist");
    assert_eq!(doc.tips.len(), 1);
    assert_eq!(doc.tips[0].id, tip_id);
    assert_eq!(doc.tips[0].expert_name, "Alex Rivera");
    assert!(doc.is_covered());

    // Coverage is recomputed: the document left the gap set.
    let gaps = reader.find_uncovered_documents().await.unwrap();
    assert!(!gaps.iter().any(|g| g.id == doc_id));
}

#[tokio::test]
async fn tip_with_missing_parent_creates_nothing() {
    let (_container, client) = setup().await;
    let writer = GraphWriter::new(client.clone());
    let reader = GraphReader::new(client.clone());

    let doc_id = writer
        .create_document(&new_document("Helm Charts", &["helm"]))
        .await
        .unwrap();
    let expert_id = writer
        .create_expert("Sam Lee", "sam@example.com", &["Helm Charts".to_string()])
        .await
        .unwrap();

    // Nonexistent document: no tip node, no edges, NotFound surfaced.
    let result = writer
        .create_tip("orphan tip", Uuid::new_v4(), expert_id)
        .await;
    assert!(matches!(result, Err(TacitError::NotFound(_))));
    assert_eq!(count(&client, "MATCH (t:Tip) RETURN count(t) AS n").await, 0);

    // Nonexistent expert: same guarantee.
    let result = writer.create_tip("orphan tip", doc_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(TacitError::NotFound(_))));
    assert_eq!(count(&client, "MATCH (t:Tip) RETURN count(t) AS n").await, 0);

    // The real document never saw a tip.
    let doc = reader
        .get_document_with_tips(doc_id)
        .await
        .unwrap()
        .expect("document should exist");
    assert!(doc.tips.is_empty());
}

#[tokio::test]
async fn expert_listing_counts_distinct_tips() {
    let (_container, client) = setup().await;
    let writer = GraphWriter::new(client.clone());
    let reader = GraphReader::new(client.clone());

    let doc_a = writer
        .create_document(&new_document("Terraform Modules", &["iac"]))
        .await
        .unwrap();
    let doc_b = writer
        .create_document(&new_document("Terraform State", &["iac"]))
        .await
        .unwrap();
    let expert_id = writer
        .create_expert(
            "Ana Silva",
            "ana@example.com",
            &["Terraform Modules".to_string(), "Terraform State".to_string()],
        )
        .await
        .unwrap();

    writer.create_tip("Pin provider versions.", doc_a, expert_id).await.unwrap();
    writer.create_tip("Use remote state locking.", doc_b, expert_id).await.unwrap();

    let experts = reader.list_experts().await.unwrap();
    let ana = experts.iter().find(|e| e.id == expert_id).unwrap();
    assert_eq!(ana.tips_count, 2);
    assert_eq!(ana.expertise_areas.len(), 2);
}
