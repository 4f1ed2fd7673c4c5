use neo4rs::query;
use tracing::info;

use crate::GraphClient;

/// Uniqueness constraints backing the schema invariants: document ids and
/// titles, expert ids, and tip ids are globally unique.
const CONSTRAINTS: [&str; 4] = [
    "CREATE CONSTRAINT document_id IF NOT EXISTS
     FOR (d:Document)
     REQUIRE d.id IS UNIQUE",
    "CREATE CONSTRAINT document_title IF NOT EXISTS
     FOR (d:Document)
     REQUIRE d.title IS UNIQUE",
    "CREATE CONSTRAINT expert_id IF NOT EXISTS
     FOR (e:Expert)
     REQUIRE e.id IS UNIQUE",
    "CREATE CONSTRAINT tip_id IF NOT EXISTS
     FOR (t:Tip)
     REQUIRE t.id IS UNIQUE",
];

/// Idempotent schema migration. Run at startup before any writes.
pub async fn ensure_schema(client: &GraphClient) -> Result<(), neo4rs::Error> {
    for stmt in CONSTRAINTS {
        client.graph.run(query(stmt)).await?;
    }
    info!("Graph schema constraints ensured");
    Ok(())
}
