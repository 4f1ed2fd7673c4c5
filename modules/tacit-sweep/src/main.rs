//! Scheduled proactive gap sweep: find uncovered documents, match experts,
//! create pending outreach records. Intended to run daily (cron or similar).

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use slack_client::SlackClient;
use tacit_common::{Config, GapNotifier, NoopNotifier};
use tacit_graph::{migrate, GraphClient, OutreachWorkflow};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tacit=info".parse()?))
        .init();

    info!("Tacit gap sweep starting...");

    let config = Config::sweep_from_env();

    let client =
        GraphClient::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await?;

    migrate::ensure_schema(&client).await?;

    let notifier: Arc<dyn GapNotifier> = match config.slack_token.as_deref() {
        Some(token) => Arc::new(SlackClient::new(token, &config.slack_expert_channel)),
        None => {
            info!("No SLACK_TOKEN configured, notifications disabled");
            Arc::new(NoopNotifier)
        }
    };

    let workflow = OutreachWorkflow::new(client, notifier);
    let created = workflow.sweep().await?;

    info!(outreach_created = created.len(), "Proactive gap sweep complete");
    Ok(())
}
