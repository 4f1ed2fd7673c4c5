use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Neo4j
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    // Text oracle
    pub gemini_api_key: String,

    // Notifications (optional — absent means no-op)
    pub slack_token: Option<String>,
    pub slack_expert_channel: String,
}

impl Config {
    /// Load full configuration. Panics with a clear message if required
    /// variables are missing.
    pub fn from_env() -> Self {
        Self {
            neo4j_uri: required_env("NEO4J_URI"),
            neo4j_user: required_env("NEO4J_USER"),
            neo4j_password: required_env("NEO4J_PASSWORD"),
            gemini_api_key: required_env("GEMINI_API_KEY"),
            slack_token: env::var("SLACK_TOKEN").ok(),
            slack_expert_channel: env::var("SLACK_EXPERT_CHANNEL")
                .unwrap_or_else(|_| "#knowledge-experts".to_string()),
        }
    }

    /// Minimal config for the proactive sweep: no oracle key needed.
    pub fn sweep_from_env() -> Self {
        Self {
            neo4j_uri: required_env("NEO4J_URI"),
            neo4j_user: required_env("NEO4J_USER"),
            neo4j_password: required_env("NEO4J_PASSWORD"),
            gemini_api_key: String::new(),
            slack_token: env::var("SLACK_TOKEN").ok(),
            slack_expert_channel: env::var("SLACK_EXPERT_CHANNEL")
                .unwrap_or_else(|_| "#knowledge-experts".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
