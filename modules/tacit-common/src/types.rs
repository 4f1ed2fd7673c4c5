use async_trait::async_trait;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Limits ---

/// Maximum distinct topics returned by reactive (per-search) gap detection.
pub const RELATED_GAP_LIMIT: usize = 5;
/// Maximum documents returned by field-based recommendations.
pub const RECOMMENDATION_LIMIT: usize = 10;
/// Documents shown in the "Related Documents" section of a search answer.
pub const RELATED_DOC_DISPLAY_LIMIT: usize = 3;
/// Length of the random outreach token.
pub const OUTREACH_TOKEN_LEN: usize = 10;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Document,
    Summary,
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocType::Document => write!(f, "document"),
            DocType::Summary => write!(f, "summary"),
        }
    }
}

/// Outreach lifecycle. Only `Pending` is exercised today; the enum exists so
/// status transitions can be added without a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutreachStatus {
    Pending,
}

impl std::fmt::Display for OutreachStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutreachStatus::Pending => write!(f, "pending"),
        }
    }
}

// --- Write payloads ---

/// Fields for a new Document node, produced by the upload pipeline.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub filename: String,
    pub original_filename: String,
    pub author_id: String,
    pub author_name: String,
    pub field: Option<String>,
    pub keywords: Vec<String>,
    pub file_link: String,
    pub content_type: String,
    pub is_admin_content: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new Summary node, produced when a chat conversation is condensed.
#[derive(Debug, Clone)]
pub struct NewSummary {
    pub topic: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

// --- Read records ---

#[derive(Debug, Clone, Serialize)]
pub struct TipRecord {
    pub id: Uuid,
    pub text: String,
    pub expert_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithTips {
    pub id: Uuid,
    pub title: String,
    pub tips: Vec<TipRecord>,
}

impl DocumentWithTips {
    pub fn tips_count(&self) -> usize {
        self.tips.len()
    }

    /// Coverage means at least one expert tip is attached.
    pub fn is_covered(&self) -> bool {
        !self.tips.is_empty()
    }
}

/// Document metadata as read back from the graph (no tips).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub title: String,
    pub filename: String,
    pub original_filename: String,
    pub author_name: String,
    pub field: Option<String>,
    pub keywords: Vec<String>,
    pub file_link: String,
    pub content_type: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpertRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub expertise_areas: Vec<String>,
    pub tips_count: i64,
}

/// Expert matched by expertise-area substring search. No tip count; used by
/// the outreach workflow for assignment only.
#[derive(Debug, Clone, Serialize)]
pub struct ExpertMatch {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub expertise_areas: Vec<String>,
}

/// One scored search result. Documents and summaries share this shape;
/// summary hits have no keywords or file link and carry their content inline.
#[derive(Debug, Clone, Serialize)]
pub struct RankedHit {
    pub id: Uuid,
    pub title: String,
    pub doc_type: DocType,
    pub file_link: Option<String>,
    pub view_link: Option<String>,
    pub keywords: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub field: Option<String>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub original_filename: Option<String>,
    pub score: f64,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub summary_content: Option<String>,
}

/// A topic that is (or may be) a knowledge gap. `id` is the document behind it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GapTopic {
    pub topic: String,
    pub id: Uuid,
}

/// One gap identified by the text oracle: the missing topic and why it matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GapFinding {
    pub topic: String,
    #[serde(default)]
    pub reason: String,
}

/// A distinct topic row fed to the oracle for gap analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TopicRow {
    pub topic: String,
    pub keywords: Vec<String>,
    pub fields: Vec<String>,
    pub id: Uuid,
}

/// Returned by the reactive outreach path.
#[derive(Debug, Clone, Serialize)]
pub struct OutreachReceipt {
    pub message_id: String,
    pub status: String,
}

// --- Collaborator contracts ---

/// Output of the NLP extraction collaborator. Entities and keywords are
/// lowercase; order is not guaranteed and both are treated as sets.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub entities: Vec<String>,
    pub keywords: Vec<String>,
}

/// NLP extraction collaborator: entity and lemmatized-keyword extraction
/// for a query string. The core never runs NLP itself.
pub trait TermExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Extraction;
}

/// Notification collaborator. Fire-and-forget: callers log failures and move
/// on; there is no acknowledgment contract.
#[async_trait]
pub trait GapNotifier: Send + Sync {
    async fn notify_gaps(&self, gaps: &[GapTopic], origin_query: &str) -> anyhow::Result<()>;
}

/// Valid no-op state for deployments without a configured sender.
pub struct NoopNotifier;

#[async_trait]
impl GapNotifier for NoopNotifier {
    async fn notify_gaps(&self, _gaps: &[GapTopic], _origin_query: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
