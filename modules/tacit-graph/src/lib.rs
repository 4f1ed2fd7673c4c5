pub mod advisor;
pub mod client;
pub mod gaps;
pub mod migrate;
pub mod outreach;
pub mod reader;
pub mod search;
pub mod writer;

#[cfg(feature = "test-utils")]
pub mod testutil;

pub use advisor::{GapAdvisor, TopicSource};
pub use client::GraphClient;
pub use gaps::GapDetector;
pub use outreach::OutreachWorkflow;
pub use reader::GraphReader;
pub use search::{GroupedResults, ResultGroup, SearchEngine};
pub use writer::GraphWriter;

pub use neo4rs::query;

use tacit_common::TacitError;

/// Store communication failures are opaque to callers; the driver error text
/// is preserved for logs.
pub(crate) fn store_err(e: neo4rs::Error) -> TacitError {
    TacitError::Store(e.to_string())
}

/// Format a timestamp the way Neo4j's `datetime($param)` expects it.
pub(crate) fn format_datetime(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
