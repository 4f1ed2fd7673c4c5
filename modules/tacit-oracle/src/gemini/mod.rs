mod client;
mod oracle;
pub mod types;

pub use client::GeminiClient;
pub use oracle::GeminiOracle;
