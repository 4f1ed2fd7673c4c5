pub mod config;
pub mod error;
pub mod terms;
pub mod types;

pub use config::Config;
pub use error::TacitError;
pub use terms::SearchTerms;
pub use types::*;
