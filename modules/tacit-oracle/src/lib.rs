//! Generative-text oracle for Tacit.
//!
//! The oracle is an unreliable collaborator: it may be slow, may fail, and
//! may return malformed structure for the roles that expect JSON. Raw oracle
//! text never reaches ranking or gap logic directly — every consumer goes
//! through `normalize`.

pub mod gemini;
pub mod normalize;
pub mod prompts;
pub mod traits;

pub use gemini::GeminiOracle;
pub use traits::{SearchContext, TextOracle, TopicContext};
