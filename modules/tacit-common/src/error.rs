use thiserror::Error;

#[derive(Error, Debug)]
pub enum TacitError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
