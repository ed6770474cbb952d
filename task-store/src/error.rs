use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The key would resolve to a path outside the data directory.
    #[error("Invalid document name: '{0}'")]
    InvalidName(String),
}
