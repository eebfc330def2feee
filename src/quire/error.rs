use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The durable copy is stale; the in-memory store still holds the change.
    #[error("Could not write storage slot '{key}': {reason}")]
    SlotWrite { key: String, reason: String },

    #[error("{0}")]
    Validation(String),

    #[error("No notebooks in store")]
    NoNotebooks,

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, QuireError>;
