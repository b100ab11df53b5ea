use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A Markov transition row is missing or malformed. This is a
    /// corrupted model definition, not a per-customer failure: the
    /// driver aborts the whole run on it.
    #[error("Transition table error for state '{state}': {detail}")]
    Model { state: String, detail: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
