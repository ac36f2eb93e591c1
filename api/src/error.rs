use thiserror::Error;

/// Shape violations found while building a [`crate::Dataset`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("a dataset needs at least one entry")]
    Empty,

    #[error("entry {index}: {field} must be between 0 and 100 (got {value})")]
    RateOutOfRange {
        index: usize,
        field: &'static str,
        value: u16,
    },

    #[error("entry {index} does not exist (dataset has {len} entries)")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Anything that went wrong talking to the record store.
///
/// `Display` is what the user sees, so store-provided messages are passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("The data store is not configured. Set VOICEBOARD_STORE_URL and VOICEBOARD_STORE_KEY.")]
    Unconfigured,

    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response from the data store: {0}")]
    Decode(String),

    #[error("Saved data is malformed: {0}")]
    InvalidPayload(#[from] DatasetError),

    #[error("A saved record already exists for {identity} ({category})")]
    Duplicate { identity: String, category: String },

    #[error("No saved record matched {identity} ({category})")]
    Missing { identity: String, category: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<StoreError> for String {
    fn from(err: StoreError) -> Self {
        err.to_string()
    }
}
