use thiserror::Error;

pub type CombineResult<T> = Result<T, CombineError>;

/// Failure raised by a single JSON slice reducer.
#[derive(Debug, Error)]
pub enum SliceError {
    #[error("failed to decode slice state: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode slice state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("slice reducer failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Nested(Box<CombineError>),
}

impl SliceError {
    pub fn failed(msg: impl Into<String>) -> Self {
        SliceError::Failed(msg.into())
    }
}

impl From<CombineError> for SliceError {
    fn from(err: CombineError) -> Self {
        SliceError::Nested(Box::new(err))
    }
}

/// Errors surfaced while building or evaluating a [`crate::CombinedReducer`].
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("slice key must not be empty")]
    EmptyKey,

    #[error("slice key `{0}` registered more than once")]
    DuplicateKey(String),

    #[error("slice `{key}` has no valid initial state for {action}: {source}")]
    InitialState {
        key: String,
        action: &'static str,
        #[source]
        source: SliceError,
    },

    #[error("previous state must be an object with keys [{expected}], found {found}")]
    NotAnObject { expected: String, found: &'static str },

    #[error("slice `{key}` failed: {source}")]
    Slice {
        key: String,
        #[source]
        source: SliceError,
    },
}
