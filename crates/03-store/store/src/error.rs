use std::error::Error as StdError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid action: {0}")]
    InvalidAction(&'static str),

    #[error("reducers may not dispatch actions (nested dispatch of `{action}`)")]
    ReentrantDispatch { action: String },

    #[error("reducer failed: {0}")]
    Reducer(#[source] Box<dyn StdError + Send + Sync>),

    #[error("invalid store configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl StoreError {
    pub fn reducer(err: impl StdError + Send + Sync + 'static) -> Self {
        StoreError::Reducer(Box::new(err))
    }
}
