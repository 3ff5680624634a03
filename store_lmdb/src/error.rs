use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for evote_store::StoreError {
    fn from(e: LmdbError) -> Self {
        use evote_store::StoreError;
        match e {
            LmdbError::NotFound(k) => StoreError::NotFound(k),
            LmdbError::Duplicate(k) => StoreError::Duplicate(k),
            LmdbError::Serialization(s) => StoreError::Serialization(s),
            LmdbError::Heed(s) => StoreError::Backend(s),
        }
    }
}
