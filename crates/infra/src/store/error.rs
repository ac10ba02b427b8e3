use std::time::Duration;

use thiserror::Error;

use stockline_core::DomainError;

/// Storage operation error.
///
/// These are infrastructure failures (IO, deadlines, key collisions) as
/// opposed to domain rejections. A conditional write whose filter matched
/// nothing is not an error; stores report it as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("persistence deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::Persistence(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockline_core::ErrorKind;

    #[test]
    fn every_store_error_is_a_persistence_error() {
        for e in [
            StoreError::Unavailable("down".into()),
            StoreError::Timeout(Duration::from_secs(8)),
            StoreError::Duplicate("x".into()),
            StoreError::Corrupt("y".into()),
        ] {
            assert_eq!(DomainError::from(e).kind(), ErrorKind::PersistenceError);
        }
    }
}
