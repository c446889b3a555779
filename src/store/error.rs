//! Persistence error types

use crate::state::ValidationErrors;
use thiserror::Error;

/// Failure reading or writing persisted data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Why a submission was not recorded
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_display_messages() {
        let err = StoreError::Backend("offline".into());
        assert_eq!(err.to_string(), "storage backend error: offline");

        let mut errors = HashMap::new();
        errors.insert("a".to_string(), "required".to_string());
        errors.insert("b".to_string(), "required".to_string());
        assert_eq!(
            SubmitError::Invalid(errors).to_string(),
            "2 field(s) failed validation"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: Result<u32, _> = serde_json::from_str("nope");
        let err: StoreError = parse.unwrap_err().into();
        assert!(matches!(err, StoreError::Serialization(_)));

        let submit: SubmitError = StoreError::Backend("x".into()).into();
        assert!(matches!(submit, SubmitError::Store(_)));
    }
}
