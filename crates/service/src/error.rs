//! Errors returned by record operations.

use thiserror::Error;

use query_engine_execution::error as store;
use query_engine_metadata::metadata::{InvalidRecordId, RecordId};
use query_engine_translation::translation::error as translation;

use crate::envelope::Envelope;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid record ID format")]
    InvalidRecordId(#[from] InvalidRecordId),
    #[error("Record not found")]
    RecordNotFound(RecordId),
    #[error("Validation failed")]
    ValidationFailed(Vec<String>),
    #[error("Validation failed for one or more records")]
    BulkValidationFailed(Vec<String>),
    #[error("Invalid query parameters")]
    InvalidQuery(#[from] translation::Error),
    #[error("Records array is required and must not be empty")]
    EmptyBulkRequest,
    #[error("IDs array is required")]
    EmptyIdList,
    #[error("Maximum {0} records allowed per bulk operation")]
    BulkLimitExceeded(usize),
    #[error("store error: {0}")]
    Store(#[from] store::Error),
}

/// How the caller should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was wrong; repeating it will not help.
    BadRequest,
    NotFound,
    /// Something failed on our side.
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RecordNotFound(_) => ErrorKind::NotFound,
            Error::Store(_) => ErrorKind::Internal,
            Error::InvalidRecordId(_)
            | Error::ValidationFailed(_)
            | Error::BulkValidationFailed(_)
            | Error::InvalidQuery(_)
            | Error::EmptyBulkRequest
            | Error::EmptyIdList
            | Error::BulkLimitExceeded(_) => ErrorKind::BadRequest,
        }
    }

    /// The failure envelope to answer with. Store details are logged, not returned.
    pub fn to_envelope(&self) -> Envelope<()> {
        match self {
            Error::ValidationFailed(errors) | Error::BulkValidationFailed(errors) => {
                Envelope::failure(self.to_string(), Some(errors.clone()))
            }
            Error::InvalidQuery(error) => {
                Envelope::failure(self.to_string(), Some(vec![error.to_string()]))
            }
            Error::Store(_) => Envelope::failure("Server error processing request", None),
            _ => Envelope::failure(self.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ids_differ_from_missing_records() {
        let invalid = Error::from(InvalidRecordId("abc".into()));
        assert_eq!(invalid.kind(), ErrorKind::BadRequest);
        assert_eq!(
            invalid.to_envelope().message.as_deref(),
            Some("Invalid record ID format")
        );

        let missing = Error::RecordNotFound(RecordId::generate());
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.to_envelope().message.as_deref(), Some("Record not found"));
    }

    #[test]
    fn validation_errors_are_listed() {
        let envelope =
            Error::ValidationFailed(vec!["NO must be a valid number".into()]).to_envelope();
        assert!(!envelope.success);
        assert_eq!(envelope.errors, Some(vec!["NO must be a valid number".into()]));
    }

    #[test]
    fn bulk_limit_message() {
        assert_eq!(
            Error::BulkLimitExceeded(1000).to_string(),
            "Maximum 1000 records allowed per bulk operation"
        );
    }
}
