//! Record identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const IDENTIFIER_LENGTH: usize = 24;

/// An opaque record identifier in the document store's object id format:
/// 24 hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid record identifier '{0}'")]
pub struct InvalidRecordId(pub String);

impl RecordId {
    /// Parse and validate an identifier supplied by a client.
    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        if value.len() == IDENTIFIER_LENGTH && value.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(RecordId(value.to_ascii_lowercase()))
        } else {
            Err(InvalidRecordId(value.to_string()))
        }
    }

    /// A fresh random identifier.
    pub fn generate() -> Self {
        let bytes = uuid::Uuid::new_v4().into_bytes();
        let hex: String = bytes[..IDENTIFIER_LENGTH / 2]
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect();
        RecordId(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let RecordId(id) = self;
        write!(f, "{id}")
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecordId::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_object_ids() {
        let id = RecordId::parse("65A0C0FFEE0000000000ABCD").unwrap();
        assert_eq!(id.as_str(), "65a0c0ffee0000000000abcd");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(RecordId::parse("not-an-id").is_err());
        assert!(RecordId::parse("65a0c0ffee0000000000abc").is_err());
        assert!(RecordId::parse("65a0c0ffee0000000000abcz").is_err());
    }

    #[test]
    fn generated_ids_are_valid() {
        let id = RecordId::generate();
        assert_eq!(RecordId::parse(id.as_str()), Ok(id));
    }
}
