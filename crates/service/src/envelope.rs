//! The response envelope shared by every operation.

use serde::Serialize;

/// `{ success, data?, message?, errors? }`, absent members omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn failure(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        Envelope {
            success: false,
            data: None,
            message: Some(message.into()),
            errors,
        }
    }
}
