// Success response envelope shared by all handlers.

use serde::Serialize;

/// Standard success envelope: `{status: 'success', message?, results?, data?}`.
///
/// `results` carries the element count for list responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Envelope around a single payload.
    pub fn data(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            results: None,
            data: Some(data),
        }
    }

    /// Envelope around a payload with a human-readable message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            results: None,
            data: Some(data),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Envelope around a list, with the element count in `results`.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            status: "success",
            message: None,
            results: Some(items.len()),
            data: Some(items),
        }
    }
}

impl ApiResponse<()> {
    /// Message-only acknowledgment (deletes, logout).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            results: None,
            data: None,
        }
    }
}
