use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the inventory record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file missing, unreadable, or malformed
    #[error("failed to load inventory from {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// Backing file could not be written
    #[error("failed to save inventory to {path:?}: {reason}")]
    Persist { path: PathBuf, reason: String },

    /// `add` was given an id that is already in the table
    #[error("a remnant with ID {0} already exists")]
    DuplicateId(i64),
}

impl StoreError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persist(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Persist {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failures raised while resolving a remote remnant image
///
/// Each variant maps to its own inline diagnostic; none of them is ever
/// replaced with a placeholder image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Server answered with something other than 200 OK
    #[error("image request returned HTTP {status}")]
    Fetch { status: u16 },

    /// Response did not declare an image content type
    #[error("URL does not point to an image (content type: {})", .content_type.as_deref().unwrap_or("missing"))]
    ContentType { content_type: Option<String> },

    /// Body was served as an image but could not be decoded
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Connection, timeout, or body transfer failure
    #[error("network error while fetching image: {0}")]
    Network(String),
}

/// Returned when the manager view is requested with the wrong secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("incorrect password")]
pub struct AccessDenied;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_message_handles_missing_header() {
        let err = ImageError::ContentType { content_type: None };
        assert!(err.to_string().contains("missing"));

        let err = ImageError::ContentType {
            content_type: Some("text/html".to_string()),
        };
        assert!(err.to_string().contains("text/html"));
    }

    #[test]
    fn test_duplicate_id_message() {
        assert_eq!(
            StoreError::DuplicateId(7).to_string(),
            "a remnant with ID 7 already exists"
        );
    }
}
