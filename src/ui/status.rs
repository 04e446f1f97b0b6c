use crate::app::ActionOutcome;
use crate::error::{ImageError, StoreError};

/// User-facing text for a record store failure
pub fn describe_store_error(err: &StoreError) -> String {
    match err {
        StoreError::Load { path, reason } => {
            format!("Could not read remnant stock from {}: {}", path.display(), reason)
        }
        StoreError::Persist { path, reason } => format!(
            "Could not save remnant stock to {}: {}. No changes were written.",
            path.display(),
            reason
        ),
        StoreError::DuplicateId(id) => {
            format!("ID {} is already in use. Pick another ID and try again.", id)
        }
    }
}

/// Inline diagnostic shown in place of a remnant photo
pub fn describe_image_error(err: &ImageError) -> String {
    match err {
        ImageError::Fetch { status } => {
            format!("Failed to load image (HTTP status {})", status)
        }
        ImageError::ContentType { content_type } => format!(
            "URL does not point to a valid image (content type: {})",
            content_type.as_deref().unwrap_or("missing")
        ),
        ImageError::Decode(reason) => format!("Image could not be decoded: {}", reason),
        ImageError::Network(reason) => format!("Error loading image: {}", reason),
    }
}

/// Confirmation line after a manager action
pub fn describe_outcome(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Updated { id, dimensions, .. } => {
            format!("Updated dimensions for ID {} to {}", id, dimensions)
        }
        ActionOutcome::Deleted { id, rows: 1 } => format!("Deleted remnant with ID {}", id),
        ActionOutcome::Deleted { id, rows } => {
            format!("Deleted {} remnants with ID {}", rows, id)
        }
        ActionOutcome::Added { id } => format!("Added new remnant with ID {}", id),
        ActionOutcome::NotFound { id } => format!("No remnant with ID {}; nothing changed", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_each_image_error_has_distinct_message() {
        let messages = [
            describe_image_error(&ImageError::Fetch { status: 404 }),
            describe_image_error(&ImageError::ContentType {
                content_type: Some("text/html".to_string()),
            }),
            describe_image_error(&ImageError::Decode("bad header".to_string())),
            describe_image_error(&ImageError::Network("timed out".to_string())),
        ];

        assert!(messages[0].contains("404"));
        assert!(messages[1].contains("text/html"));
        assert!(messages[2].contains("bad header"));
        assert!(messages[3].contains("timed out"));
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_store_errors_are_verbatim() {
        let err = StoreError::Persist {
            path: PathBuf::from("/srv/stock.csv"),
            reason: "permission denied".to_string(),
        };
        let text = describe_store_error(&err);
        assert!(text.contains("/srv/stock.csv"));
        assert!(text.contains("permission denied"));

        assert!(describe_store_error(&StoreError::DuplicateId(3)).contains("ID 3"));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            describe_outcome(&ActionOutcome::Deleted { id: 4, rows: 1 }),
            "Deleted remnant with ID 4"
        );
        assert_eq!(
            describe_outcome(&ActionOutcome::Deleted { id: 4, rows: 2 }),
            "Deleted 2 remnants with ID 4"
        );
        assert!(describe_outcome(&ActionOutcome::NotFound { id: 9 }).contains("nothing changed"));
    }
}
