use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirStoreError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("Cannot {action} while {state}")]
    InvalidAction { action: &'static str, state: String },

    #[error("Extraction failed: {0}")]
    UploadFailed(String),

    #[error("Confirm failed: {0}")]
    ConfirmFailed(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AirStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_action() {
        let error = AirStoreError::InvalidAction {
            action: "upload",
            state: "uploading".to_string(),
        };
        assert_eq!(format!("{}", error), "Cannot upload while uploading");
    }

    #[test]
    fn test_error_display_upload_failed() {
        let error = AirStoreError::UploadFailed("unreadable image".to_string());
        assert_eq!(format!("{}", error), "Extraction failed: unreadable image");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: AirStoreError = io_error.into();
        assert!(matches!(error, AirStoreError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: AirStoreError = json_error.into();
        assert!(matches!(error, AirStoreError::Json(_)));
    }
}
