//! Transport adapter for the two backend operations.
//!
//! Service-reported failures, transport-level failures, and malformed
//! bodies all surface through the `Err` arm of the outcome types, each
//! with a human-readable message. The adapter performs no retries and no
//! deduplication; retrying is a user action re-entered through the
//! workflow.

use crate::error::{AirStoreError, Result};
use crate::model::{LedgerEntry, SelectedFile};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback when the upload response carries no structured detail.
pub const UPLOAD_FALLBACK: &str = "An error occurred during extraction.";

/// Fallback when the confirm response carries no structured detail.
pub const CONFIRM_FALLBACK: &str = "An error occurred while confirming data.";

const MALFORMED: &str = "malformed response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Ok {
        record_id: String,
        entries: Vec<LedgerEntry>,
    },
    Err {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Ok,
    Err { message: String },
}

/// The two backend calls the workflow depends on.
///
/// Implemented over HTTP in production and by a scripted double in
/// tests. Always used through static dispatch, so plain `async fn`
/// methods are fine here.
#[allow(async_fn_in_trait)]
pub trait ExtractionApi {
    async fn upload_image(&self, file: &SelectedFile) -> UploadOutcome;
    async fn confirm_record(&self, record_id: &str, entries: &[LedgerEntry]) -> ConfirmOutcome;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadResponse {
    status: Option<String>,
    message: Option<String>,
    record_id: Option<String>,
    data: Option<UploadData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadData {
    entries: Vec<LedgerEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Serialize)]
struct ConfirmPayload<'a> {
    entries: &'a [LedgerEntry],
}

/// Classify an upload response body into an outcome.
///
/// `success` is the HTTP-level verdict (2xx). A 2xx body can still
/// report a service error via `status: "error"`; a non-2xx body may
/// carry a `detail` string.
pub fn classify_upload_response(success: bool, body: &str) -> UploadOutcome {
    if !success {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);
        return UploadOutcome::Err {
            message: detail.unwrap_or_else(|| UPLOAD_FALLBACK.to_string()),
        };
    }

    let response: UploadResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(_) => {
            return UploadOutcome::Err {
                message: MALFORMED.to_string(),
            }
        }
    };

    if response.status.as_deref() == Some("error") {
        return UploadOutcome::Err {
            message: response
                .message
                .unwrap_or_else(|| UPLOAD_FALLBACK.to_string()),
        };
    }

    match (response.record_id, response.data) {
        (Some(record_id), Some(data)) => UploadOutcome::Ok {
            record_id,
            entries: data.entries,
        },
        _ => UploadOutcome::Err {
            message: MALFORMED.to_string(),
        },
    }
}

/// Classify a confirm response. Any 2xx is a success; the body is not
/// inspected further.
pub fn classify_confirm_response(success: bool, body: &str) -> ConfirmOutcome {
    if success {
        return ConfirmOutcome::Ok;
    }

    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);
    ConfirmOutcome::Err {
        message: detail.unwrap_or_else(|| CONFIRM_FALLBACK.to_string()),
    }
}

/// HTTP implementation against the AirStore backend.
pub struct HttpExtractionApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExtractionApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AirStoreError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ExtractionApi for HttpExtractionApi {
    async fn upload_image(&self, file: &SelectedFile) -> UploadOutcome {
        let part = match reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.mime_type())
        {
            Ok(part) => part,
            Err(_) => {
                return UploadOutcome::Err {
                    message: UPLOAD_FALLBACK.to_string(),
                }
            }
        };
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await;

        match response {
            Ok(response) => {
                let success = response.status().is_success();
                let body = response.text().await.unwrap_or_default();
                classify_upload_response(success, &body)
            }
            Err(_) => UploadOutcome::Err {
                message: UPLOAD_FALLBACK.to_string(),
            },
        }
    }

    async fn confirm_record(&self, record_id: &str, entries: &[LedgerEntry]) -> ConfirmOutcome {
        let response = self
            .client
            .post(format!("{}/confirm/{}", self.base_url, record_id))
            .json(&ConfirmPayload { entries })
            .send()
            .await;

        match response {
            Ok(response) => {
                let success = response.status().is_success();
                let body = response.text().await.unwrap_or_default();
                classify_confirm_response(success, &body)
            }
            Err(_) => ConfirmOutcome::Err {
                message: CONFIRM_FALLBACK.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_success_body() {
        let body = r#"{
            "status": "success",
            "record_id": "r1",
            "data": {
                "entries": [
                    {"date": "2024-01-01", "name": "Raj", "amount": "100", "status": "pending"}
                ]
            }
        }"#;

        let outcome = classify_upload_response(true, body);
        match outcome {
            UploadOutcome::Ok { record_id, entries } => {
                assert_eq!(record_id, "r1");
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].name, "Raj");
                assert_eq!(entries[0].amount, "100");
            }
            UploadOutcome::Err { message } => panic!("unexpected error: {}", message),
        }
    }

    #[test]
    fn test_upload_success_without_status_field() {
        let body = r#"{"record_id": "r2", "data": {"entries": []}}"#;
        let outcome = classify_upload_response(true, body);
        assert!(matches!(outcome, UploadOutcome::Ok { record_id, .. } if record_id == "r2"));
    }

    #[test]
    fn test_upload_service_error() {
        let body = r#"{"status": "error", "message": "unreadable image"}"#;
        let outcome = classify_upload_response(true, body);
        assert_eq!(
            outcome,
            UploadOutcome::Err {
                message: "unreadable image".to_string()
            }
        );
    }

    #[test]
    fn test_upload_service_error_without_message() {
        let body = r#"{"status": "error"}"#;
        let outcome = classify_upload_response(true, body);
        assert_eq!(
            outcome,
            UploadOutcome::Err {
                message: UPLOAD_FALLBACK.to_string()
            }
        );
    }

    #[test]
    fn test_upload_http_error_with_detail() {
        let body = r#"{"detail": "image too large"}"#;
        let outcome = classify_upload_response(false, body);
        assert_eq!(
            outcome,
            UploadOutcome::Err {
                message: "image too large".to_string()
            }
        );
    }

    #[test]
    fn test_upload_http_error_without_detail() {
        let outcome = classify_upload_response(false, "Internal Server Error");
        assert_eq!(
            outcome,
            UploadOutcome::Err {
                message: UPLOAD_FALLBACK.to_string()
            }
        );
    }

    #[test]
    fn test_upload_malformed_body() {
        let outcome = classify_upload_response(true, "<html>oops</html>");
        assert_eq!(
            outcome,
            UploadOutcome::Err {
                message: "malformed response".to_string()
            }
        );
    }

    #[test]
    fn test_upload_missing_record_id() {
        let body = r#"{"data": {"entries": []}}"#;
        let outcome = classify_upload_response(true, body);
        assert_eq!(
            outcome,
            UploadOutcome::Err {
                message: "malformed response".to_string()
            }
        );
    }

    #[test]
    fn test_confirm_success_ignores_body() {
        assert_eq!(
            classify_confirm_response(true, r#"{"status": "success"}"#),
            ConfirmOutcome::Ok
        );
        assert_eq!(classify_confirm_response(true, ""), ConfirmOutcome::Ok);
    }

    #[test]
    fn test_confirm_http_error_with_detail() {
        let outcome = classify_confirm_response(false, r#"{"detail": "db unavailable"}"#);
        assert_eq!(
            outcome,
            ConfirmOutcome::Err {
                message: "db unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_confirm_http_error_without_detail() {
        let outcome = classify_confirm_response(false, "");
        assert_eq!(
            outcome,
            ConfirmOutcome::Err {
                message: CONFIRM_FALLBACK.to_string()
            }
        );
    }

    #[test]
    fn test_confirm_payload_shape() {
        let entries = vec![LedgerEntry {
            date: "2024-01-01".into(),
            name: "Raj".into(),
            amount: "150".into(),
            status: "pending".into(),
        }];
        let json = serde_json::to_string(&ConfirmPayload { entries: &entries }).expect("serialize");
        assert!(json.starts_with(r#"{"entries":["#));
        assert!(json.contains("\"amount\":\"150\""));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpExtractionApi::new("http://localhost:8000/", Duration::from_secs(5))
            .expect("client");
        assert_eq!(api.base_url(), "http://localhost:8000");
    }
}
