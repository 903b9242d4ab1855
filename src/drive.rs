//! Object storage for user uploads.
//!
//! Files land in a Drive folder through a resumable upload session (start
//! the session, then send the bytes) and come back as a shareable link that
//! gets written into the spreadsheet.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::auth::TokenProvider;
use crate::error::UploadError;

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=resumable";

/// Uploads file bytes and returns a link to the stored object.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    async fn upload(
        &self,
        folder_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// Drive v3 implementation.
pub struct DriveUploader {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
}

impl DriveUploader {
    pub fn new(tokens: Arc<TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
        }
    }
}

/// Viewer link for an uploaded file.
pub fn share_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{file_id}/view?usp=sharing")
}

#[async_trait]
impl ObjectUploader for DriveUploader {
    async fn upload(
        &self,
        folder_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, UploadError> {
        let token = self.tokens.access_token().await?;

        let metadata = json!({
            "name": filename,
            "parents": [folder_id],
        });

        let start = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(&token)
            .json(&metadata)
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;

        if !start.status().is_success() {
            return Err(UploadError::Api {
                status: start.status().as_u16(),
                body: start.text().await.unwrap_or_default(),
            });
        }

        let session_url = start
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(UploadError::MissingLocation)?;

        let finish = self
            .http
            .put(&session_url)
            .bearer_auth(&token)
            .body(bytes)
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;

        if !finish.status().is_success() {
            return Err(UploadError::Api {
                status: finish.status().as_u16(),
                body: finish.text().await.unwrap_or_default(),
            });
        }

        let file: DriveFile = finish
            .json()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        tracing::debug!(file_id = %file.id, %filename, %folder_id, "file uploaded");
        Ok(share_link(&file.id))
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_link_format() {
        assert_eq!(
            share_link("abc123"),
            "https://drive.google.com/file/d/abc123/view?usp=sharing"
        );
    }

    #[test]
    fn drive_file_response_parses() {
        let file: DriveFile =
            serde_json::from_str(r#"{"id": "xyz", "kind": "drive#file"}"#).unwrap();
        assert_eq!(file.id, "xyz");
    }
}
