//! Google Drive client for uploading database snapshots
//!
//! Authenticates with a locally cached authorized-user token (the file the
//! Google consent flow writes). An expired access token is refreshed against
//! the token endpoint and the file is rewritten; a missing or unusable file
//! surfaces as `ExternalService` so the rest of the system keeps running.

use chrono::{DateTime, Duration, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Google Drive upload client
#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    token_path: String,
    upload_endpoint: String,
}

/// Cached authorized-user token, in the shape the consent flow writes it.
/// Unknown fields are preserved across rewrites.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    refresh_token: Option<String>,
    token_uri: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
}

impl DriveClient {
    /// Create a new DriveClient
    pub fn new(token_path: String, upload_endpoint: String) -> Self {
        Self {
            client: Client::new(),
            token_path,
            upload_endpoint,
        }
    }

    /// Upload a snapshot under the given name, returning the remote file id
    pub async fn upload_snapshot(&self, bytes: Vec<u8>, name: &str) -> AppResult<String> {
        let access_token = self.access_token().await?;

        let metadata = serde_json::json!({ "name": name }).to_string();
        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata)
                    .mime_str("application/json")
                    .map_err(|e| AppError::Internal(format!("multipart error: {}", e)))?,
            )
            .part(
                "media",
                Part::bytes(bytes)
                    .mime_str("application/octet-stream")
                    .map_err(|e| AppError::Internal(format!("multipart error: {}", e)))?,
            );

        let response = self
            .client
            .post(format!(
                "{}?uploadType=multipart&fields=id",
                self.upload_endpoint
            ))
            .bearer_auth(access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Drive upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Drive API returned {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Drive API response unreadable: {}", e))
        })?;

        Ok(uploaded.id)
    }

    /// Current access token, refreshing and persisting it when expired
    async fn access_token(&self) -> AppResult<String> {
        let raw = tokio::fs::read_to_string(&self.token_path).await.map_err(|_| {
            AppError::ExternalService(format!(
                "credential file {} is missing; run the consent flow to provision it",
                self.token_path
            ))
        })?;

        let mut stored: StoredToken = serde_json::from_str(&raw).map_err(|e| {
            AppError::ExternalService(format!(
                "credential file {} is unreadable: {}",
                self.token_path, e
            ))
        })?;

        let expired = stored.expiry.map(|e| e <= Utc::now()).unwrap_or(false);
        if !expired {
            return Ok(stored.token);
        }

        let (refresh_token, token_uri, client_id, client_secret) = match (
            &stored.refresh_token,
            &stored.token_uri,
            &stored.client_id,
            &stored.client_secret,
        ) {
            (Some(r), Some(u), Some(i), Some(s)) => (r, u, i, s),
            _ => {
                return Err(AppError::ExternalService(
                    "credential expired and cannot be refreshed; re-run the consent flow"
                        .to_string(),
                ))
            }
        };

        tracing::info!("Refreshing expired Drive access token");

        let response = self
            .client
            .post(token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("token refresh failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let refreshed: RefreshResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("token endpoint response unreadable: {}", e))
        })?;

        stored.token = refreshed.access_token;
        stored.expiry = Some(Utc::now() + Duration::seconds(refreshed.expires_in));

        let serialized = serde_json::to_string_pretty(&stored)
            .map_err(|e| AppError::Internal(format!("token serialization error: {}", e)))?;
        tokio::fs::write(&self.token_path, serialized)
            .await
            .map_err(|e| {
                AppError::ExternalService(format!(
                    "cannot persist refreshed credential to {}: {}",
                    self.token_path, e
                ))
            })?;

        Ok(stored.token)
    }
}
