use std::time::Duration;

use gdocs_editor_engine::wire::{decode_document, decode_error_message, encode_batch_update};
use gdocs_editor_engine::{DocumentService, DocumentSnapshot, EditOperation, ServiceError};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// [`DocumentService`] backed by the Google Docs REST API.
pub struct GoogleDocsClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleDocsClient {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn document_url(&self, document_id: &str) -> String {
        format!("{}/documents/{document_id}", self.base_url)
    }

    /// Read the body of `response`, mapping unsuccessful statuses to errors.
    async fn read_body(
        response: reqwest::Response,
        document_id: &str,
    ) -> Result<String, ServiceError> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if status.is_success() {
            Ok(body)
        } else {
            log::debug!("{document_id}: service answered {status}: {body}");
            Err(classify_failure(status, document_id, &body))
        }
    }
}

impl DocumentService for GoogleDocsClient {
    async fn fetch_document(&self, document_id: &str) -> Result<DocumentSnapshot, ServiceError> {
        let response = self
            .client
            .get(self.document_url(document_id))
            .send()
            .await
            .map_err(transport_error)?;

        let body = Self::read_body(response, document_id).await?;
        decode_document(&body)
    }

    async fn apply_edits(
        &self,
        document_id: &str,
        edits: &[EditOperation],
    ) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(format!("{}:batchUpdate", self.document_url(document_id)))
            .json(&encode_batch_update(edits))
            .send()
            .await
            .map_err(transport_error)?;

        Self::read_body(response, document_id).await.map(|_| ())
    }
}

fn transport_error(error: reqwest::Error) -> ServiceError {
    ServiceError::Transport(error.to_string())
}

fn classify_failure(status: StatusCode, document_id: &str, body: &str) -> ServiceError {
    let message = decode_error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(document_id.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(message),
        StatusCode::BAD_REQUEST => ServiceError::InvalidRequest(message),
        _ => ServiceError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}
