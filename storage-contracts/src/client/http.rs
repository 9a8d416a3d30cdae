// SPDX-License-Identifier: GPL-3.0-only

//! HTTP client for the disk management API
//!
//! Talks JSON over plain request/response calls. The inventory query is a
//! `GET`; each mutation is a `POST` whose body is interpreted as an
//! [`OperationResult`] whenever it parses as one, including on 4xx/5xx
//! replies (a read-only server answers 403 with a structured body).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use storage_types::InventorySnapshot;

use crate::client::error::ClientError;
use crate::protocol::{INVENTORY_ENDPOINT, OperationId, OperationRequest, OperationResult};
use crate::traits::DiskApi;

/// Header carrying the [`OperationId`] of a mutating request.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct HttpDiskApi {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpDiskApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDiskApi")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpDiskApi {
    /// Create a client for the API rooted at `base_url` (e.g. "http://127.0.0.1:5000")
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidArgument(format!("Invalid API URL '{base_url}': {e}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidArgument(format!(
                "Unsupported API URL scheme: {}",
                base_url.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("diskmap/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl DiskApi for HttpDiskApi {
    async fn fetch_inventory(&self) -> Result<InventorySnapshot, ClientError> {
        let url = self.endpoint(INVENTORY_ENDPOINT);
        tracing::debug!(%url, "fetching disk inventory");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let snapshot: InventorySnapshot = serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse inventory: {e}")))?;
        Ok(snapshot)
    }

    async fn submit(
        &self,
        operation_id: OperationId,
        request: &OperationRequest,
    ) -> Result<OperationResult, ClientError> {
        let kind = request.kind();
        let url = self.endpoint(kind.endpoint());
        let body = request.to_body()?;
        tracing::debug!(%url, %operation_id, ?kind, "submitting disk operation");

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, operation_id.to_string())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        interpret_operation_response(status, text)
    }
}

fn interpret_operation_response(
    status: StatusCode,
    body: String,
) -> Result<OperationResult, ClientError> {
    match serde_json::from_str::<OperationResult>(&body) {
        // A success body on an error status is not trustworthy.
        Ok(result) if !status.is_success() && result.is_success() => Err(ClientError::Http {
            status: status.as_u16(),
            body,
        }),
        Ok(result) => Ok(result),
        Err(e) if status.is_success() => Err(ClientError::ParseError(format!(
            "Failed to parse operation result: {e}"
        ))),
        Err(_) => Err(ClientError::Http {
            status: status.as_u16(),
            body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        let err = HttpDiskApi::new("ftp://example.com", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));

        let err = HttpDiskApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let api = HttpDiskApi::new("http://127.0.0.1:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.endpoint("/api/disks"), "http://127.0.0.1:5000/api/disks");
    }

    #[test]
    fn structured_error_on_forbidden_is_a_result() {
        let body = r#"{"status":"error","message":"disabled"}"#.to_string();
        let result = interpret_operation_response(StatusCode::FORBIDDEN, body).unwrap();
        assert_eq!(result, OperationResult::failure("disabled"));
    }

    #[test]
    fn unstructured_error_is_transport_failure() {
        let err = interpret_operation_response(StatusCode::BAD_GATEWAY, "<html>".to_string())
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::Http {
                status: 502,
                body: "<html>".to_string()
            }
        );
    }

    #[test]
    fn garbage_on_ok_is_parse_error() {
        let err = interpret_operation_response(StatusCode::OK, "ok".to_string()).unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[test]
    fn success_body_on_error_status_is_not_trusted() {
        let body = r#"{"status":"success"}"#.to_string();
        let err =
            interpret_operation_response(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
    }
}
