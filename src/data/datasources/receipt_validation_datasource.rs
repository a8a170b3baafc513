use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use tokio_util::sync::CancellationToken;

use crate::{constants::VERIFY_RECEIPT_CONTENT_TYPE, errors::IapError};

#[derive(Debug)]
pub(crate) struct CalloutResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Vec<u8>,
}

#[async_trait]
pub(crate) trait ReceiptValidationDatasource: Send + Sync {
    /// verifyReceipt:
    /// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
    ///
    /// url:
    ///   Production or sandbox verifyReceipt endpoint.
    /// body:
    ///   The already-serialized JSON request body, sent as-is.
    /// cancel:
    ///   Aborts the callout (sending or reading the body) when triggered.
    ///
    /// Responses with a 5xx status are turned into
    /// `IapError::AppStoreServer` without reading the body.
    async fn post(
        &self,
        url: &str,
        body: &[u8],
        cancel: &CancellationToken,
    ) -> Result<CalloutResponse, IapError>;
}

pub(crate) struct ReceiptValidationDatasourceImpl {
    http_client: reqwest::Client,
}

#[async_trait]
impl ReceiptValidationDatasource for ReceiptValidationDatasourceImpl {
    async fn post(
        &self,
        url: &str,
        body: &[u8],
        cancel: &CancellationToken,
    ) -> Result<CalloutResponse, IapError> {
        let request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, VERIFY_RECEIPT_CONTENT_TYPE)
            .body(body.to_vec());

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IapError::Cancelled),
            r = request.send() => r.map_err(IapError::Transport)?,
        };

        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "verifyReceipt callout returned");
        reject_server_error(status)?;

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(IapError::Cancelled),
            b = response.bytes() => b.map_err(IapError::Transport)?,
        };
        Ok(CalloutResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl ReceiptValidationDatasourceImpl {
    pub(crate) fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

/// A 5xx response can't carry a meaningful status envelope, so it is surfaced
/// as a server error. The unread response is dropped by the caller.
fn reject_server_error(status: StatusCode) -> Result<(), IapError> {
    if status.as_u16() >= 500 {
        return Err(IapError::AppStoreServer {
            http_status: status.as_u16(),
        });
    }
    Ok(())
}
