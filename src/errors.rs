use thiserror::Error;

use crate::domain::entities::receipt_status::StatusErrorKind;

#[derive(Debug, Error)]
pub enum IapError {
    #[error("Failed to encode verifyReceipt request.")]
    RequestEncoding(#[source] serde_json::Error),

    /// The callout could not be built or sent, or the connection failed
    /// while reading the response (includes timeouts).
    #[error("verifyReceipt callout failed to send.")]
    Transport(#[source] reqwest::Error),

    #[error("verifyReceipt callout was cancelled.")]
    Cancelled,

    /// The App Store answered with a 5xx status. The body is never parsed.
    #[error("Received http status code {http_status} from the App Store.")]
    AppStoreServer { http_status: u16 },

    #[error("Failed to parse verifyReceipt {stage}.")]
    InvalidResponse {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The App Store rejected the receipt with a non-zero status.
    #[error("Status {status}: {kind}")]
    Status { status: i64, kind: StatusErrorKind },

    /// The receipt is valid, but does not contain the requested transaction.
    #[error("Transaction id '{transaction_id}' not found in receipt.")]
    TransactionNotFound { transaction_id: String },
}

impl IapError {
    pub fn status_kind(&self) -> Option<StatusErrorKind> {
        match self {
            IapError::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IapError::TransactionNotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'.")]
    InvalidValue { key: &'static str, value: String },
}
