use tokio_util::sync::CancellationToken;

use crate::{
    config::ReceiptVerifierConfig,
    data::{
        datasources::receipt_validation_datasource::ReceiptValidationDatasourceImpl,
        repositories::receipt_repository_impl::ReceiptRepositoryImpl,
    },
    domain::{
        entities::verified_receipt::VerifiedReceipt,
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::IapError,
};

/// Verifies App Store receipts through the legacy verifyReceipt endpoint.
///
/// Holds no mutable state; a single instance can be shared between tasks.
pub struct IapReceiptUtil<R: ReceiptRepository> {
    receipt_repository: R,
}

impl<R: ReceiptRepository> IapReceiptUtil<R> {
    /// Verifies `receipt` and returns it narrowed down to the in-app purchase
    /// records of `transaction_id`.
    pub async fn verify(
        &self,
        receipt: &str,
        transaction_id: &str,
    ) -> Result<VerifiedReceipt, IapError> {
        self.verify_with_cancel(receipt, transaction_id, &CancellationToken::new())
            .await
    }

    /// Same as `verify`, but aborts any in-flight callout with
    /// `IapError::Cancelled` once `cancel` is triggered.
    pub async fn verify_with_cancel(
        &self,
        receipt: &str,
        transaction_id: &str,
        cancel: &CancellationToken,
    ) -> Result<VerifiedReceipt, IapError> {
        self.receipt_repository
            .verify(receipt, transaction_id, cancel)
            .await
    }
}

impl IapReceiptUtil<ReceiptRepositoryImpl<ReceiptValidationDatasourceImpl>> {
    /// Builds a verifier with its own HTTP client, using the configured
    /// timeout for each callout.
    pub fn new(config: ReceiptVerifierConfig) -> Result<Self, IapError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(IapError::Transport)?;
        Ok(Self::with_client(http_client, config))
    }

    /// Builds a verifier on top of a caller-supplied HTTP client. The
    /// configured timeout is not applied to it.
    pub fn with_client(http_client: reqwest::Client, config: ReceiptVerifierConfig) -> Self {
        Self {
            receipt_repository: ReceiptRepositoryImpl::new(http_client, config),
        }
    }
}
