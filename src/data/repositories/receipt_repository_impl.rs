use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ReceiptVerifierConfig,
    constants::SANDBOX_RECEIPT_STATUS,
    data::{
        datasources::receipt_validation_datasource::{
            ReceiptValidationDatasource, ReceiptValidationDatasourceImpl,
        },
        models::verify_receipt::{
            status_response_model::StatusResponseModel,
            verify_receipt_request_model::VerifyReceiptRequestModel,
            verify_receipt_response_model::{self as vr, VerifyReceiptResponseModel},
        },
    },
    domain::{
        entities::{
            receipt_status::interpret_status,
            verified_receipt::{InAppPurchase, ReceiptDetails, ReceiptEnvironment, VerifiedReceipt},
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::IapError,
};

pub(crate) struct ReceiptRepositoryImpl<D: ReceiptValidationDatasource> {
    receipt_validation_datasource: D,
    config: ReceiptVerifierConfig,
}

#[async_trait]
impl<D: ReceiptValidationDatasource> ReceiptRepository for ReceiptRepositoryImpl<D> {
    async fn verify(
        &self,
        receipt: &str,
        transaction_id: &str,
        cancel: &CancellationToken,
    ) -> Result<VerifiedReceipt, IapError> {
        // Serialized once, so the sandbox fallback re-sends the exact same
        // bytes.
        let request = serde_json::to_vec(&VerifyReceiptRequestModel {
            receipt_data: receipt,
            password: self.config.shared_secret(),
        })
        .map_err(IapError::RequestEncoding)?;

        let body = self.callout_with_sandbox_fallback(&request, cancel).await?;

        let response: VerifyReceiptResponseModel =
            serde_json::from_slice(&body).map_err(|e| IapError::InvalidResponse {
                stage: "verification response",
                source: e,
            })?;
        interpret_status(response.status)?;

        filter_transaction(response, transaction_id)
    }
}

impl ReceiptRepositoryImpl<ReceiptValidationDatasourceImpl> {
    pub(crate) fn new(http_client: reqwest::Client, config: ReceiptVerifierConfig) -> Self {
        Self::with_datasource(ReceiptValidationDatasourceImpl::new(http_client), config)
    }
}

impl<D: ReceiptValidationDatasource> ReceiptRepositoryImpl<D> {
    pub(crate) fn with_datasource(datasource: D, config: ReceiptVerifierConfig) -> Self {
        Self {
            receipt_validation_datasource: datasource,
            config,
        }
    }

    /// As per Apple's documentation, always try the production endpoint first.
    /// If it reports a sandbox receipt (21007) and we're not running in
    /// production, the same request is re-sent to the sandbox and its body
    /// replaces the production one.
    ///
    /// A production client never falls back; the 21007 status is reported to
    /// the caller as a status error.
    async fn callout_with_sandbox_fallback(
        &self,
        request: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, IapError> {
        let production = self
            .receipt_validation_datasource
            .post(&self.config.production_url, request, cancel)
            .await?;

        let envelope: StatusResponseModel =
            serde_json::from_slice(&production.body).map_err(|e| IapError::InvalidResponse {
                stage: "status envelope",
                source: e,
            })?;

        if envelope.status != SANDBOX_RECEIPT_STATUS || self.config.is_production {
            return Ok(production.body);
        }

        tracing::info!(
            production_http_status = production.status.as_u16(),
            "Sandbox receipt sent to production; retrying against sandbox."
        );
        let sandbox = self
            .receipt_validation_datasource
            .post(&self.config.sandbox_url, request, cancel)
            .await?;
        Ok(sandbox.body)
    }
}

/// Keeps only the in-app records matching `transaction_id`, in their original
/// order. Fails if there are none.
fn filter_transaction(
    response: VerifyReceiptResponseModel,
    transaction_id: &str,
) -> Result<VerifiedReceipt, IapError> {
    let mut receipt = response.receipt.map(ReceiptDetails::from).unwrap_or_default();
    receipt
        .in_app
        .retain(|purchase| purchase.transaction_id == transaction_id);
    tracing::debug!(
        transaction_id,
        matches = receipt.in_app.len(),
        "Filtered receipt in-app records."
    );
    if receipt.in_app.is_empty() {
        return Err(IapError::TransactionNotFound {
            transaction_id: transaction_id.to_string(),
        });
    }
    Ok(VerifiedReceipt {
        status: response.status,
        environment: response.environment.map(ReceiptEnvironment::from),
        receipt,
    })
}

impl From<vr::Environment> for ReceiptEnvironment {
    fn from(m: vr::Environment) -> Self {
        match m {
            vr::Environment::Sandbox => ReceiptEnvironment::Sandbox,
            vr::Environment::Production => ReceiptEnvironment::Production,
            vr::Environment::Unknown(other) => ReceiptEnvironment::Other(other),
        }
    }
}

impl From<vr::ReceiptModel> for ReceiptDetails {
    fn from(m: vr::ReceiptModel) -> Self {
        ReceiptDetails {
            bundle_id: m.bundle_id,
            application_version: m.application_version,
            original_application_version: m.original_application_version,
            receipt_type: m.receipt_type,
            creation_time: m.receipt_creation_date_ms,
            in_app: m.in_app.into_iter().map(InAppPurchase::from).collect(),
        }
    }
}

impl From<vr::InAppModel> for InAppPurchase {
    fn from(m: vr::InAppModel) -> Self {
        InAppPurchase {
            transaction_id: m.transaction_id,
            original_transaction_id: m.original_transaction_id,
            product_id: m.product_id,
            quantity: m.quantity,
            purchase_time: m.purchase_date_ms,
            original_purchase_time: m.original_purchase_date_ms,
            cancellation_time: m.cancellation_date_ms,
            cancellation_reason: m.cancellation_reason,
            is_trial_period: m.is_trial_period,
            web_order_line_item_id: m.web_order_line_item_id,
        }
    }
}
