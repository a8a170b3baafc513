use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{domain::entities::verified_receipt::VerifiedReceipt, errors::IapError};

#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Validates the receipt with the App Store and returns it with only the
    /// in-app purchase records whose transaction ID equals `transaction_id`.
    ///
    /// receipt:
    ///   The Base64-encoded receipt data, as received from the device.
    /// transaction_id:
    ///   The transaction to look for in the validated receipt.
    /// cancel:
    ///   Aborts any in-flight callout when triggered.
    async fn verify(
        &self,
        receipt: &str,
        transaction_id: &str,
        cancel: &CancellationToken,
    ) -> Result<VerifiedReceipt, IapError>;
}
