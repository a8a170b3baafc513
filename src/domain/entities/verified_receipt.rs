use chrono::{DateTime, Utc};

/// A receipt accepted by the App Store, with `receipt.in_app` narrowed down
/// to the records of the requested transaction.
#[derive(Debug, Clone)]
pub struct VerifiedReceipt {
    /// Always 0 for a verified receipt.
    pub status: i64,
    pub environment: Option<ReceiptEnvironment>,
    pub receipt: ReceiptDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptEnvironment {
    Sandbox,
    Production,
    Other(String),
}

#[derive(Debug, Clone, Default)]
pub struct ReceiptDetails {
    pub bundle_id: Option<String>,
    pub application_version: Option<String>,
    pub original_application_version: Option<String>,
    pub receipt_type: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub in_app: Vec<InAppPurchase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InAppPurchase {
    pub transaction_id: String,
    pub original_transaction_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<u32>,
    pub purchase_time: Option<DateTime<Utc>>,
    pub original_purchase_time: Option<DateTime<Utc>>,
    /// Set if the App Store refunded the transaction or revoked it from
    /// family sharing.
    pub cancellation_time: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub is_trial_period: Option<bool>,
    pub web_order_line_item_id: Option<String>,
}

impl InAppPurchase {
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_time.is_some()
    }
}
