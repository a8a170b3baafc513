use std::time::Duration;

/// Legacy verifyReceipt endpoint for the production environment.
pub const PRODUCTION_VERIFY_RECEIPT_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";

/// Legacy verifyReceipt endpoint for the sandbox environment.
pub const SANDBOX_VERIFY_RECEIPT_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

pub(crate) const VERIFY_RECEIPT_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub(crate) const DEFAULT_CALLOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status returned by the production endpoint when it is handed a sandbox
/// receipt.
pub(crate) const SANDBOX_RECEIPT_STATUS: i64 = 21007;
