use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, TimestampMilliSeconds};

/// Data structure returned by the legacy verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
///
/// Subscription renewal fields (latest_receipt_info, pending_renewal_info)
/// are not modelled.
#[derive(Debug, Deserialize)]
pub(crate) struct VerifyReceiptResponseModel {
    /// Either 0 if the receipt is valid, or a status code if there is an
    /// error.
    pub(crate) status: i64,
    /// The environment for which the receipt was generated.
    pub(crate) environment: Option<Environment>,
    /// A JSON representation of the receipt that was sent for verification.
    /// Absent when the status is non-zero.
    pub(crate) receipt: Option<ReceiptModel>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub(crate) enum Environment {
    Sandbox,
    Production,

    #[serde(untagged)]
    Unknown(String),
}

/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt
#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptModel {
    /// The bundle identifier for the app to which the receipt belongs.
    pub(crate) bundle_id: Option<String>,
    /// The app's version number (CFBundleVersion).
    pub(crate) application_version: Option<String>,
    /// The version of the app that the user originally purchased.
    pub(crate) original_application_version: Option<String>,
    /// The type of receipt generated, such as "Production" or
    /// "ProductionSandbox".
    pub(crate) receipt_type: Option<String>,
    /// The time the App Store generated the receipt, in UNIX epoch time
    /// format, in milliseconds.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<TimestampMilliSeconds<String>>>")]
    pub(crate) receipt_creation_date_ms: Option<DateTime<Utc>>,
    /// The in-app purchase receipt fields for all in-app purchase
    /// transactions.
    #[serde(default)]
    pub(crate) in_app: Vec<InAppModel>,
}

/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
///
/// Only `transaction_id` is required. Fields that need parsing fall back to
/// `None` when malformed, so one bad record can't fail the whole receipt.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InAppModel {
    /// A unique identifier for a transaction such as a purchase, restore, or
    /// renewal.
    pub(crate) transaction_id: String,
    /// The transaction identifier of the original purchase.
    pub(crate) original_transaction_id: Option<String>,
    /// The unique identifier of the product purchased.
    pub(crate) product_id: Option<String>,
    /// The number of consumable products purchased. Sent as a string.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    pub(crate) quantity: Option<u32>,
    /// The time the App Store charged the user's account for the purchase, in
    /// UNIX epoch time format, in milliseconds.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<TimestampMilliSeconds<String>>>")]
    pub(crate) purchase_date_ms: Option<DateTime<Utc>>,
    /// The time of the original in-app purchase, in UNIX epoch time format, in
    /// milliseconds.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<TimestampMilliSeconds<String>>>")]
    pub(crate) original_purchase_date_ms: Option<DateTime<Utc>>,
    /// The time the App Store refunded a transaction or revoked it from
    /// family sharing, in UNIX epoch time format, in milliseconds.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<TimestampMilliSeconds<String>>>")]
    pub(crate) cancellation_date_ms: Option<DateTime<Utc>>,
    /// The reason for a refunded or revoked transaction ("0" or "1").
    pub(crate) cancellation_reason: Option<String>,
    /// Whether the purchase is within a free trial period. Sent as a string.
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    pub(crate) is_trial_period: Option<bool>,
    /// A unique identifier for purchase events across devices.
    pub(crate) web_order_line_item_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_in_app_record() {
        let m: VerifyReceiptResponseModel = serde_json::from_str(
            r#"{"status":0,"receipt":{"in_app":[{"transaction_id":"T1"}]}}"#,
        )
        .unwrap();
        assert_eq!(m.status, 0);
        assert_eq!(m.environment, None);
        let in_app = &m.receipt.unwrap().in_app;
        assert_eq!(in_app.len(), 1);
        assert_eq!(in_app[0].transaction_id, "T1");
        assert_eq!(in_app[0].quantity, None);
        assert_eq!(in_app[0].purchase_date_ms, None);
    }

    #[test]
    fn parses_string_encoded_fields() {
        let m: VerifyReceiptResponseModel = serde_json::from_str(
            r#"{
                "status": 0,
                "environment": "Sandbox",
                "receipt": {
                    "receipt_type": "ProductionSandbox",
                    "bundle_id": "io.fractic.app",
                    "application_version": "42",
                    "receipt_creation_date_ms": "1571869335000",
                    "in_app": [{
                        "quantity": "2",
                        "product_id": "io.fractic.coins",
                        "transaction_id": "1000000584163702",
                        "original_transaction_id": "1000000584163702",
                        "purchase_date": "2019-10-23 22:22:15 Etc/GMT",
                        "purchase_date_ms": "1571869335000",
                        "is_trial_period": "false",
                        "unknown_field": 7
                    }]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(m.environment, Some(Environment::Sandbox));
        let receipt = m.receipt.unwrap();
        assert_eq!(receipt.bundle_id.as_deref(), Some("io.fractic.app"));
        assert_eq!(
            receipt.receipt_creation_date_ms.map(|t| t.timestamp_millis()),
            Some(1571869335000)
        );
        let record = &receipt.in_app[0];
        assert_eq!(record.quantity, Some(2));
        assert_eq!(record.is_trial_period, Some(false));
        assert_eq!(
            record.purchase_date_ms.map(|t| t.timestamp_millis()),
            Some(1571869335000)
        );
    }

    #[test]
    fn unrecognized_environment_is_kept() {
        let m: VerifyReceiptResponseModel =
            serde_json::from_str(r#"{"status":21005,"environment":"Xcode"}"#).unwrap();
        assert_eq!(m.environment, Some(Environment::Unknown("Xcode".to_string())));
        assert!(m.receipt.is_none());
    }

    #[test]
    fn malformed_optional_fields_become_none() {
        let m: VerifyReceiptResponseModel = serde_json::from_str(
            r#"{"status":0,"receipt":{
                "receipt_creation_date_ms":"yesterday",
                "in_app":[{
                    "transaction_id":"T2",
                    "quantity":1,
                    "purchase_date_ms":"n/a",
                    "cancellation_date_ms":null,
                    "is_trial_period":"FALSE",
                    "product_id":"io.fractic.coins"
                }]
            }}"#,
        )
        .unwrap();
        let receipt = m.receipt.unwrap();
        assert_eq!(receipt.receipt_creation_date_ms, None);
        let record = &receipt.in_app[0];
        assert_eq!(record.quantity, None);
        assert_eq!(record.purchase_date_ms, None);
        assert_eq!(record.cancellation_date_ms, None);
        assert_eq!(record.is_trial_period, None);
        assert_eq!(record.product_id.as_deref(), Some("io.fractic.coins"));
    }

    #[test]
    fn missing_transaction_id_is_rejected() {
        let r: Result<VerifyReceiptResponseModel, _> =
            serde_json::from_str(r#"{"status":0,"receipt":{"in_app":[{"product_id":"x"}]}}"#);
        assert!(r.is_err());
    }
}
