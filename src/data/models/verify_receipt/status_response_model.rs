use serde::Deserialize;

/// Minimal view of a verifyReceipt response, used to decide whether the
/// receipt has to be re-sent to the sandbox before the full body is parsed.
///
/// https://developer.apple.com/documentation/appstorereceipts/status
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponseModel {
    pub(crate) status: i64,
}
