use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;

use crate::errors::IapError;

/// Failure categories reported through the `status` field of a verifyReceipt
/// response.
///
/// https://developer.apple.com/documentation/appstorereceipts/status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusErrorKind {
    /// 21000
    InvalidJson,
    /// 21002
    InvalidReceiptData,
    /// 21003
    ReceiptUnauthenticated,
    /// 21004
    InvalidSharedSecret,
    /// 21005
    ServerUnavailable,
    /// 21007: a sandbox receipt was sent to the production environment.
    ReceiptIsForTest,
    /// 21008: a production receipt was sent to the sandbox environment.
    ReceiptIsForProduction,
    /// 21009, or anything in 21100-21199.
    InternalDataAccessError,
    /// 21010
    ReceiptUnauthorized,
    Unknown,
}

static STATUS_ERROR_KINDS: Lazy<HashMap<i64, StatusErrorKind>> = Lazy::new(|| {
    HashMap::from([
        (21000, StatusErrorKind::InvalidJson),
        (21002, StatusErrorKind::InvalidReceiptData),
        (21003, StatusErrorKind::ReceiptUnauthenticated),
        (21004, StatusErrorKind::InvalidSharedSecret),
        (21005, StatusErrorKind::ServerUnavailable),
        (21007, StatusErrorKind::ReceiptIsForTest),
        (21008, StatusErrorKind::ReceiptIsForProduction),
        (21009, StatusErrorKind::InternalDataAccessError),
        (21010, StatusErrorKind::ReceiptUnauthorized),
    ])
});

impl StatusErrorKind {
    /// Returns `None` for status 0 (valid receipt).
    pub fn from_status(status: i64) -> Option<Self> {
        if status == 0 {
            return None;
        }
        Some(match STATUS_ERROR_KINDS.get(&status) {
            Some(kind) => *kind,
            None if (21100..=21199).contains(&status) => StatusErrorKind::InternalDataAccessError,
            None => StatusErrorKind::Unknown,
        })
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatusErrorKind::InvalidJson => {
                "The App Store could not read the JSON object you provided."
            }
            StatusErrorKind::InvalidReceiptData => {
                "The data in the receipt-data property was malformed or missing."
            }
            StatusErrorKind::ReceiptUnauthenticated => "The receipt could not be authenticated.",
            StatusErrorKind::InvalidSharedSecret => {
                "The shared secret you provided does not match the shared secret on file for your account."
            }
            StatusErrorKind::ServerUnavailable => "The receipt server is not currently available.",
            StatusErrorKind::ReceiptIsForTest => {
                "This receipt is from the test environment, but it was sent to the production environment for verification."
            }
            StatusErrorKind::ReceiptIsForProduction => {
                "This receipt is from the production environment, but it was sent to the test environment for verification."
            }
            StatusErrorKind::InternalDataAccessError => "Internal data access error.",
            StatusErrorKind::ReceiptUnauthorized => {
                "This receipt could not be authorized. Treat this the same as if a purchase was never made."
            }
            StatusErrorKind::Unknown => "An unknown error occurred.",
        }
    }
}

impl fmt::Display for StatusErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Maps a verifyReceipt status code to success or a typed status error,
/// keeping the original code for diagnostics.
pub(crate) fn interpret_status(status: i64) -> Result<(), IapError> {
    match StatusErrorKind::from_status(status) {
        None => Ok(()),
        Some(kind) => Err(IapError::Status { status, kind }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_success() {
        assert!(interpret_status(0).is_ok());
        assert_eq!(StatusErrorKind::from_status(0), None);
    }

    #[test]
    fn documented_codes_map_to_their_kind() {
        let cases = [
            (21000, StatusErrorKind::InvalidJson),
            (21002, StatusErrorKind::InvalidReceiptData),
            (21003, StatusErrorKind::ReceiptUnauthenticated),
            (21004, StatusErrorKind::InvalidSharedSecret),
            (21005, StatusErrorKind::ServerUnavailable),
            (21007, StatusErrorKind::ReceiptIsForTest),
            (21008, StatusErrorKind::ReceiptIsForProduction),
            (21009, StatusErrorKind::InternalDataAccessError),
            (21010, StatusErrorKind::ReceiptUnauthorized),
        ];
        for (status, expected) in cases {
            match interpret_status(status) {
                Err(IapError::Status { status: s, kind }) => {
                    assert_eq!(s, status);
                    assert_eq!(kind, expected, "status {status}");
                }
                other => panic!("unexpected result for {status}: {other:?}"),
            }
        }
    }

    #[test]
    fn internal_data_access_range_is_inclusive() {
        for status in 21100..=21199 {
            assert_eq!(
                StatusErrorKind::from_status(status),
                Some(StatusErrorKind::InternalDataAccessError),
                "status {status}"
            );
        }
        assert_eq!(
            StatusErrorKind::from_status(21099),
            Some(StatusErrorKind::Unknown)
        );
        assert_eq!(
            StatusErrorKind::from_status(21200),
            Some(StatusErrorKind::Unknown)
        );
    }

    #[test]
    fn unlisted_codes_are_unknown() {
        for status in [1, -1, 21001, 21006, 21011, 99999, i64::MIN, i64::MAX] {
            assert_eq!(
                StatusErrorKind::from_status(status),
                Some(StatusErrorKind::Unknown),
                "status {status}"
            );
        }
    }

    #[test]
    fn shared_secret_mismatch_keeps_code() {
        let err = interpret_status(21004).unwrap_err();
        assert!(err.to_string().starts_with("Status 21004: "));
        assert_eq!(err.status_kind(), Some(StatusErrorKind::InvalidSharedSecret));
    }
}
