//! Unified error codes for the commerce-bundles workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Bundle and purchasable errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Line item not found
    LineItemNotFound = 4002,

    // ==================== 6xxx: Bundle ====================
    /// Bundle not found
    BundleNotFound = 6001,
    /// Requested quantity exceeds bundle stock
    StockExceeded = 6002,
    /// Constituent purchasable not found
    PurchasableNotFound = 6101,
    /// Bundle type not found
    BundleTypeNotFound = 6201,
    /// Bundle type handle already exists
    BundleTypeHandleExists = 6202,
    /// Bundle type handle is not a valid identifier
    BundleTypeHandleInvalid = 6203,
    /// Bundle type handle is a reserved word
    BundleTypeHandleReserved = 6204,
    /// Bundle type still has bundles
    BundleTypeInUse = 6205,
    /// Bundle type has no settings for the requested site
    SiteNotConfigured = 6301,
    /// Tax category not found
    TaxCategoryNotFound = 6401,
    /// Shipping category not found
    ShippingCategoryNotFound = 6402,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// SKU format rendering failed
    SkuFormatFailed = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::LineItemNotFound => "Line item not found",

            // Bundle
            ErrorCode::BundleNotFound => "Bundle not found",
            ErrorCode::StockExceeded => "Requested quantity exceeds bundle stock",
            ErrorCode::PurchasableNotFound => "Constituent purchasable not found",
            ErrorCode::BundleTypeNotFound => "Bundle type not found",
            ErrorCode::BundleTypeHandleExists => "Bundle type handle already exists",
            ErrorCode::BundleTypeHandleInvalid => "Bundle type handle is not a valid identifier",
            ErrorCode::BundleTypeHandleReserved => "Bundle type handle is a reserved word",
            ErrorCode::BundleTypeInUse => "Bundle type still has bundles",
            ErrorCode::SiteNotConfigured => "Bundle type has no settings for the requested site",
            ErrorCode::TaxCategoryNotFound => "Tax category not found",
            ErrorCode::ShippingCategoryNotFound => "Shipping category not found",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SkuFormatFailed => "SKU format rendering failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::LineItemNotFound),

            // Bundle
            6001 => Ok(ErrorCode::BundleNotFound),
            6002 => Ok(ErrorCode::StockExceeded),
            6101 => Ok(ErrorCode::PurchasableNotFound),
            6201 => Ok(ErrorCode::BundleTypeNotFound),
            6202 => Ok(ErrorCode::BundleTypeHandleExists),
            6203 => Ok(ErrorCode::BundleTypeHandleInvalid),
            6204 => Ok(ErrorCode::BundleTypeHandleReserved),
            6205 => Ok(ErrorCode::BundleTypeInUse),
            6301 => Ok(ErrorCode::SiteNotConfigured),
            6401 => Ok(ErrorCode::TaxCategoryNotFound),
            6402 => Ok(ErrorCode::ShippingCategoryNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::SkuFormatFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::BundleNotFound.code(), 6001);
        assert_eq!(ErrorCode::StockExceeded.code(), 6002);
        assert_eq!(ErrorCode::BundleTypeHandleReserved.code(), 6204);
        assert_eq!(ErrorCode::SiteNotConfigured.code(), 6301);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::SkuFormatFailed.code(), 9101);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(6001), Ok(ErrorCode::BundleNotFound));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::StockExceeded).unwrap();
        assert_eq!(json, "6002");

        let code: ErrorCode = serde_json::from_str("6201").unwrap();
        assert_eq!(code, ErrorCode::BundleTypeNotFound);
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::BundleNotFound.message(), "Bundle not found");
        assert_eq!(
            ErrorCode::StockExceeded.message(),
            "Requested quantity exceeds bundle stock"
        );
    }
}
