//! Common constants used throughout the crate.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically.

/// Default name of the query parameter carrying the expiration timestamp.
pub const DEFAULT_EXPIRES_PARAMETER: &str = "expires";

/// Default name of the query parameter carrying the signature.
pub const DEFAULT_SIGNATURE_PARAMETER: &str = "signature";

/// Error code: InvalidExpiration
pub(crate) const ERR_CODE_INVALID_EXPIRATION: &str = "InvalidExpiration";

/// Error code: InvalidParameterName
pub(crate) const ERR_CODE_INVALID_PARAMETER_NAME: &str = "InvalidParameterName";

/// Error code: InvalidSignatureKey
pub(crate) const ERR_CODE_INVALID_SIGNATURE_KEY: &str = "InvalidSignatureKey";

/// Error message: `"Expiration must be in the future"`
pub(crate) const ERR_MSG_EXPIRATION_IN_PAST: &str = "Expiration must be in the future";

/// Error message: `"Expiration must be a point in time or an integer number of seconds"`
pub(crate) const ERR_MSG_EXPIRATION_WRONG_TYPE: &str =
    "Expiration must be a point in time or an integer number of seconds";

/// Error message: `"Expires and signature parameters must have different names"`
pub(crate) const ERR_MSG_PARAMETER_NAMES_EQUAL: &str = "Expires and signature parameters must have different names";

/// Error message: `"Parameter name must not be empty"`
pub(crate) const ERR_MSG_PARAMETER_NAME_EMPTY: &str = "Parameter name must not be empty";

/// Error message: `"The signature key is empty"`
pub(crate) const ERR_MSG_SIGNATURE_KEY_EMPTY: &str = "The signature key is empty";

/// Uppercase hex digits.
pub(crate) const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// Length of a SHA-256 output.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

/// Length of a SHA-512 output.
pub(crate) const SHA512_OUTPUT_LEN: usize = 64;

/// Separator placed between the URL and the expiration in the string to sign.
pub(crate) const SIGNING_SEPARATOR: &str = "::";
