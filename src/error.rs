use {
    crate::constants::*,
    derive_builder::UninitializedFieldError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Error returned when a [`UrlSigner`][crate::UrlSigner] cannot be constructed or a URL cannot be
/// signed.
///
/// Validation never returns this; a URL that fails validation is reported as `false`.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignatureError {
    /// The expiration passed to a signing call could not be used. See [`ExpirationError`] for the
    /// reason.
    InvalidExpiration(ExpirationError),

    /// The expires or signature parameter name is empty, or both names are the same.
    InvalidParameterName(/* message */ String),

    /// The signature key is empty. Sample message:
    /// `The signature key is empty`
    InvalidSignatureKey(/* message */ String),
}

impl SignatureError {
    /// Return a stable code identifying the kind of error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidExpiration(_) => ERR_CODE_INVALID_EXPIRATION,
            Self::InvalidParameterName(_) => ERR_CODE_INVALID_PARAMETER_NAME,
            Self::InvalidSignatureKey(_) => ERR_CODE_INVALID_SIGNATURE_KEY,
        }
    }

    /// Shortcut for an empty signature key error.
    pub(crate) fn signature_key_empty() -> Self {
        Self::InvalidSignatureKey(ERR_MSG_SIGNATURE_KEY_EMPTY.to_string())
    }
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InvalidExpiration(ref e) => Display::fmt(e, f),
            Self::InvalidParameterName(msg) => f.write_str(msg),
            Self::InvalidSignatureKey(msg) => f.write_str(msg),
        }
    }
}

impl Error for SignatureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidExpiration(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExpirationError> for SignatureError {
    fn from(e: ExpirationError) -> SignatureError {
        SignatureError::InvalidExpiration(e)
    }
}

/// Required by the builder's generated `build()`; every builder field has a default, so an
/// unset key surfaces through validation instead.
impl From<UninitializedFieldError> for SignatureError {
    fn from(e: UninitializedFieldError) -> SignatureError {
        SignatureError::InvalidSignatureKey(e.to_string())
    }
}

/// Reason an expiration was rejected while signing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpirationError {
    /// The expiration resolves to a timestamp that is not strictly after the signing time.
    IsInPast,
    /// The expiration is neither a recognized point in time nor an integer number of seconds.
    WrongType,
}

impl Display for ExpirationError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            ExpirationError::IsInPast => f.write_str(ERR_MSG_EXPIRATION_IN_PAST),
            ExpirationError::WrongType => f.write_str(ERR_MSG_EXPIRATION_WRONG_TYPE),
        }
    }
}

impl Error for ExpirationError {}
