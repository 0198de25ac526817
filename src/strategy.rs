//! Pluggable signature algorithms.
//!
//! A [`UrlSigner`][crate::UrlSigner] delegates the actual cryptography to a [`SignatureStrategy`].
//! The signer owns expiration handling, canonicalization, and comparison; the strategy only turns
//! `(url, expiration, key)` into a signature string.

use crate::{
    constants::SIGNING_SEPARATOR,
    crypto::{hmac_sha256, hmac_sha512},
};

/// Computes the signature for a canonical URL and expiration.
///
/// Implementations must be deterministic: the same inputs always produce the same output. The
/// output is compared byte-for-byte in constant time, so it should have a fixed length for a
/// given algorithm.
pub trait SignatureStrategy: Send + Sync {
    /// Create the signature for `url` expiring at `expiration` (a decimal Unix timestamp) using
    /// `key`.
    fn create_signature(&self, url: &str, expiration: &str, key: &str) -> String;
}

/// Any `Fn(url, expiration, key) -> String` can be used as a strategy.
impl<F> SignatureStrategy for F
where
    F: Fn(&str, &str, &str) -> String + Send + Sync,
{
    fn create_signature(&self, url: &str, expiration: &str, key: &str) -> String {
        self(url, expiration, key)
    }
}

/// HMAC-SHA256 over `"{url}::{expiration}"`, hex encoded. This is the default strategy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HmacSha256Strategy;

impl SignatureStrategy for HmacSha256Strategy {
    fn create_signature(&self, url: &str, expiration: &str, key: &str) -> String {
        hex::encode(hmac_sha256(key.as_bytes(), string_to_sign(url, expiration).as_bytes()))
    }
}

/// HMAC-SHA512 over `"{url}::{expiration}"`, hex encoded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HmacSha512Strategy;

impl SignatureStrategy for HmacSha512Strategy {
    fn create_signature(&self, url: &str, expiration: &str, key: &str) -> String {
        hex::encode(hmac_sha512(key.as_bytes(), string_to_sign(url, expiration).as_bytes()))
    }
}

fn string_to_sign(url: &str, expiration: &str) -> String {
    let mut result = String::with_capacity(url.len() + SIGNING_SEPARATOR.len() + expiration.len());
    result.push_str(url);
    result.push_str(SIGNING_SEPARATOR);
    result.push_str(expiration);
    result
}
