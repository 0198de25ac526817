use {
    crate::constants::{SHA256_OUTPUT_LEN, SHA512_OUTPUT_LEN},
    hmac::{Hmac, Mac},
    sha2::{Sha256, Sha512},
    subtle::ConstantTimeEq,
};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Wrapper function to form a HMAC-SHA256 operation.
#[inline(always)]
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(value);
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(mac.finalize().into_bytes().as_slice());
    result
}

/// Wrapper function to form a HMAC-SHA512 operation.
#[inline(always)]
pub(crate) fn hmac_sha512(key: &[u8], value: &[u8]) -> [u8; SHA512_OUTPUT_LEN] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(value);
    let mut result = [0; SHA512_OUTPUT_LEN];
    result.copy_from_slice(mac.finalize().into_bytes().as_slice());
    result
}

/// Compare two byte strings without short-circuiting on the first differing byte.
///
/// Slices of different lengths compare unequal immediately; only the length is revealed.
#[inline(always)]
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
