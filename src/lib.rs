//! The `url_signature` crate creates and validates time-limited, tamper-evident URLs.
//!
//! Signing appends two query parameters to a URL: an expiration (a Unix timestamp) and a
//! signature computed over the rest of the URL plus that expiration using a secret key. Anyone
//! holding the unmodified URL before it expires can present it; changing any part of it, or
//! presenting it late, makes validation fail. No state is kept on the server.
//!
//! Typical uses are download links and password-reset links.
//!
//! # Workflow
//! 1. Create a [`UrlSigner`] with a secret key, either with [`UrlSigner::new`] or through
//!    [`UrlSigner::builder`] to change the parameter names or the [`SignatureStrategy`].
//! 2. Call [`UrlSigner::sign`] with the URL and an expiration: a number of seconds from now or a
//!    point in time (anything implementing [`IntoExpiration`]).
//! 3. When the URL comes back, call [`UrlSigner::validate`]. It returns `false` for every kind of
//!    failure; treat that as "reject the request" without telling the caller why.
//!
//! ## Example
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use url_signature::UrlSigner;
//!
//! let signer = UrlSigner::new("secret").unwrap();
//!
//! // Pin the clock so the output is reproducible; normally you would call `sign`.
//! let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
//! let signed = signer.sign_at("https://example.com/file?id=42", 3600, None, now).unwrap();
//! assert_eq!(
//!     signed,
//!     "https://example.com/file?id=42&expires=1609462800\
//!      &signature=2ec15e7281cc854c4ebc91d75e63baff7d2e76fd44aa37eb063ef4e4367e1ddf"
//! );
//!
//! assert!(signer.validate_at(&signed, None, now + Duration::minutes(30)));
//! assert!(!signer.validate_at(&signed, Some("wrong"), now));
//! assert!(!signer.validate_at(&signed, None, now + Duration::hours(2)));
//! ```
//!
//! # Signature strategies
//! The default strategy is HMAC-SHA256 over `"{url}::{expiration}"`, hex encoded. The strategy is
//! a trait object, so any deterministic algorithm can be plugged in, including a plain closure:
//! ```rust
//! use url_signature::{HmacSha512Strategy, UrlSigner};
//!
//! let signer = UrlSigner::builder()
//!     .default_key("secret")
//!     .expires_parameter("e")
//!     .signature_parameter("s")
//!     .strategy(HmacSha512Strategy)
//!     .build()
//!     .unwrap();
//! let signed = signer.sign("/download/report.pdf", 60).unwrap();
//! assert!(signed.starts_with("/download/report.pdf?e="));
//! assert!(signer.validate(&signed));
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chronoutil;
mod constants;
mod crypto;
mod error;
mod expiration;
pub mod query;
mod signer;
mod strategy;

pub use {
    constants::{DEFAULT_EXPIRES_PARAMETER, DEFAULT_SIGNATURE_PARAMETER},
    error::{ExpirationError, SignatureError},
    expiration::{Expiration, IntoExpiration},
    query::{add_query_parameters, query_parameters, without_parameters, QueryParameters},
    signer::{UrlSigner, UrlSignerBuilder},
    strategy::{HmacSha256Strategy, HmacSha512Strategy, SignatureStrategy},
};
