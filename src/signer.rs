use {
    crate::{
        constants::*,
        crypto::constant_time_eq,
        query::{add_query_parameters, query_parameters, without_parameters},
        HmacSha256Strategy, IntoExpiration, SignatureError, SignatureStrategy,
    },
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    log::{debug, trace},
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        str::FromStr,
        sync::Arc,
    },
};

/// Signs URLs with an expiration and validates signed URLs.
///
/// A signed URL carries two extra query parameters: the expiration as a Unix timestamp and a
/// signature over the rest of the URL plus that timestamp. Nothing is stored; a URL is valid as
/// long as its signature matches and its expiration has not passed.
///
/// `UrlSigner` is immutable once built and can be shared freely between threads.
///
/// # Example
/// ```
/// use url_signature::UrlSigner;
///
/// let signer = UrlSigner::new("secret").unwrap();
/// let url = signer.sign("https://example.com/file?id=42", 3600).unwrap();
/// assert!(signer.validate(&url));
/// assert!(!signer.validate_with_key(&url, "wrong"));
/// ```
#[derive(Builder, Clone)]
#[builder(build_fn(validate = "Self::validate", error = "SignatureError"))]
pub struct UrlSigner {
    /// The key used when a signing or validation call does not supply its own. Must not be empty.
    #[builder(setter(into), default)]
    default_key: String,

    /// Name of the query parameter carrying the expiration. Defaults to `expires`.
    #[builder(setter(into), default = "DEFAULT_EXPIRES_PARAMETER.to_string()")]
    expires_parameter: String,

    /// Name of the query parameter carrying the signature. Defaults to `signature`.
    #[builder(setter(into), default = "DEFAULT_SIGNATURE_PARAMETER.to_string()")]
    signature_parameter: String,

    /// The algorithm producing signatures. Defaults to [`HmacSha256Strategy`].
    #[builder(setter(custom), default = "default_strategy()")]
    strategy: Arc<dyn SignatureStrategy>,
}

fn default_strategy() -> Arc<dyn SignatureStrategy> {
    Arc::new(HmacSha256Strategy)
}

impl UrlSignerBuilder {
    /// Use `strategy` to create signatures instead of HMAC-SHA256.
    pub fn strategy<S: SignatureStrategy + 'static>(&mut self, strategy: S) -> &mut Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    fn validate(&self) -> Result<(), SignatureError> {
        if self.default_key.as_deref().unwrap_or_default().is_empty() {
            return Err(SignatureError::signature_key_empty());
        }

        let expires_parameter = self.expires_parameter.as_deref().unwrap_or(DEFAULT_EXPIRES_PARAMETER);
        let signature_parameter = self.signature_parameter.as_deref().unwrap_or(DEFAULT_SIGNATURE_PARAMETER);

        if expires_parameter.is_empty() || signature_parameter.is_empty() {
            return Err(SignatureError::InvalidParameterName(ERR_MSG_PARAMETER_NAME_EMPTY.to_string()));
        }

        if expires_parameter == signature_parameter {
            return Err(SignatureError::InvalidParameterName(ERR_MSG_PARAMETER_NAMES_EQUAL.to_string()));
        }

        Ok(())
    }
}

impl UrlSigner {
    /// Create a signer with the given default key and the default parameter names.
    ///
    /// # Errors
    /// Returns [`SignatureError::InvalidSignatureKey`] if `default_key` is empty.
    pub fn new<K: Into<String>>(default_key: K) -> Result<Self, SignatureError> {
        Self::builder().default_key(default_key).build()
    }

    /// Create a [`UrlSignerBuilder`] to configure parameter names or the signature strategy.
    #[inline]
    pub fn builder() -> UrlSignerBuilder {
        UrlSignerBuilder::default()
    }

    /// Retrieve the name of the expiration query parameter.
    #[inline]
    pub fn expires_parameter(&self) -> &str {
        &self.expires_parameter
    }

    /// Retrieve the name of the signature query parameter.
    #[inline]
    pub fn signature_parameter(&self) -> &str {
        &self.signature_parameter
    }

    /// Sign `url` with the default key so it expires at `expiration`.
    ///
    /// `expiration` is either a number of seconds from now or a point in time; see
    /// [`IntoExpiration`].
    ///
    /// # Errors
    /// Returns [`SignatureError::InvalidExpiration`] if the expiration cannot be interpreted or is
    /// not in the future.
    pub fn sign<E: IntoExpiration>(&self, url: &str, expiration: E) -> Result<String, SignatureError> {
        self.sign_at(url, expiration, None, Utc::now())
    }

    /// Sign `url` with `key` instead of the default key.
    ///
    /// # Errors
    /// As for [`sign`][Self::sign]; additionally returns [`SignatureError::InvalidSignatureKey`]
    /// if `key` is empty.
    pub fn sign_with_key<E: IntoExpiration>(
        &self,
        url: &str,
        expiration: E,
        key: &str,
    ) -> Result<String, SignatureError> {
        self.sign_at(url, expiration, Some(key), Utc::now())
    }

    /// Sign `url` as of `now`, with `key` if given or the default key otherwise.
    ///
    /// The signature covers `url` with any existing expiration and signature parameters removed;
    /// the returned URL is that string with fresh parameters appended.
    ///
    /// # Errors
    /// See [`sign`][Self::sign] and [`sign_with_key`][Self::sign_with_key].
    pub fn sign_at<E: IntoExpiration>(
        &self,
        url: &str,
        expiration: E,
        key: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<String, SignatureError> {
        let key = match key {
            Some(key) if key.is_empty() => return Err(SignatureError::signature_key_empty()),
            Some(key) => key,
            None => self.default_key.as_str(),
        };

        let expiration = expiration.into_expiration()?.timestamp_at(now)?.to_string();
        let intended_url = self.intended_url(url);
        trace!("sign_at: signing '{}' with expiration {}", intended_url, expiration);

        let signature = self.strategy.create_signature(&intended_url, &expiration, key);

        Ok(add_query_parameters(
            &intended_url,
            [
                (self.expires_parameter.as_str(), expiration.as_str()),
                (self.signature_parameter.as_str(), signature.as_str()),
            ],
        ))
    }

    /// Check `url` against the default key at the current time.
    ///
    /// Returns `false` for anything other than an unexpired URL with a matching signature,
    /// including malformed input. The reason is logged at debug level but never returned.
    pub fn validate(&self, url: &str) -> bool {
        self.validate_at(url, None, Utc::now())
    }

    /// Check `url` against `key` at the current time.
    pub fn validate_with_key(&self, url: &str, key: &str) -> bool {
        self.validate_at(url, Some(key), Utc::now())
    }

    /// Check `url` as of `now`, with `key` if given or the default key otherwise.
    ///
    /// A URL is still valid during the second named by its expiration.
    pub fn validate_at(&self, url: &str, key: Option<&str>, now: DateTime<Utc>) -> bool {
        let key = key.unwrap_or(self.default_key.as_str());
        if key.is_empty() {
            debug!("validate_at: empty signature key");
            return false;
        }

        let query = query_parameters(url);
        let (expiration, provided_signature) =
            match (query.get(&self.expires_parameter), query.get(&self.signature_parameter)) {
                (Some(expiration), Some(signature)) => (expiration, signature),
                _ => {
                    debug!(
                        "validate_at: URL is missing the '{}' or '{}' parameter",
                        self.expires_parameter, self.signature_parameter
                    );
                    return false;
                }
            };

        let timestamp = match i64::from_str(expiration) {
            Ok(timestamp) => timestamp,
            Err(_) => {
                debug!("validate_at: expiration '{}' is not an integer timestamp", expiration);
                return false;
            }
        };

        if timestamp < now.timestamp() {
            debug!("validate_at: URL expired at {}; now {}", timestamp, now.timestamp());
            return false;
        }

        let intended_url = self.intended_url(url);
        let expected_signature = self.strategy.create_signature(&intended_url, expiration, key);
        let is_equal = constant_time_eq(expected_signature.as_bytes(), provided_signature.as_bytes());
        if !is_equal {
            debug!("validate_at: signature mismatch for '{}'", intended_url);
        }

        is_equal
    }

    /// The URL that was signed: `url` without the expiration and signature parameters.
    fn intended_url(&self, url: &str) -> String {
        without_parameters(url, [self.expires_parameter.as_str(), self.signature_parameter.as_str()])
    }
}

impl Debug for UrlSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UrlSigner")
            .field("expires_parameter", &self.expires_parameter)
            .field("signature_parameter", &self.signature_parameter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{ExpirationError, HmacSha512Strategy, SignatureError, UrlSigner},
        chrono::{DateTime, Duration, TimeZone, Utc},
    };

    const URL: &str = "https://example.com/file?id=42";
    const SIGNED_URL: &str = "https://example.com/file?id=42&expires=1609462800&signature=2ec15e7281cc854c4ebc91d75e63baff7d2e76fd44aa37eb063ef4e4367e1ddf";

    fn test_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    }

    macro_rules! expect_err {
        ($test:expr, $expected:ident) => {
            match $test {
                Ok(ref v) => panic!("Expected Err({}); got Ok({:?})", stringify!($expected), v),
                Err(ref e) => match e {
                    SignatureError::$expected(_) => e.to_string(),
                    _ => panic!("Expected {}; got {:#?}: {}", stringify!($expected), &e, &e),
                },
            }
        };
    }

    #[test_log::test]
    fn test_builder_defaults() {
        let signer = UrlSigner::new("secret").unwrap();
        assert_eq!(signer.expires_parameter(), "expires");
        assert_eq!(signer.signature_parameter(), "signature");

        let signer = UrlSigner::builder()
            .default_key("secret")
            .expires_parameter("exp")
            .signature_parameter("sig")
            .build()
            .unwrap();
        assert_eq!(signer.expires_parameter(), "exp");
        assert_eq!(signer.signature_parameter(), "sig");
    }

    #[test_log::test]
    fn test_builder_rejects_bad_config() {
        let e = expect_err!(UrlSigner::new(""), InvalidSignatureKey);
        assert_eq!(e, "The signature key is empty");

        let e = expect_err!(UrlSigner::builder().build(), InvalidSignatureKey);
        assert_eq!(e, "The signature key is empty");

        let e = expect_err!(UrlSigner::builder().default_key("k").expires_parameter("").build(), InvalidParameterName);
        assert_eq!(e, "Parameter name must not be empty");

        let e = expect_err!(UrlSigner::builder().default_key("k").signature_parameter("expires").build(), InvalidParameterName);
        assert_eq!(e, "Expires and signature parameters must have different names");
    }

    #[test_log::test]
    fn test_debug_hides_key() {
        let signer = UrlSigner::new("super-secret-key").unwrap();
        let debug = format!("{:?}", signer);
        assert!(debug.contains("UrlSigner"));
        assert!(debug.contains("expires"));
        assert!(!debug.contains("super-secret-key"));
    }

    #[test_log::test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<UrlSigner>();
    }

    #[test_log::test]
    fn test_sign_at_known_value() {
        let signer = UrlSigner::new("secret").unwrap();
        assert_eq!(signer.sign_at(URL, 3600, None, test_timestamp()).unwrap(), SIGNED_URL);
        assert_eq!(signer.sign_at(URL, 3600, Some("secret"), test_timestamp()).unwrap(), SIGNED_URL);

        let at = test_timestamp() + Duration::hours(1);
        assert_eq!(signer.sign_at(URL, at, None, test_timestamp()).unwrap(), SIGNED_URL);
        assert_eq!(signer.sign_at(URL, "2021-01-01T01:00:00Z", None, test_timestamp()).unwrap(), SIGNED_URL);
    }

    #[test_log::test]
    fn test_sign_replaces_existing_parameters() {
        let signer = UrlSigner::new("secret").unwrap();
        let url = "https://example.com/file?expires=1&id=42&signature=abc";
        assert_eq!(signer.sign_at(url, 3600, None, test_timestamp()).unwrap(), SIGNED_URL);
    }

    #[test_log::test]
    fn test_sign_rejects_bad_expiration() {
        let signer = UrlSigner::new("secret").unwrap();
        let now = test_timestamp();

        match signer.sign_at(URL, 0, None, now) {
            Err(SignatureError::InvalidExpiration(ExpirationError::IsInPast)) => (),
            other => panic!("Expected IsInPast; got {:?}", other),
        }

        match signer.sign_at(URL, now - Duration::seconds(1), None, now) {
            Err(SignatureError::InvalidExpiration(ExpirationError::IsInPast)) => (),
            other => panic!("Expected IsInPast; got {:?}", other),
        }

        match signer.sign_at(URL, "next tuesday", None, now) {
            Err(SignatureError::InvalidExpiration(ExpirationError::WrongType)) => (),
            other => panic!("Expected WrongType; got {:?}", other),
        }

        let e = expect_err!(signer.sign_at(URL, 3600, Some(""), now), InvalidSignatureKey);
        assert_eq!(e, "The signature key is empty");
    }

    #[test_log::test]
    fn test_validate_at_expiration_boundary() {
        let signer = UrlSigner::new("secret").unwrap();
        let now = test_timestamp();
        assert!(signer.validate_at(SIGNED_URL, None, now));
        assert!(signer.validate_at(SIGNED_URL, None, now + Duration::seconds(3599)));
        // The expiration second itself is still valid.
        assert!(signer.validate_at(SIGNED_URL, None, now + Duration::seconds(3600)));
        assert!(signer.validate_at(SIGNED_URL, None, now + Duration::milliseconds(3600_999)));
        assert!(!signer.validate_at(SIGNED_URL, None, now + Duration::seconds(3601)));
    }

    #[test_log::test]
    fn test_validate_keys() {
        let signer = UrlSigner::new("secret").unwrap();
        let now = test_timestamp();
        assert!(signer.validate_at(SIGNED_URL, Some("secret"), now));
        assert!(!signer.validate_at(SIGNED_URL, Some("wrong"), now));
        assert!(!signer.validate_at(SIGNED_URL, Some(""), now));

        let other = UrlSigner::new("other").unwrap();
        assert!(!other.validate_at(SIGNED_URL, None, now));
        assert!(other.validate_at(SIGNED_URL, Some("secret"), now));

        let signed = signer.sign_at(URL, 60, Some("per-call"), now).unwrap();
        assert!(!signer.validate_at(&signed, None, now));
        assert!(signer.validate_at(&signed, Some("per-call"), now));
    }

    #[test_log::test]
    fn test_validate_rejects_malformed() {
        let signer = UrlSigner::new("secret").unwrap();
        let now = test_timestamp();
        let sig = "2ec15e7281cc854c4ebc91d75e63baff7d2e76fd44aa37eb063ef4e4367e1ddf";

        assert!(!signer.validate_at(URL, None, now));
        assert!(!signer.validate_at("https://example.com/file?id=42&expires=1609462800", None, now));
        assert!(!signer.validate_at(&format!("https://example.com/file?id=42&signature={}", sig), None, now));
        assert!(!signer.validate_at(&format!("https://example.com/file?id=42&expires=soon&signature={}", sig), None, now));
        assert!(!signer.validate_at(
            &format!("https://example.com/file?id=42&expires=99999999999999999999&signature={}", sig),
            None,
            now
        ));
        assert!(!signer.validate_at(&format!("https://example.com/file?id=42&expires=+1609462800&signature={}", sig), None, now));
        assert!(!signer.validate_at("", None, now));
        assert!(!signer.validate_at("?&&=&expires&signature", None, now));
        assert!(!signer.validate_at("%%%?expires=%&signature=%zz#", None, now));
    }

    #[test_log::test]
    fn test_custom_parameter_names() {
        let signer = UrlSigner::builder()
            .default_key("secret")
            .expires_parameter("e")
            .signature_parameter("s")
            .build()
            .unwrap();
        let now = test_timestamp();
        let signed = signer.sign_at(URL, 3600, None, now).unwrap();
        assert_eq!(
            signed,
            "https://example.com/file?id=42&e=1609462800&s=2ec15e7281cc854c4ebc91d75e63baff7d2e76fd44aa37eb063ef4e4367e1ddf"
        );
        assert!(signer.validate_at(&signed, None, now));

        // A default-configured signer does not find its parameters.
        let default = UrlSigner::new("secret").unwrap();
        assert!(!default.validate_at(&signed, None, now));
    }

    #[test_log::test]
    fn test_alternate_strategies() {
        let now = test_timestamp();

        let signer = UrlSigner::builder().default_key("secret").strategy(HmacSha512Strategy).build().unwrap();
        let signed = signer.sign_at(URL, 3600, None, now).unwrap();
        assert!(signed.ends_with("&signature=7956820da65e60b3219c9d883200aeeb52f8d8099d2cb75f8d193e9a5f61f640bc191d7b05922b9956e2e4f5c195f62900e86afa7c65a16d212499c7a644f6f6"));
        assert!(signer.validate_at(&signed, None, now));
        assert!(!signer.validate_at(SIGNED_URL, None, now));

        let signer = UrlSigner::builder()
            .default_key("secret")
            .strategy(|url: &str, expiration: &str, key: &str| format!("{}-{}-{}", key.len(), expiration, url.len()))
            .build()
            .unwrap();
        let signed = signer.sign_at(URL, 3600, None, now).unwrap();
        assert_eq!(signed, "https://example.com/file?id=42&expires=1609462800&signature=6-1609462800-30");
        assert!(signer.validate_at(&signed, None, now));
    }
}
