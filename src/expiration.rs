//! Expiration inputs for signing.
use {
    crate::{chronoutil::ParseISO8601, ExpirationError, SignatureError},
    chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc},
    log::trace,
    std::{str::FromStr, time::SystemTime},
};

/// When a signed URL stops being valid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Expiration {
    /// A number of seconds after the time of signing.
    Seconds(i64),

    /// An absolute point in time.
    At(DateTime<Utc>),
}

impl Expiration {
    /// Resolve this expiration to a Unix timestamp, relative to `now`.
    ///
    /// # Errors
    /// * [`ExpirationError::WrongType`] if an offset cannot be represented as a point in time.
    /// * [`ExpirationError::IsInPast`] if the result is not strictly after `now` (compared in whole
    ///   seconds).
    pub fn timestamp_at(&self, now: DateTime<Utc>) -> Result<i64, SignatureError> {
        let at = match *self {
            Self::Seconds(secs) => Duration::try_seconds(secs)
                .and_then(|offset| now.checked_add_signed(offset))
                .ok_or(ExpirationError::WrongType)?,
            Self::At(at) => at,
        };

        let timestamp = at.timestamp();
        if timestamp <= now.timestamp() {
            trace!("timestamp_at: {} is not after {}", timestamp, now.timestamp());
            return Err(ExpirationError::IsInPast.into());
        }

        Ok(timestamp)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Expiration {
    fn from(at: DateTime<Tz>) -> Self {
        Self::At(at.with_timezone(&Utc))
    }
}

impl From<SystemTime> for Expiration {
    fn from(at: SystemTime) -> Self {
        Self::At(DateTime::<Utc>::from(at))
    }
}

impl From<Duration> for Expiration {
    fn from(offset: Duration) -> Self {
        Self::Seconds(offset.num_seconds())
    }
}

impl From<i64> for Expiration {
    fn from(secs: i64) -> Self {
        Self::Seconds(secs)
    }
}

impl From<i32> for Expiration {
    fn from(secs: i32) -> Self {
        Self::Seconds(secs.into())
    }
}

impl From<u32> for Expiration {
    fn from(secs: u32) -> Self {
        Self::Seconds(secs.into())
    }
}

impl FromStr for Expiration {
    type Err = SignatureError;

    /// Parse an expiration from text: an integer number of seconds, an ISO 8601 timestamp (basic
    /// or extended format), or an RFC 3339 timestamp.
    fn from_str(s: &str) -> Result<Self, SignatureError> {
        let s = s.trim();

        if let Ok(secs) = i64::from_str(s) {
            return Ok(Self::Seconds(secs));
        }

        if let Ok(at) = DateTime::<FixedOffset>::parse_from_iso8601(s) {
            return Ok(at.into());
        }

        match DateTime::parse_from_rfc3339(s) {
            Ok(at) => Ok(at.into()),
            Err(_) => {
                trace!("Expiration::from_str: unrecognized expiration '{}'", s);
                Err(ExpirationError::WrongType.into())
            }
        }
    }
}

/// A trait for converting the various accepted expiration inputs into an [`Expiration`].
///
/// Integers and durations are offsets in seconds from the time of signing; date-time types are
/// absolute. Strings are parsed with [`Expiration::from_str`].
pub trait IntoExpiration {
    /// Convert this value into an [`Expiration`].
    fn into_expiration(self) -> Result<Expiration, SignatureError>;
}

impl IntoExpiration for Expiration {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self)
    }
}

impl<Tz: TimeZone> IntoExpiration for DateTime<Tz> {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self.into())
    }
}

impl IntoExpiration for SystemTime {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self.into())
    }
}

impl IntoExpiration for Duration {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self.into())
    }
}

/// Offsets longer than `i64::MAX` seconds are rejected as [`ExpirationError::WrongType`].
impl IntoExpiration for std::time::Duration {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        self.as_secs().into_expiration()
    }
}

impl IntoExpiration for i64 {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self.into())
    }
}

impl IntoExpiration for i32 {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self.into())
    }
}

impl IntoExpiration for u32 {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        Ok(self.into())
    }
}

/// Values above `i64::MAX` are rejected as [`ExpirationError::WrongType`].
impl IntoExpiration for u64 {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        i64::try_from(self).map(Expiration::Seconds).map_err(|_| ExpirationError::WrongType.into())
    }
}

impl IntoExpiration for &str {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        self.parse()
    }
}

impl IntoExpiration for String {
    fn into_expiration(self) -> Result<Expiration, SignatureError> {
        self.parse()
    }
}
