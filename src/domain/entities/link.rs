//! Link entities: identifiers, short codes, long URLs and link records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::utils::base62;
use crate::utils::url_validator::{UrlValidationError, validate_long_url};

/// Key prefix of link records (`short:<decimal id>`).
pub const SHORT_KEY_PREFIX: &str = "short:";

/// Key prefix of reverse index entries (`long:<url>`).
pub const LONG_KEY_PREFIX: &str = "long:";

/// Hash field of a link record holding the long URL.
pub const LINK_URL_FIELD: &str = "url";

/// Internal numeric key of a shortened link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(u64);

impl Identifier {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Store key of the link record for this identifier.
    pub fn short_key(self) -> String {
        format!("{SHORT_KEY_PREFIX}{}", self.0)
    }

    pub fn to_short_code(self) -> ShortCode {
        ShortCode(base62::encode(self.0))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public base62 form of an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wraps a code read back from the reverse index.
    pub(crate) fn from_stored(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes a caller-supplied code into the identifier it names.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MalformedCode`] if `code` has characters outside
    /// the base62 alphabet.
    pub fn parse(code: &str) -> Result<Identifier, AppError> {
        base62::decode(code)
            .map(Identifier::new)
            .map_err(|e| AppError::malformed_code(code, e))
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated, canonical absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LongUrl(String);

impl LongUrl {
    /// Validates and canonicalizes `raw`.
    ///
    /// # Errors
    ///
    /// See [`validate_long_url`].
    pub fn parse(raw: &str) -> Result<Self, UrlValidationError> {
        validate_long_url(raw).map(Self)
    }

    /// Wraps a URL read back from a link record.
    pub(crate) fn from_stored(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store key of the reverse index entry for this URL.
    pub fn long_key(&self) -> String {
        format!("{LONG_KEY_PREFIX}{}", self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LongUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Association between an identifier and a long URL, live until `expires_at`.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub identifier: Identifier,
    pub long_url: LongUrl,
    pub expires_at: DateTime<Utc>,
}

impl LinkRecord {
    pub fn new(identifier: Identifier, long_url: LongUrl, expires_at: DateTime<Utc>) -> Self {
        Self {
            identifier,
            long_url,
            expires_at,
        }
    }

    pub fn short_code(&self) -> ShortCode {
        self.identifier.to_short_code()
    }
}
