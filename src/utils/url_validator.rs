//! Long URL validation and canonicalization.
//!
//! A long URL is accepted only if it parses as an absolute `http`/`https`
//! URL with a host. The accepted form is canonicalized so that trivially
//! different spellings share one reverse-index key and one ranking entry.

use url::Url;

/// Upper bound on accepted URL length, in bytes.
pub const MAX_URL_LEN: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LEN} bytes")]
    TooLong,

    #[error("not an absolute URL: {0}")]
    InvalidFormat(String),

    #[error("only HTTP and HTTPS URLs can be shortened")]
    UnsupportedScheme,

    #[error("URL has no host")]
    MissingHost,

    #[error("failed to canonicalize URL: {0}")]
    NormalizationFailed(&'static str),
}

/// Validates `input` and returns its canonical form.
///
/// # Canonicalization
///
/// - scheme and host are lowercased
/// - the default port (80 for HTTP, 443 for HTTPS) is dropped
/// - the fragment is dropped
/// - path and query are kept verbatim
///
/// # Errors
///
/// See [`UrlValidationError`].
pub fn validate_long_url(input: &str) -> Result<String, UrlValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if input.len() > MAX_URL_LEN {
        return Err(UrlValidationError::TooLong);
    }

    let mut url =
        Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedScheme);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlValidationError::MissingHost)?
        .to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|_| UrlValidationError::NormalizationFailed("host"))?;

    url.set_fragment(None);

    if matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        url.set_port(None)
            .map_err(|_| UrlValidationError::NormalizationFailed("port"))?;
    }

    Ok(url.into())
}
