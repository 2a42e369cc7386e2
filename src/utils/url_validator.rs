//! Long URL validation.
//!
//! A URL is accepted when it is absolute, carries a scheme and names a host.
//! The URL is stored exactly as submitted; no normalization is applied.

use url::Url;

/// Reasons a URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL has no scheme")]
    MissingScheme,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` has a non-empty scheme and a non-empty network location.
///
/// Any scheme is allowed; the redirect target is the caller's choice.
///
/// # Errors
///
/// Returns [`UrlValidationError::MissingScheme`] if there is no `scheme://` prefix,
/// [`UrlValidationError::InvalidFormat`] if the URL does not parse, and
/// [`UrlValidationError::MissingHost`] if it has no host (e.g. `mailto:` or `file:///`).
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("http://www.debian.org/").is_ok());
/// assert!(validate_url("www.debian.org").is_err());
/// assert!(validate_url("mailto:someone@example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    match input.trim().split_once("://") {
        Some((scheme, _)) if !scheme.is_empty() => {}
        _ => return Err(UrlValidationError::MissingScheme),
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
