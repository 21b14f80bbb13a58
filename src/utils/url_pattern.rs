//! URL shape checks and origin/token helpers.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Loose URL shape: optional http(s) scheme, dotted host, optional port,
/// optional path/query/fragment.
static URL_SHAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:https?://)?[\da-zA-Z.-]+\.[a-zA-Z.]{2,6}(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("URL shape regex is valid")
});

/// Custom aliases: letters, digits and dashes.
pub static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("alias regex is valid"));

/// Errors from origin normalization.
#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS origins are allowed")]
    UnsupportedProtocol,

    #[error("Origin has no host")]
    MissingHost,
}

/// Returns true if `input` looks like a shortenable URL.
///
/// Beyond the regex, the value (with `http://` prepended when the scheme is
/// missing) must parse as a URL with a host.
pub fn is_url_shaped(input: &str) -> bool {
    if !URL_SHAPE_REGEX.is_match(input) {
        return false;
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    Url::parse(&candidate)
        .map(|url| url.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false)
}

/// Normalizes a configured origin: http(s) only, lowercase host, no trailing
/// slash. A path prefix is kept, query and fragment are dropped.
///
/// # Errors
///
/// Returns [`OriginError`] for unparseable, non-HTTP or host-less input.
pub fn normalize_origin(input: &str) -> Result<String, OriginError> {
    let url = Url::parse(input.trim()).map_err(|e| OriginError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(OriginError::UnsupportedProtocol),
    }

    if url.host_str().is_none() {
        return Err(OriginError::MissingHost);
    }

    let origin = url.origin().ascii_serialization();
    let path = url.path().trim_end_matches('/');

    Ok(format!("{origin}{path}"))
}

/// Extracts the short token from a navigation path.
///
/// Accepts `/s/{token}`, `/{token}`, a full URL ending in either, or a bare
/// token. Query strings and fragments are ignored. Returns `None` when no
/// token is present.
pub fn extract_token(path: &str) -> Option<String> {
    let without_origin = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
        None => path,
    };

    let path_only = without_origin
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim_matches('/');

    let token = match path_only.rsplit_once('/') {
        Some((_, last)) => last,
        None => path_only,
    };

    if token.is_empty() || token == "s" {
        None
    } else {
        Some(token.to_string())
    }
}
