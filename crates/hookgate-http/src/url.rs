//! Absolute URL reconstruction.
//!
//! Senders sign the public absolute URL (`https://host/path?query`), but the
//! server sees whatever the last hop sent: an origin-form target
//! (`/path?query`) over HTTP/1.1, or an absolute URI built from the internal
//! `:scheme` and `:authority` over h2c. The URL is rebuilt from, in order of
//! preference:
//!
//! 1. A configured public base URL plus the request target. Behind a proxy
//!    this is the only source that knows the public scheme and host.
//! 2. The request URI itself, when it is already absolute.
//! 3. The default scheme plus the `Host` header.
//!
//! The path and query are always copied verbatim, never re-encoded.

/// Rebuild the absolute URL the sender signed.
///
/// Falls back to the bare request target when no host is known; such a URL
/// will not match any signature, so the request is rejected downstream.
///
/// # Examples
///
/// ```
/// use hookgate_http::url::resolve_request_url;
///
/// let (parts, ()) = http::Request::builder()
///     .uri("/myapp.php?foo=1&bar=2")
///     .header("host", "internal:8080")
///     .body(())
///     .unwrap()
///     .into_parts();
///
/// assert_eq!(
///     resolve_request_url(&parts, Some("https://mycompany.com"), "https"),
///     "https://mycompany.com/myapp.php?foo=1&bar=2"
/// );
/// assert_eq!(
///     resolve_request_url(&parts, None, "http"),
///     "http://internal:8080/myapp.php?foo=1&bar=2"
/// );
/// ```
#[must_use]
pub fn resolve_request_url(
    parts: &http::request::Parts,
    public_url: Option<&str>,
    default_scheme: &str,
) -> String {
    let uri = &parts.uri;
    let target = uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    if let Some(base) = public_url {
        return format!("{}{target}", base.trim_end_matches('/'));
    }

    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    match request_host(parts) {
        Some(host) => format!("{default_scheme}://{host}{target}"),
        None => target.to_owned(),
    }
}

/// The host the client addressed: URI authority first, then the `Host` header.
fn request_host(parts: &http::request::Parts) -> Option<&str> {
    parts.uri.authority().map(http::uri::Authority::as_str).or_else(|| {
        parts
            .headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|host| !host.is_empty())
    })
}
