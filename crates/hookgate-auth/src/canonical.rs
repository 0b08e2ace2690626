//! Canonical string construction for webhook signatures.
//!
//! The signer hashes a single string built from the request:
//!
//! ```text
//! FullUrl + Name1 + Value1 + Name2 + Value2 + ...
//! ```
//!
//! `FullUrl` is the absolute URL exactly as requested, query string included.
//! The name/value pairs come from the form-encoded POST body, sorted by name,
//! taking only the first value of each field. Non-POST requests sign the URL
//! alone.

use std::collections::HashMap;

use percent_encoding::percent_decode;

/// Media type of bodies that take part in the canonical string.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decoded form fields: field name to its values, in transport order.
///
/// Names and values are raw decoded bytes. The signer hashes bytes, so a
/// value that is not valid UTF-8 still has to verify.
pub type FormFields = HashMap<Vec<u8>, Vec<Vec<u8>>>;

/// Decode an `application/x-www-form-urlencoded` body.
///
/// The body is split on `&`, then each pair on its first `=`. `+` decodes
/// to a space and `%XX` to the byte `XX`. Decoding never fails; a pair is
/// skipped instead when it is empty, contains `;`, or has a `%` that is not
/// followed by two hex digits.
///
/// # Examples
///
/// ```
/// use hookgate_auth::canonical::parse_form;
///
/// let form = parse_form(b"Digits=1234&To=%2B18005551212&Digits=9&bad=%zz");
/// assert_eq!(form[&b"Digits"[..]], vec![b"1234".to_vec(), b"9".to_vec()]);
/// assert_eq!(form[&b"To"[..]], vec![b"+18005551212".to_vec()]);
/// assert!(!form.contains_key(&b"bad"[..]));
/// ```
#[must_use]
pub fn parse_form(body: &[u8]) -> FormFields {
    let mut fields = FormFields::new();
    for pair in body.split(|&b| b == b'&') {
        if pair.is_empty() || pair.contains(&b';') {
            continue;
        }

        let (name, value) = match pair.iter().position(|&b| b == b'=') {
            Some(idx) => (&pair[..idx], &pair[idx + 1..]),
            None => (pair, &b""[..]),
        };

        let (Some(name), Some(value)) = (unescape(name), unescape(value)) else {
            continue;
        };
        fields.entry(name).or_default().push(value);
    }
    fields
}

/// Decode one form component, or `None` if it holds an invalid escape.
fn unescape(component: &[u8]) -> Option<Vec<u8>> {
    let mut rest = component;
    while let Some(idx) = rest.iter().position(|&b| b == b'%') {
        let escape = rest.get(idx + 1..idx + 3)?;
        if !escape.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        rest = &rest[idx + 3..];
    }

    let spaced: Vec<u8> = component
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    Some(percent_decode(&spaced).collect())
}

/// Whether the request carries a body that is part of the signature.
///
/// Only POST requests with a form-urlencoded `Content-Type` qualify. Media
/// type parameters such as `charset` are ignored.
#[must_use]
pub fn is_signed_form(method: &http::Method, headers: &http::HeaderMap) -> bool {
    if *method != http::Method::POST {
        return false;
    }

    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Extract the form fields that take part in the signature.
///
/// Returns an empty field set for anything that is not a form POST, so JSON
/// and other encodings sign the URL only.
#[must_use]
pub fn form_for_request(
    method: &http::Method,
    headers: &http::HeaderMap,
    body: &[u8],
) -> FormFields {
    if is_signed_form(method, headers) {
        parse_form(body)
    } else {
        FormFields::new()
    }
}

/// Reduce form fields to `(name, first value)` pairs sorted by name.
///
/// A field whose value list is empty contributes an empty value. Sorting is
/// plain byte order on the name; names are unique so there are no ties.
///
/// # Examples
///
/// ```
/// use hookgate_auth::canonical::{parse_form, sorted_form_pairs};
///
/// let form = parse_form(b"b=2&a=1&a=3");
/// let pairs = sorted_form_pairs(&form);
/// assert_eq!(pairs, [(&b"a"[..], &b"1"[..]), (&b"b"[..], &b"2"[..])]);
/// ```
#[must_use]
pub fn sorted_form_pairs(fields: &FormFields) -> Vec<(&[u8], &[u8])> {
    let mut pairs: Vec<(&[u8], &[u8])> = fields
        .iter()
        .map(|(name, values)| {
            let value = values.first().map_or(&b""[..], Vec::as_slice);
            (name.as_slice(), value)
        })
        .collect();

    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    pairs
}

/// Build the canonical byte string that the signer hashed.
///
/// The URL is used verbatim. For POST requests the sorted form pairs are
/// appended as `name` immediately followed by `value`, with no delimiters.
///
/// # Examples
///
/// ```
/// use hookgate_auth::canonical::{build_canonical_string, parse_form};
///
/// let form = parse_form(b"To=%2B18005551212&Digits=1234");
/// let canonical = build_canonical_string(
///     &http::Method::POST,
///     "https://example.com/hook?x=1",
///     &form,
/// );
/// assert_eq!(canonical, b"https://example.com/hook?x=1Digits1234To+18005551212");
/// ```
#[must_use]
pub fn build_canonical_string(method: &http::Method, url: &str, fields: &FormFields) -> Vec<u8> {
    if *method != http::Method::POST {
        return url.as_bytes().to_vec();
    }

    let pairs = sorted_form_pairs(fields);
    let suffix_len: usize = pairs.iter().map(|(k, v)| k.len() + v.len()).sum();

    let mut canonical = Vec::with_capacity(url.len() + suffix_len);
    canonical.extend_from_slice(url.as_bytes());
    for (name, value) in pairs {
        canonical.extend_from_slice(name);
        canonical.extend_from_slice(value);
    }
    canonical
}
