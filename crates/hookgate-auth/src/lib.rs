//! Webhook request signature verification for Hookgate.
//!
//! A webhook sender signs each request with a shared secret:
//!
//! ```text
//! X-Twilio-Signature: Base64(HMAC-SHA1(Secret, FullUrl + SortedFormPairs))
//! ```
//!
//! This crate implements the receiving side: rebuild the canonical string
//! from the request and check the transmitted signature in constant time.
//! Everything is synchronous and free of shared state, so verification can run
//! on any number of request tasks concurrently.
//!
//! # Usage
//!
//! ```rust
//! use hookgate_auth::{Secret, verify_request, DEFAULT_SIGNATURE_HEADER};
//!
//! let (parts, ()) = http::Request::builder()
//!     .method("POST")
//!     .uri("https://mycompany.com/myapp.php?foo=1&bar=2")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .header("x-twilio-signature", "RSOYDt4T1cUTdK1PDd93/VVr8B8=")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//! let body = "CallSid=CA1234567890ABCDE&Caller=%2B14158675309&Digits=1234\
//!             &From=%2B14158675309&To=%2B18005551212";
//!
//! let header = http::HeaderName::from_static(DEFAULT_SIGNATURE_HEADER);
//! let url = parts.uri.to_string();
//! assert!(verify_request(&Secret::from("12345"), &parts, &url, body.as_bytes(), &header));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction from URL and form body
//! - [`error`] - Verification failure reasons
//! - [`request`] - Request-level verification over `http::request::Parts`
//! - [`secret`] - The shared secret type
//! - [`signature`] - HMAC-SHA1 computation and constant-time comparison

pub mod canonical;
pub mod error;
pub mod request;
pub mod secret;
pub mod signature;

pub use canonical::{FormFields, build_canonical_string, parse_form};
pub use error::AuthError;
pub use request::{DEFAULT_SIGNATURE_HEADER, validate_request, verify_request};
pub use secret::Secret;
pub use signature::{SIGNATURE_LEN, check_signature, compute_signature, sign, verify_signature};
