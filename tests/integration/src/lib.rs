//! Integration tests for the Hookgate server.
//!
//! These tests require a running server at `localhost:8080` configured with
//! the reference credentials:
//!
//! ```text
//! AUTH_TOKEN=12345 PUBLIC_URL=https://mycompany.com WEBHOOK_PATH=/myapp.php hookgate-server
//! ```
//!
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p hookgate-integration -- --ignored
//! ```

use std::sync::Once;

use hookgate_auth::Secret;

static INIT: Once = Once::new();

/// Secret the server under test is started with.
pub const AUTH_TOKEN: &str = "12345";

/// Public base URL the server under test is started with.
pub const PUBLIC_URL: &str = "https://mycompany.com";

/// Webhook path the server under test is started with.
pub const WEBHOOK_PATH: &str = "/myapp.php";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("HOOKGATE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Create an HTTP client for the server.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// The reference webhook form fields.
#[must_use]
pub fn reference_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("CallSid", "CA1234567890ABCDE"),
        ("Caller", "+14158675309"),
        ("Digits", "1234"),
        ("From", "+14158675309"),
        ("To", "+18005551212"),
    ]
}

/// Sign `fields` posted to `path_and_query` the way the sender would.
#[must_use]
pub fn sign_form(path_and_query: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted = fields.to_vec();
    sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut canonical = format!("{PUBLIC_URL}{path_and_query}");
    for (name, value) in sorted {
        canonical.push_str(name);
        canonical.push_str(value);
    }
    hookgate_auth::sign(&Secret::from(AUTH_TOKEN), &canonical)
}

#[cfg(test)]
mod test_gate;
#[cfg(test)]
mod test_health;
