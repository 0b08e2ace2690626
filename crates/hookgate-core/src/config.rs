//! Configuration management for Hookgate.
//!
//! All configuration is driven by environment variables.

use std::fmt;

use crate::error::{HookgateError, HookgateResult};

/// Global configuration for the Hookgate server.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookgateConfig {
    /// Bind address for the server.
    pub gateway_listen: String,
    /// Log level.
    pub log_level: String,
    /// Shared secret used to verify webhook signatures.
    #[serde(skip_serializing, default)]
    pub auth_token: Option<String>,
    /// Header carrying the webhook signature.
    pub signature_header: String,
    /// Request path guarded by signature verification.
    pub webhook_path: String,
    /// Public scheme and authority the sender signs against, e.g. `https://hooks.example.com`.
    pub public_url: Option<String>,
    /// Scheme assumed when `public_url` is unset.
    pub default_scheme: String,
    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
    /// Accept requests that fail verification, logging a warning instead.
    pub report_only: bool,
}

impl Default for HookgateConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:8080".to_owned(),
            log_level: "info".to_owned(),
            auth_token: None,
            signature_header: "X-Twilio-Signature".to_owned(),
            webhook_path: "/webhook".to_owned(),
            public_url: None,
            default_scheme: "https".to_owned(),
            max_body_bytes: 1024 * 1024,
            report_only: false,
        }
    }
}

impl HookgateConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`HookgateError::InvalidSetting`] if a numeric or boolean setting
    /// cannot be parsed.
    pub fn from_env() -> HookgateResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`HookgateError::InvalidSetting`] if a numeric or boolean setting
    /// cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HookgateResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("AUTH_TOKEN") {
            config.auth_token = Some(v);
        }
        if let Some(v) = lookup("SIGNATURE_HEADER") {
            config.signature_header = v;
        }
        if let Some(v) = lookup("WEBHOOK_PATH") {
            config.webhook_path = v;
        }
        if let Some(v) = lookup("PUBLIC_URL").filter(|v| !v.is_empty()) {
            config.public_url = Some(v.trim_end_matches('/').to_owned());
        }
        if let Some(v) = lookup("DEFAULT_SCHEME") {
            config.default_scheme = v;
        }
        if let Some(v) = lookup("MAX_BODY_BYTES") {
            config.max_body_bytes = v.parse().map_err(|_| HookgateError::InvalidSetting {
                name: "MAX_BODY_BYTES",
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup("REPORT_ONLY") {
            config.report_only = parse_flag(&v).ok_or(HookgateError::InvalidSetting {
                name: "REPORT_ONLY",
                value: v.clone(),
            })?;
        }

        Ok(config)
    }

    /// The shared secret, which must be configured before serving.
    ///
    /// # Errors
    ///
    /// Returns [`HookgateError::MissingSetting`] if `AUTH_TOKEN` is unset or empty.
    pub fn require_auth_token(&self) -> HookgateResult<&str> {
        self.auth_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(HookgateError::MissingSetting("AUTH_TOKEN"))
    }
}

/// Parse `true`/`false`/`1`/`0`, ignoring ASCII case.
fn parse_flag(value: &str) -> Option<bool> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl fmt::Debug for HookgateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookgateConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("log_level", &self.log_level)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("signature_header", &self.signature_header)
            .field("webhook_path", &self.webhook_path)
            .field("public_url", &self.public_url)
            .field("default_scheme", &self.default_scheme)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("report_only", &self.report_only)
            .finish()
    }
}
