//! Error types for the Hookgate core.

/// Core error type for Hookgate infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum HookgateError {
    /// A required setting is not configured.
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    /// A setting is present but cannot be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidSetting {
        /// Environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Convenience result type for Hookgate operations.
pub type HookgateResult<T> = Result<T, HookgateError>;
