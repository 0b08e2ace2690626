//! Configuration and error types shared across Hookgate crates.
//!
//! The verification crate itself reads no configuration; everything here is
//! consumed by the server binary and handed to the HTTP layer.

mod config;
mod error;

pub use config::HookgateConfig;
pub use error::{HookgateError, HookgateResult};
