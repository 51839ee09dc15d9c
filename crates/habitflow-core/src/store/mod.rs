//! Caller-owned storage: versioned ledger cache, subscriptions, and
//! document-style JSON persistence.
//!
//! There are no process-wide singletons here; the caller owns a
//! [`LedgerCache`] and wires subscriptions through it explicitly.

mod cache;
mod config;
mod json;
mod subscription;

pub use cache::{DateRange, LedgerCache, Versioned};
pub use config::Config;
pub use json::JsonStore;
pub use subscription::{LedgerDelta, SubscriptionHandle, SubscriptionRegistry};

use std::path::PathBuf;

/// Returns `~/.config/habitflow[-dev]/` based on HABITFLOW_ENV.
///
/// Set HABITFLOW_ENV=dev to use the development data directory, or
/// HABITFLOW_DATA_DIR to point somewhere else entirely (CLI end-to-end
/// tests rely on the latter).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = if let Ok(dir) = std::env::var("HABITFLOW_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("HABITFLOW_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("habitflow-dev")
        } else {
            base_dir.join("habitflow")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
