//! # smartmeet-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`SmartmeetSettings::default()`]
//! 2. **User file** — `~/.smartmeet/settings.json` (deep-merged over
//!    defaults)
//! 3. **Environment variables** — `SMARTMEET_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use smartmeet_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("listening on {}:{}", settings.server.host, settings.server.port);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton, initialized on first access.
static SETTINGS: OnceLock<SmartmeetSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.smartmeet/settings.json` with env
/// var overrides. On subsequent calls, returns the cached value. If loading
/// fails, returns compiled defaults.
pub fn get_settings() -> &'static SmartmeetSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
pub fn init_settings(settings: SmartmeetSettings) -> std::result::Result<(), SmartmeetSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
