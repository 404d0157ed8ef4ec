//! # Render Settings Service
//!
//! Configuration for the rich-text mode boundary.
//!
//! ## Philosophy
//!
//! - **Defaults baked in**: A missing settings file is not an error
//! - **Typed settings**: Every knob is a field, not a string key
//! - **Versioned**: The on-disk format carries its version and unknown
//!   versions are refused
//! - **Not a policy surface**: The sanitization allow-list is fixed and cannot
//!   be configured here
//!
//! ## Example
//!
//! ```ignore
//! use services_settings::load_settings;
//!
//! let settings = load_settings("render.json")?;
//! let renderer = ViewRenderer::with_shell(doc_id, settings.shell.clone());
//! ```

pub mod persistence;

pub use persistence::{
    deserialize_settings, load_settings, load_settings_safe, save_settings, serialize_settings,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use view_types::ShellStyle;

/// Settings error types
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize settings: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Format version (see [`RenderSettings::CURRENT_VERSION`])
    pub version: u32,
    /// Presentational shell shared by both surfaces
    #[serde(default)]
    pub shell: ShellStyle,
    /// Pass initial and reloaded content through the gate before it becomes
    /// canonical
    ///
    /// Render-time sanitization happens regardless.
    #[serde(default)]
    pub sanitize_on_load: bool,
}

impl RenderSettings {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            shell: ShellStyle::default(),
            sanitize_on_load: false,
        }
    }

    pub fn with_shell(mut self, shell: ShellStyle) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_sanitize_on_load(mut self, enabled: bool) -> Self {
        self.sanitize_on_load = enabled;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new()
    }
}
