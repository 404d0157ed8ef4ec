//! Settings persistence layer
//!
//! Loads and saves [`RenderSettings`] as pretty-printed JSON.

use crate::{RenderSettings, SettingsError};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Result type for persistence operations
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serializes settings to JSON bytes
pub fn serialize_settings(settings: &RenderSettings) -> SettingsResult<Vec<u8>> {
    serde_json::to_vec_pretty(settings).map_err(SettingsError::Serialize)
}

/// Deserializes settings from JSON bytes
///
/// The version is checked before the body so a future format is reported as
/// unsupported rather than malformed.
pub fn deserialize_settings(bytes: &[u8]) -> SettingsResult<RenderSettings> {
    let probe: VersionProbe = serde_json::from_slice(bytes).map_err(SettingsError::Deserialize)?;
    if probe.version != RenderSettings::CURRENT_VERSION {
        return Err(SettingsError::UnsupportedVersion(probe.version));
    }

    serde_json::from_slice(bytes).map_err(SettingsError::Deserialize)
}

/// Loads settings from a file, using defaults when it does not exist
pub fn load_settings(path: impl AsRef<Path>) -> SettingsResult<RenderSettings> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => deserialize_settings(&bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Ok(RenderSettings::default())
        }
        Err(err) => Err(SettingsError::Io(err)),
    }
}

/// Loads settings from a file, falling back to defaults on any error
pub fn load_settings_safe(path: impl AsRef<Path>) -> RenderSettings {
    let path = path.as_ref();
    load_settings(path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "invalid settings, using defaults");
        RenderSettings::default()
    })
}

/// Writes settings to a file
pub fn save_settings(path: impl AsRef<Path>, settings: &RenderSettings) -> SettingsResult<()> {
    let bytes = serialize_settings(settings)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use view_types::ShellStyle;

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let settings = RenderSettings::new()
            .with_sanitize_on_load(true)
            .with_shell(ShellStyle::default().with_class_name("doc-body"));

        let bytes = serialize_settings(&settings).unwrap();
        let restored = deserialize_settings(&bytes).unwrap();

        assert_eq!(restored, settings);
    }

    #[test]
    fn test_serialized_form_is_pretty() {
        let bytes = serialize_settings(&RenderSettings::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\n  \"version\": 1"));
        assert!(text.contains("\"sanitize_on_load\": false"));
    }

    #[test]
    fn test_unsupported_version() {
        let json = br#"{"version": 99, "shell": "not even a shell"}"#;
        let result = deserialize_settings(json);
        assert!(matches!(result, Err(SettingsError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let result = deserialize_settings(br#"{"sanitize_on_load": true}"#);
        assert!(matches!(result, Err(SettingsError::Deserialize(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = deserialize_settings(b"invalid json");
        assert!(matches!(result, Err(SettingsError::Deserialize(_))));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let json = br#"{"version": 1, "shell": {"padding": "2rem"}}"#;
        let settings = deserialize_settings(json).unwrap();

        assert_eq!(settings.shell.padding, "2rem");
        assert_eq!(settings.shell.class_name, "rich-text-shell");
        assert!(!settings.sanitize_on_load);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        let settings = RenderSettings::new().with_sanitize_on_load(true);

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_rejects_wrong_version_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        fs::write(&path, r#"{"version": 2}"#).unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(SettingsError::UnsupportedVersion(2))
        ));
        assert_eq!(load_settings_safe(&path), RenderSettings::default());
    }

    #[test]
    fn test_load_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_settings(dir.path()), Err(SettingsError::Io(_))));
    }
}
