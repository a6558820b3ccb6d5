//! Configuration file management.
//!
//! Handles loading and saving TOML configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# josera-card configuration
# Auto-generated - edit as needed

[editor]
# Generative Language API endpoint and image model used for logo edits
base_url = "https://generativelanguage.googleapis.com"
model = "gemini-2.5-flash-image"

# Environment variable holding the API key (API_KEY is tried as a fallback)
api_key_env = "GEMINI_API_KEY"

# Request timeout in seconds
timeout_secs = 120

[export]
# Directory exported files are written to
output_dir = "."

# Render the contact QR code on the back of the card
show_qr_code = true

# Layout of the two card faces in JPEG/PDF exports: "row" or "column"
direction = "row"

# Oversampling factor and JPEG quality for raster exports
scale = 3
jpeg_quality = 90

[upload]
# Largest accepted logo file in bytes (default: 5 MiB)
max_logo_bytes = 5242880

[render]
# TrueType font for card text (optional, system fonts are searched otherwise)
# font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
"#;

/// Resolve the configuration file path.
#[must_use]
pub fn config_file_path(override_path: Option<&Path>) -> PathBuf {
    override_path.map_or_else(AppConfig::default_config_file, Path::to_path_buf)
}

/// Load configuration from file or fall back to defaults.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config(override_path: Option<&Path>) -> Result<AppConfig> {
    let config_path = config_file_path(override_path);

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else if override_path.is_some() {
        Err(AppError::Config {
            message: format!("Config file not found: {}", config_path.display()),
        })
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Save configuration to file.
///
/// # Errors
/// Returns error if file cannot be written.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let content = toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })?;

    fs::write(path, content)
        .map_err(|e| AppError::io(format!("Failed to write config file: {}", path.display()), e))?;

    tracing::info!(path = %path.display(), "Configuration saved");

    Ok(())
}

/// Create the commented default configuration file if it doesn't exist.
/// Returns whether a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    create_parent_dir(path)?;
    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");
    Ok(true)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.editor.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.export.direction, Direction::Row);
        assert_eq!(config.upload.max_logo_bytes, 5 * 1024 * 1024);
        assert!(config.render.font_path.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.export.direction = Direction::Column;
        config.export.jpeg_quality = 75;

        save_config(&config, &config_path).unwrap();
        let loaded = load_config(Some(&config_path)).unwrap();

        assert_eq!(loaded.export.direction, Direction::Column);
        assert_eq!(loaded.export.jpeg_quality, 75);
        assert_eq!(loaded.editor.model, config.editor.model);
    }

    #[test]
    fn test_ensure_config_exists_writes_once() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        assert!(ensure_config_exists(&config_path).unwrap());
        fs::write(&config_path, "[export]\nscale = 2\n").unwrap();
        assert!(!ensure_config_exists(&config_path).unwrap());

        assert_eq!(load_config_from_file(&config_path).unwrap().export.scale, 2);
    }

    #[test]
    fn test_missing_override_is_error() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[export\nscale = ").unwrap();

        assert!(matches!(
            load_config_from_file(&config_path),
            Err(AppError::Config { .. })
        ));
    }
}
