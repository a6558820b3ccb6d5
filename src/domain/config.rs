//! Application configuration.
//!
//! Every key has a serde default so a partial `config.toml` is always valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::export::{Direction, ExportOptions};

/// Settings for the generative image editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Base URL of the Generative Language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Image-capable model used for logo edits.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_model() -> String {
    "gemini-2.5-flash-image".into()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}

const fn default_timeout_secs() -> u64 {
    120
}

/// Settings for exported artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory artifacts are saved into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Initial value of the QR toggle.
    #[serde(default = "default_show_qr_code")]
    pub show_qr_code: bool,

    /// Initial layout of the dual-sided snapshot.
    #[serde(default)]
    pub direction: Direction,

    /// Oversampling factor for raster output.
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// JPEG quality, 1-100.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            show_qr_code: default_show_qr_code(),
            direction: Direction::default(),
            scale: default_scale(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl ExportConfig {
    /// Initial export options for a new session.
    #[must_use]
    pub const fn options(&self) -> ExportOptions {
        ExportOptions {
            show_qr_code: self.show_qr_code,
            direction: self.direction,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

const fn default_show_qr_code() -> bool {
    true
}

const fn default_scale() -> u32 {
    3
}

const fn default_jpeg_quality() -> u8 {
    90
}

/// Limits applied to logo uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted logo file in bytes.
    #[serde(default = "default_max_logo_bytes")]
    pub max_logo_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_logo_bytes: default_max_logo_bytes(),
        }
    }
}

const fn default_max_logo_bytes() -> u64 {
    5 * 1024 * 1024
}

/// Settings for the card painter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenderConfig {
    /// TrueType font used for card text; system fonts are searched if unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Image editor configuration.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Export configuration.
    #[serde(default)]
    pub export: ExportConfig,

    /// Upload limits.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Painter configuration.
    #[serde(default)]
    pub render: RenderConfig,
}

impl AppConfig {
    /// Get the default configuration directory.
    #[must_use]
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("josera-card")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_file() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.editor.model, "gemini-2.5-flash-image");
        assert_eq!(config.export.scale, 3);
        assert_eq!(config.export.jpeg_quality, 90);
        assert!(config.export.show_qr_code);
        assert_eq!(config.upload.max_logo_bytes, 5 * 1024 * 1024);
        assert!(config.render.font_path.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [export]
            direction = "column"
            show_qr_code = false
            "#,
        )
        .unwrap();

        assert_eq!(config.export.direction, Direction::Column);
        assert!(!config.export.options().show_qr_code);
        assert_eq!(config.export.scale, 3);
        assert_eq!(config.editor.timeout_secs, 120);
    }

    #[test]
    fn test_default_config_file_name() {
        assert!(AppConfig::default_config_file().ends_with("josera-card/config.toml"));
    }
}
