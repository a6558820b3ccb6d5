//! TrueType font discovery for the card painter.

use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use crate::domain::{AppError, Result};

/// Common system font locations tried when no font is configured.
const SYSTEM_FONT_PATHS: [&str; 8] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a font from a file.
///
/// # Errors
/// Returns error if the file cannot be read or is not a font.
pub fn load_font_file(path: &Path) -> Result<Font> {
    let data = fs::read(path)
        .map_err(|e| AppError::io(format!("Failed to read font file: {}", path.display()), e))?;

    Font::from_bytes(data, FontSettings::default()).map_err(|e| AppError::Config {
        message: format!("Failed to parse font {}: {e}", path.display()),
    })
}

/// Resolve the card font: configured path, then `FONT_PATH`, then system
/// locations. Returns `None` when nothing usable is found.
#[must_use]
pub fn discover_font(configured: Option<&Path>) -> Option<Font> {
    if let Some(path) = configured {
        match load_font_file(path) {
            Ok(font) => return Some(font),
            Err(e) => tracing::warn!(error = %e, "Configured font unusable, searching system fonts"),
        }
    }

    let env_path = std::env::var_os("FONT_PATH").map(PathBuf::from);
    let candidates = env_path
        .into_iter()
        .chain(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_font_file(&path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "Loaded card font");
                return Some(font);
            }
            Err(e) => tracing::debug!(error = %e, "Skipping font candidate"),
        }
    }

    tracing::warn!("No usable font found; JPEG and PDF export are unavailable");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_font_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load_font_file(&dir.path().join("nope.ttf"));
        assert!(matches!(result, Err(AppError::Io { .. })));
    }

    #[test]
    fn test_garbage_font_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        fs::write(&path, b"not a font").unwrap();

        assert!(matches!(load_font_file(&path), Err(AppError::Config { .. })));
    }
}
