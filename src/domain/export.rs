//! Export options, formats and artifacts.

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Filename prefix shared by every exported artifact.
pub const ARTIFACT_PREFIX: &str = "josera-card";

/// How the two faces are arranged in the dual-sided snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Front and back side by side.
    #[default]
    Row,
    /// Front above back.
    Column,
}

impl std::str::FromStr for Direction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "row" => Ok(Self::Row),
            "column" | "col" => Ok(Self::Column),
            _ => Err(AppError::invalid_input(format!(
                "Unknown direction: {s}. Use: row, column"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// User-selectable export options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Render a contact QR code on the back face.
    pub show_qr_code: bool,
    /// Layout of the dual-sided snapshot.
    pub direction: Direction,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            show_qr_code: true,
            direction: Direction::Row,
        }
    }
}

/// Output formats the composer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Lossy raster snapshot.
    Jpeg,
    /// Single-page A4 document with a lossless snapshot.
    Pdf,
    /// Standalone interactive flip card.
    Html,
}

impl ExportFormat {
    /// Every format, in the order `export all` produces them.
    pub const ALL: [Self; 3] = [Self::Pdf, Self::Jpeg, Self::Html];

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }

    /// MIME type handed to the file-save mechanism.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Pdf => "application/pdf",
            Self::Html => "text/html",
        }
    }

    /// Name used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Pdf => "PDF",
            Self::Html => "HTML card",
        }
    }

    /// Message shown when this export fails.
    #[must_use]
    pub fn failure_message(self) -> String {
        format!("Failed to generate {}. Please try again.", self.label())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(AppError::invalid_input(format!(
                "Unknown format: {s}. Use: jpg, pdf, html"
            ))),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A finished export, ready to be saved by the host.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Target filename, e.g. `josera-card-frianti.pdf`.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Build an artifact named after the card holder.
    #[must_use]
    pub fn new(format: ExportFormat, name: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: artifact_filename(name, format),
            mime: format.mime(),
            bytes,
        }
    }
}

/// Lowercase `text` and collapse whitespace runs into single hyphens.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// `josera-card-<slug>.<ext>`; an empty name falls back to `card`.
#[must_use]
pub fn artifact_filename(name: &str, format: ExportFormat) -> String {
    let slug = slugify(name);
    let slug = if slug.is_empty() { "card".to_string() } else { slug };
    format!("{ARTIFACT_PREFIX}-{slug}.{}", format.extension())
}
