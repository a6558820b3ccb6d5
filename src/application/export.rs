//! Export composition: turns a card snapshot into a downloadable artifact.

use fontdue::Font;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use super::html::build_card_html;
use super::qr::encode_qr;
use super::render::CardPainter;
use super::vcard::encode_vcard;
use crate::domain::{AppError, Artifact, CardData, ExportConfig, ExportFormat, ExportOptions, Logo, Result};
use crate::infrastructure::single_page_pdf;

/// Raster output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Oversampling factor applied to the logical layout.
    pub scale: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 3,
            jpeg_quality: 90,
        }
    }
}

impl From<&ExportConfig> for RenderSettings {
    fn from(config: &ExportConfig) -> Self {
        Self {
            scale: config.scale.max(1),
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
        }
    }
}

/// Everything an export needs, borrowed from the editor session.
#[derive(Debug, Clone, Copy)]
pub struct CardSnapshot<'a> {
    pub card: &'a CardData,
    pub logo: &'a Logo,
    pub options: ExportOptions,
}

/// Builds JPEG, PDF and HTML artifacts.
pub struct ExportComposer {
    settings: RenderSettings,
    font: Option<Font>,
}

impl ExportComposer {
    #[must_use]
    pub const fn new(settings: RenderSettings, font: Option<Font>) -> Self {
        Self { settings, font }
    }

    /// Compose one artifact from the snapshot.
    ///
    /// # Errors
    /// Returns error if painting, QR encoding or document encoding fails.
    /// JPEG and PDF need a font; without one they fail with `Render`.
    pub fn compose(&self, format: ExportFormat, snapshot: CardSnapshot<'_>) -> Result<Artifact> {
        let bytes = match format {
            ExportFormat::Jpeg => self.encode_jpeg(&self.paint(snapshot)?)?,
            ExportFormat::Pdf => {
                let title = format!("{} - Business Card", snapshot.card.name);
                single_page_pdf(&self.paint(snapshot)?, &title)?
            }
            ExportFormat::Html => Self::build_html(snapshot)?.into_bytes(),
        };

        tracing::info!(format = %format, size = bytes.len(), "Composed export");
        Ok(Artifact::new(format, &snapshot.card.name, bytes))
    }

    fn paint(&self, snapshot: CardSnapshot<'_>) -> Result<RgbImage> {
        let font = self.font.as_ref().ok_or_else(|| {
            AppError::render("No font available for card text; set render.font_path or FONT_PATH")
        })?;
        CardPainter::new(font, self.settings.scale).paint(
            snapshot.card,
            snapshot.logo,
            snapshot.options,
        )
    }

    fn encode_jpeg(&self, image: &RgbImage) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, self.settings.jpeg_quality);
        image
            .write_with_encoder(encoder)
            .map_err(|e| AppError::render(format!("JPEG encoding failed: {e}")))?;
        Ok(bytes)
    }

    fn build_html(snapshot: CardSnapshot<'_>) -> Result<String> {
        let qr = if snapshot.options.show_qr_code {
            Some(encode_qr(&encode_vcard(snapshot.card))?)
        } else {
            None
        };
        Ok(build_card_html(snapshot.card, snapshot.logo, qr.as_ref()))
    }
}
