//! Single-page A4 PDF writer built on `lopdf`.
//!
//! The card snapshot is embedded as one raw RGB image XObject,
//! spanning the page width and placed a fixed margin below the top edge.
//! The document is flate-compressed before serialization.

use chrono::Utc;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::domain::{AppError, Result};

/// A4 portrait, in millimetres.
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Distance from the top edge of the page to the top of the image.
pub const TOP_MARGIN_MM: f32 = 20.0;

const PT_PER_MM: f32 = 72.0 / 25.4;
const IMAGE_NAME: &str = "Im0";

/// Image rectangle in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Convert millimetres to PDF points.
#[must_use]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Place a `px_width`×`px_height` image at full page width, keeping its
/// aspect ratio.
#[must_use]
pub fn place_on_a4(px_width: u32, px_height: u32) -> ImagePlacement {
    let width = mm_to_pt(A4_WIDTH_MM);
    let height = if px_width == 0 {
        0.0
    } else {
        width * px_height as f32 / px_width as f32
    };
    let top = mm_to_pt(A4_HEIGHT_MM) - mm_to_pt(TOP_MARGIN_MM);

    ImagePlacement {
        x: 0.0,
        y: top - height,
        width,
        height,
    }
}

/// Write `image` onto a single A4 page.
///
/// # Errors
/// Returns `Pdf` if the page content or the document cannot be serialized.
pub fn single_page_pdf(image: &RgbImage, title: &str) -> Result<Vec<u8>> {
    let (px_width, px_height) = image.dimensions();
    let placement = place_on_a4(px_width, px_height);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(px_width),
            "Height" => i64::from(px_height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        image.as_raw().clone(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    placement.width.into(),
                    0_f32.into(),
                    0_f32.into(),
                    placement.height.into(),
                    placement.x.into(),
                    placement.y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(AppError::pdf)?,
    ));

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { IMAGE_NAME => image_id },
    });

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0_f32.into(),
            0_f32.into(),
            mm_to_pt(A4_WIDTH_MM).into(),
            mm_to_pt(A4_HEIGHT_MM).into(),
        ],
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
        "CreationDate" => Object::string_literal(
            Utc::now().format("D:%Y%m%d%H%M%SZ").to_string(),
        ),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(AppError::pdf)?;

    tracing::debug!(
        width = px_width,
        height = px_height,
        size = bytes.len(),
        "Wrote PDF page"
    );
    Ok(bytes)
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_a4_in_points() {
        assert!((mm_to_pt(A4_WIDTH_MM) - 595.28).abs() < 0.01);
        assert!((mm_to_pt(A4_HEIGHT_MM) - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_placement_spans_width_below_margin() {
        let p = place_on_a4(896, 304);

        assert!((p.width - mm_to_pt(210.0)).abs() < 0.01);
        assert!((p.height - mm_to_pt(210.0 * 304.0 / 896.0)).abs() < 0.01);
        assert!((p.y + p.height - mm_to_pt(277.0)).abs() < 0.01);
        assert!(p.x.abs() < f32::EPSILON);
    }

    #[test]
    fn test_placement_of_empty_image() {
        let p = place_on_a4(0, 10);
        assert!(p.height.abs() < f32::EPSILON);
    }

    #[test]
    fn test_document_structure() {
        let image = RgbImage::from_pixel(8, 4, image::Rgb([93, 75, 120]));
        let bytes = single_page_pdf(&image, "Frianti").unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, b"DeviceRGB"));
        assert!(contains(&bytes, b"Frianti"));
        assert!(contains(&bytes, b"%%EOF"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_non_ascii_title_is_utf16() {
        match text_string("Café") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(bytes.len(), 2 + 4 * 2);
            }
            other => panic!("unexpected object: {other:?}"),
        }
    }
}
