//! Dual-sided card snapshot painter.
//!
//! Produces the raster used by the JPEG and PDF exports: both faces, each
//! 400×240 logical pixels, on a white sheet with 32 px padding and gap,
//! arranged per `Direction`.

use fontdue::Font;
use image::{DynamicImage, GrayImage, Rgb, RgbImage, RgbaImage};

use super::canvas::{measure_text, truncate_to_width, wrap_text, Canvas, Rect};
use super::qr::encode_qr;
use super::vcard::encode_vcard;
use crate::domain::{CardData, Direction, ExportOptions, Logo, Result};

/// Logical size of one card face.
pub const CARD_WIDTH: u32 = 400;
pub const CARD_HEIGHT: u32 = 240;

/// Sheet padding and spacing between faces.
pub const SHEET_PADDING: u32 = 32;
pub const FACE_GAP: u32 = 32;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GRAY_100: Rgb<u8> = Rgb([243, 244, 246]);
const GRAY_200: Rgb<u8> = Rgb([229, 231, 235]);
const GRAY_400: Rgb<u8> = Rgb([156, 163, 175]);
const GRAY_500: Rgb<u8> = Rgb([107, 114, 128]);
const GRAY_800: Rgb<u8> = Rgb([31, 41, 55]);
const RED_500: Rgb<u8> = Rgb([239, 68, 68]);
const YELLOW_400: Rgb<u8> = Rgb([250, 204, 21]);
const BACK_PURPLE: Rgb<u8> = Rgb([0x5D, 0x4B, 0x78]);

const CORNER_RADIUS: f32 = 12.0;
const FACE_PADDING: f32 = 32.0;
const QR_BOX: f32 = 72.0;

/// Where the two faces land on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub width: u32,
    pub height: u32,
    pub front: (u32, u32),
    pub back: (u32, u32),
}

impl SheetLayout {
    /// Layout for the given direction.
    #[must_use]
    pub const fn for_direction(direction: Direction) -> Self {
        let p = SHEET_PADDING;
        match direction {
            Direction::Row => Self {
                width: 2 * p + 2 * CARD_WIDTH + FACE_GAP,
                height: 2 * p + CARD_HEIGHT,
                front: (p, p),
                back: (p + CARD_WIDTH + FACE_GAP, p),
            },
            Direction::Column => Self {
                width: 2 * p + CARD_WIDTH,
                height: 2 * p + 2 * CARD_HEIGHT + FACE_GAP,
                front: (p, p),
                back: (p, p + CARD_HEIGHT + FACE_GAP),
            },
        }
    }
}

/// Paints card snapshots.
pub struct CardPainter<'a> {
    font: &'a Font,
    scale: u32,
}

impl<'a> CardPainter<'a> {
    #[must_use]
    pub const fn new(font: &'a Font, scale: u32) -> Self {
        Self { font, scale }
    }

    /// Paint the dual-sided snapshot.
    ///
    /// # Errors
    /// Returns error if the canvas cannot be allocated or the QR code cannot
    /// be encoded.
    pub fn paint(&self, card: &CardData, logo: &Logo, options: ExportOptions) -> Result<RgbImage> {
        let layout = SheetLayout::for_direction(options.direction);
        let mut canvas = Canvas::new(layout.width, layout.height, self.scale, WHITE)?;

        let logo_image = decode_logo(logo);
        let qr = if options.show_qr_code {
            Some(encode_qr(&encode_vcard(card))?.bitmap)
        } else {
            None
        };

        let front = face_rect(layout.front);
        let back = face_rect(layout.back);
        self.paint_front(&mut canvas, front, card, logo_image.as_ref());
        self.paint_back(&mut canvas, back, card, logo_image.as_ref(), qr.as_ref());

        Ok(canvas.into_image())
    }

    fn paint_front(
        &self,
        canvas: &mut Canvas,
        face: Rect,
        card: &CardData,
        logo: Option<&DynamicImage>,
    ) {
        canvas.fill_rounded_rect(face, CORNER_RADIUS, GRAY_100, 1.0);
        canvas.fill_rounded_rect(face.inset(1.0), CORNER_RADIUS - 1.0, WHITE, 1.0);

        let logo_box = Rect::new(face.x + (face.w - 128.0) / 2.0, face.y + 20.0, 128.0, 128.0);
        canvas.fill_rounded_rect(logo_box, 16.0, GRAY_100, 1.0);
        canvas.fill_rounded_rect(logo_box.inset(1.0), 15.0, WHITE, 1.0);
        let logo_area = logo_box.inset(16.0);

        match logo {
            Some(image) => {
                let dest = logo_area.fit(image.width(), image.height());
                canvas.draw_image(&image.to_rgba8(), dest, 1.0);
            }
            None => {
                canvas.fill_rounded_rect(logo_area, 8.0, GRAY_200, 1.0);
                draw_centered(
                    canvas,
                    self.font,
                    "No Logo Uploaded",
                    logo_area.x + logo_area.w / 2.0,
                    logo_area.y + 42.0,
                    8.0,
                    GRAY_400,
                    logo_area.w,
                );
            }
        }

        let font = self.font;
        let center = face.x + face.w / 2.0;
        let inner_width = face.w - 48.0;

        let company_y = face.y + 160.0;
        let tagline = card.tagline.to_uppercase();
        draw_centered(canvas, font, &card.company, center, company_y, 18.0, GRAY_800, inner_width);
        draw_centered(canvas, font, &tagline, center, company_y + 24.0, 10.0, RED_500, inner_width);

        if !card.description.is_empty() {
            let max = face.w * 0.8;
            for (i, line) in wrap_text(font, &card.description, 9.0, max, 2).iter().enumerate() {
                let line_y = 11.0f32.mul_add(i as f32, face.y + 200.0);
                draw_centered(canvas, font, line, center, line_y, 9.0, GRAY_500, max);
            }
        }
    }

    fn paint_back(
        &self,
        canvas: &mut Canvas,
        face: Rect,
        card: &CardData,
        logo: Option<&DynamicImage>,
        qr: Option<&GrayImage>,
    ) {
        canvas.fill_rounded_rect(face, CORNER_RADIUS, BACK_PURPLE, 1.0);

        // Dot pattern: one dot per 20 px tile.
        let mut y = face.y + 2.0;
        while y < face.y + face.h {
            let mut x = face.x + 2.0;
            while x < face.x + face.w {
                canvas.fill_circle(x, y, 1.0, WHITE, 0.1);
                x += 20.0;
            }
            y += 20.0;
        }

        if let Some(image) = logo {
            let area = Rect::new(face.x + (face.w - 200.0) / 2.0, face.y + 20.0, 200.0, 200.0);
            let dest = area.fit(image.width(), image.height());
            canvas.draw_image(&watermark(image), dest, 0.05);
        }

        let left = face.x + FACE_PADDING;
        canvas.fill_rounded_rect(Rect::new(left, face.y + 80.0, 48.0, 4.0), 2.0, YELLOW_400, 1.0);

        let qr_box = Rect::new(
            face.x + face.w - FACE_PADDING - QR_BOX,
            face.y + face.h - FACE_PADDING - QR_BOX,
            QR_BOX,
            QR_BOX,
        );
        if let Some(bitmap) = qr {
            canvas.fill_rounded_rect(qr_box, 8.0, WHITE, 1.0);
            canvas.draw_bitmap(bitmap, qr_box.inset(4.0));
        }

        let text_left = left + 28.0;
        let text_right = if qr.is_some() {
            qr_box.x - 8.0
        } else {
            face.x + face.w - FACE_PADDING
        };
        let text_width = text_right - text_left;

        let rows = [
            (face.y + 108.0, card.phone.as_str()),
            (face.y + 130.0, card.email.as_str()),
            (face.y + 152.0, card.website.as_str()),
        ];
        for (row_y, _) in rows {
            contact_icon(canvas, left, row_y);
        }
        if !card.address.is_empty() {
            contact_icon(canvas, left, face.y + 174.0);
        }

        let font = self.font;
        let name = truncate_to_width(font, &card.name, 20.0, face.w - 2.0 * FACE_PADDING);
        canvas.draw_text(font, &name, left, face.y + 30.0, 20.0, WHITE);
        let title_width = 2.0f32.mul_add(-FACE_PADDING, face.w);
        let title = truncate_to_width(font, &card.title.to_uppercase(), 12.0, title_width);
        canvas.draw_text(font, &title, left, face.y + 58.0, 12.0, YELLOW_400);

        for (row_y, value) in rows {
            let line = truncate_to_width(font, value, 10.0, text_width);
            canvas.draw_text(font, &line, text_left, row_y + 4.0, 10.0, WHITE);
        }

        if !card.address.is_empty() {
            for (i, line) in wrap_text(font, &card.address, 8.0, text_width, 3).iter().enumerate() {
                let line_y = 10.0f32.mul_add(i as f32, face.y + 176.0);
                canvas.draw_text(font, line, text_left, line_y, 8.0, WHITE);
            }
        }
    }
}

/// Draw one truncated line centered on `center_x`.
#[allow(clippy::too_many_arguments)]
fn draw_centered(
    canvas: &mut Canvas,
    font: &Font,
    text: &str,
    center_x: f32,
    y: f32,
    size: f32,
    color: Rgb<u8>,
    max_width: f32,
) {
    let line = truncate_to_width(font, text, size, max_width);
    let width = measure_text(font, &line, size);
    canvas.draw_text(font, &line, center_x - width / 2.0, y, size, color);
}

fn face_rect((x, y): (u32, u32)) -> Rect {
    Rect::new(x as f32, y as f32, CARD_WIDTH as f32, CARD_HEIGHT as f32)
}

/// Round icon badge in front of a contact row.
fn contact_icon(canvas: &mut Canvas, left: f32, row_y: f32) {
    canvas.fill_circle(left + 10.0, row_y + 10.0, 10.0, WHITE, 0.1);
    canvas.fill_circle(left + 10.0, row_y + 10.0, 3.0, YELLOW_400, 1.0);
}

fn watermark(image: &DynamicImage) -> RgbaImage {
    image.grayscale().to_rgba8()
}

/// Decode an inline logo for painting. URL logos and undecodable payloads
/// fall back to the placeholder panel.
fn decode_logo(logo: &Logo) -> Option<DynamicImage> {
    if !logo.is_inline() {
        return None;
    }
    let decoded = logo
        .decode_bytes()
        .ok()
        .and_then(|bytes| image::load_from_memory(&bytes).ok());
    if decoded.is_none() {
        tracing::warn!(logo = %logo, "Logo could not be decoded; painting placeholder");
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use image::codecs::png::PngEncoder;

    use crate::domain::CardField;
    use crate::infrastructure::discover_font;

    fn font() -> Font {
        discover_font(None).expect("a TrueType font for painter tests")
    }

    fn red_square_logo() -> Logo {
        let square = RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
        let mut png = Vec::new();
        square.write_with_encoder(PngEncoder::new(&mut png)).unwrap();
        Logo::from_bytes("image/png", &png)
    }

    #[test]
    fn test_sheet_layout_dimensions() {
        let row = SheetLayout::for_direction(Direction::Row);
        assert_eq!((row.width, row.height), (896, 304));
        assert_eq!(row.back, (464, 32));

        let column = SheetLayout::for_direction(Direction::Column);
        assert_eq!((column.width, column.height), (464, 576));
        assert_eq!(column.back, (32, 304));
    }

    #[test]
    fn test_paint_empty_card() {
        let font = font();
        let painter = CardPainter::new(&font, 3);
        let image = painter
            .paint(&CardData::default(), &Logo::placeholder(), ExportOptions::default())
            .unwrap();

        assert_eq!(image.dimensions(), (896 * 3, 304 * 3));
        // Back face body is purple.
        let back_center = image.get_pixel((464 + 200) * 3, (32 + 40) * 3);
        assert_eq!(back_center, &BACK_PURPLE);
    }

    #[test]
    fn test_paint_column_direction() {
        let options = ExportOptions {
            show_qr_code: false,
            direction: Direction::Column,
        };
        let font = font();
        let image = CardPainter::new(&font, 1)
            .paint(&CardData::sample(), &Logo::placeholder(), options)
            .unwrap();
        assert_eq!(image.dimensions(), (464, 576));
    }

    #[test]
    fn test_paint_draws_card_text() {
        let font = font();
        let painter = CardPainter::new(&font, 1);
        let blank = painter
            .paint(&CardData::default(), &Logo::placeholder(), ExportOptions::default())
            .unwrap();
        let named = painter
            .paint(
                &CardData::default().with_field(CardField::Name, "Frianti"),
                &Logo::placeholder(),
                ExportOptions::default(),
            )
            .unwrap();

        assert_ne!(blank, named);
    }

    #[test]
    fn test_paint_very_long_fields_quickly() {
        let font = font();
        let long = "x".repeat(100_000);
        let card = CardData::sample()
            .with_field(CardField::Name, long.as_str())
            .with_field(CardField::Description, long.as_str())
            .with_field(CardField::Address, long.as_str());

        // A record this large cannot be a QR symbol.
        let options = ExportOptions {
            show_qr_code: false,
            direction: Direction::Row,
        };

        let started = Instant::now();
        let image = CardPainter::new(&font, 1)
            .paint(&card, &Logo::placeholder(), options)
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(image.dimensions(), (896, 304));
    }

    #[test]
    fn test_inline_logo_is_drawn_on_front() {
        let options = ExportOptions {
            show_qr_code: false,
            direction: Direction::Row,
        };
        let font = font();
        let image = CardPainter::new(&font, 1)
            .paint(&CardData::default(), &red_square_logo(), options)
            .unwrap();

        // Center of the logo area on the front face.
        let pixel = image.get_pixel(32 + 200, 32 + 20 + 64);
        assert!(pixel.0[0] > 200 && pixel.0[1] < 60);
    }

    #[test]
    fn test_qr_box_only_when_enabled() {
        let card = CardData::sample();
        // Top-left corner of the white QR box, inset past the rounded corner.
        let probe = (464 + 400 - 32 - 72 + 6, 32 + 240 - 32 - 72 + 2);

        let font = font();
        let with_qr = CardPainter::new(&font, 1)
            .paint(&card, &Logo::placeholder(), ExportOptions::default())
            .unwrap();
        assert_eq!(with_qr.get_pixel(probe.0, probe.1), &WHITE);

        let options = ExportOptions {
            show_qr_code: false,
            ..ExportOptions::default()
        };
        let without_qr = CardPainter::new(&font, 1)
            .paint(&card, &Logo::placeholder(), options)
            .unwrap();
        assert_ne!(without_qr.get_pixel(probe.0, probe.1), &WHITE);
    }
}
