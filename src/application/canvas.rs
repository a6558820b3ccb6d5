//! Raster drawing primitives for the card painter.
//!
//! Coordinates are logical pixels; the canvas multiplies them by its
//! oversampling scale. All drawing clips silently at the canvas edges.

use fontdue::Font;
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage, RgbaImage};

use crate::domain::{AppError, Result};

/// Largest accepted canvas side in device pixels.
const MAX_SIDE_PX: u32 = 16_384;

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Shrink by `d` on every side.
    #[must_use]
    pub fn inset(self, d: f32) -> Self {
        Self::new(self.x + d, self.y + d, (self.w - 2.0 * d).max(0.0), (self.h - 2.0 * d).max(0.0))
    }

    /// Largest rectangle with the given aspect ratio centered inside `self`.
    #[must_use]
    pub fn fit(self, src_w: u32, src_h: u32) -> Self {
        if src_w == 0 || src_h == 0 {
            return self;
        }
        let ratio = (self.w / src_w as f32).min(self.h / src_h as f32);
        let w = src_w as f32 * ratio;
        let h = src_h as f32 * ratio;
        Self::new(self.x + (self.w - w) / 2.0, self.y + (self.h - h) / 2.0, w, h)
    }
}

/// An RGB canvas with an oversampling factor.
pub struct Canvas {
    image: RgbImage,
    scale: f32,
}

impl Canvas {
    /// Create a canvas of `width`×`height` logical pixels filled with `background`.
    ///
    /// # Errors
    /// Returns `Render` when the scaled size is zero or unreasonably large.
    pub fn new(width: u32, height: u32, scale: u32, background: Rgb<u8>) -> Result<Self> {
        let px_w = width.checked_mul(scale);
        let px_h = height.checked_mul(scale);
        match (px_w, px_h) {
            (Some(w), Some(h)) if w > 0 && h > 0 && w <= MAX_SIDE_PX && h <= MAX_SIDE_PX => Ok(Self {
                image: RgbImage::from_pixel(w, h, background),
                scale: scale as f32,
            }),
            _ => Err(AppError::render(format!(
                "Cannot allocate a {width}x{height} canvas at scale {scale}"
            ))),
        }
    }

    /// Finish drawing.
    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Fill a rectangle with rounded corners. Edge pixels are blended by
    /// their approximate coverage.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgb<u8>, alpha: f32) {
        let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
        let (half_w, half_h) = (rect.w / 2.0, rect.h / 2.0);
        let (mid_x, mid_y) = (rect.x + half_w, rect.y + half_h);
        let (x0, y0, x1, y1) = self.covering_bounds(rect);

        for py in y0..y1 {
            for px in x0..x1 {
                let lx = (px as f32 + 0.5) / self.scale;
                let ly = (py as f32 + 0.5) / self.scale;
                // Signed distance to the outline, negative inside.
                let qx = (lx - mid_x).abs() - (half_w - r);
                let qy = (ly - mid_y).abs() - (half_h - r);
                let outside = qx.max(0.0).hypot(qy.max(0.0));
                let inside = qx.max(qy).min(0.0);
                let distance = (outside + inside - r) * self.scale;

                let coverage = (0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(px, py, color, alpha * coverage);
                }
            }
        }
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb<u8>, alpha: f32) {
        let rect = Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        self.fill_rounded_rect(rect, radius, color, alpha);
    }

    /// Draw an RGBA image stretched into `dest`.
    pub fn draw_image(&mut self, src: &RgbaImage, dest: Rect, opacity: f32) {
        let (x0, y0, x1, y1) = self.pixel_bounds(dest);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let resized = imageops::resize(src, x1 - x0, y1 - y0, FilterType::Triangle);

        for (dx, dy, pixel) in resized.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = f32::from(a) / 255.0 * opacity;
            if alpha > 0.0 {
                self.blend(x0 + dx, y0 + dy, Rgb([r, g, b]), alpha);
            }
        }
    }

    /// Draw a grayscale bitmap without smoothing (keeps QR modules crisp).
    pub fn draw_bitmap(&mut self, src: &GrayImage, dest: Rect) {
        let (x0, y0, x1, y1) = self.pixel_bounds(dest);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let resized = imageops::resize(src, x1 - x0, y1 - y0, FilterType::Nearest);

        for (dx, dy, pixel) in resized.enumerate_pixels() {
            let v = pixel.0[0];
            self.blend(x0 + dx, y0 + dy, Rgb([v, v, v]), 1.0);
        }
    }

    /// Draw a single line of text with its top edge at `y`. Returns the
    /// advance in logical pixels.
    pub fn draw_text(
        &mut self,
        font: &Font,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Rgb<u8>,
    ) -> f32 {
        let px_size = size * self.scale;
        let ascent = font
            .horizontal_line_metrics(px_size)
            .map_or(px_size * 0.8, |m| m.ascent);
        let baseline = y * self.scale + ascent;
        let mut pen = x * self.scale;

        for ch in text.chars() {
            let (metrics, coverage) = font.rasterize(ch, px_size);
            let gx = pen.round() as i64 + i64::from(metrics.xmin);
            let gy = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i64;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let c = coverage[row * metrics.width + col];
                    if c == 0 {
                        continue;
                    }
                    let (px, py) = (gx + col as i64, gy + row as i64);
                    if px >= 0 && py >= 0 {
                        self.blend(px as u32, py as u32, color, f32::from(c) / 255.0);
                    }
                }
            }
            pen += metrics.advance_width;
        }

        pen / self.scale - x
    }

    /// Device-pixel bounds of `rect`, clipped to the canvas.
    fn pixel_bounds(&self, rect: Rect) -> (u32, u32, u32, u32) {
        let clip = |v: f32, max: u32| (v * self.scale).round().clamp(0.0, max as f32) as u32;
        let (w, h) = self.image.dimensions();
        (
            clip(rect.x, w),
            clip(rect.y, h),
            clip(rect.x + rect.w, w),
            clip(rect.y + rect.h, h),
        )
    }

    /// Device-pixel bounds touching `rect` at all, clipped to the canvas.
    fn covering_bounds(&self, rect: Rect) -> (u32, u32, u32, u32) {
        let (w, h) = self.image.dimensions();
        let lo = |v: f32, max: u32| (v * self.scale).floor().clamp(0.0, max as f32) as u32;
        let hi = |v: f32, max: u32| (v * self.scale).ceil().clamp(0.0, max as f32) as u32;
        (
            lo(rect.x, w),
            lo(rect.y, h),
            hi(rect.x + rect.w, w),
            hi(rect.y + rect.h, h),
        )
    }

    fn blend(&mut self, px: u32, py: u32, color: Rgb<u8>, alpha: f32) {
        if px >= self.image.width() || py >= self.image.height() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let dst = self.image.get_pixel_mut(px, py);
        for i in 0..3 {
            let mixed = f32::from(dst.0[i]).mul_add(1.0 - a, f32::from(color.0[i]) * a);
            dst.0[i] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Width of `text` at `size` logical pixels.
#[must_use]
pub fn measure_text(font: &Font, text: &str, size: f32) -> f32 {
    text.chars().map(|ch| font.metrics(ch, size).advance_width).sum()
}

const ELLIPSIS: &str = "…";

/// Shorten `text` with an ellipsis until it fits in `max_width`.
///
/// Stops reading as soon as the text is known to overflow, so the cost is
/// bounded by what fits rather than by the length of `text`.
#[must_use]
pub fn truncate_to_width(font: &Font, text: &str, size: f32, max_width: f32) -> String {
    let budget = max_width - measure_text(font, ELLIPSIS, size);
    let mut width = 0.0;
    let mut cut = None;

    for (i, ch) in text.char_indices() {
        let advance = font.metrics(ch, size).advance_width;
        if cut.is_none() && width + advance > budget {
            cut = Some(i);
        }
        width += advance;
        if width > max_width {
            return match cut {
                Some(end) if budget >= 0.0 => format!("{}{ELLIPSIS}", text[..end].trim_end()),
                _ => String::new(),
            };
        }
    }
    text.to_string()
}

/// Greedy word wrap into at most `max_lines` lines; the last line is
/// truncated when text remains.
#[must_use]
pub fn wrap_text(font: &Font, text: &str, size: f32, max_width: f32, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if max_lines == 0 {
        return lines;
    }
    let space = font.metrics(' ', size).advance_width;

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0.0;
        for word in paragraph.split_whitespace() {
            let word_width = measure_text(font, word, size);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.len() > max_lines {
        let rest = lines.split_off(max_lines - 1).join(" ");
        lines.push(rest);
    }
    lines
        .into_iter()
        .map(|line| truncate_to_width(font, &line, size, max_width))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::infrastructure::discover_font;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn font() -> Font {
        discover_font(None).expect("a TrueType font for text tests")
    }

    #[test]
    fn test_canvas_is_scaled() {
        let canvas = Canvas::new(10, 5, 3, WHITE).unwrap();
        assert_eq!(canvas.into_image().dimensions(), (30, 15));
    }

    #[test]
    fn test_canvas_rejects_zero_and_huge() {
        assert!(Canvas::new(10, 10, 0, WHITE).is_err());
        assert!(Canvas::new(100_000, 10, 3, WHITE).is_err());
    }

    #[test]
    fn test_rounded_rect_leaves_corners() {
        let mut canvas = Canvas::new(20, 20, 1, WHITE).unwrap();
        canvas.fill_rounded_rect(Rect::new(0.0, 0.0, 20.0, 20.0), 8.0, BLACK, 1.0);
        let image = canvas.into_image();

        assert_eq!(image.get_pixel(0, 0), &WHITE);
        assert_eq!(image.get_pixel(10, 10), &BLACK);
        assert_eq!(image.get_pixel(10, 0), &BLACK);
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut canvas = Canvas::new(4, 4, 1, WHITE).unwrap();
        canvas.fill_rounded_rect(Rect::new(0.0, 0.0, 4.0, 4.0), 0.0, BLACK, 0.5);
        let image = canvas.into_image();
        let v = image.get_pixel(1, 1).0[0];
        assert!((126..=129).contains(&v));
    }

    #[test]
    fn test_draw_bitmap_clips_at_edge() {
        let mut canvas = Canvas::new(10, 10, 2, WHITE).unwrap();
        let bitmap = GrayImage::from_pixel(4, 4, image::Luma([0]));
        canvas.draw_bitmap(&bitmap, Rect::new(6.0, 6.0, 8.0, 8.0));
        let image = canvas.into_image();

        assert_eq!(image.get_pixel(19, 19), &BLACK);
        assert_eq!(image.get_pixel(0, 0), &WHITE);
    }

    #[test]
    fn test_circle_edge_is_antialiased() {
        let mut canvas = Canvas::new(20, 20, 1, WHITE).unwrap();
        canvas.fill_circle(10.0, 10.0, 6.0, BLACK, 1.0);
        let image = canvas.into_image();

        assert_eq!(image.get_pixel(10, 10), &BLACK);
        assert_eq!(image.get_pixel(1, 1), &WHITE);
        // Pixel centers near the outline are partially covered.
        let edge = (0..20)
            .map(|x| image.get_pixel(x, 10).0[0])
            .filter(|v| *v > 0 && *v < 255)
            .count();
        assert!(edge > 0);
    }

    #[test]
    fn test_truncate_fits_and_ends_with_ellipsis() {
        let font = font();
        assert_eq!(truncate_to_width(&font, "short", 10.0, 200.0), "short");

        let cut = truncate_to_width(&font, "a fairly long company name", 10.0, 60.0);
        assert!(cut.ends_with(ELLIPSIS));
        assert!(measure_text(&font, &cut, 10.0) <= 60.0);

        assert_eq!(truncate_to_width(&font, "anything", 10.0, 0.5), "");
    }

    #[test]
    fn test_truncate_huge_text_is_fast() {
        let font = font();
        let text = "x".repeat(1_000_000);

        let started = Instant::now();
        let cut = truncate_to_width(&font, &text, 20.0, 336.0);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(cut.len() < 200);
    }

    #[test]
    fn test_wrap_text_limits_lines() {
        let font = font();
        let text = "word ".repeat(50_000);

        let started = Instant::now();
        let lines = wrap_text(&font, &text, 9.0, 320.0, 2);
        assert!(started.elapsed() < Duration::from_secs(5));

        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(ELLIPSIS));
        assert!(lines.iter().all(|l| measure_text(&font, l, 9.0) <= 320.0));
    }

    #[test]
    fn test_rect_fit_keeps_aspect() {
        let fitted = Rect::new(0.0, 0.0, 100.0, 100.0).fit(200, 100);
        assert_eq!(fitted, Rect::new(0.0, 25.0, 100.0, 50.0));
    }
}
