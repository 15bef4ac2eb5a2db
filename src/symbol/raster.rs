//! Rasterisation of encoded symbols and PNG output.
//!
//! Encoders produce either a row of bar modules (linear symbologies) or a
//! square matrix of modules (QR). Both are painted here onto an RGBA canvas
//! and written out as PNG.

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};

use super::font::{glyph, text_width, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};
use crate::error::EncodeError;

/// Visual parameters for a linear barcode.
#[derive(Debug, Clone)]
pub struct BarStyle {
    /// Width of one module in pixels
    pub module_width: u32,

    /// Height of the bars in pixels
    pub module_height: u32,

    /// Blank pixels on each side of the bars
    pub quiet_zone: u32,

    /// Caption line height in pixels
    pub font_size: u32,

    /// Gap between the bars and the caption in pixels
    pub text_distance: u32,

    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,

    /// Human-readable text drawn under the bars, if any
    pub caption: Option<String>,

    /// Centre the caption instead of aligning it with the first bar
    pub center_text: bool,
}

/// Check a canvas size against the configured limit.
pub fn check_dimensions(width: u64, height: u64, max: u32) -> Result<(u32, u32), EncodeError> {
    if width == 0 || height == 0 || width > u64::from(max) || height > u64::from(max) {
        return Err(EncodeError::ImageTooLarge { width, height, max });
    }
    Ok((width as u32, height as u32))
}

/// Paint a row of modules (1 = bar, 0 = space) with an optional caption.
pub fn render_bars(
    modules: &[u8],
    style: &BarStyle,
    max_dimension: u32,
) -> Result<RgbaImage, EncodeError> {
    let module_width = u64::from(style.module_width);
    let quiet = u64::from(style.quiet_zone);
    let bars_width = modules.len() as u64 * module_width + 2 * quiet;

    let caption = style.caption.as_deref().filter(|text| !text.is_empty());
    let scale = (style.font_size / (GLYPH_HEIGHT + 2)).max(1);
    let (text_px, caption_height) = match caption {
        Some(text) => (
            u64::from(text_width(text)) * u64::from(scale),
            u64::from(style.text_distance) + u64::from((GLYPH_HEIGHT + 2) * scale),
        ),
        None => (0, 0),
    };

    let width = bars_width.max(text_px + 2 * u64::from(scale));
    let height = u64::from(style.module_height) + caption_height;
    let (width, height) = check_dimensions(width, height, max_dimension)?;

    let mut canvas = RgbaImage::from_pixel(width, height, style.background);

    let x0 = (u64::from(width) - bars_width) / 2;
    for (i, _) in modules.iter().enumerate().filter(|(_, m)| **m == 1) {
        let x = x0 + quiet + i as u64 * module_width;
        fill_rect(
            &mut canvas,
            x as u32,
            0,
            style.module_width,
            style.module_height,
            style.foreground,
        );
    }

    if let Some(text) = caption {
        let y = style.module_height + style.text_distance;
        // Left-aligned captions start at the first bar but never run off the canvas
        let x = if style.center_text {
            (u64::from(width) - text_px) / 2
        } else {
            (x0 + quiet).min(u64::from(width) - text_px)
        };
        draw_text(&mut canvas, text, x as u32, y, scale, style.foreground);
    }

    Ok(canvas)
}

/// Paint a square module matrix, `border` modules of quiet zone on each side.
pub fn render_matrix<F>(
    modules_per_side: usize,
    is_dark: F,
    box_size: u32,
    border: u32,
    fill: Rgba<u8>,
    back: Rgba<u8>,
    max_dimension: u32,
) -> Result<RgbaImage, EncodeError>
where
    F: Fn(usize, usize) -> bool,
{
    let side = (modules_per_side as u64 + 2 * u64::from(border)) * u64::from(box_size);
    let (side, _) = check_dimensions(side, side, max_dimension)?;

    let mut canvas = RgbaImage::from_pixel(side, side, back);
    for y in 0..modules_per_side {
        for x in 0..modules_per_side {
            if is_dark(x, y) {
                fill_rect(
                    &mut canvas,
                    (x as u32 + border) * box_size,
                    (y as u32 + border) * box_size,
                    box_size,
                    box_size,
                    fill,
                );
            }
        }
    }

    Ok(canvas)
}

/// Encode a canvas as PNG.
pub fn encode_png(canvas: &RgbaImage) -> Result<Bytes, EncodeError> {
    let mut output = Cursor::new(Vec::new());
    canvas.write_to(&mut output, ImageFormat::Png)?;
    Ok(Bytes::from(output.into_inner()))
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn draw_text(canvas: &mut RgbaImage, text: &str, x: u32, y: u32, scale: u32, color: Rgba<u8>) {
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    for (i, c) in text.chars().enumerate() {
        let gx = x + i as u32 * advance;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    fill_rect(
                        canvas,
                        gx + col * scale,
                        y + row as u32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }
}
