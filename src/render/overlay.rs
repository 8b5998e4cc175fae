use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};

use crate::foundation::core::Canvas;
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::foundation::math::{mul_div255, unit_to_u8};
use crate::render::composite::over;
use crate::scene::program::{Overlay, OverlayAnchor, OverlayRole};

/// A parsed font face for overlay text. Cheap to clone, the face data is
/// shared.
#[derive(Clone)]
pub struct OverlayFont {
    face: FontArc,
}

impl OverlayFont {
    /// Parse a TTF/OTF face from owned bytes.
    pub fn from_vec(bytes: Vec<u8>) -> ShowreelResult<Self> {
        let face = FontArc::try_from_vec(bytes)
            .map_err(|err| ShowreelError::configuration(format!("unusable font: {err}")))?;
        Ok(Self { face })
    }

    /// Read and parse a font file.
    pub fn from_file(path: impl AsRef<Path>) -> ShowreelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            ShowreelError::configuration(format!("font {} unreadable: {err}", path.display()))
        })?;
        Self::from_vec(bytes)
    }
}

impl fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayFont").finish_non_exhaustive()
    }
}

/// Sizing and opacity for rasterized overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Pixel height of label text.
    pub label_px: f32,
    /// Pixel height of watermark text.
    pub watermark_px: f32,
    /// Inset from the anchored canvas edges, in pixels.
    pub margin_px: u32,
    /// Label opacity in `[0, 1]`.
    pub label_opacity: f64,
    /// Watermark opacity in `[0, 1]`.
    pub watermark_opacity: f64,
    /// Straight RGB text color.
    pub color: [u8; 3],
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            label_px: 42.0,
            watermark_px: 36.0,
            margin_px: 60,
            label_opacity: 0.95,
            watermark_opacity: 0.6,
            color: [255, 255, 255],
        }
    }
}

/// Rasterize one overlay string onto an opaque RGBA8 surface buffer.
///
/// Glyph coverage becomes the source alpha of a premultiplied source-over,
/// scaled by the role opacity, so the buffer stays fully opaque. Pixels
/// falling outside the canvas are clipped.
pub(crate) fn draw_overlay(
    data: &mut [u8],
    canvas: Canvas,
    font: &OverlayFont,
    style: &OverlayStyle,
    overlay: &Overlay,
) {
    debug_assert_eq!(data.len(), canvas.byte_len());
    if overlay.text.is_empty() {
        return;
    }

    let (px, opacity) = match overlay.role {
        OverlayRole::Label => (style.label_px, style.label_opacity),
        OverlayRole::Watermark => (style.watermark_px, style.watermark_opacity),
    };
    let scaled = font.face.as_scaled(PxScale::from(px));
    let margin = style.margin_px as f32;
    let text_width = advance_width(&scaled, &overlay.text);

    // `descent()` is negative, so the bottom-right baseline sits above the
    // margin line by exactly the descender depth.
    let (left, baseline) = match overlay.anchor {
        OverlayAnchor::TopLeft => (margin, margin + scaled.ascent()),
        OverlayAnchor::TopRight => (
            canvas.width as f32 - margin - text_width,
            margin + scaled.ascent(),
        ),
        OverlayAnchor::BottomRight => (
            canvas.width as f32 - margin - text_width,
            canvas.height as f32 - margin + scaled.descent(),
        ),
    };

    let width = i64::from(canvas.width);
    let height = i64::from(canvas.height);
    let mut caret = left;
    let mut previous = None;
    for ch in overlay.text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let advance = scaled.h_advance(id);
        let mut glyph = scaled.scaled_glyph(ch);
        glyph.position = point(caret, baseline);
        caret += advance;
        previous = Some(id);

        let Some(outline) = font.face.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outline.px_bounds();
        outline.draw(|gx, gy, coverage| {
            let x = (bounds.min.x + gx as f32) as i64;
            let y = (bounds.min.y + gy as f32) as i64;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let sa = unit_to_u8(f64::from(coverage));
            if sa == 0 {
                return;
            }
            let src = [
                mul_div255(u16::from(style.color[0]), sa),
                mul_div255(u16::from(style.color[1]), sa),
                mul_div255(u16::from(style.color[2]), sa),
                sa as u8,
            ];
            let idx = (y as usize * width as usize + x as usize) * 4;
            let dst = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
            data[idx..idx + 4].copy_from_slice(&over(dst, src, opacity));
        });
    }
}

/// Kerned advance width of `text`, for right-aligned anchors.
fn advance_width<F, SF>(scaled: &SF, text: &str) -> f32
where
    F: Font,
    SF: ScaleFont<F>,
{
    let mut width = 0.0;
    let mut previous = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
