use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::{ImageSource, decode_image};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::foundation::math::mul_div255;

/// Opaque fill drawn behind every prepared frame, so rounding in the
/// cover-fit blit can never leave a transparent gap.
pub const DEFAULT_BACKGROUND: [u8; 4] = [17, 24, 39, 255];

/// Cover-fit placement of a source image inside a target canvas.
///
/// The drawn rectangle always covers the full target: one axis matches the
/// target exactly, the other overshoots and is cropped symmetrically, so
/// offsets are zero or negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverFit {
    /// Scaled source width in pixels.
    pub draw_w: u32,
    /// Scaled source height in pixels.
    pub draw_h: u32,
    /// X of the drawn rectangle's left edge relative to the target.
    pub offset_x: i32,
    /// Y of the drawn rectangle's top edge relative to the target.
    pub offset_y: i32,
}

/// Compute cover-fit geometry for a `src_w x src_h` image drawn into a
/// `target_w x target_h` canvas.
///
/// If the source is proportionally wider than the target, the drawn height
/// matches the target and the width overshoot is cropped left/right;
/// otherwise the drawn width matches and the height overshoot is cropped
/// top/bottom. No letterboxing, no distortion.
pub fn cover_fit(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> CoverFit {
    // image_aspect > target_aspect, compared exactly via cross-multiplication.
    let wider = u64::from(src_w) * u64::from(target_h) > u64::from(target_w) * u64::from(src_h);

    if wider {
        let draw_w = (f64::from(src_w) * f64::from(target_h) / f64::from(src_h)).round() as u32;
        let draw_w = draw_w.max(target_w);
        CoverFit {
            draw_w,
            draw_h: target_h,
            offset_x: ((i64::from(target_w) - i64::from(draw_w)) / 2) as i32,
            offset_y: 0,
        }
    } else {
        let draw_h = (f64::from(src_h) * f64::from(target_w) / f64::from(src_w)).round() as u32;
        let draw_h = draw_h.max(target_h);
        CoverFit {
            draw_w: target_w,
            draw_h,
            offset_x: 0,
            offset_y: ((i64::from(target_h) - i64::from(draw_h)) / 2) as i32,
        }
    }
}

/// An immutable frame rasterized to exact canvas dimensions, fully opaque.
///
/// Prepared once per source image when a render starts, shared read-only for
/// the lifetime of that render, and discarded when the render completes or
/// is superseded. Compositing never rescales one of these.
#[derive(Clone, Debug)]
pub struct PreparedFrame {
    width: u32,
    height: u32,
    /// Straight RGBA8, row-major, tightly packed, alpha 255 everywhere.
    rgba8: Arc<Vec<u8>>,
}

impl PreparedFrame {
    /// Wrap an existing RGBA8 buffer. The buffer must match the canvas byte
    /// length and be fully opaque.
    pub fn from_rgba8(canvas: Canvas, rgba8: Vec<u8>) -> ShowreelResult<Self> {
        if rgba8.len() != canvas.byte_len() {
            return Err(ShowreelError::configuration(format!(
                "prepared frame buffer is {} bytes, canvas {}x{} needs {}",
                rgba8.len(),
                canvas.width,
                canvas.height,
                canvas.byte_len()
            )));
        }
        if rgba8.chunks_exact(4).any(|px| px[3] != 255) {
            return Err(ShowreelError::configuration(
                "prepared frame buffers must be fully opaque",
            ));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// A frame filled with one opaque color.
    pub fn solid(canvas: Canvas, rgb: [u8; 3]) -> Self {
        let px = [rgb[0], rgb[1], rgb[2], 255];
        Self {
            width: canvas.width,
            height: canvas.height,
            rgba8: Arc::new(px.repeat(canvas.pixel_count())),
        }
    }

    /// Frame width in pixels. Always equals the render canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels. Always equals the render canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba8
    }
}

/// Decode one source and rasterize it into a [`PreparedFrame`] at canvas
/// dimensions using cover-fit placement over an opaque background.
pub fn prepare_frame(
    source: &ImageSource,
    canvas: Canvas,
    background: [u8; 4],
) -> ShowreelResult<PreparedFrame> {
    let decoded = decode_image(source)?;
    let fit = cover_fit(decoded.width, decoded.height, canvas.width, canvas.height);

    let src = image::RgbaImage::from_raw(decoded.width, decoded.height, decoded.rgba8)
        .ok_or_else(|| ShowreelError::image_load(format!("decode {}: raw buffer size mismatch", source.label())))?;
    let scaled = if (fit.draw_w, fit.draw_h) == (decoded.width, decoded.height) {
        src
    } else {
        image::imageops::resize(&src, fit.draw_w, fit.draw_h, image::imageops::FilterType::Triangle)
    };

    let bg = [background[0], background[1], background[2], 255];
    let mut out = bg.repeat(canvas.pixel_count());
    blit_over_background(&mut out, canvas, &scaled, fit, bg);

    Ok(PreparedFrame {
        width: canvas.width,
        height: canvas.height,
        rgba8: Arc::new(out),
    })
}

/// Prepare every source before any recording starts. Sources decode in
/// parallel; the first failure aborts the batch.
#[tracing::instrument(skip(sources), fields(sources = sources.len()))]
pub fn prepare_frames(
    sources: &[ImageSource],
    canvas: Canvas,
    background: [u8; 4],
) -> ShowreelResult<Vec<PreparedFrame>> {
    let frames = sources
        .par_iter()
        .map(|source| prepare_frame(source, canvas, background))
        .collect::<ShowreelResult<Vec<_>>>()?;
    tracing::debug!(frames = frames.len(), "prepared frames");
    Ok(frames)
}

fn blit_over_background(
    out: &mut [u8],
    canvas: Canvas,
    scaled: &image::RgbaImage,
    fit: CoverFit,
    bg: [u8; 4],
) {
    let draw_w = i64::from(fit.draw_w);
    let draw_h = i64::from(fit.draw_h);
    let src = scaled.as_raw();

    for ty in 0..i64::from(canvas.height) {
        let sy = ty - i64::from(fit.offset_y);
        if sy < 0 || sy >= draw_h {
            continue;
        }
        let out_row = &mut out[(ty as usize * canvas.width as usize * 4)..][..canvas.width as usize * 4];
        let src_row = &src[(sy as usize * fit.draw_w as usize * 4)..][..fit.draw_w as usize * 4];

        for tx in 0..i64::from(canvas.width) {
            let sx = tx - i64::from(fit.offset_x);
            if sx < 0 || sx >= draw_w {
                continue;
            }
            let px = &src_row[(sx as usize * 4)..][..4];
            let dst = &mut out_row[(tx as usize * 4)..][..4];
            let a = px[3];
            if a == 255 {
                dst.copy_from_slice(px);
            } else {
                // Flatten straight-alpha source pixels over the opaque background.
                let ia = u16::from(255 - a);
                for c in 0..3 {
                    dst[c] = mul_div255(u16::from(px[c]), u16::from(a))
                        .saturating_add(mul_div255(u16::from(bg[c]), ia));
                }
                dst[3] = 255;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frame.rs"]
mod tests;
