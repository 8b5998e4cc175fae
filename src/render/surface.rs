use crate::assets::frame::{DEFAULT_BACKGROUND, PreparedFrame};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::render::composite::blend_in_place;
use crate::render::overlay::{OverlayFont, OverlayStyle, draw_overlay};
use crate::scene::program::{FrameContent, FrameDescriptor};

/// Default width of the white band marking the wipe boundary.
pub const WIPE_DIVIDER_PX: u32 = 8;

/// Borrowed view of the surface pixels for one tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Opaque RGBA8 pixels, row-major.
    pub data: &'a [u8],
}

/// Reusable compositing target for one canvas geometry.
///
/// [`Surface::draw`] repaints the whole buffer from a descriptor, so the
/// buffer never carries state from one tick into the next.
#[derive(Debug)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
    font: Option<OverlayFont>,
    style: OverlayStyle,
    divider_px: u32,
}

impl Surface {
    /// Allocate a surface. Without a font, overlays are skipped.
    pub fn new(canvas: Canvas, font: Option<OverlayFont>, style: OverlayStyle) -> Self {
        Self {
            canvas,
            data: DEFAULT_BACKGROUND.repeat(canvas.pixel_count()),
            font,
            style,
            divider_px: WIPE_DIVIDER_PX,
        }
    }

    /// Width of the wipe divider band. Zero disables it.
    pub fn set_divider_px(&mut self, px: u32) {
        self.divider_px = px;
    }

    /// Surface geometry.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Composite one descriptor into the buffer, content first, then
    /// overlays in order.
    pub fn draw(&mut self, descriptor: &FrameDescriptor) -> ShowreelResult<()> {
        match &descriptor.content {
            FrameContent::Single { frame } => {
                self.check_frame(frame)?;
                self.data.copy_from_slice(frame.as_bytes());
            }
            FrameContent::Crossfade { under, over, alpha } => {
                self.check_frame(under)?;
                self.check_frame(over)?;
                self.data.copy_from_slice(under.as_bytes());
                blend_in_place(&mut self.data, over.as_bytes(), *alpha)?;
            }
            FrameContent::Wipe {
                before,
                after,
                boundary_px,
            } => {
                self.check_frame(before)?;
                self.check_frame(after)?;
                self.data.copy_from_slice(after.as_bytes());
                let boundary = (*boundary_px).min(self.canvas.width);
                if boundary > 0 {
                    let stride = self.canvas.width as usize * 4;
                    let left = boundary as usize * 4;
                    for (dst, src) in self
                        .data
                        .chunks_exact_mut(stride)
                        .zip(before.as_bytes().chunks_exact(stride))
                    {
                        dst[..left].copy_from_slice(&src[..left]);
                    }
                }
                self.draw_divider(boundary);
            }
        }

        if let Some(font) = &self.font {
            for overlay in &descriptor.overlays {
                draw_overlay(&mut self.data, self.canvas, font, &self.style, overlay);
            }
        }
        Ok(())
    }

    /// Borrow the buffer for encoding.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.canvas.width,
            height: self.canvas.height,
            data: &self.data,
        }
    }

    // Centered on the boundary, clipped to the canvas. Suppressed at the
    // rest positions so finished wipes show a clean frame.
    fn draw_divider(&mut self, boundary: u32) {
        if self.divider_px == 0 || boundary == 0 || boundary >= self.canvas.width {
            return;
        }
        let half = self.divider_px / 2;
        let start = boundary.saturating_sub(half);
        let end = (boundary + (self.divider_px - half)).min(self.canvas.width);
        let stride = self.canvas.width as usize * 4;
        let lo = start as usize * 4;
        let hi = end as usize * 4;
        for row in self.data.chunks_exact_mut(stride) {
            for px in row[lo..hi].chunks_exact_mut(4) {
                px.copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }

    fn check_frame(&self, frame: &PreparedFrame) -> ShowreelResult<()> {
        if frame.width() != self.canvas.width || frame.height() != self.canvas.height {
            return Err(ShowreelError::configuration(format!(
                "frame {}x{} does not match surface {}x{}",
                frame.width(),
                frame.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
