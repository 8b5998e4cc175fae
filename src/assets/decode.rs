use std::path::PathBuf;

use crate::foundation::error::{ShowreelError, ShowreelResult};

/// Caller-owned handle to one source image. Dimensions are unknown until
/// decoded; the engine only borrows a source during frame preparation.
///
/// Remote sources are the caller's concern: fetch first, pass `Bytes`.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Encoded image bytes already in memory (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// Path to an encoded image on disk.
    Path(PathBuf),
}

impl ImageSource {
    /// Short description used in load error messages.
    pub fn label(&self) -> String {
        match self {
            Self::Bytes(bytes) => format!("{} in-memory bytes", bytes.len()),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

/// Raw decoded pixels, straight (non-premultiplied) RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// Tightly packed straight RGBA8.
    pub rgba8: Vec<u8>,
}

/// Decode a source image to straight RGBA8.
///
/// Fails with [`ShowreelError::ImageLoad`] when the source cannot be read or
/// its format cannot be decoded.
pub fn decode_image(source: &ImageSource) -> ShowreelResult<DecodedImage> {
    let owned;
    let bytes: &[u8] = match source {
        ImageSource::Bytes(bytes) => bytes,
        ImageSource::Path(path) => {
            owned = std::fs::read(path).map_err(|err| {
                ShowreelError::image_load(format!("read {}: {err}", path.display()))
            })?;
            &owned
        }
    };

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|err| ShowreelError::image_load(format!("decode {}: {err}", source.label())))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ShowreelError::image_load(format!(
            "decode {}: image has zero dimension",
            source.label()
        )));
    }

    Ok(DecodedImage {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
