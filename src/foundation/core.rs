use crate::foundation::error::{ShowreelError, ShowreelResult};

/// Fixed output geometry shared by every prepared frame and the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Validate and build a canvas. Zero dimensions are rejected.
    pub fn new(width: u32, height: u32) -> ShowreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ShowreelError::configuration(format!(
                "canvas dimensions must be > 0, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length in bytes of one RGBA8 buffer at this geometry.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Output frame rate as a rational, e.g. 30000/1001 for NTSC rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator, frames.
    pub num: u32,
    /// Denominator, seconds. Must be > 0.
    pub den: u32,
}

impl Fps {
    /// Validate and build a frame rate. Zero numerator or denominator is rejected.
    pub fn new(num: u32, den: u32) -> ShowreelResult<Self> {
        if den == 0 {
            return Err(ShowreelError::configuration("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ShowreelError::configuration("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Millisecond timestamp at which output frame `index` is due, floored.
    /// Frame 0 is due at 0ms.
    pub fn frame_due_ms(self, index: u64) -> u64 {
        index * 1000 * u64::from(self.den) / u64::from(self.num)
    }

    /// Number of output frames due by `elapsed_ms` inclusive. Counts every
    /// index `i` with `frame_due_ms(i) <= elapsed_ms`, so frame 0 makes the
    /// count 1 at elapsed 0.
    pub fn frames_due_by_ms(self, elapsed_ms: u64) -> u64 {
        let per_sec = 1000 * u64::from(self.den);
        ((elapsed_ms + 1) * u64::from(self.num) + per_sec - 1) / per_sec
    }
}
