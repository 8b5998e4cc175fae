use crate::capture::codec::NegotiatedCodec;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::render::surface::FrameView;

/// Configuration handed to a [`StreamEncoder`] at the start of a recording.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Output geometry.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Target bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Negotiated codec and container.
    pub codec: NegotiatedCodec,
}

/// Encoder contract for consuming surface frames in timeline order.
///
/// Ordering contract: `push_frame` is called once per output frame, in
/// order, between one `begin` and one `finish`. `take_chunks` must never
/// block; implementations that encode out-of-process drain their output on
/// a separate thread and hand buffered chunks back here.
pub trait StreamEncoder: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: EncodeConfig) -> ShowreelResult<()>;
    /// Push one output frame.
    fn push_frame(&mut self, frame: FrameView<'_>) -> ShowreelResult<()>;
    /// Drain chunks emitted since the last call, without blocking.
    fn take_chunks(&mut self) -> Vec<Vec<u8>>;
    /// Called once after the last frame; returns any trailing chunks.
    fn finish(&mut self) -> ShowreelResult<Vec<Vec<u8>>>;
}

/// Deterministic in-memory encoder for tests and headless hosts.
///
/// Each pushed frame becomes one chunk holding a copy of the frame bytes,
/// so the finished artifact is the raw frame sequence.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncodeConfig>,
    pending: Vec<Vec<u8>>,
    frames_pushed: u64,
    emit_empty_chunks: bool,
}

impl InMemoryEncoder {
    /// Create an encoder with no captured state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit an empty chunk before each frame, exercising downstream
    /// non-empty filtering.
    pub fn with_empty_chunks(mut self) -> Self {
        self.emit_empty_chunks = true;
        self
    }

    /// Frames pushed since the last `begin`.
    pub fn frames_pushed(&self) -> u64 {
        self.frames_pushed
    }

    /// Configuration captured at `begin`, if any.
    pub fn config(&self) -> Option<&EncodeConfig> {
        self.cfg.as_ref()
    }
}

impl StreamEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncodeConfig) -> ShowreelResult<()> {
        self.cfg = Some(cfg);
        self.pending.clear();
        self.frames_pushed = 0;
        Ok(())
    }

    fn push_frame(&mut self, frame: FrameView<'_>) -> ShowreelResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(ShowreelError::configuration("encoder not started"));
        };
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(ShowreelError::recorder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        if frame.data.len() != cfg.canvas.byte_len() {
            return Err(ShowreelError::recorder(
                "frame byte length does not match width*height*4",
            ));
        }
        if self.emit_empty_chunks {
            self.pending.push(Vec::new());
        }
        self.pending.push(frame.data.to_vec());
        self.frames_pushed += 1;
        Ok(())
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.pending)
    }

    fn finish(&mut self) -> ShowreelResult<Vec<Vec<u8>>> {
        if self.cfg.take().is_none() {
            return Err(ShowreelError::configuration("encoder not started"));
        }
        Ok(std::mem::take(&mut self.pending))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/encoder.rs"]
mod tests;
