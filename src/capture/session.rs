use std::sync::Arc;

use crate::capture::codec::{CodecCandidate, CodecProbe, ContainerFormat, NegotiatedCodec, negotiate};
use crate::capture::encoder::{EncodeConfig, StreamEncoder};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::render::surface::FrameView;

/// Lifecycle of one recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// Built, codec not yet negotiated.
    Idle,
    /// Codec negotiated, encoder not yet started.
    Armed,
    /// Encoder accepting frames.
    Recording,
    /// Stop accepted, artifact being assembled.
    Finalizing,
    /// Artifact available.
    Ready,
    /// Terminal failure; accumulated chunks were discarded.
    Failed,
}

/// Finished recording: one contiguous byte buffer plus its container tag.
///
/// Cheap to clone; the bytes are shared.
#[derive(Clone, Debug)]
pub struct MediaArtifact {
    /// Encoder output chunks concatenated in emission order.
    pub data: Arc<Vec<u8>>,
    /// Container the bytes are laid out in.
    pub container: ContainerFormat,
    /// Negotiated codec identifier, when one was negotiated.
    pub codec_id: Option<String>,
}

impl MediaArtifact {
    /// Artifact size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the encoder emitted no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Recording state machine: negotiates a codec, paces surface frames into
/// the encoder, accumulates non-empty chunks, and assembles the artifact on
/// stop.
///
/// The pacing contract makes output length independent of how often the
/// driver ticks: output frame `i` is due at `frame_due_ms(i)`, and each
/// [`CaptureSession::capture_frame`] call pushes the current surface once
/// per due frame not yet pushed, duplicating or skipping as the tick rate
/// demands.
pub struct CaptureSession {
    state: CaptureState,
    canvas: Canvas,
    fps: Fps,
    bitrate_bps: u64,
    codec: Option<NegotiatedCodec>,
    encoder: Box<dyn StreamEncoder>,
    chunks: Vec<Vec<u8>>,
    frames_pushed: u64,
    artifact: Option<MediaArtifact>,
}

impl CaptureSession {
    /// Build an idle session around an injected encoder.
    pub fn new(canvas: Canvas, fps: Fps, bitrate_bps: u64, encoder: Box<dyn StreamEncoder>) -> Self {
        Self {
            state: CaptureState::Idle,
            canvas,
            fps,
            bitrate_bps,
            codec: None,
            encoder,
            chunks: Vec::new(),
            frames_pushed: 0,
            artifact: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Negotiated codec, once armed.
    pub fn codec(&self) -> Option<&NegotiatedCodec> {
        self.codec.as_ref()
    }

    /// Output frames pushed to the encoder so far.
    pub fn frames_pushed(&self) -> u64 {
        self.frames_pushed
    }

    /// The finished artifact, once Ready.
    pub fn artifact(&self) -> Option<&MediaArtifact> {
        self.artifact.as_ref()
    }

    /// Negotiate a codec against the probe. Idle → Armed.
    ///
    /// Negotiation itself cannot fail: an unsupported preference list falls
    /// back to the encoder default.
    pub fn arm(
        &mut self,
        candidates: &[CodecCandidate],
        probe: &dyn CodecProbe,
    ) -> ShowreelResult<()> {
        if self.state != CaptureState::Idle {
            return Err(ShowreelError::configuration(format!(
                "arm called in {:?} state",
                self.state
            )));
        }
        let picked = negotiate(candidates, probe);
        tracing::debug!(id = ?picked.id, container = ?picked.container, "codec negotiated");
        self.codec = Some(picked);
        self.state = CaptureState::Armed;
        Ok(())
    }

    /// Start the encoder. Armed → Recording.
    pub fn start(&mut self) -> ShowreelResult<()> {
        if self.state != CaptureState::Armed {
            return Err(ShowreelError::configuration(format!(
                "start called in {:?} state",
                self.state
            )));
        }
        // Pacing divides by `num`, so a literal-built Fps is checked here.
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ShowreelError::configuration("fps must be non-zero"));
        }
        let Some(codec) = self.codec.clone() else {
            return Err(ShowreelError::configuration("start without negotiated codec"));
        };
        let cfg = EncodeConfig {
            canvas: self.canvas,
            fps: self.fps,
            bitrate_bps: self.bitrate_bps,
            codec,
        };
        if let Err(err) = self.encoder.begin(cfg) {
            return Err(self.fail(err));
        }
        self.chunks.clear();
        self.frames_pushed = 0;
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Pace the current surface into the encoder for `elapsed_ms`, then
    /// drain and accumulate any non-empty chunks.
    ///
    /// An encoder error is fatal: the session moves to Failed and discards
    /// everything accumulated, so no partial artifact can surface as Ready.
    pub fn capture_frame(&mut self, frame: FrameView<'_>, elapsed_ms: u64) -> ShowreelResult<()> {
        if self.state != CaptureState::Recording {
            return Err(ShowreelError::configuration(format!(
                "capture_frame called in {:?} state",
                self.state
            )));
        }
        while self.fps.frame_due_ms(self.frames_pushed) <= elapsed_ms {
            if let Err(err) = self.encoder.push_frame(frame) {
                return Err(self.fail(err));
            }
            self.frames_pushed += 1;
        }
        let chunks = self.encoder.take_chunks();
        self.accumulate(chunks);
        Ok(())
    }

    /// Finalize the recording. Recording → Finalizing → Ready.
    ///
    /// Calling stop in any state other than Recording is a no-op, which
    /// makes the natural-completion and teardown paths safe to race.
    /// Stopping before any frame was pushed violates draw-before-stop
    /// ordering and fails the session.
    pub fn stop(&mut self) -> ShowreelResult<()> {
        if self.state != CaptureState::Recording {
            return Ok(());
        }
        if self.frames_pushed == 0 {
            return Err(self.fail(ShowreelError::configuration(
                "stop called before any frame was captured",
            )));
        }
        self.state = CaptureState::Finalizing;

        match self.encoder.finish() {
            Ok(trailing) => self.accumulate(trailing),
            Err(err) => {
                return Err(self.fail(ShowreelError::encoding_finalize(format!(
                    "encoder finish failed: {err}"
                ))));
            }
        }

        let Some(codec) = self.codec.clone() else {
            return Err(self.fail(ShowreelError::configuration("stop without negotiated codec")));
        };
        let chunks = std::mem::take(&mut self.chunks);
        let total: usize = chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in &chunks {
            data.extend_from_slice(chunk);
        }
        tracing::debug!(
            chunks = chunks.len(),
            bytes = data.len(),
            frames = self.frames_pushed,
            "capture finalized"
        );
        self.artifact = Some(MediaArtifact {
            data: Arc::new(data),
            container: codec.container,
            codec_id: codec.id,
        });
        self.state = CaptureState::Ready;
        Ok(())
    }

    fn accumulate(&mut self, chunks: Vec<Vec<u8>>) {
        for chunk in chunks {
            if !chunk.is_empty() {
                self.chunks.push(chunk);
            }
        }
    }

    fn fail(&mut self, err: ShowreelError) -> ShowreelError {
        self.state = CaptureState::Failed;
        self.chunks.clear();
        self.artifact = None;
        err
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("state", &self.state)
            .field("frames_pushed", &self.frames_pushed)
            .field("chunks", &self.chunks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
