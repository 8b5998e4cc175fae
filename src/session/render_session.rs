use crate::assets::decode::ImageSource;
use crate::assets::frame::{DEFAULT_BACKGROUND, prepare_frames};
use crate::capture::codec::{CodecCandidate, CodecProbe, default_codec_preferences};
use crate::capture::encoder::StreamEncoder;
use crate::capture::session::{CaptureSession, MediaArtifact};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ErrorKind, ShowreelError, ShowreelResult};
use crate::render::overlay::{OverlayFont, OverlayStyle};
use crate::render::surface::{Surface, WIPE_DIVIDER_PX};
use crate::scene::model::{OverlaySpec, SceneKind, SceneSpec};
use crate::scene::program::SceneProgram;
use crate::session::compositor::{CompositorLoop, TickOutcome};

/// Everything configurable about one render.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Output geometry.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Target bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Codec preference order, consulted front to back.
    pub codec_preferences: Vec<CodecCandidate>,
    /// Overlay strings.
    pub overlays: OverlaySpec,
    /// Overlay font; overlays are skipped when absent.
    pub font: Option<OverlayFont>,
    /// Overlay sizing and opacity.
    pub overlay_style: OverlayStyle,
    /// Opaque background flattened behind translucent sources.
    pub background: [u8; 4],
    /// Wipe divider width in pixels; zero disables.
    pub divider_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 2560,
                height: 1440,
            },
            fps: Fps { num: 30, den: 1 },
            bitrate_bps: 12_000_000,
            codec_preferences: default_codec_preferences(),
            overlays: OverlaySpec::default(),
            font: None,
            overlay_style: OverlayStyle::default(),
            background: DEFAULT_BACKGROUND,
            divider_px: WIPE_DIVIDER_PX,
        }
    }
}

/// Externally visible lifecycle of a [`RenderSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    /// No render started since construction or the last teardown.
    Idle,
    /// A render is accepting ticks.
    Rendering,
    /// The artifact is available.
    Ready,
    /// The render failed terminally; the kind says why.
    Failed(ErrorKind),
}

#[derive(Debug)]
struct ActiveRender {
    driver: CompositorLoop,
    surface: Surface,
    capture: CaptureSession,
}

/// Owner of the render happy path: prepare frames, arm and start capture,
/// drive ticks, finalize, expose the artifact.
///
/// Errors before recording starts come back synchronously from
/// [`RenderSession::begin`]; errors during recording surface through the
/// status transition instead, so hosts drive [`RenderSession::tick`]
/// unconditionally and never handle mid-render failures at the tick site.
#[derive(Debug)]
pub struct RenderSession {
    options: RenderOptions,
    status: RenderStatus,
    active: Option<ActiveRender>,
    artifact: Option<MediaArtifact>,
    scene_kind: Option<SceneKind>,
    last_error: Option<String>,
}

impl RenderSession {
    /// Build an idle session.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            status: RenderStatus::Idle,
            active: None,
            artifact: None,
            scene_kind: None,
            last_error: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> RenderStatus {
        self.status
    }

    /// The configuration this session renders with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Handle to the finished artifact, once Ready. Cloning shares bytes.
    pub fn artifact(&self) -> Option<MediaArtifact> {
        self.artifact.clone()
    }

    /// Display form of the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Download-style filename for the finished artifact, stamped with the
    /// current wall-clock time.
    pub fn suggested_file_name(&self, prefix: &str) -> Option<String> {
        let artifact = self.artifact.as_ref()?;
        let scene = self.scene_kind?;
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Some(crate::capture::codec::suggested_file_name(
            prefix,
            scene,
            artifact.container,
            timestamp_ms,
        ))
    }

    /// Start a render over `sources` with `spec`.
    ///
    /// Any previous render is torn down first — its encoder, surface, and
    /// issued artifact handle are all released — so repeated `begin` calls
    /// cannot leak resources. On success the status is Rendering and the
    /// session is ready for ticks from elapsed 0; on error the status is
    /// Failed with the originating kind and the error is also returned.
    #[tracing::instrument(skip_all, fields(sources = sources.len(), scene = spec.kind().as_str()))]
    pub fn begin(
        &mut self,
        sources: &[ImageSource],
        spec: &SceneSpec,
        encoder: Box<dyn StreamEncoder>,
        probe: &dyn CodecProbe,
    ) -> ShowreelResult<()> {
        self.teardown();
        match self.try_begin(sources, spec, encoder, probe) {
            Ok(()) => {
                self.status = RenderStatus::Rendering;
                Ok(())
            }
            Err(err) => {
                self.status = RenderStatus::Failed(err.kind());
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn try_begin(
        &mut self,
        sources: &[ImageSource],
        spec: &SceneSpec,
        encoder: Box<dyn StreamEncoder>,
        probe: &dyn CodecProbe,
    ) -> ShowreelResult<()> {
        if let Some(required) = spec.required_sources()
            && sources.len() != required
        {
            return Err(ShowreelError::configuration(format!(
                "{} scene requires exactly {required} sources, got {}",
                spec.kind().as_str(),
                sources.len()
            )));
        }
        if sources.is_empty() {
            return Err(ShowreelError::configuration(
                "a scene requires at least one source",
            ));
        }

        let frames = prepare_frames(sources, self.options.canvas, self.options.background)?;
        let program = SceneProgram::new(
            spec,
            frames,
            self.options.canvas,
            self.options.overlays.clone(),
        )?;

        let mut surface = Surface::new(
            self.options.canvas,
            self.options.font.clone(),
            self.options.overlay_style,
        );
        surface.set_divider_px(self.options.divider_px);

        let mut capture = CaptureSession::new(
            self.options.canvas,
            self.options.fps,
            self.options.bitrate_bps,
            encoder,
        );
        capture.arm(&self.options.codec_preferences, probe)?;
        capture.start()?;

        self.scene_kind = Some(spec.kind());
        self.active = Some(ActiveRender {
            driver: CompositorLoop::new(program),
            surface,
            capture,
        });
        Ok(())
    }

    /// Advance the render to `elapsed_ms`.
    ///
    /// Draws the due frame, paces it into the encoder, and stops the
    /// capture on the completing tick. Infallible at this boundary: a
    /// mid-render failure flips the status to Failed and reports Complete
    /// so drivers wind down naturally.
    pub fn tick(&mut self, elapsed_ms: u64) -> TickOutcome {
        let Some(active) = self.active.as_mut() else {
            return TickOutcome::Complete;
        };

        let outcome = match Self::advance(active, elapsed_ms) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "render failed mid-tick");
                self.fail(err);
                return TickOutcome::Complete;
            }
        };
        if outcome == TickOutcome::Complete {
            self.finalize();
        }
        outcome
    }

    /// Drive ticks at a fixed virtual cadence until the scene completes.
    ///
    /// Tick `i` runs at elapsed `i * 1000 / ticks_per_sec` ms, so the
    /// encoded length depends only on the scene and frame rate, not on the
    /// cadence chosen here.
    pub fn run_to_completion(&mut self, ticks_per_sec: u32) -> ShowreelResult<RenderStatus> {
        if ticks_per_sec == 0 {
            return Err(ShowreelError::configuration("ticks_per_sec must be > 0"));
        }
        let mut index: u64 = 0;
        while self.active.is_some() {
            let elapsed_ms = index * 1000 / u64::from(ticks_per_sec);
            self.tick(elapsed_ms);
            index += 1;
        }
        Ok(self.status)
    }

    /// Abandon any active render and release held resources. Idempotent.
    pub fn cancel(&mut self) {
        self.teardown();
    }

    // Pacing is clamped to the scene duration so the overshoot of the
    // completing tick never lengthens the output.
    fn advance(active: &mut ActiveRender, elapsed_ms: u64) -> ShowreelResult<TickOutcome> {
        let outcome = active.driver.tick(elapsed_ms, &mut active.surface)?;
        let pace_to = elapsed_ms.min(active.driver.program().duration_ms());
        active.capture.capture_frame(active.surface.view(), pace_to)?;
        Ok(outcome)
    }

    fn finalize(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        match active.capture.stop() {
            Ok(()) => {
                self.artifact = active.capture.artifact().cloned();
                self.status = RenderStatus::Ready;
                tracing::debug!(
                    bytes = self.artifact.as_ref().map_or(0, MediaArtifact::len),
                    "render ready"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "finalize failed");
                self.status = RenderStatus::Failed(err.kind());
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn fail(&mut self, err: ShowreelError) {
        self.status = RenderStatus::Failed(err.kind());
        self.last_error = Some(err.to_string());
        self.active = None;
        self.artifact = None;
    }

    fn teardown(&mut self) {
        // Dropping the active render kills any in-flight encoder process
        // and releases the previously issued artifact handle.
        self.active = None;
        self.artifact = None;
        self.scene_kind = None;
        self.last_error = None;
        self.status = RenderStatus::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
