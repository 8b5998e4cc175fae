//! Showreel: a deterministic still-image video compositor.
//!
//! Showreel turns a handful of still images into a short presentation video.
//! Sources are decoded and cover-fitted up front, a pure scene program maps
//! elapsed milliseconds to frame descriptors, a CPU surface composites each
//! descriptor, and a paced capture session streams the frames into a
//! negotiated encoder that yields a single in-memory media artifact.
//!
//! Pipeline overview:
//!
//! 1. Prepare: [`ImageSource`] values become [`PreparedFrame`]s via
//!    [`prepare_frames`] (decode, cover-fit, flatten onto the background).
//!    This is the only stage that performs IO or rescaling.
//! 2. Program: a [`SceneSpec`] plus prepared frames compiles into a
//!    [`SceneProgram`], a pure function from elapsed time to a
//!    [`FrameDescriptor`].
//! 3. Composite: a [`Surface`] renders each descriptor (copies, crossfades,
//!    wipes, text overlays) into an opaque RGBA8 buffer.
//! 4. Capture: a [`CaptureSession`] paces [`FrameView`]s into a
//!    [`StreamEncoder`] and assembles the emitted chunks into a
//!    [`MediaArtifact`].
//!
//! Key design constraints:
//!
//! - Deterministic by default: scene programs are pure functions of elapsed
//!   time and pacing is derived from the frame clock alone, so any tick
//!   cadence produces the same output length.
//! - No IO on the tick path: decoding happens before a render begins; ticks
//!   only blend pixels and push bytes.
//! - Errors at the edges: [`RenderSession::begin`] fails synchronously, and
//!   mid-render failures surface as a terminal status instead of panicking
//!   the caller's timer loop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod capture;
mod foundation;
mod render;
mod scene;
mod session;

pub use animation::ease::Ease;
pub use assets::decode::{DecodedImage, ImageSource, decode_image};
pub use assets::frame::{
    CoverFit, DEFAULT_BACKGROUND, PreparedFrame, cover_fit, prepare_frame, prepare_frames,
};
pub use capture::codec::{
    CodecCandidate, CodecProbe, ContainerFormat, NegotiatedCodec, StaticProbe,
    default_codec_preferences, negotiate, negotiate_strict, suggested_file_name,
};
pub use capture::encoder::{EncodeConfig, InMemoryEncoder, StreamEncoder};
pub use capture::ffmpeg::{FfmpegEncoder, FfmpegProbe, is_ffmpeg_on_path};
pub use capture::session::{CaptureSession, CaptureState, MediaArtifact};
pub use foundation::core::{Canvas, Fps};
pub use foundation::error::{ErrorKind, ShowreelError, ShowreelResult};
pub use render::overlay::{OverlayFont, OverlayStyle};
pub use render::surface::{FrameView, Surface, WIPE_DIVIDER_PX};
pub use scene::model::{OverlaySpec, RevealSpec, SceneKind, SceneSpec, ShowcaseSpec};
pub use scene::program::{
    FrameContent, FrameDescriptor, Overlay, OverlayAnchor, OverlayRole, SceneProgram,
};
pub use session::compositor::{CompositorLoop, TickOutcome};
pub use session::render_session::{RenderOptions, RenderSession, RenderStatus};
