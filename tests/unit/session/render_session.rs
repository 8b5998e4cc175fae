use super::*;

use crate::animation::ease::Ease;
use crate::capture::codec::StaticProbe;
use crate::capture::encoder::{EncodeConfig, InMemoryEncoder};
use crate::render::surface::FrameView;
use crate::scene::model::RevealSpec;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn small_options() -> RenderOptions {
    RenderOptions {
        canvas: Canvas::new(8, 4).unwrap(),
        fps: Fps::new(30, 1).unwrap(),
        ..RenderOptions::default()
    }
}

fn reveal_spec(duration_ms: u64) -> SceneSpec {
    SceneSpec::Reveal(RevealSpec {
        duration_ms,
        ease: Ease::default(),
    })
}

fn two_sources() -> Vec<ImageSource> {
    vec![
        ImageSource::Bytes(png_bytes(8, 4, [10, 0, 0, 255])),
        ImageSource::Bytes(png_bytes(8, 4, [0, 20, 0, 255])),
    ]
}

struct ExplodingEncoder;

impl StreamEncoder for ExplodingEncoder {
    fn begin(&mut self, _cfg: EncodeConfig) -> ShowreelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _frame: FrameView<'_>) -> ShowreelResult<()> {
        Err(ShowreelError::recorder("encoder exploded"))
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        Vec::new()
    }

    fn finish(&mut self) -> ShowreelResult<Vec<Vec<u8>>> {
        Ok(Vec::new())
    }
}

#[test]
fn reveal_renders_to_a_ready_artifact() {
    let mut session = RenderSession::new(small_options());
    session
        .begin(
            &two_sources(),
            &reveal_spec(100),
            Box::new(InMemoryEncoder::new()),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap();
    assert_eq!(session.status(), RenderStatus::Rendering);

    let status = session.run_to_completion(30).unwrap();
    assert_eq!(status, RenderStatus::Ready);

    let artifact = session.artifact().unwrap();
    // Frames 0..=3 are due by 100ms at 30fps; the in-memory encoder emits
    // one raw frame per chunk.
    let frame_len = session.options().canvas.byte_len();
    assert_eq!(artifact.len(), 4 * frame_len);
    assert_eq!(artifact.codec_id.as_deref(), Some("vp9"));

    let name = session.suggested_file_name("showreel").unwrap();
    assert!(name.starts_with("showreel-reveal-"));
    assert!(name.ends_with(".webm"));
}

#[test]
fn wrong_source_count_fails_synchronously() {
    let mut session = RenderSession::new(small_options());
    let err = session
        .begin(
            &two_sources()[..1],
            &reveal_spec(100),
            Box::new(InMemoryEncoder::new()),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(session.status(), RenderStatus::Failed(ErrorKind::Configuration));
    assert!(session.last_error().is_some());
    assert!(session.artifact().is_none());
}

#[test]
fn undecodable_source_fails_synchronously() {
    let mut session = RenderSession::new(small_options());
    let sources = vec![
        ImageSource::Bytes(vec![0xde, 0xad]),
        ImageSource::Bytes(png_bytes(8, 4, [0, 20, 0, 255])),
    ];
    let err = session
        .begin(
            &sources,
            &reveal_spec(100),
            Box::new(InMemoryEncoder::new()),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ImageLoad);
    assert_eq!(session.status(), RenderStatus::Failed(ErrorKind::ImageLoad));
}

#[test]
fn tick_without_begin_reports_complete() {
    let mut session = RenderSession::new(small_options());
    assert_eq!(session.tick(0), TickOutcome::Complete);
    assert_eq!(session.status(), RenderStatus::Idle);
}

#[test]
fn encoder_failure_mid_render_flips_status_only() {
    let mut session = RenderSession::new(small_options());
    session
        .begin(
            &two_sources(),
            &reveal_spec(100),
            Box::new(ExplodingEncoder),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap();

    // The failure is absorbed; the driver just sees Complete.
    assert_eq!(session.tick(0), TickOutcome::Complete);
    assert_eq!(session.status(), RenderStatus::Failed(ErrorKind::Recorder));
    assert!(session.artifact().is_none());
    assert!(session.last_error().is_some());
    assert_eq!(session.tick(33), TickOutcome::Complete);
}

#[test]
fn beginning_again_releases_the_previous_artifact() {
    let mut session = RenderSession::new(small_options());
    session
        .begin(
            &two_sources(),
            &reveal_spec(100),
            Box::new(InMemoryEncoder::new()),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap();
    session.run_to_completion(30).unwrap();
    assert!(session.artifact().is_some());

    session
        .begin(
            &two_sources(),
            &reveal_spec(100),
            Box::new(InMemoryEncoder::new()),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap();
    assert_eq!(session.status(), RenderStatus::Rendering);
    assert!(session.artifact().is_none());
}

#[test]
fn cancel_is_idempotent() {
    let mut session = RenderSession::new(small_options());
    session
        .begin(
            &two_sources(),
            &reveal_spec(5000),
            Box::new(InMemoryEncoder::new()),
            &StaticProbe::new(["vp9"]),
        )
        .unwrap();
    session.tick(0);

    session.cancel();
    assert_eq!(session.status(), RenderStatus::Idle);
    assert!(session.artifact().is_none());
    session.cancel();
    assert_eq!(session.status(), RenderStatus::Idle);
}

#[test]
fn run_to_completion_rejects_a_zero_cadence() {
    let mut session = RenderSession::new(small_options());
    let err = session.run_to_completion(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
