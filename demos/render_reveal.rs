use std::io::Cursor;

use anyhow::Context;
use image::{DynamicImage, Rgba, RgbaImage};
use showreel::{
    Canvas, CodecProbe, FfmpegEncoder, FfmpegProbe, Fps, ImageSource, InMemoryEncoder,
    RenderOptions, RenderSession, RenderStatus, RevealSpec, SceneSpec, StaticProbe, StreamEncoder,
    is_ffmpeg_on_path,
};

fn gradient(tint: [u8; 3]) -> anyhow::Result<ImageSource> {
    let img = RgbaImage::from_fn(640, 360, |x, _| {
        let t = (x * 255 / 640) as u8;
        Rgba([tint[0].saturating_add(t), tint[1], tint[2], 255])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img).write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(ImageSource::Bytes(bytes))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let sources = [gradient([160, 40, 40])?, gradient([40, 140, 60])?];
    let spec = SceneSpec::Reveal(RevealSpec {
        duration_ms: 1500,
        ..RevealSpec::default()
    });

    let mut session = RenderSession::new(RenderOptions {
        canvas: Canvas {
            width: 640,
            height: 360,
        },
        fps: Fps { num: 30, den: 1 },
        ..RenderOptions::default()
    });

    let have_ffmpeg = is_ffmpeg_on_path();
    let (encoder, probe): (Box<dyn StreamEncoder>, Box<dyn CodecProbe>) = if have_ffmpeg {
        (Box::new(FfmpegEncoder::new()), Box::new(FfmpegProbe::query()?))
    } else {
        (
            Box::new(InMemoryEncoder::new()),
            Box::new(StaticProbe::new(["vp9"])),
        )
    };

    session.begin(&sources, &spec, encoder, probe.as_ref())?;
    let status = session.run_to_completion(60)?;
    anyhow::ensure!(
        status == RenderStatus::Ready,
        "render failed: {:?}",
        session.last_error()
    );

    let artifact = session.artifact().context("no artifact after Ready")?;
    let name = session
        .suggested_file_name("demo")
        .context("no filename after Ready")?;
    if have_ffmpeg {
        std::fs::write(&name, artifact.data.as_slice())?;
        println!("wrote {name} ({} bytes)", artifact.len());
    } else {
        println!("ffmpeg not on PATH; kept {} raw bytes in memory", artifact.len());
    }

    Ok(())
}
