use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{Receiver, channel};
use std::thread::JoinHandle;

use crate::capture::codec::{CodecProbe, ContainerFormat};
use crate::capture::encoder::{EncodeConfig, StreamEncoder};
use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::render::surface::FrameView;

/// Production encoder that spawns the system `ffmpeg` and streams raw RGBA
/// frames to its stdin.
///
/// Encoded container bytes come back on stdout, drained by a dedicated
/// thread into a channel so [`StreamEncoder::take_chunks`] never blocks the
/// caller. Dropping the encoder kills the child process, so an abandoned
/// recording cannot leak an `ffmpeg`.
#[derive(Default)]
pub struct FfmpegEncoder {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    chunks: Option<Receiver<Vec<u8>>>,
    stdout_drain: Option<JoinHandle<std::io::Result<()>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    cfg: Option<EncodeConfig>,
}

impl FfmpegEncoder {
    /// Create an encoder; the child process is spawned at `begin`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StreamEncoder for FfmpegEncoder {
    fn begin(&mut self, cfg: EncodeConfig) -> ShowreelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ShowreelError::configuration("fps must be non-zero"));
        }
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(ShowreelError::configuration(
                "ffmpeg encoder width/height must be non-zero",
            ));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(ShowreelError::configuration(
                "ffmpeg encoder width/height must be even (required for yuv420p output)",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(ShowreelError::recorder(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
        ]);
        if let Some(encoder) = ffmpeg_encoder_name(cfg.codec.id.as_deref()) {
            cmd.args(["-c:v", encoder]);
        }
        cmd.args([
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            &cfg.bitrate_bps.to_string(),
            "-f",
            muxer_name(cfg.codec.container),
        ]);
        if cfg.codec.container == ContainerFormat::Mp4 {
            // Plain mp4 wants a seekable output; fragmented mp4 streams.
            cmd.args(["-movflags", "frag_keyframe+empty_moov"]);
        }
        cmd.arg("pipe:1");

        let mut child = cmd.spawn().map_err(|e| {
            ShowreelError::recorder(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ShowreelError::recorder("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShowreelError::recorder("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ShowreelError::recorder("failed to open ffmpeg stderr (unexpected)"))?;

        let (tx, rx) = channel();
        let stdout_drain = std::thread::spawn(move || {
            let mut buf = [0u8; 64 * 1024];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) => return Ok(()),
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            return Ok(());
                        }
                    }
                    Err(e) => return Err(e),
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.chunks = Some(rx);
        self.stdout_drain = Some(stdout_drain);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: FrameView<'_>) -> ShowreelResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(ShowreelError::configuration("ffmpeg encoder not started"));
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
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ShowreelError::recorder("ffmpeg encoder already finalized"));
        };
        stdin.write_all(frame.data).map_err(|e| {
            ShowreelError::recorder(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        let Some(rx) = self.chunks.as_ref() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        while let Ok(chunk) = rx.try_recv() {
            out.push(chunk);
        }
        out
    }

    fn finish(&mut self) -> ShowreelResult<Vec<Vec<u8>>> {
        // Closing stdin signals end-of-stream; ffmpeg then flushes stdout
        // and exits.
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ShowreelError::configuration("ffmpeg encoder not started"))?;

        // Reap the child before any fallible step. The drain thread keeps
        // consuming stdout while we wait and ends at EOF.
        let status = child
            .wait()
            .map_err(|e| ShowreelError::encoding_finalize(format!("failed to wait for ffmpeg: {e}")))?;
        let drained = match self.stdout_drain.take() {
            Some(handle) => handle.join().map_err(|_| {
                ShowreelError::encoding_finalize("ffmpeg stdout drain thread panicked")
            })?,
            None => Ok(()),
        };
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ShowreelError::encoding_finalize("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    ShowreelError::encoding_finalize(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };

        if let Err(e) = drained {
            return Err(ShowreelError::encoding_finalize(format!(
                "ffmpeg stdout read failed: {e}"
            )));
        }
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ShowreelError::encoding_finalize(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let mut trailing = Vec::new();
        if let Some(rx) = self.chunks.take() {
            while let Ok(chunk) = rx.try_recv() {
                trailing.push(chunk);
            }
        }
        self.cfg = None;
        Ok(trailing)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        // Teardown must not leak a child process.
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl std::fmt::Debug for FfmpegEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegEncoder")
            .field("running", &self.child.is_some())
            .finish_non_exhaustive()
    }
}

/// Probe backed by the system `ffmpeg -encoders` listing, queried once.
#[derive(Clone, Debug, Default)]
pub struct FfmpegProbe {
    encoders: String,
}

impl FfmpegProbe {
    /// Run `ffmpeg -encoders` and cache its output.
    pub fn query() -> ShowreelResult<Self> {
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stderr(Stdio::null())
            .output()
            .map_err(|e| ShowreelError::recorder(format!("failed to run ffmpeg -encoders: {e}")))?;
        Ok(Self {
            encoders: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

impl CodecProbe for FfmpegProbe {
    fn supports(&self, codec_id: &str) -> bool {
        match ffmpeg_encoder_name(Some(codec_id)) {
            Some(encoder) => self
                .encoders
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(encoder)),
            // Container-generic entries only need a muxer, which every
            // ffmpeg build carries.
            None => true,
        }
    }
}

// `None` means no `-c:v` argument: ffmpeg picks its default encoder for
// the muxer.
fn ffmpeg_encoder_name(codec_id: Option<&str>) -> Option<&str> {
    match codec_id {
        Some("vp9") => Some("libvpx-vp9"),
        Some("vp8") => Some("libvpx"),
        Some("h264") | Some("avc1") => Some("libx264"),
        Some("webm") | Some("mp4") | Some("mkv") | None => None,
        Some(other) => Some(other),
    }
}

fn muxer_name(container: ContainerFormat) -> &'static str {
    match container {
        ContainerFormat::Webm => "webm",
        ContainerFormat::Mp4 => "mp4",
        ContainerFormat::Mkv => "matroska",
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
