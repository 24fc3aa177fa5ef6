use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Colour that translucent pixels are flattened onto.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Options writing an MP4 to `out_path` over a black background.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::BLACK,
        }
    }
}

/// Sink that pipes raw frames into the system `ffmpeg` and produces an h264 MP4.
///
/// Odd frame sizes are padded by one pixel on the right/bottom edge since yuv420p needs even
/// dimensions.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Sink with `opts`. Nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
        ]);
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            cmd.args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"]);
        }
        cmd.args([
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> OvertureResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(OvertureError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(OvertureError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(OvertureError::encode(
                "ffmpeg is required for MP4 output, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg).spawn().map_err(|e| {
            OvertureError::encode(format!("failed to spawn ffmpeg: {e}"))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| OvertureError::encode("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| OvertureError::encode("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });
        tracing::debug!(
            path = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "spawned ffmpeg"
        );

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> OvertureResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| OvertureError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(OvertureError::encode("ffmpeg sink received out-of-order frame"));
        }
        check_frame(cfg, frame)?;
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.scratch, &frame.data, self.opts.background)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| OvertureError::encode("ffmpeg sink is already finalized"))?;
        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| OvertureError::encode(format!("write frame to ffmpeg: {e}")))?;
        Ok(())
    }

    fn end(&mut self) -> OvertureResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| OvertureError::encode("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .map_err(|e| OvertureError::encode(format!("wait for ffmpeg: {e}")))?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| OvertureError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| OvertureError::encode(format!("read ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            return Err(OvertureError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Composite premultiplied RGBA8 over an opaque `background`, producing opaque RGBA8.
pub(crate) fn flatten_premul_over_bg(
    dst: &mut [u8],
    src_premul: &[u8],
    background: Rgba8,
) -> OvertureResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(OvertureError::encode(
            "flatten expects equal-length rgba8 buffers",
        ));
    }
    let bg = [
        u16::from(background.r),
        u16::from(background.g),
        u16::from(background.b),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> OvertureResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
