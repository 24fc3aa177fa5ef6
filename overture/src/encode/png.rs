use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::render::backend::FrameRGBA;

/// Sink writing one PNG per frame, named `frame_00000.png`, `frame_00001.png`, ...
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created on `begin` if missing.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: Vec::new(),
        }
    }

    /// Path of the PNG for frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }

    /// Files written since the last `begin`.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> OvertureResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create frame directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> OvertureResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| OvertureError::encode("png sink not started"))?;
        check_frame(cfg, frame)?;
        let path = self.frame_path(idx);
        write_png(&path, frame)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> OvertureResult<()> {
        tracing::debug!(
            frames = self.written.len(),
            dir = %self.dir.display(),
            "png sequence complete"
        );
        self.cfg = None;
        Ok(())
    }
}

/// Write `frame` as a straight-alpha RGBA PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> OvertureResult<()> {
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
