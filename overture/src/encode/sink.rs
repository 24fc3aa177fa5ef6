use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::render::backend::FrameRGBA;

/// Stream parameters handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// Playback rate.
    pub fps: Fps,
}

/// Consumer of rendered intro frames.
///
/// `push_frame` is called in strictly increasing [`FrameIndex`] order between one `begin` and
/// one `end`.
pub trait FrameSink: Send {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> OvertureResult<()>;
    /// Consume the next frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> OvertureResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> OvertureResult<()>;
}

/// Check that `frame` matches the stream started with `cfg`.
pub(crate) fn check_frame(cfg: &SinkConfig, frame: &FrameRGBA) -> OvertureResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(OvertureError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
        return Err(OvertureError::encode(
            "frame data length does not match width*height*4",
        ));
    }
    Ok(())
}

/// Sink that keeps every frame in memory. Handy for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration received in `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Return `true` once `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> OvertureResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> OvertureResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| OvertureError::encode("in-memory sink not started"))?;
        check_frame(cfg, frame)?;
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(OvertureError::encode("frame pushed out of order"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> OvertureResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
