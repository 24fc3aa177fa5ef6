/// Total length of the intro in milliseconds.
pub const DURATION_MS: f64 = 8500.0;

/// Delay between finishing the intro and hiding its layer, leaving room for the fade-out.
pub const HIDE_DELAY_MS: f64 = 1500.0;

/// Normalized progress for `elapsed_ms` since the first frame.
pub fn progress_at(elapsed_ms: f64) -> f64 {
    (elapsed_ms / DURATION_MS).clamp(0.0, 1.0)
}

/// Monotonic progress clock anchored at the first frame timestamp it sees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressClock {
    start_ms: Option<f64>,
    progress: f64,
}

impl ProgressClock {
    /// A clock that has not seen a frame yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the host timestamp `t_ms` and return the new progress.
    ///
    /// The first call anchors the clock. Progress never decreases, even if the host delivers
    /// an older timestamp.
    pub fn tick(&mut self, t_ms: f64) -> f64 {
        let start = *self.start_ms.get_or_insert(t_ms);
        self.progress = self.progress.max(progress_at(t_ms - start));
        self.progress
    }

    /// Timestamp of the first frame, if any frame was seen.
    pub fn start_ms(&self) -> Option<f64> {
        self.start_ms
    }

    /// Most recent progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Milliseconds between the first frame and `t_ms` (zero before the first frame).
    pub fn elapsed_ms(&self, t_ms: f64) -> f64 {
        self.start_ms.map_or(0.0, |s| (t_ms - s).max(0.0))
    }

    /// Return `true` once progress has reached 1.
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clock.rs"]
mod tests;
