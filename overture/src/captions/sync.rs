use crate::foundation::error::{OvertureError, OvertureResult};

/// Progress window after `end` during which a caption plays its exit transition.
pub const EXIT_WINDOW: f64 = 0.1;

/// A caption declared by the page: visible while progress is within `[start, end]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionDescriptor {
    /// Progress at which the caption becomes active.
    pub start: f64,
    /// Progress after which the caption starts exiting.
    pub end: f64,
    /// Display text (informational; the page owns presentation).
    #[serde(default)]
    pub text: String,
}

impl CaptionDescriptor {
    /// Caption active over `[start, end]` without text.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            text: String::new(),
        }
    }

    /// Return a copy carrying `text`.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Validate `0 <= start <= end <= 1`.
    pub fn validate(&self) -> OvertureResult<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.start) || !in_unit(self.end) {
            return Err(OvertureError::validation(
                "caption start/end must be finite and within [0, 1]",
            ));
        }
        if self.start > self.end {
            return Err(OvertureError::validation("caption start must be <= end"));
        }
        Ok(())
    }
}

/// Presentation state of one caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionState {
    /// Not shown.
    Idle,
    /// Shown.
    Active,
    /// Fading out right after its window.
    Exiting,
}

/// Derive the state of `caption` at `progress`.
///
/// Stateless: the same inputs always give the same state. Because session progress never
/// decreases, a caption that left its window never becomes active again.
pub fn caption_state(caption: &CaptionDescriptor, progress: f64) -> CaptionState {
    if progress >= caption.start && progress <= caption.end {
        CaptionState::Active
    } else if progress > caption.end && progress < caption.end + EXIT_WINDOW {
        CaptionState::Exiting
    } else {
        CaptionState::Idle
    }
}

/// Derive the state of every caption, in declaration order.
pub fn sync_captions(captions: &[CaptionDescriptor], progress: f64) -> Vec<CaptionState> {
    captions
        .iter()
        .map(|c| caption_state(c, progress))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/captions/sync.rs"]
mod tests;
