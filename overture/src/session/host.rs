//! The seams between an intro session and the page hosting it.

use crate::captions::sync::{CaptionDescriptor, CaptionState};
use crate::foundation::core::Viewport;
use crate::render::backend::FrameRGBA;

/// Ticket for a requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Ticket for a one-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Presentation flag shared with the rest of the page.
///
/// This is the only signal the intro sends outward: the page reveals its content when it flips to
/// [`Presentation::IntroFinished`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// The intro owns the screen.
    IntroActive,
    /// The intro is done; page content is revealed.
    IntroFinished,
}

/// User input that ends the intro early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// The dedicated skip button.
    SkipButton,
    /// A click anywhere on the intro layer.
    Click,
    /// Any key press.
    KeyPress,
    /// A touch on the intro layer.
    Touch,
}

/// Frame and timer scheduling, in the manner of `requestAnimationFrame` and `setTimeout`.
///
/// Callbacks are not registered here: the host later calls [`IntroSession::on_frame`] and
/// [`IntroSession::on_timer`] with the returned handle.
///
/// [`IntroSession::on_frame`]: crate::IntroSession::on_frame
/// [`IntroSession::on_timer`]: crate::IntroSession::on_timer
pub trait FrameScheduler {
    /// Ask for one frame callback at the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a frame request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Arm a one-shot timer firing after `delay_ms`.
    fn set_timer(&mut self, delay_ms: f64) -> TimerHandle;
}

/// The page the intro runs on.
pub trait IntroPage {
    /// Return `true` when the page has a drawing surface for the intro.
    fn has_surface(&self) -> bool;
    /// Current viewport, read fresh on every call.
    fn viewport(&self) -> Viewport;
    /// Show a rendered frame on the intro surface.
    fn present(&mut self, frame: &FrameRGBA);
    /// Update the shared presentation flag.
    fn set_presentation(&mut self, presentation: Presentation);
    /// Remove the intro layer from view.
    fn hide_intro_layer(&mut self);
    /// Caption descriptors in page order.
    fn captions(&self) -> &[CaptionDescriptor];
    /// Apply one state per caption, in the order of [`IntroPage::captions`].
    fn apply_caption_states(&mut self, states: &[CaptionState]);
    /// Wall clock in milliseconds, used by ambient effects that loop independently of progress.
    fn wall_clock_ms(&self) -> f64;
}

/// Everything a session needs from its host.
pub trait IntroHost: FrameScheduler + IntroPage {}

impl<T: FrameScheduler + IntroPage + ?Sized> IntroHost for T {}
