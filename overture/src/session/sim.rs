use crate::captions::sync::{CaptionDescriptor, CaptionState};
use crate::foundation::core::{Fps, Viewport};
use crate::foundation::error::OvertureResult;
use crate::render::backend::FrameRGBA;
use crate::session::host::{
    FrameHandle, FrameScheduler, InputEvent, IntroPage, Presentation, TimerHandle,
};
use crate::session::intro::IntroSession;

/// Deterministic host with a virtual millisecond clock.
///
/// Frame requests are delivered at the next refresh boundary of a fixed-rate display; timers fire
/// at their deadline. [`SimulatedHost::advance_to`] delivers both in timestamp order, timers first
/// on ties.
#[derive(Debug)]
pub struct SimulatedHost {
    now_ms: f64,
    frame_interval_ms: f64,
    wall_offset_ms: f64,
    surface: bool,
    viewport: Viewport,
    captions: Vec<CaptionDescriptor>,
    next_id: u64,
    requested: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, f64)>,
    cancelled: Vec<FrameHandle>,
    presentations: Vec<Presentation>,
    layer_visible: bool,
    caption_states: Vec<CaptionState>,
    frames_presented: u64,
    last_frame: Option<FrameRGBA>,
}

impl SimulatedHost {
    /// Host with an intro surface of `viewport`, refreshing at `fps`.
    pub fn new(viewport: Viewport, fps: Fps) -> Self {
        Self {
            now_ms: 0.0,
            frame_interval_ms: fps.frame_duration_ms(),
            wall_offset_ms: 0.0,
            surface: true,
            viewport,
            captions: Vec::new(),
            next_id: 1,
            requested: Vec::new(),
            timers: Vec::new(),
            cancelled: Vec::new(),
            presentations: Vec::new(),
            layer_visible: true,
            caption_states: Vec::new(),
            frames_presented: 0,
            last_frame: None,
        }
    }

    /// Return a host whose page has no intro surface.
    pub fn without_surface(mut self) -> Self {
        self.surface = false;
        self
    }

    /// Return a host whose page carries `captions`.
    pub fn with_captions(mut self, captions: Vec<CaptionDescriptor>) -> Self {
        self.captions = captions;
        self
    }

    /// Return a host whose wall clock reads `offset_ms` at virtual time zero.
    pub fn with_wall_clock_offset(mut self, offset_ms: f64) -> Self {
        self.wall_offset_ms = offset_ms;
        self
    }

    fn next_handle(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Refresh boundary strictly after the current time.
    fn next_vsync_ms(&self) -> f64 {
        let k = (self.now_ms / self.frame_interval_ms + 1e-9).floor() + 1.0;
        k * self.frame_interval_ms
    }

    /// Run the virtual clock up to `t_ms`, delivering every frame and timer due on the way.
    pub fn advance_to(&mut self, session: &mut IntroSession, t_ms: f64) -> OvertureResult<()> {
        loop {
            let timer = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (_, at))| *at <= t_ms)
                .min_by(|a, b| a.1.1.total_cmp(&b.1.1))
                .map(|(i, (_, at))| (i, *at));
            let vsync = (!self.requested.is_empty())
                .then(|| self.next_vsync_ms())
                .filter(|at| *at <= t_ms);

            match (timer, vsync) {
                (Some((i, at)), Some(v)) if at <= v => self.fire_timer(session, i, at),
                (Some((i, at)), None) => self.fire_timer(session, i, at),
                (_, Some(at)) => {
                    self.now_ms = at;
                    for handle in std::mem::take(&mut self.requested) {
                        session.on_frame(handle, at, self)?;
                    }
                }
                (None, None) => break,
            }
        }
        self.now_ms = self.now_ms.max(t_ms);
        Ok(())
    }

    fn fire_timer(&mut self, session: &mut IntroSession, index: usize, at: f64) {
        let (handle, _) = self.timers.remove(index);
        self.now_ms = self.now_ms.max(at);
        session.on_timer(handle, self);
    }

    /// Change the viewport and notify the session, as a window resize would.
    pub fn resize(&mut self, session: &mut IntroSession, viewport: Viewport) -> OvertureResult<()> {
        self.viewport = viewport;
        session.on_resize(self)
    }

    /// Deliver an input event to the session.
    pub fn input(&mut self, session: &mut IntroSession, event: InputEvent) {
        session.handle_input(event, self);
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Last presentation flag set by the session.
    pub fn presentation(&self) -> Option<Presentation> {
        self.presentations.last().copied()
    }

    /// Every presentation change, oldest first.
    pub fn presentation_history(&self) -> &[Presentation] {
        &self.presentations
    }

    /// Return `true` until the session hides the intro layer.
    pub fn is_layer_visible(&self) -> bool {
        self.layer_visible
    }

    /// Caption states from the most recent frame.
    pub fn caption_states(&self) -> &[CaptionState] {
        &self.caption_states
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The most recently presented frame.
    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.last_frame.as_ref()
    }

    /// Frame requests that were withdrawn.
    pub fn cancelled_frames(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Frame requests still waiting for delivery.
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.requested
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

impl FrameScheduler for SimulatedHost {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle());
        self.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.requested.len();
        self.requested.retain(|h| *h != handle);
        if self.requested.len() != before {
            self.cancelled.push(handle);
        }
    }

    fn set_timer(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle());
        self.timers.push((handle, self.now_ms + delay_ms.max(0.0)));
        handle
    }
}

impl IntroPage for SimulatedHost {
    fn has_surface(&self) -> bool {
        self.surface
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn present(&mut self, frame: &FrameRGBA) {
        self.frames_presented += 1;
        self.last_frame = Some(frame.clone());
    }

    fn set_presentation(&mut self, presentation: Presentation) {
        self.presentations.push(presentation);
    }

    fn hide_intro_layer(&mut self) {
        self.layer_visible = false;
    }

    fn captions(&self) -> &[CaptionDescriptor] {
        &self.captions
    }

    fn apply_caption_states(&mut self, states: &[CaptionState]) {
        self.caption_states = states.to_vec();
    }

    fn wall_clock_ms(&self) -> f64 {
        self.wall_offset_ms + self.now_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/sim.rs"]
mod tests;
