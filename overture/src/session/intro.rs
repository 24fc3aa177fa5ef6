use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::captions::sync::sync_captions;
use crate::foundation::core::Viewport;
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuBackend;
use crate::scene::compose::{FrameInputs, compose_frame};
use crate::scene::particles::ParticleField;
use crate::session::host::{FrameHandle, InputEvent, IntroHost, Presentation, TimerHandle};
use crate::timeline::clock::{HIDE_DELAY_MS, ProgressClock};
use crate::timeline::phase::{Phase, PhaseSample};

/// Clock driving the looping sheen on the final chip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheenClock {
    /// The page wall clock: the sheen keeps looping independently of the session.
    #[default]
    Wall,
    /// Milliseconds since the first frame: every frame is a pure function of elapsed time.
    Session,
}

/// Options for [`IntroSession::initialize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOpts {
    /// Seed for particle placement.
    pub seed: u64,
    /// Text drawn on the final chip.
    pub mark: String,
    /// Sheen time source.
    pub sheen_clock: SheenClock,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            seed: 0,
            mark: "DZ".to_string(),
            sheen_clock: SheenClock::Wall,
        }
    }
}

/// One run of the intro animation, from the first frame until the intro layer is hidden.
///
/// The session is driven by its host: the host delivers frames and timers it was asked for, plus
/// resize and input events. After [`IntroSession::finish`] no further frame is requested or
/// rendered.
pub struct IntroSession {
    opts: SessionOpts,
    clock: ProgressClock,
    viewport: Viewport,
    particles: ParticleField,
    rng: StdRng,
    backend: CpuBackend,
    pending: Option<FrameHandle>,
    hide_timer: Option<TimerHandle>,
    finished: bool,
    layer_hidden: bool,
}

impl IntroSession {
    /// Start the intro on `host`.
    ///
    /// Returns `Ok(None)` when the page has no intro surface.
    #[tracing::instrument(skip(host, opts), fields(seed = opts.seed))]
    pub fn initialize<H: IntroHost + ?Sized>(
        host: &mut H,
        opts: SessionOpts,
    ) -> OvertureResult<Option<Self>> {
        if !host.has_surface() {
            tracing::debug!("page has no intro surface; intro disabled");
            return Ok(None);
        }
        if opts.mark.is_empty() {
            return Err(OvertureError::validation("intro mark must be non-empty"));
        }
        let viewport = host.viewport();
        viewport.validate()?;

        let mut rng = StdRng::seed_from_u64(opts.seed);
        let particles = ParticleField::generate(&viewport, &mut rng);
        host.set_presentation(Presentation::IntroActive);
        let pending = Some(host.request_frame());
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.device_pixel_ratio,
            "intro initialized"
        );

        Ok(Some(Self {
            opts,
            clock: ProgressClock::new(),
            viewport,
            particles,
            rng,
            backend: CpuBackend::new(),
            pending,
            hide_timer: None,
            finished: false,
            layer_hidden: false,
        }))
    }

    /// Frame callback for `handle` at timestamp `t_ms`.
    ///
    /// Frames that are not the pending request, and every frame after finishing, are ignored. A
    /// rasterization error finishes the intro and is returned.
    pub fn on_frame<H: IntroHost + ?Sized>(
        &mut self,
        handle: FrameHandle,
        t_ms: f64,
        host: &mut H,
    ) -> OvertureResult<()> {
        if self.finished || self.pending != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame");
            return Ok(());
        }
        self.pending = None;

        if self.clock.start_ms().is_none() {
            tracing::debug!(start_ms = t_ms, "first intro frame");
        }
        let progress = self.clock.tick(t_ms);
        let sheen_ms = match self.opts.sheen_clock {
            SheenClock::Wall => host.wall_clock_ms(),
            SheenClock::Session => self.clock.elapsed_ms(t_ms),
        };

        let frame = match self.render(sheen_ms) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "intro frame failed to render; finishing");
                self.finish(host);
                return Err(e);
            }
        };
        host.present(&frame);
        let states = sync_captions(host.captions(), progress);
        host.apply_caption_states(&states);

        if progress < 1.0 {
            self.pending = Some(host.request_frame());
        } else {
            tracing::debug!("intro reached full progress");
            self.finish(host);
        }
        Ok(())
    }

    /// End the intro. Only the first call has any effect.
    pub fn finish<H: IntroHost + ?Sized>(&mut self, host: &mut H) {
        if self.finished {
            return;
        }
        self.finished = true;
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
        host.set_presentation(Presentation::IntroFinished);
        self.hide_timer = Some(host.set_timer(HIDE_DELAY_MS));
        tracing::debug!(progress = self.clock.progress(), "intro finished");
    }

    /// Timer callback. Hides the intro layer when the hide delay elapses.
    pub fn on_timer<H: IntroHost + ?Sized>(&mut self, handle: TimerHandle, host: &mut H) {
        if self.hide_timer != Some(handle) {
            return;
        }
        self.hide_timer = None;
        self.layer_hidden = true;
        host.hide_intro_layer();
        tracing::debug!("intro layer hidden");
    }

    /// Re-read the viewport and regenerate the particle field.
    pub fn on_resize<H: IntroHost + ?Sized>(&mut self, host: &mut H) -> OvertureResult<()> {
        let viewport = host.viewport();
        viewport.validate()?;
        self.viewport = viewport;
        self.particles = ParticleField::generate(&self.viewport, &mut self.rng);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.device_pixel_ratio,
            "intro viewport resized"
        );
        Ok(())
    }

    /// Skip button and the alternate gestures all end the intro.
    pub fn handle_input<H: IntroHost + ?Sized>(&mut self, event: InputEvent, host: &mut H) {
        if !self.finished {
            tracing::debug!(?event, "intro skipped");
        }
        self.finish(host);
    }

    fn render(&mut self, sheen_ms: f64) -> OvertureResult<FrameRGBA> {
        let list = compose_frame(&FrameInputs {
            viewport: &self.viewport,
            particles: &self.particles,
            progress: self.clock.progress(),
            sheen_ms,
            mark: &self.opts.mark,
        });
        self.backend.render(&list, &self.viewport)
    }

    /// Current progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    /// Phase shown at the current progress.
    pub fn phase(&self) -> PhaseSample {
        Phase::at(self.clock.progress())
    }

    /// Timestamp of the first frame, once one was delivered.
    pub fn start_ms(&self) -> Option<f64> {
        self.clock.start_ms()
    }

    /// Return `true` once [`IntroSession::finish`] ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Return `true` once the hide timer fired.
    pub fn is_layer_hidden(&self) -> bool {
        self.layer_hidden
    }

    /// The outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Viewport the session currently draws for.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The current particle field.
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/intro.rs"]
mod tests;
