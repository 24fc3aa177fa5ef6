//! Overture is the cinematic intro engine of a static blog front end.
//!
//! An intro runs for a fixed 8.5 seconds and moves through three visual phases (an energy orb, a
//! morphing layer stack and a metallic chip carrying the site mark) over a drifting particle
//! field, while page captions fade in and out in step with progress. The user can skip at any
//! time; either way the session flips the page presentation exactly once and hides the intro
//! layer shortly after.
//!
//! # Pipeline overview
//!
//! 1. **Clock**: frame timestamp -> progress in `[0, 1]` ([`ProgressClock`])
//! 2. **Compose**: progress + particles + viewport -> [`DisplayList`] ([`compose_frame`])
//! 3. **Render**: [`DisplayList`] -> premultiplied RGBA8 [`FrameRGBA`] ([`CpuBackend`])
//! 4. **Present** on a host page ([`IntroSession`]), or **export** offline to a [`FrameSink`]
//!    ([`export_intro`])
//!
//! Hosts implement [`FrameScheduler`] and [`IntroPage`]. [`SimulatedHost`] drives a session on a
//! virtual clock for tests and command-line previews.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod animation;
pub(crate) mod captions;
pub(crate) mod config;
pub(crate) mod encode;
pub(crate) mod foundation;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{
    Affine, BezPath, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8, Vec2, Viewport,
};
pub use crate::foundation::error::{OvertureError, OvertureResult};

pub use crate::animation::ease::Ease;
pub use crate::captions::sync::{
    CaptionDescriptor, CaptionState, EXIT_WINDOW, caption_state, sync_captions,
};
pub use crate::config::intro::IntroConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuBackend;
pub use crate::scene::compose::{FrameInputs, compose_frame};
pub use crate::scene::display::{DisplayList, DrawOp, LinearGradient, MarkOp, Paint};
pub use crate::scene::particles::{PARTICLE_COUNT, Particle, ParticleField};
pub use crate::scene::phases::{
    SHEEN_PERIOD_MS, energy_glow_blur, energy_orb, final_chip, mark_opacity, morphing_stack,
    sheen_offset, stack_radius, stack_split,
};
pub use crate::session::export::{
    ExportOpts, ExportStats, export_intro, intro_frame_count, render_progress,
};
pub use crate::session::host::{
    FrameHandle, FrameScheduler, InputEvent, IntroHost, IntroPage, Presentation, TimerHandle,
};
pub use crate::session::intro::{IntroSession, SessionOpts, SheenClock};
pub use crate::session::sim::SimulatedHost;
pub use crate::timeline::clock::{DURATION_MS, HIDE_DELAY_MS, ProgressClock, progress_at};
pub use crate::timeline::phase::{ENERGY_END, Phase, PhaseSample, STRUCTURE_END};
