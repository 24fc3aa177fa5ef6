use std::collections::HashMap;
use std::sync::{Arc, mpsc};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::config::intro::IntroConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, FrameRange, Viewport};
use crate::foundation::error::{OvertureError, OvertureResult};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuBackend;
use crate::scene::compose::{FrameInputs, compose_frame};
use crate::scene::particles::ParticleField;
use crate::timeline::clock::{DURATION_MS, progress_at};

const MAX_REORDER_BUFFER_BYTES: u64 = 256 * 1024 * 1024;

/// Options for [`export_intro`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOpts {
    /// Render frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames rendered per parallel batch.
    pub chunk_size: usize,
    /// Worker threads for the pool. `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Frames in flight between renderers and the sink.
    pub channel_capacity: usize,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            channel_capacity: 4,
        }
    }
}

/// Summary of an export run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Render batches used.
    pub chunks: u64,
}

/// Number of frames an export at `fps` produces: frame 0 through the first frame at full progress.
pub fn intro_frame_count(fps: Fps) -> u64 {
    fps.frames_covering_ms(DURATION_MS)
}

/// Everything needed to render any frame of an offline intro, shared by all workers.
struct IntroFrames {
    viewport: Viewport,
    particles: ParticleField,
    fps: Fps,
    mark: String,
}

impl IntroFrames {
    fn new(config: &IntroConfig) -> OvertureResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            viewport: config.viewport,
            particles: ParticleField::generate(&config.viewport, &mut rng),
            fps: config.fps,
            mark: config.mark.clone(),
        })
    }

    /// Offline renders have no wall clock; the sheen follows elapsed time under both clocks.
    fn render_at(
        &self,
        backend: &mut CpuBackend,
        progress: f64,
        sheen_ms: f64,
    ) -> OvertureResult<FrameRGBA> {
        let list = compose_frame(&FrameInputs {
            viewport: &self.viewport,
            particles: &self.particles,
            progress,
            sheen_ms,
            mark: &self.mark,
        });
        backend.render(&list, &self.viewport)
    }

    fn render_frame(&self, backend: &mut CpuBackend, idx: FrameIndex) -> OvertureResult<FrameRGBA> {
        let elapsed = self.fps.frame_to_ms(idx);
        self.render_at(backend, progress_at(elapsed), elapsed)
    }

    fn sink_config(&self) -> SinkConfig {
        let (width, height) = self.viewport.device_size();
        SinkConfig {
            width,
            height,
            fps: self.fps,
        }
    }
}

/// Render the frame shown at `progress` for `config`.
pub fn render_progress(config: &IntroConfig, progress: f64) -> OvertureResult<FrameRGBA> {
    if !progress.is_finite() {
        return Err(OvertureError::validation("progress must be finite"));
    }
    let progress = progress.clamp(0.0, 1.0);
    let frames = IntroFrames::new(config)?;
    frames.render_at(&mut CpuBackend::new(), progress, progress * DURATION_MS)
}

/// Render the whole intro and stream it into `sink` in frame order.
///
/// In parallel mode frames complete out of order; they are reordered before reaching the sink.
#[tracing::instrument(skip(config, sink), fields(width = config.viewport.width, height = config.viewport.height))]
pub fn export_intro(
    config: &IntroConfig,
    opts: ExportOpts,
    sink: &mut dyn FrameSink,
) -> OvertureResult<ExportStats> {
    let frames = IntroFrames::new(config)?;
    let range = FrameRange::new(FrameIndex(0), FrameIndex(intro_frame_count(frames.fps)))?;
    let cfg = frames.sink_config();

    let bytes_per_frame = u64::from(cfg.width)
        .saturating_mul(u64::from(cfg.height))
        .saturating_mul(4)
        .max(1);
    let max_chunk_by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1);
    let chunk_size = (opts.chunk_size.max(1) as u64)
        .min(max_chunk_by_mem)
        .min(range.len_frames());
    let pool = if opts.parallel {
        Some(build_thread_pool(opts.threads)?)
    } else {
        None
    };
    tracing::debug!(
        frames = range.len_frames(),
        parallel = opts.parallel,
        chunk_size,
        "exporting intro"
    );

    std::thread::scope(|scope| -> OvertureResult<ExportStats> {
        let (tx, rx) = mpsc::sync_channel::<FrameMsg>(opts.channel_capacity.max(1));
        let sink_ref: &mut dyn FrameSink = sink;

        let enc = scope.spawn(move || -> OvertureResult<()> {
            sink_ref.begin(cfg)?;
            let mut next = range.start.0;
            let mut pending = HashMap::<u64, Arc<FrameRGBA>>::new();
            while next < range.end.0 {
                if let Some(frame) = pending.remove(&next) {
                    sink_ref.push_frame(FrameIndex(next), &frame)?;
                    next += 1;
                    continue;
                }
                let msg = rx
                    .recv()
                    .map_err(|_| OvertureError::encode("frame channel closed before the last frame"))?;
                pending.insert(msg.idx.0, msg.frame);
            }
            sink_ref.end()
        });

        let mut stats = ExportStats::default();
        let produced = (|| -> OvertureResult<()> {
            let send = |idx: FrameIndex, frame: FrameRGBA| {
                tx.send(FrameMsg {
                    idx,
                    frame: Arc::new(frame),
                })
                .map_err(|_| OvertureError::encode("sink stopped accepting frames"))
            };
            let mut sequential = CpuBackend::new();
            let mut chunk_start = range.start.0;
            while chunk_start < range.end.0 {
                let chunk_end = (chunk_start + chunk_size).min(range.end.0);
                match pool.as_ref() {
                    Some(pool) => {
                        let rendered = pool.install(|| {
                            (chunk_start..chunk_end)
                                .into_par_iter()
                                .map_init(CpuBackend::new, |backend, f| {
                                    frames
                                        .render_frame(backend, FrameIndex(f))
                                        .map(|frame| (f, frame))
                                })
                                .collect::<Vec<_>>()
                        });
                        for r in rendered {
                            let (f, frame) = r?;
                            send(FrameIndex(f), frame)?;
                        }
                    }
                    None => {
                        for f in chunk_start..chunk_end {
                            let frame = frames.render_frame(&mut sequential, FrameIndex(f))?;
                            send(FrameIndex(f), frame)?;
                        }
                    }
                }
                stats.frames_total += chunk_end - chunk_start;
                stats.chunks += 1;
                chunk_start = chunk_end;
            }
            Ok(())
        })();

        drop(tx);
        let enc_res = enc
            .join()
            .map_err(|_| OvertureError::encode("encoder thread panicked"))?;
        match (produced, enc_res) {
            (Ok(()), Ok(())) => Ok(stats),
            // The sink failed first; its error is the cause of the closed channel.
            (Err(OvertureError::Encode(_)), Err(e)) => Err(e),
            (Err(e), _) | (Ok(()), Err(e)) => Err(e),
        }
    })
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<FrameRGBA>,
}

fn build_thread_pool(threads: Option<usize>) -> OvertureResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(OvertureError::validation("export 'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| OvertureError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/export.rs"]
mod tests;
