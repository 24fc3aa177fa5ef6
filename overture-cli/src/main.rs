use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "overture", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a given progress as a PNG.
    Frame(FrameArgs),
    /// Print caption states across the intro as JSON lines.
    Captions(CaptionsArgs),
    /// Run a session on a virtual clock and print its lifecycle as JSON.
    Simulate(SimulateArgs),
    /// Render the intro to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the intro as a numbered PNG sequence.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input intro config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CaptionsArgs {
    /// Input intro config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Progress step between samples (at least 1e-4).
    #[arg(long, default_value_t = 0.05)]
    step: f64,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input intro config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Press the skip button at this virtual time.
    #[arg(long)]
    skip_at_ms: Option<f64>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input intro config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input intro config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Captions(args) => cmd_captions(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Render(args) => cmd_render(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_config(path: &std::path::Path) -> anyhow::Result<overture::IntroConfig> {
    let cfg = overture::IntroConfig::from_path(path)?;
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.in_path)?;
    let frame = overture::render_progress(&cfg, args.progress)?;
    overture::ensure_parent_dir(&args.out)?;
    overture::write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

const MIN_CAPTION_STEP: f64 = 1e-4;

fn cmd_captions(args: CaptionsArgs) -> anyhow::Result<()> {
    if !args.step.is_finite() || args.step < MIN_CAPTION_STEP {
        anyhow::bail!("--step must be finite and >= {MIN_CAPTION_STEP}");
    }
    let cfg = load_config(&args.in_path)?;
    let samples = (1.0 / args.step - 1e-9).ceil() as u64;
    for i in 0..=samples {
        let progress = ((i as f64) * args.step).min(1.0);
        let states = overture::sync_captions(&cfg.captions, progress);
        let line = serde_json::json!({ "progress": progress, "states": states });
        println!("{line}");
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.in_path)?;
    let mut host = overture::SimulatedHost::new(cfg.viewport, cfg.fps)
        .with_captions(cfg.captions.clone());
    let mut session = overture::IntroSession::initialize(&mut host, cfg.session_opts())?
        .context("simulated page has no intro surface")?;

    let step = cfg.fps.frame_duration_ms();
    let limit = overture::DURATION_MS + overture::HIDE_DELAY_MS + 4.0 * step;
    let mut skipped_at = None;
    let mut finished_at = None;
    let mut hidden_at = None;
    let mut t = 0.0;
    while t <= limit && hidden_at.is_none() {
        t += step;
        if let Some(skip) = args.skip_at_ms
            && skipped_at.is_none()
            && skip <= t
        {
            host.advance_to(&mut session, skip)?;
            host.input(&mut session, overture::InputEvent::SkipButton);
            skipped_at = Some(skip);
        }
        host.advance_to(&mut session, t)?;
        if finished_at.is_none() && session.is_finished() {
            finished_at = Some(skipped_at.unwrap_or(t));
        }
        if !host.is_layer_visible() {
            hidden_at = Some(t);
        }
    }

    let summary = serde_json::json!({
        "frames_presented": host.frames_presented(),
        "progress": session.progress(),
        "skipped_at_ms": skipped_at,
        "finished_at_ms": finished_at,
        "layer_hidden_at_ms": hidden_at,
        "presentation": host.presentation(),
        "captions": host.caption_states(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.in_path)?;
    let opts = overture::ExportOpts {
        parallel: args.parallel,
        threads: args.threads,
        chunk_size: args.chunk_size,
        ..overture::ExportOpts::default()
    };
    let mut sink = overture::FfmpegSink::new(overture::FfmpegSinkOpts::new(&args.out));
    let stats = overture::export_intro(&cfg, opts, &mut sink)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_total);
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.in_path)?;
    let mut sink = overture::PngSequenceSink::new(&args.out_dir);
    let stats = overture::export_intro(&cfg, overture::ExportOpts::default(), &mut sink)?;
    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        args.out_dir.display()
    );
    Ok(())
}
