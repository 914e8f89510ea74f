use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use drawon::{
    AnimationConfig, Animator, CancelToken, Canvas, CpuRasterizer, Drawing, Ease, ExportOptions,
    FfmpegSinkOpts, FrameRasterizer as _, PenMarker, PenTracker, RenderThreading, Rgba8,
    StaggerPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "drawon", version, about = "Draw-on animations for SVG paths")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the schedule and per-path state as JSON.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input SVG document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Animation config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output width in pixels (default: document width rounded up to even).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (default: document height rounded up to even).
    #[arg(long)]
    height: Option<u32>,

    /// Total duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    #[arg(long)]
    fps: Option<u32>,

    /// Fade fills in after drawing.
    #[arg(long)]
    fill: Option<bool>,

    #[arg(long)]
    stroke_color: Option<Rgba8>,

    #[arg(long)]
    stroke_width: Option<f64>,

    #[arg(long)]
    background_color: Option<Rgba8>,

    /// `none`, `sequential` or `overlapping:<fraction>`.
    #[arg(long = "stagger")]
    stagger_policy: Option<StaggerPolicy>,

    /// `linear`, `ease-in`, `ease-out` or `ease-in-out`.
    #[arg(long = "easing")]
    easing_kind: Option<Ease>,

    #[arg(long)]
    fill_duration_fraction: Option<f64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Timeline position as a fraction in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Mark the pen tip of the path being drawn.
    #[arg(long)]
    pen: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Mark the pen tip of the path being drawn.
    #[arg(long)]
    pen: bool,

    /// Rasterize frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    #[arg(long)]
    threads: Option<usize>,

    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Video codec passed to ffmpeg.
    #[arg(long, default_value = "libx264")]
    codec: String,

    #[arg(long, default_value_t = 23)]
    crf: u8,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Timeline position as a fraction in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    time: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

impl CommonArgs {
    fn load_drawing(&self) -> anyhow::Result<Drawing> {
        Drawing::from_svg_file(&self.in_path)
            .with_context(|| format!("load svg '{}'", self.in_path.display()))
    }

    fn animation_config(&self) -> anyhow::Result<AnimationConfig> {
        let mut cfg = match &self.config {
            Some(path) => AnimationConfig::from_json_file(path)?,
            None => AnimationConfig::default(),
        };
        if let Some(v) = self.duration {
            cfg.duration = v;
        }
        if let Some(v) = self.fps {
            cfg.fps = v;
        }
        if let Some(v) = self.fill {
            cfg.fill = v;
        }
        if let Some(v) = self.stroke_color {
            cfg.stroke_color = v;
        }
        if let Some(v) = self.stroke_width {
            cfg.stroke_width = v;
        }
        if let Some(v) = self.background_color {
            cfg.background_color = v;
        }
        if let Some(v) = self.stagger_policy {
            cfg.stagger_policy = v;
        }
        if let Some(v) = self.easing_kind {
            cfg.easing_kind = v;
        }
        if let Some(v) = self.fill_duration_fraction {
            cfg.fill_duration_fraction = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn canvas(&self, drawing: &Drawing) -> anyhow::Result<Canvas> {
        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (w, h) => {
                let fallback = Canvas::covering_even(drawing.size())
                    .context("pick a canvas size with --width/--height")?;
                (w.unwrap_or(fallback.width), h.unwrap_or(fallback.height))
            }
        };
        Ok(Canvas::new(width, height)?)
    }

    fn rasterizer(&self, drawing: &Drawing, pen: bool) -> anyhow::Result<CpuRasterizer> {
        let r = CpuRasterizer::new(self.canvas(drawing)?, drawing)?;
        Ok(if pen {
            r.with_pen_marker(PenMarker {
                tracker: PenTracker::default(),
                color: Rgba8::opaque(220, 40, 40),
                radius: 4.0,
            })
        } else {
            r
        })
    }
}

fn check_time(time: f64) -> anyhow::Result<f64> {
    if !(0.0..=1.0).contains(&time) {
        anyhow::bail!("--time must be a fraction in [0, 1], got {time}");
    }
    Ok(time)
}

fn report_skipped(drawing: &Drawing) {
    for skipped in drawing.skipped() {
        eprintln!("skipped path '{}': {}", skipped.id, skipped.reason);
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let time = check_time(args.time)?;
    let config = args.common.animation_config()?;
    let drawing = args.common.load_drawing()?;
    report_skipped(&drawing);
    let animator = Animator::new(&drawing, config)?;
    let rasterizer = args.common.rasterizer(&drawing, args.pen)?;

    let frame = rasterizer.rasterize(&animator.snapshot(time))?;

    drawon::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = args.common.animation_config()?;
    let drawing = args.common.load_drawing()?;
    report_skipped(&drawing);
    let animator = Animator::new(&drawing, config)?;
    let rasterizer = args.common.rasterizer(&drawing, args.pen)?;

    let mut sink_opts = FfmpegSinkOpts::new(&args.out)
        .with_background(animator.config().background_color);
    sink_opts.codec = args.codec;
    sink_opts.crf = Some(args.crf);

    let opts = ExportOptions {
        threading: RenderThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
        },
    };

    let stats = drawon::export_video_with(
        &animator,
        &rasterizer,
        sink_opts,
        &opts,
        &mut |p| eprint!("\rframe {}/{}", p.done(), p.total),
        &CancelToken::new(),
    );
    eprintln!();
    let stats = stats.with_context(|| format!("render '{}'", args.out.display()))?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_pushed);
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let time = check_time(args.time)?;
    let config = args.common.animation_config()?;
    let drawing = args.common.load_drawing()?;
    let animator = Animator::new(&drawing, config)?;

    let report = serde_json::json!({
        "source": display_path(&args.common.in_path),
        "view_box": drawing.view_box(),
        "config": animator.config(),
        "paths": drawing.path_listing(),
        "skipped": drawing.skipped(),
        "schedule": animator.schedule(),
        "time": time,
        "states": animator.evaluate_all(time),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
