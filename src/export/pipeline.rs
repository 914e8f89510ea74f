use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::engine::animator::Animator;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::render::backend::{FrameRGBA, FrameRasterizer};

/// Frame rendering parallelism.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Rasterize each chunk on a rayon pool.
    pub parallel: bool,
    /// Frames rasterized before they are handed to the sink. `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    pub threading: RenderThreading,
}

/// Reported after every frame handed to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportProgress {
    /// Index of the frame just pushed.
    pub frame: FrameIndex,
    pub total: u64,
}

impl ExportProgress {
    pub fn done(&self) -> u64 {
        self.frame.0 + 1
    }

    pub fn fraction(&self) -> f64 {
        self.done() as f64 / self.total.max(1) as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub frames_total: u64,
    pub frames_pushed: u64,
}

/// Shared flag that stops a running export between frames.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Rasterize every frame of `animator`'s timeline and stream it into `sink`.
///
/// Frames are pushed in index order. On any error or on cancellation the sink is aborted, so
/// nothing partial is left behind by sinks that write files.
#[tracing::instrument(skip_all, fields(frames = animator.frame_count()))]
pub fn export_frames(
    animator: &Animator<'_>,
    rasterizer: &dyn FrameRasterizer,
    sink: &mut dyn FrameSink,
    opts: &ExportOptions,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> DrawonResult<ExportStats> {
    let canvas = rasterizer.canvas();
    let cfg = SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: animator.config().fps,
    };

    let result = run(animator, rasterizer, &mut *sink, cfg, opts, progress, cancel);
    if let Err(e) = &result {
        tracing::debug!(error = %e, "export aborted");
        sink.abort();
    }
    result
}

fn run(
    animator: &Animator<'_>,
    rasterizer: &dyn FrameRasterizer,
    sink: &mut dyn FrameSink,
    cfg: SinkConfig,
    opts: &ExportOptions,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> DrawonResult<ExportStats> {
    sink.begin(cfg)?;
    let stats = push_all(animator, rasterizer, &mut *sink, opts, progress, cancel)?;
    sink.end()?;
    Ok(stats)
}

fn push_all(
    animator: &Animator<'_>,
    rasterizer: &dyn FrameRasterizer,
    sink: &mut dyn FrameSink,
    opts: &ExportOptions,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> DrawonResult<ExportStats> {
    let total = animator.frame_count();
    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };
    let mut stats = ExportStats {
        frames_total: total,
        frames_pushed: 0,
    };

    let mut push = |idx: FrameIndex, frame: &FrameRGBA| -> DrawonResult<()> {
        if cancel.is_cancelled() {
            return Err(DrawonError::Cancelled);
        }
        sink.push_frame(idx, frame)?;
        stats.frames_pushed += 1;
        progress(ExportProgress { frame: idx, total });
        Ok(())
    };

    let mut chunk_start = 0;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);
        match pool.as_ref() {
            Some(pool) => {
                if cancel.is_cancelled() {
                    return Err(DrawonError::Cancelled);
                }
                let frames = pool.install(|| {
                    (chunk_start..chunk_end)
                        .into_par_iter()
                        .map(|f| rasterizer.rasterize(&animator.frame_snapshot(FrameIndex(f))))
                        .collect::<Vec<_>>()
                });
                for (f, frame) in (chunk_start..chunk_end).zip(frames) {
                    push(FrameIndex(f), &frame?)?;
                }
            }
            None => {
                for f in chunk_start..chunk_end {
                    if cancel.is_cancelled() {
                        return Err(DrawonError::Cancelled);
                    }
                    let frame = rasterizer.rasterize(&animator.frame_snapshot(FrameIndex(f)))?;
                    push(FrameIndex(f), &frame)?;
                }
            }
        }
        chunk_start = chunk_end;
    }

    Ok(stats)
}

/// Encode `animator`'s timeline to a video file through `ffmpeg`.
///
/// Alpha is flattened over the animation's background color.
pub fn export_video(
    animator: &Animator<'_>,
    rasterizer: &dyn FrameRasterizer,
    out_path: impl Into<PathBuf>,
    opts: &ExportOptions,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> DrawonResult<ExportStats> {
    let sink_opts =
        FfmpegSinkOpts::new(out_path).with_background(animator.config().background_color);
    export_video_with(animator, rasterizer, sink_opts, opts, progress, cancel)
}

/// [`export_video`] with explicit encoder settings.
pub fn export_video_with(
    animator: &Animator<'_>,
    rasterizer: &dyn FrameRasterizer,
    sink_opts: FfmpegSinkOpts,
    opts: &ExportOptions,
    progress: &mut dyn FnMut(ExportProgress),
    cancel: &CancelToken,
) -> DrawonResult<ExportStats> {
    let out = sink_opts.out_path.clone();
    let mut sink = FfmpegSink::new(sink_opts);
    let stats = export_frames(animator, rasterizer, &mut sink, opts, progress, cancel)?;
    tracing::info!(
        out = %out.display(),
        frames = stats.frames_pushed,
        "video export finalized"
    );
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> DrawonResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DrawonError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DrawonError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
