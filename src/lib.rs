//! drawon turns SVG paths into draw-on animations.
//!
//! The engine is a chain of pure steps:
//!
//! - Parse path data into absolute [`PathSegment`]s
//! - Measure each path into a [`LengthTable`]
//! - Stagger the paths over the timeline with [`schedule`]
//! - [`evaluate`] any path at any time into a [`PartialPathState`]
//!
//! [`Animator`] ties these together for a loaded [`Drawing`]. Frame exporters rasterize its
//! [`FrameSnapshot`]s with [`CpuRasterizer`] and stream them into a [`FrameSink`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod encode;
pub(crate) mod engine;
pub(crate) mod export;
pub(crate) mod geometry;
pub(crate) mod path;
pub(crate) mod render;
pub(crate) mod style;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, DocumentSize, FrameIndex, MAX_CANVAS_SIDE, Point, Rect, Vec2,
};
pub use crate::foundation::error::{DrawonError, DrawonResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::schedule::{ScheduleEntry, StaggerPolicy, TimingSchedule, schedule};
pub use crate::animation::state::{
    DEFAULT_FILL_DURATION_FRACTION, FillPolicy, PartialPathState, Phase, evaluate,
};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_encoder_available, is_ffmpeg_on_path,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::animator::{Animator, FrameSnapshot, PathFrame, StrokeDash};
pub use crate::engine::config::AnimationConfig;
pub use crate::engine::drawing::{Drawing, MeasuredPath, PathListing, PathSource, SkippedPath};
pub use crate::engine::pen::{PenPose, PenTracker};
pub use crate::export::pipeline::{
    CancelToken, ExportOptions, ExportProgress, ExportStats, RenderThreading, export_frames,
    export_video, export_video_with,
};
pub use crate::geometry::sampler::{
    LengthEntry, LengthTable, SAMPLE_DENSITY, build_length_table, point_at_fraction,
    segment_length, tangent_at_fraction,
};
pub use crate::geometry::trim::partial_bezpath;
pub use crate::path::model::Path;
pub use crate::path::parser::{parse_path_data, segments_to_svg_d};
pub use crate::path::segment::{ArcSegment, PathSegment};
pub use crate::render::backend::{FrameRGBA, FrameRasterizer};
pub use crate::render::cpu::{CpuRasterizer, PenMarker};
pub use crate::style::color::Rgba8;
pub use crate::style::paint::{FillRule, PathStyle, ResolvedStyle};
