use std::collections::BTreeMap;

use crate::animation::schedule::{ScheduleEntry, TimingSchedule, schedule};
use crate::animation::state::{FillPolicy, PartialPathState, evaluate};
use crate::engine::config::AnimationConfig;
use crate::engine::drawing::{Drawing, MeasuredPath};
use crate::foundation::core::{BezPath, FrameIndex, Point, Vec2};
use crate::foundation::error::DrawonResult;
use crate::style::color::Rgba8;
use crate::style::paint::ResolvedStyle;

/// Stroke-dash values that reproduce the drawn fraction in markup exporters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeDash {
    pub dash_array: f64,
    pub dash_offset: f64,
}

impl StrokeDash {
    pub fn for_fraction(total_length: f64, drawn: f64) -> Self {
        Self {
            dash_array: total_length,
            dash_offset: total_length * (1.0 - drawn),
        }
    }
}

/// Everything a renderer needs to draw one path at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PathFrame {
    pub id: String,
    pub state: PartialPathState,
    pub style: ResolvedStyle,
    pub total_length: f64,
    pub dash: StrokeDash,
    /// The drawn part of the outline.
    pub stroke: BezPath,
    /// The full outline, present once fill opacity is above zero.
    pub fill_outline: Option<BezPath>,
    /// Tip of the drawn part.
    pub head: Point,
    /// Unit direction of travel at the tip.
    pub tangent: Vec2,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    pub time_fraction: f64,
    pub background: Rgba8,
    /// One entry per path, in document order.
    pub paths: Vec<PathFrame>,
}

/// A drawing bound to one configuration and its precomputed schedule.
///
/// All queries are pure; an `Animator` can be shared across threads.
#[derive(Clone, Debug)]
pub struct Animator<'a> {
    drawing: &'a Drawing,
    config: AnimationConfig,
    schedule: TimingSchedule,
}

impl<'a> Animator<'a> {
    /// Validate `config` and schedule every measured path of `drawing`.
    #[tracing::instrument(skip(drawing), fields(paths = drawing.paths().len()))]
    pub fn new(drawing: &'a Drawing, config: AnimationConfig) -> DrawonResult<Self> {
        config.validate()?;
        let schedule = schedule(
            &drawing.path_ids(),
            config.duration,
            config.stagger_policy,
            config.easing_kind,
        )?;
        Ok(Self {
            drawing,
            config,
            schedule,
        })
    }

    pub fn drawing(&self) -> &'a Drawing {
        self.drawing
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn schedule(&self) -> &TimingSchedule {
        &self.schedule
    }

    pub fn frame_count(&self) -> u64 {
        self.config.frame_count()
    }

    pub fn frame_time_fraction(&self, frame: FrameIndex) -> f64 {
        self.config.frame_time_fraction(frame)
    }

    /// Convert seconds on the timeline to a fraction in `[0, 1]`.
    pub fn time_fraction_at(&self, seconds: f64) -> f64 {
        (seconds / self.config.duration).clamp(0.0, 1.0)
    }

    /// Paths without a fill color never enter the fill phase.
    fn fill_policy(&self, path: &MeasuredPath) -> FillPolicy {
        if path.path().style().fill.is_some() {
            self.config.fill_policy()
        } else {
            FillPolicy::Disabled
        }
    }

    fn entries(&self) -> impl Iterator<Item = (&'a MeasuredPath, &ScheduleEntry)> + '_ {
        self.drawing.paths().iter().zip(self.schedule.entries())
    }

    /// State of path `id` at `t`, or `None` for an unknown id.
    pub fn evaluate(&self, id: &str, t: f64) -> Option<PartialPathState> {
        let entry = self.schedule.get(id)?;
        let path = self.drawing.get(id)?;
        Some(evaluate(entry, t, self.fill_policy(path)))
    }

    pub fn evaluate_all(&self, t: f64) -> BTreeMap<String, PartialPathState> {
        self.entries()
            .map(|(path, entry)| {
                (
                    entry.path_id.clone(),
                    evaluate(entry, t, self.fill_policy(path)),
                )
            })
            .collect()
    }

    pub fn snapshot(&self, t: f64) -> FrameSnapshot {
        let paths = self
            .entries()
            .map(|(path, entry)| self.path_frame(path, entry, t))
            .collect();
        FrameSnapshot {
            time_fraction: t.clamp(0.0, 1.0),
            background: self.config.background_color,
            paths,
        }
    }

    pub fn frame_snapshot(&self, frame: FrameIndex) -> FrameSnapshot {
        self.snapshot(self.frame_time_fraction(frame))
    }

    fn path_frame(&self, path: &MeasuredPath, entry: &ScheduleEntry, t: f64) -> PathFrame {
        let state = evaluate(entry, t, self.fill_policy(path));
        let drawn = state.drawn_length_fraction;
        let style = ResolvedStyle::resolve(
            path.path().style(),
            self.config.stroke_color,
            self.config.stroke_width,
        );
        let fill_outline = (state.fill_opacity > 0.0 && style.fill.is_some())
            .then(|| path.path().to_bezpath());
        PathFrame {
            id: entry.path_id.clone(),
            state,
            style,
            total_length: path.total_length(),
            dash: StrokeDash::for_fraction(path.total_length(), drawn),
            stroke: path.partial(drawn),
            fill_outline,
            head: path.point_at(drawn),
            tangent: path.tangent_at(drawn),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/animator.rs"]
mod tests;
