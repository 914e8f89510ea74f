//! Per-path animation state as a pure function of the schedule and global time.

use crate::animation::schedule::ScheduleEntry;
use crate::foundation::math::clamp01;

/// Default length of the fill-in ramp, as a fraction of the whole timeline.
pub const DEFAULT_FILL_DURATION_FRACTION: f64 = 0.1;

/// Progress within this distance of 1 counts as finished, absorbing rounding in window sums.
const PROGRESS_EPSILON: f64 = 1e-9;

/// Whether fill fades in once a path is fully drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FillPolicy {
    Disabled,
    /// Linear ramp starting at draw end and lasting `duration_fraction` of the timeline,
    /// shortened so it finishes by the end of the timeline.
    AfterDraw { duration_fraction: f64 },
}

impl FillPolicy {
    pub fn after_draw(enabled: bool, duration_fraction: f64) -> Self {
        if enabled {
            Self::AfterDraw { duration_fraction }
        } else {
            Self::Disabled
        }
    }
}

/// Where a path is in `NotStarted -> Drawing -> (DrawnNoFill | FillingIn) -> Complete`.
///
/// `DrawnNoFill` is the final phase of paths that are never filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Drawing,
    DrawnNoFill,
    FillingIn,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartialPathState {
    pub drawn_length_fraction: f64,
    pub fill_opacity: f64,
    pub is_visible: bool,
    pub phase: Phase,
}

/// Evaluate one path's state at `global_time_fraction` (clamped to `[0, 1]`).
pub fn evaluate(
    entry: &ScheduleEntry,
    global_time_fraction: f64,
    fill: FillPolicy,
) -> PartialPathState {
    debug_assert!(
        global_time_fraction.is_finite(),
        "global time fraction must be finite"
    );
    let t = clamp01(global_time_fraction);
    let start = entry.start_fraction;
    let draw_end = entry.end_fraction();

    let local_t = if entry.duration_fraction > 0.0 {
        progress(t - start, entry.duration_fraction)
    } else if t >= start {
        1.0
    } else {
        0.0
    };
    let drawn = entry.easing.apply(local_t);
    let is_visible = t >= start;

    let fill_opacity = match fill {
        FillPolicy::Disabled => 0.0,
        FillPolicy::AfterDraw { .. } if local_t < 1.0 => 0.0,
        FillPolicy::AfterDraw { duration_fraction } => {
            let ramp = duration_fraction.max(0.0).min(1.0 - draw_end);
            if ramp <= 0.0 {
                1.0
            } else {
                progress(t - draw_end, ramp)
            }
        }
    };

    let phase = if !is_visible {
        Phase::NotStarted
    } else if local_t < 1.0 {
        Phase::Drawing
    } else {
        match fill {
            FillPolicy::Disabled => Phase::DrawnNoFill,
            FillPolicy::AfterDraw { .. } if fill_opacity < 1.0 => Phase::FillingIn,
            FillPolicy::AfterDraw { .. } => Phase::Complete,
        }
    };

    PartialPathState {
        drawn_length_fraction: drawn,
        fill_opacity,
        is_visible,
        phase,
    }
}

fn progress(elapsed: f64, span: f64) -> f64 {
    let p = clamp01(elapsed / span);
    if p >= 1.0 - PROGRESS_EPSILON { 1.0 } else { p }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/state.rs"]
mod tests;
