//! Arc-length measurement by chord sampling.
//!
//! Lines are measured exactly. Curves and arcs are evaluated at `density + 1` uniformly
//! spaced parameters and their chord lengths summed. The density is fixed so that every
//! consumer of a [`LengthTable`] sees the same lengths.

use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::foundation::math::clamp01;
use crate::path::model::Path;
use crate::path::segment::PathSegment;

/// Chords per curve or arc segment.
pub const SAMPLE_DENSITY: usize = 40;

/// One sample: cumulative length up to `point`, located at parameter `t` of `segment`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LengthEntry {
    pub length: f64,
    pub segment: usize,
    pub t: f64,
    pub point: Point,
}

/// Cumulative length table for one path. Entries are in path order with non-decreasing
/// `length`; `total` is the last entry's length.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LengthTable {
    entries: Vec<LengthEntry>,
    total: f64,
    density: usize,
}

impl LengthTable {
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn density(&self) -> usize {
        self.density
    }

    pub fn entries(&self) -> &[LengthEntry] {
        &self.entries
    }

    /// The sampled polyline, one point per entry.
    pub fn polyline(&self) -> impl Iterator<Item = Point> + '_ {
        self.entries.iter().map(|e| e.point)
    }

    /// Map a length fraction to `(segment index, local parameter)`.
    ///
    /// Within a chord the parameter is interpolated linearly by length.
    pub fn locate(&self, fraction: f64) -> (usize, f64) {
        let target = clamp01(fraction) * self.total;
        let idx = self
            .entries
            .partition_point(|e| e.length < target)
            .min(self.entries.len().saturating_sub(1));
        let Some(next) = self.entries.get(idx).copied() else {
            return (0, 0.0);
        };
        if idx == 0 {
            return (next.segment, next.t);
        }
        let prev = self.entries[idx - 1];
        let span = next.length - prev.length;
        if prev.segment != next.segment || span <= 0.0 {
            return (next.segment, next.t);
        }
        let u = (target - prev.length) / span;
        (next.segment, prev.t + (next.t - prev.t) * u)
    }
}

/// Length of one segment at the given sampling density. Move and close markers measure zero.
pub fn segment_length(segment: &PathSegment, density: usize) -> f64 {
    match segment {
        PathSegment::MoveTo { .. } | PathSegment::Close { .. } => 0.0,
        PathSegment::LineTo { from, to } => (*to - *from).hypot(),
        _ => {
            let n = density.max(1);
            let mut prev = segment.eval(0.0);
            let mut len = 0.0;
            for k in 1..=n {
                let p = segment.eval(k as f64 / n as f64);
                len += (p - prev).hypot();
                prev = p;
            }
            len
        }
    }
}

/// Measure `path`. Fails with [`DrawonError::DegeneratePath`] when the total length is zero.
pub fn build_length_table(path: &Path, sample_density: usize) -> DrawonResult<LengthTable> {
    if sample_density == 0 {
        return Err(DrawonError::config("sample density must be at least 1"));
    }

    let mut entries = Vec::new();
    let mut cumulative = 0.0;
    for (index, seg) in path.segments().iter().enumerate() {
        if !seg.is_drawable() {
            continue;
        }
        let steps = if seg.is_sampled() { sample_density } else { 1 };
        let mut prev = seg.eval(0.0);
        entries.push(LengthEntry {
            length: cumulative,
            segment: index,
            t: 0.0,
            point: prev,
        });
        for k in 1..=steps {
            let t = k as f64 / steps as f64;
            let p = seg.eval(t);
            cumulative += (p - prev).hypot();
            entries.push(LengthEntry {
                length: cumulative,
                segment: index,
                t,
                point: p,
            });
            prev = p;
        }
    }

    if entries.is_empty() || cumulative <= 0.0 || !cumulative.is_finite() {
        return Err(DrawonError::degenerate(path.id()));
    }

    Ok(LengthTable {
        entries,
        total: cumulative,
        density: sample_density,
    })
}

/// Point at length fraction `f` (clamped to `[0, 1]`).
pub fn point_at_fraction(path: &Path, table: &LengthTable, f: f64) -> Point {
    let (index, t) = table.locate(f);
    path.segments()[index].eval(t)
}

/// Unit tangent at length fraction `f`. Zero only where the path has no direction at all.
pub fn tangent_at_fraction(path: &Path, table: &LengthTable, f: f64) -> Vec2 {
    let (index, t) = table.locate(f);
    let seg = &path.segments()[index];
    let d = seg.deriv(t);
    if d.hypot() > 1e-12 {
        return d.normalize();
    }
    // Cusps and coincident control points: fall back to a chord around `t`.
    let h = 1.0 / table.density().max(1) as f64;
    let chord = seg.eval((t + h).min(1.0)) - seg.eval((t - h).max(0.0));
    if chord.hypot() > 1e-12 {
        chord.normalize()
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/sampler.rs"]
mod tests;
