use kurbo::{CubicBez, ParamCurve, QuadBez};

use crate::foundation::core::BezPath;
use crate::foundation::math::clamp01;
use crate::geometry::sampler::LengthTable;
use crate::path::model::{ARC_TOLERANCE, Path};
use crate::path::segment::PathSegment;

/// The leading part of `path` covering length fraction `[0, fraction]`.
///
/// Whole segments before the cut are copied, including their move and close markers; the
/// segment containing the cut is subdivided. An empty path is returned at fraction 0.
pub fn partial_bezpath(path: &Path, table: &LengthTable, fraction: f64) -> BezPath {
    let fraction = clamp01(fraction);
    if fraction <= 0.0 {
        return BezPath::new();
    }
    if fraction >= 1.0 {
        return path.to_bezpath();
    }

    let (cut, t) = table.locate(fraction);
    let mut bp = BezPath::new();
    for seg in &path.segments()[..cut] {
        push_whole(&mut bp, seg);
    }
    if t > 0.0 {
        push_partial(&mut bp, &path.segments()[cut], t);
    }
    bp
}

fn push_whole(bp: &mut BezPath, seg: &PathSegment) {
    push_partial(bp, seg, 1.0);
}

fn push_partial(bp: &mut BezPath, seg: &PathSegment, t: f64) {
    match seg {
        PathSegment::MoveTo { to } => bp.move_to(*to),
        PathSegment::Close { .. } => bp.close_path(),
        PathSegment::LineTo { from, to } => bp.line_to(from.lerp(*to, t)),
        PathSegment::CubicCurve {
            from,
            ctrl1,
            ctrl2,
            to,
        } => {
            let c = CubicBez::new(*from, *ctrl1, *ctrl2, *to).subsegment(0.0..t);
            bp.curve_to(c.p1, c.p2, c.p3);
        }
        PathSegment::QuadraticCurve { from, ctrl, to } => {
            let q = QuadBez::new(*from, *ctrl, *to).subsegment(0.0..t);
            bp.quad_to(q.p1, q.p2);
        }
        PathSegment::ArcTo(arc) => {
            for el in arc.to_kurbo(t).append_iter(ARC_TOLERANCE) {
                bp.push(el);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/trim.rs"]
mod tests;
