use std::f64::consts::TAU;

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, QuadBez};

use crate::foundation::core::{Point, Vec2};

/// One drawing command with absolute coordinates.
///
/// Every drawable variant carries its start point (`from`) so a segment can be evaluated
/// without looking at its neighbours.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo {
        to: Point,
    },
    LineTo {
        from: Point,
        to: Point,
    },
    CubicCurve {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    QuadraticCurve {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    ArcTo(ArcSegment),
    /// Marks the end of a closed subpath. The closing line, if any, precedes it as a `LineTo`.
    Close {
        to: Point,
    },
}

impl PathSegment {
    /// Absolute end point of the segment.
    pub fn end_point(&self) -> Point {
        match self {
            Self::MoveTo { to }
            | Self::LineTo { to, .. }
            | Self::CubicCurve { to, .. }
            | Self::QuadraticCurve { to, .. }
            | Self::Close { to } => *to,
            Self::ArcTo(arc) => arc.to,
        }
    }

    /// Whether the segment contributes stroke length.
    pub fn is_drawable(&self) -> bool {
        !matches!(self, Self::MoveTo { .. } | Self::Close { .. })
    }

    /// Whether the length of this segment is measured by chord sampling.
    pub fn is_sampled(&self) -> bool {
        matches!(
            self,
            Self::CubicCurve { .. } | Self::QuadraticCurve { .. } | Self::ArcTo(_)
        )
    }

    /// Point at local parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        match self {
            Self::MoveTo { to } | Self::Close { to } => *to,
            Self::LineTo { from, to } => from.lerp(*to, t),
            Self::CubicCurve {
                from,
                ctrl1,
                ctrl2,
                to,
            } => CubicBez::new(*from, *ctrl1, *ctrl2, *to).eval(t),
            Self::QuadraticCurve { from, ctrl, to } => QuadBez::new(*from, *ctrl, *to).eval(t),
            Self::ArcTo(arc) => arc.eval(t),
        }
    }

    /// First derivative with respect to the local parameter.
    pub fn deriv(&self, t: f64) -> Vec2 {
        match self {
            Self::MoveTo { .. } | Self::Close { .. } => Vec2::ZERO,
            Self::LineTo { from, to } => *to - *from,
            Self::CubicCurve {
                from,
                ctrl1,
                ctrl2,
                to,
            } => CubicBez::new(*from, *ctrl1, *ctrl2, *to)
                .deriv()
                .eval(t)
                .to_vec2(),
            Self::QuadraticCurve { from, ctrl, to } => {
                QuadBez::new(*from, *ctrl, *to).deriv().eval(t).to_vec2()
            }
            Self::ArcTo(arc) => arc.deriv(t),
        }
    }
}

/// Elliptical arc kept in both endpoint form (for re-serialization) and center form
/// (for sampling).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArcSegment {
    pub from: Point,
    pub to: Point,
    /// Radii as written in the path data (absolute values).
    pub radii: Vec2,
    /// Rotation of the ellipse x-axis, in degrees, as written in the path data.
    pub x_rotation_deg: f64,
    pub large_arc: bool,
    pub sweep: bool,
    pub center: Point,
    /// Radii after out-of-range correction.
    pub center_radii: Vec2,
    /// Angle of `from` on the unrotated ellipse, in radians.
    pub start_angle: f64,
    /// Signed angular extent, in radians. Positive sweeps follow increasing angles.
    pub sweep_angle: f64,
}

/// Result of converting an endpoint-parameterized arc.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ArcParameterization {
    Center(ArcSegment),
    /// Zero radius: the arc degenerates to a straight line.
    LineTo,
    /// Coincident endpoints: the arc is omitted.
    Omit,
}

impl ArcSegment {
    /// Convert SVG endpoint parameters into center form (SVG 2 implementation notes B.2.4).
    pub(crate) fn from_endpoints(
        from: Point,
        to: Point,
        radii: Vec2,
        x_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
    ) -> ArcParameterization {
        if from == to {
            return ArcParameterization::Omit;
        }

        let mut rx = radii.x.abs();
        let mut ry = radii.y.abs();
        if rx * rx < f64::EPSILON || ry * ry < f64::EPSILON {
            return ArcParameterization::LineTo;
        }

        let phi = x_rotation_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let mid_x = (from.x - to.x) / 2.0;
        let mid_y = (from.y - to.y) / 2.0;
        let x1_ = cos_phi * mid_x + sin_phi * mid_y;
        let y1_ = -sin_phi * mid_x + cos_phi * mid_y;

        let lambda = (x1_ / rx).powi(2) + (y1_ / ry).powi(2);
        if lambda > 1.0 {
            rx *= lambda.sqrt();
            ry *= lambda.sqrt();
        }

        let d = (rx * y1_).powi(2) + (ry * x1_).powi(2);
        if d == 0.0 {
            return ArcParameterization::Omit;
        }
        let mut k = ((rx * ry).powi(2) / d - 1.0).abs().sqrt();
        if sweep == large_arc {
            k = -k;
        }
        let cx_ = k * rx * y1_ / ry;
        let cy_ = -k * ry * x1_ / rx;

        let cx = cos_phi * cx_ - sin_phi * cy_ + (from.x + to.x) / 2.0;
        let cy = sin_phi * cx_ + cos_phi * cy_ + (from.y + to.y) / 2.0;

        let u = Vec2::new((x1_ - cx_) / rx, (y1_ - cy_) / ry);
        let v = Vec2::new((-x1_ - cx_) / rx, (-y1_ - cy_) / ry);
        if u.hypot() == 0.0 || v.hypot() == 0.0 {
            return ArcParameterization::Omit;
        }

        let start_angle = u.y.atan2(u.x);
        let mut sweep_angle = angle_between(u, v);
        if sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        } else if !sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        }

        ArcParameterization::Center(ArcSegment {
            from,
            to,
            radii: Vec2::new(radii.x.abs(), radii.y.abs()),
            x_rotation_deg,
            large_arc,
            sweep,
            center: Point::new(cx, cy),
            center_radii: Vec2::new(rx, ry),
            start_angle,
            sweep_angle,
        })
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep_angle * t
    }

    pub fn eval(&self, t: f64) -> Point {
        // The endpoints are exact; only interior points go through the trigonometry.
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        let (sin_phi, cos_phi) = self.x_rotation_deg.to_radians().sin_cos();
        let (sin_t, cos_t) = self.angle_at(t).sin_cos();
        let (rx, ry) = (self.center_radii.x, self.center_radii.y);
        Point::new(
            self.center.x + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
            self.center.y + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
        )
    }

    pub fn deriv(&self, t: f64) -> Vec2 {
        let (sin_phi, cos_phi) = self.x_rotation_deg.to_radians().sin_cos();
        let (sin_t, cos_t) = self.angle_at(t.clamp(0.0, 1.0)).sin_cos();
        let (rx, ry) = (self.center_radii.x, self.center_radii.y);
        Vec2::new(
            -rx * sin_t * cos_phi - ry * cos_t * sin_phi,
            -rx * sin_t * sin_phi + ry * cos_t * cos_phi,
        ) * self.sweep_angle
    }

    /// The portion of this arc covering local parameters `[0, t]` as a `kurbo::Arc`.
    pub fn to_kurbo(&self, t: f64) -> kurbo::Arc {
        kurbo::Arc {
            center: self.center,
            radii: self.center_radii,
            start_angle: self.start_angle,
            sweep_angle: self.sweep_angle * t.clamp(0.0, 1.0),
            x_rotation: self.x_rotation_deg.to_radians(),
        }
    }
}

fn angle_between(u: Vec2, v: Vec2) -> f64 {
    let cos = (u.dot(v) / (u.hypot() * v.hypot())).clamp(-1.0, 1.0);
    let angle = cos.acos();
    if u.cross(v) < 0.0 { -angle } else { angle }
}

#[cfg(test)]
#[path = "../../tests/unit/path/segment.rs"]
mod tests;
