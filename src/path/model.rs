use crate::foundation::core::BezPath;
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::path::parser::{parse_path_data, segments_to_svg_d};
use crate::path::segment::PathSegment;
use crate::style::paint::PathStyle;

/// Flattening tolerance (document units) used when arcs are converted to cubics.
pub(crate) const ARC_TOLERANCE: f64 = 0.01;

/// One parsed outline with its identity and paint. Immutable after construction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    id: String,
    segments: Vec<PathSegment>,
    style: PathStyle,
    data: String,
}

/// Deserialized form of [`Path`], checked by [`Path::from_segments`].
#[derive(serde::Deserialize)]
struct RawPath {
    id: String,
    segments: Vec<PathSegment>,
    style: PathStyle,
    #[serde(default)]
    data: Option<String>,
}

impl TryFrom<RawPath> for Path {
    type Error = DrawonError;

    fn try_from(raw: RawPath) -> DrawonResult<Self> {
        let mut path = Self::from_segments(raw.id, raw.segments, raw.style)?;
        if let Some(data) = raw.data {
            path.data = data;
        }
        Ok(path)
    }
}

impl Path {
    /// Parse raw path data. Grammar errors carry `id`.
    pub fn parse(id: impl Into<String>, d: &str, style: PathStyle) -> DrawonResult<Self> {
        let id = id.into();
        let segments = parse_path_data(d).map_err(|e| e.with_path_id(&id))?;
        Ok(Self {
            id,
            segments,
            style,
            data: d.to_owned(),
        })
    }

    /// Build from already-absolute segments. The first segment must be a `MoveTo`.
    pub fn from_segments(
        id: impl Into<String>,
        segments: Vec<PathSegment>,
        style: PathStyle,
    ) -> DrawonResult<Self> {
        let id = id.into();
        if !matches!(segments.first(), Some(PathSegment::MoveTo { .. })) {
            return Err(DrawonError::MalformedPath {
                path_id: Some(id),
                offset: 0,
                message: "path must begin with a moveto segment".to_owned(),
            });
        }
        let data = segments_to_svg_d(&segments);
        Ok(Self {
            id,
            segments,
            style,
            data,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    /// Path data as it was given.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Absolute path data regenerated from the parsed segments.
    pub fn to_svg_d(&self) -> String {
        segments_to_svg_d(&self.segments)
    }

    /// Split at subpath boundaries. Each slice starts with a `MoveTo`.
    pub fn subpaths(&self) -> Vec<&[PathSegment]> {
        let mut out = Vec::new();
        let mut start = 0;
        for (i, seg) in self.segments.iter().enumerate() {
            if i > start && matches!(seg, PathSegment::MoveTo { .. }) {
                out.push(&self.segments[start..i]);
                start = i;
            }
        }
        if start < self.segments.len() {
            out.push(&self.segments[start..]);
        }
        out
    }

    /// Full outline as a kurbo path; arcs become cubic approximations.
    pub fn to_bezpath(&self) -> BezPath {
        let mut bp = BezPath::new();
        for seg in &self.segments {
            match seg {
                PathSegment::MoveTo { to } => bp.move_to(*to),
                PathSegment::LineTo { to, .. } => bp.line_to(*to),
                PathSegment::CubicCurve {
                    ctrl1, ctrl2, to, ..
                } => bp.curve_to(*ctrl1, *ctrl2, *to),
                PathSegment::QuadraticCurve { ctrl, to, .. } => bp.quad_to(*ctrl, *to),
                PathSegment::ArcTo(arc) => {
                    for el in arc.to_kurbo(1.0).append_iter(ARC_TOLERANCE) {
                        bp.push(el);
                    }
                }
                PathSegment::Close { .. } => bp.close_path(),
            }
        }
        bp
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/model.rs"]
mod tests;
