//! Loading paths from SVG documents or raw path data, measured once at load time.

use std::collections::BTreeSet;
use std::path::Path as FsPath;

use anyhow::Context;

use crate::foundation::core::{Affine, BezPath, Canvas, DocumentSize, Point, Rect, Vec2};
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::geometry::sampler::{
    LengthTable, SAMPLE_DENSITY, build_length_table, point_at_fraction, tangent_at_fraction,
};
use crate::geometry::trim::partial_bezpath;
use crate::path::model::Path;
use crate::style::color::Rgba8;
use crate::style::paint::{FillRule, PathStyle};

/// A path together with its length table.
#[derive(Clone, Debug)]
pub struct MeasuredPath {
    path: Path,
    table: LengthTable,
}

impl MeasuredPath {
    /// Measure `path` at the fixed sample density. Zero-length paths are rejected.
    pub fn new(path: Path) -> DrawonResult<Self> {
        let table = build_length_table(&path, SAMPLE_DENSITY)?;
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id(&self) -> &str {
        self.path.id()
    }

    pub fn table(&self) -> &LengthTable {
        &self.table
    }

    pub fn total_length(&self) -> f64 {
        self.table.total()
    }

    pub fn point_at(&self, fraction: f64) -> Point {
        point_at_fraction(&self.path, &self.table, fraction)
    }

    pub fn tangent_at(&self, fraction: f64) -> Vec2 {
        tangent_at_fraction(&self.path, &self.table, fraction)
    }

    pub fn partial(&self, fraction: f64) -> BezPath {
        partial_bezpath(&self.path, &self.table, fraction)
    }
}

/// A path left out of the drawing, with the reason.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SkippedPath {
    pub id: String,
    pub reason: String,
}

/// Pre-built input: path data, id and fill color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathSource {
    pub d: String,
    pub id: String,
    pub fill: Option<Rgba8>,
}

impl PathSource {
    pub fn new(d: impl Into<String>, id: impl Into<String>, fill: Option<Rgba8>) -> Self {
        Self {
            d: d.into(),
            id: id.into(),
            fill,
        }
    }
}

/// `(id, d, fill)` record as listed by [`Drawing::path_listing`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PathListing {
    pub id: String,
    pub d: String,
    pub fill: Option<String>,
}

/// Every drawable path of one document, in document order.
#[derive(Clone, Debug)]
pub struct Drawing {
    view_box: Rect,
    paths: Vec<MeasuredPath>,
    skipped: Vec<SkippedPath>,
}

impl Drawing {
    #[tracing::instrument(skip(svg), fields(bytes = svg.len()))]
    pub fn from_svg_str(svg: &str) -> DrawonResult<Self> {
        let doc = roxmltree::Document::parse(svg)
            .map_err(|e| DrawonError::document(format!("parse svg: {e}")))?;
        let root = doc.root_element();
        if !root.tag_name().name().eq_ignore_ascii_case("svg") {
            return Err(DrawonError::document(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }
        let view_box = document_view_box(root)?;

        let mut paths = Vec::new();
        let mut skipped = Vec::new();
        let elements: Vec<_> = root
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "path")
            .filter(|n| !in_non_rendered_container(*n))
            .collect();
        let mut taken: BTreeSet<String> = elements
            .iter()
            .filter_map(|n| n.attribute("id"))
            .map(str::to_owned)
            .collect();
        for (index, node) in elements.into_iter().enumerate() {
            let id = match node.attribute("id") {
                Some(id) => id.to_owned(),
                None => fallback_id(index, &mut taken),
            };
            let d = node.attribute("d").unwrap_or("");
            if d.trim().is_empty() {
                tracing::warn!(path_id = %id, "skipping path without path data");
                skipped.push(SkippedPath {
                    id,
                    reason: "no path data".to_owned(),
                });
                continue;
            }
            paths.push(Path::parse(id, d, element_style(node))?);
        }

        let mut drawing = Self::from_paths(view_box, paths)?;
        skipped.append(&mut drawing.skipped);
        drawing.skipped = skipped;
        Ok(drawing)
    }

    pub fn from_svg_file(path: &FsPath) -> DrawonResult<Self> {
        let svg = std::fs::read_to_string(path)
            .with_context(|| format!("read svg '{}'", path.display()))?;
        Self::from_svg_str(&svg)
    }

    /// Build from `(d, id, fill)` records over a `size` document with origin at zero.
    #[tracing::instrument(skip(sources))]
    pub fn from_path_data(
        size: DocumentSize,
        sources: impl IntoIterator<Item = PathSource>,
    ) -> DrawonResult<Self> {
        let paths = sources
            .into_iter()
            .map(|src| Path::parse(src.id, &src.d, PathStyle::with_fill(src.fill)))
            .collect::<DrawonResult<Vec<_>>>()?;
        Self::from_paths(Rect::new(0.0, 0.0, size.width, size.height), paths)
    }

    /// Measure parsed paths. Degenerate ones are skipped with a warning.
    pub fn from_paths(view_box: Rect, paths: Vec<Path>) -> DrawonResult<Self> {
        DocumentSize::new(view_box.width(), view_box.height())?;

        let mut seen = BTreeSet::new();
        let mut measured = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in paths {
            if !seen.insert(path.id().to_owned()) {
                return Err(DrawonError::document(format!(
                    "duplicate path id '{}'",
                    path.id()
                )));
            }
            match MeasuredPath::new(path) {
                Ok(m) => measured.push(m),
                Err(DrawonError::DegeneratePath { path_id }) => {
                    tracing::warn!(path_id = %path_id, "skipping degenerate path");
                    let reason = DrawonError::degenerate(path_id.as_str()).to_string();
                    skipped.push(SkippedPath {
                        id: path_id,
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }

        tracing::debug!(
            paths = measured.len(),
            skipped = skipped.len(),
            "loaded drawing"
        );
        Ok(Self {
            view_box,
            paths: measured,
            skipped,
        })
    }

    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    pub fn size(&self) -> DocumentSize {
        DocumentSize {
            width: self.view_box.width(),
            height: self.view_box.height(),
        }
    }

    /// Map document coordinates onto `canvas` pixels.
    pub fn to_canvas(&self, canvas: Canvas) -> Affine {
        self.size().to_canvas(canvas) * Affine::translate(-self.view_box.origin().to_vec2())
    }

    pub fn paths(&self) -> &[MeasuredPath] {
        &self.paths
    }

    pub fn get(&self, id: &str) -> Option<&MeasuredPath> {
        self.paths.iter().find(|p| p.id() == id)
    }

    pub fn path_ids(&self) -> Vec<&str> {
        self.paths.iter().map(MeasuredPath::id).collect()
    }

    pub fn skipped(&self) -> &[SkippedPath] {
        &self.skipped
    }

    pub fn path_listing(&self) -> Vec<PathListing> {
        self.paths
            .iter()
            .map(|m| PathListing {
                id: m.id().to_owned(),
                d: m.path().data().to_owned(),
                fill: m.path().style().fill.map(Rgba8::to_hex),
            })
            .collect()
    }
}

/// `path{index}`, suffixed until it collides with no id in `taken`.
fn fallback_id(index: usize, taken: &mut BTreeSet<String>) -> String {
    let base = format!("path{index}");
    let mut id = base.clone();
    let mut n = 1;
    while taken.contains(&id) {
        id = format!("{base}_{n}");
        n += 1;
    }
    taken.insert(id.clone());
    id
}

fn in_non_rendered_container(node: roxmltree::Node<'_, '_>) -> bool {
    node.ancestors()
        .skip(1)
        .filter(|n| n.is_element())
        .any(|n| matches!(n.tag_name().name(), "defs" | "clipPath" | "mask" | "symbol"))
}

fn document_view_box(root: roxmltree::Node<'_, '_>) -> DrawonResult<Rect> {
    if let Some(vb) = root.attribute("viewBox").and_then(parse_view_box) {
        return Ok(vb);
    }
    let width = root.attribute("width").and_then(parse_length);
    let height = root.attribute("height").and_then(parse_length);
    match (width, height) {
        (Some(w), Some(h)) => {
            let size = DocumentSize::new(w, h)?;
            Ok(Rect::new(0.0, 0.0, size.width, size.height))
        }
        _ => Err(DrawonError::document(
            "svg has no usable viewBox or width/height",
        )),
    }
}

fn parse_view_box(s: &str) -> Option<Rect> {
    let mut it = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let min_x = it.next()?.parse::<f64>().ok()?;
    let min_y = it.next()?.parse::<f64>().ok()?;
    let w = it.next()?.parse::<f64>().ok()?;
    let h = it.next()?.parse::<f64>().ok()?;
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(Rect::new(min_x, min_y, min_x + w, min_y + h))
}

/// A user-unit length; only bare numbers and `px` are accepted.
fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Presentation attributes, then the `style` attribute on top.
fn element_style(node: roxmltree::Node<'_, '_>) -> PathStyle {
    let mut props: Vec<(&str, &str)> = ["fill", "stroke", "stroke-width", "fill-rule"]
        .into_iter()
        .filter_map(|name| node.attribute(name).map(|v| (name, v)))
        .collect();
    if let Some(style) = node.attribute("style") {
        props.extend(style.split(';').filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            Some((k.trim(), v.trim()))
        }));
    }

    let id = node.attribute("id").unwrap_or("");
    let mut style = PathStyle::default();
    for (name, value) in props {
        match name {
            "fill" => style.fill = paint(id, name, value).unwrap_or(style.fill),
            "stroke" => style.stroke = paint(id, name, value).unwrap_or(style.stroke),
            "stroke-width" => match parse_length(value) {
                Some(w) if w >= 0.0 => style.stroke_width = Some(w),
                _ => tracing::warn!(path_id = id, value, "ignoring unsupported stroke-width"),
            },
            "fill-rule" => style.fill_rule = FillRule::from_svg(value),
            _ => {}
        }
    }
    style
}

/// Parse a paint value. Unsupported paints (gradients, `currentColor`) keep the current value.
fn paint(id: &str, name: &str, value: &str) -> Option<Option<Rgba8>> {
    match Rgba8::parse_paint(value) {
        Ok(p) => Some(p),
        Err(_) => {
            tracing::warn!(path_id = id, property = name, value, "ignoring unsupported paint");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/drawing.rs"]
mod tests;
