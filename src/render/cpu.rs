use kurbo::Shape;

use crate::engine::animator::{FrameSnapshot, PathFrame};
use crate::engine::drawing::Drawing;
use crate::engine::pen::PenTracker;
use crate::foundation::core::{Affine, BezPath, Canvas, Point};
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::render::backend::{FrameRGBA, FrameRasterizer};
use crate::style::color::Rgba8;
use crate::style::paint::FillRule;

/// Pen-tip marker drawn on top of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenMarker {
    pub tracker: PenTracker,
    pub color: Rgba8,
    /// Marker radius in output pixels.
    pub radius: f64,
}

/// Software rasterizer for frame snapshots.
#[derive(Clone, Debug)]
pub struct CpuRasterizer {
    canvas: Canvas,
    width: u16,
    height: u16,
    transform: Affine,
    pen: Option<PenMarker>,
}

impl CpuRasterizer {
    /// Rasterizer for `drawing` scaled onto `canvas`.
    pub fn new(canvas: Canvas, drawing: &Drawing) -> DrawonResult<Self> {
        Self::with_transform(canvas, drawing.to_canvas(canvas))
    }

    pub fn with_transform(canvas: Canvas, transform: Affine) -> DrawonResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| DrawonError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| DrawonError::render("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(DrawonError::render("canvas width/height must be non-zero"));
        }
        Ok(Self {
            canvas,
            width,
            height,
            transform,
            pen: None,
        })
    }

    pub fn with_pen_marker(mut self, marker: PenMarker) -> Self {
        self.pen = Some(marker);
        self
    }

    fn draw_path(&self, ctx: &mut vello_cpu::RenderContext, frame: &PathFrame) {
        if !frame.state.is_visible {
            return;
        }

        if let (Some(outline), Some(fill)) = (&frame.fill_outline, frame.style.fill) {
            let color = fill.with_opacity(frame.state.fill_opacity);
            if color.a > 0 {
                ctx.set_fill_rule(match frame.style.fill_rule {
                    FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
                    FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
                });
                set_color(ctx, color);
                ctx.fill_path(&bezpath_to_cpu(outline));
            }
        }

        if frame.state.drawn_length_fraction > 0.0
            && frame.style.stroke_width > 0.0
            && !frame.stroke.elements().is_empty()
        {
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(frame.style.stroke_width)
                    .with_caps(vello_cpu::kurbo::Cap::Round)
                    .with_join(vello_cpu::kurbo::Join::Round),
            );
            set_color(ctx, frame.style.stroke);
            ctx.stroke_path(&bezpath_to_cpu(&frame.stroke));
        }
    }

    fn draw_pen(&self, ctx: &mut vello_cpu::RenderContext, snapshot: &FrameSnapshot) {
        let Some(marker) = self.pen else {
            return;
        };
        let Some(pose) = marker.tracker.pose(snapshot) else {
            return;
        };
        // The marker is sized in pixels, so it is placed after the document transform.
        let tip = self.transform * pose.point;
        let circle = kurbo::Circle::new(tip, marker.radius.max(0.5)).to_path(0.1);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
        set_color(ctx, marker.color);
        ctx.fill_path(&bezpath_to_cpu(&circle));
    }
}

impl FrameRasterizer for CpuRasterizer {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn rasterize(&self, snapshot: &FrameSnapshot) -> DrawonResult<FrameRGBA> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(&mut ctx, snapshot.background);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        ctx.set_transform(affine_to_cpu(self.transform));
        for frame in &snapshot.paths {
            self.draw_path(&mut ctx, frame);
        }
        self.draw_pen(&mut ctx, snapshot);

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA::new(
            self.canvas.width,
            self.canvas.height,
            pixmap.data_as_u8_slice().to_vec(),
            true,
        )
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
