use crate::foundation::error::{DrawonError, DrawonResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Largest canvas side the rasterizer accepts.
pub const MAX_CANVAS_SIDE: u32 = u16::MAX as u32;

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> DrawonResult<Self> {
        if width == 0 || height == 0 {
            return Err(DrawonError::config("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Smallest canvas with even dimensions that covers `size` document units.
    ///
    /// Fails when a side would exceed [`MAX_CANVAS_SIDE`].
    pub fn covering_even(size: DocumentSize) -> DrawonResult<Self> {
        fn even(axis: &str, v: f64) -> DrawonResult<u32> {
            let px = v.ceil().max(2.0);
            let px = px + (px % 2.0);
            if px > f64::from(MAX_CANVAS_SIDE) {
                return Err(DrawonError::config(format!(
                    "document {axis} {v} needs a {px}px canvas side, max is {MAX_CANVAS_SIDE}"
                )));
            }
            Ok(px as u32)
        }
        Ok(Self {
            width: even("width", size.width)?,
            height: even("height", size.height)?,
        })
    }
}

/// Size of the source document in user units (viewBox or width/height).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSize {
    pub width: f64,
    pub height: f64,
}

impl DocumentSize {
    pub fn new(width: f64, height: f64) -> DrawonResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(DrawonError::document(format!(
                "document size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Affine mapping document units onto `canvas` pixels (non-uniform stretch, origin kept).
    pub fn to_canvas(self, canvas: Canvas) -> Affine {
        Affine::scale_non_uniform(
            f64::from(canvas.width) / self.width,
            f64::from(canvas.height) / self.height,
        )
    }
}
