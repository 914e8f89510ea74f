use crate::engine::animator::FrameSnapshot;
use crate::foundation::core::Canvas;
use crate::foundation::error::{DrawonError, DrawonResult};

/// One rendered frame, row-major RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn new(width: u32, height: u32, data: Vec<u8>, premultiplied: bool) -> DrawonResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DrawonError::render(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha copy of the pixel data, for image encoders.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
            } else if a < 255 {
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }
}

/// Turns frame snapshots into pixels. Shared across worker threads during export.
pub trait FrameRasterizer: Send + Sync {
    fn canvas(&self) -> Canvas;

    fn rasterize(&self, snapshot: &FrameSnapshot) -> DrawonResult<FrameRGBA>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
