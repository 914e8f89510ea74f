use crate::animation::state::Phase;
use crate::engine::animator::FrameSnapshot;
use crate::foundation::core::{Point, Rect, Vec2};

/// Where the pen tip is at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PenPose {
    pub path_id: String,
    pub point: Point,
    pub tangent: Vec2,
}

/// Places a hand image so that its pen tip follows the path being drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PenTracker {
    /// Hand image size.
    pub hand_size: Vec2,
    /// Position of the pen tip inside the hand image, from its top-left corner.
    pub pen_offset: Vec2,
}

impl Default for PenTracker {
    fn default() -> Self {
        Self {
            hand_size: Vec2::new(100.0, 100.0),
            pen_offset: Vec2::new(10.0, 85.0),
        }
    }
}

impl PenTracker {
    /// Tip of the most recently started path that is still drawing.
    pub fn pose(&self, snapshot: &FrameSnapshot) -> Option<PenPose> {
        snapshot
            .paths
            .iter()
            .rev()
            .find(|p| p.state.phase == Phase::Drawing)
            .map(|p| PenPose {
                path_id: p.id.clone(),
                point: p.head,
                tangent: p.tangent,
            })
    }

    /// Rectangle to draw the hand in, for a tip at `tip` (same space as `hand_size`).
    pub fn hand_rect(&self, tip: Point) -> Rect {
        let origin = tip - self.pen_offset;
        Rect::from_origin_size(origin, self.hand_size.to_size())
    }
}
