use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Point of the rectangle closest to (px, py). Returns the point itself when inside.
    pub fn closest_point(&self, px: f32, py: f32) -> (f32, f32) {
        (
            px.clamp(self.x, self.x + self.width),
            py.clamp(self.y, self.y + self.height),
        )
    }

    /// Distance from (px, py) to the rectangle (zero when inside).
    pub fn distance_to(&self, px: f32, py: f32) -> f32 {
        let (cx, cy) = self.closest_point(px, py);
        distance(px, py, cx, cy)
    }

    /// Circle-vs-rectangle overlap test. Touching exactly at `radius` is not an overlap.
    pub fn overlaps_circle(&self, cx: f32, cy: f32, radius: f32) -> bool {
        self.distance_to(cx, cy) < radius
    }
}

/// Playable area. Entities live in `[r, width - r] x [r, height - r]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a circle center so the whole circle stays inside the bounds.
    pub fn clamp_circle(&self, x: f32, y: f32, radius: f32) -> (f32, f32) {
        (
            x.clamp(radius, (self.width - radius).max(radius)),
            y.clamp(radius, (self.height - radius).max(radius)),
        )
    }

    /// Whether (x, y) lies inside the bounds expanded by `pad` on every side.
    pub fn contains_padded(&self, x: f32, y: f32, pad: f32) -> bool {
        x >= -pad && x <= self.width + pad && y >= -pad && y <= self.height + pad
    }
}

/// Euclidean distance between two points.
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

/// Circle-circle overlap test on the sum of radii (strict).
pub fn circles_overlap(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> bool {
    distance(ax, ay, bx, by) < ar + br
}

/// Angle in radians from (fx, fy) toward (tx, ty).
pub fn angle_to(fx: f32, fy: f32, tx: f32, ty: f32) -> f32 {
    (ty - fy).atan2(tx - fx)
}
