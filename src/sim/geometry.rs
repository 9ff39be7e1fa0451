//! Point and axis-aligned box math
//!
//! Everything here is pure. Overlap tests are strict: boxes whose edges touch
//! exactly do not overlap, and a point on a box edge is not inside it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Immutable playfield extent, origin at the top-left corner, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: crate::consts::DEFAULT_WIDTH,
            height: crate::consts::DEFAULT_HEIGHT,
        }
    }
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if `aabb` lies fully inside the playfield (edges may touch)
    pub fn contains(&self, aabb: &Aabb) -> bool {
        aabb.min.x >= 0.0
            && aabb.min.y >= 0.0
            && aabb.max().x <= self.width
            && aabb.max().y <= self.height
    }
}

/// Axis-aligned box stored as top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Box enclosing a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict point-in-box test
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            size: self.size,
        }
    }
}

/// Strict overlap test between two boxes
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// Which playfield edges a box crossed before clamping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl EdgeHits {
    /// Either vertical wall
    pub fn side(&self) -> bool {
        self.left || self.right
    }
}

/// Result of [`clamp_to_bounds`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub aabb: Aabb,
    pub edges: EdgeHits,
}

/// Push a box back inside the playfield, reporting which edges it crossed.
///
/// A box larger than the playfield on an axis is pinned to the low edge.
pub fn clamp_to_bounds(aabb: Aabb, bounds: &Bounds) -> Clamped {
    let mut edges = EdgeHits::default();
    let mut min = aabb.min;
    let max = aabb.max();

    if max.x > bounds.width {
        edges.right = true;
        min.x = bounds.width - aabb.size.x;
    }
    if min.x < 0.0 {
        edges.left = aabb.min.x < 0.0;
        min.x = 0.0;
    }
    if max.y > bounds.height {
        edges.bottom = true;
        min.y = bounds.height - aabb.size.y;
    }
    if min.y < 0.0 {
        edges.top = aabb.min.y < 0.0;
        min.y = 0.0;
    }

    Clamped {
        aabb: Aabb {
            min,
            size: aabb.size,
        },
        edges,
    }
}
