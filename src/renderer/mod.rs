//! Per-tick render snapshots
//!
//! The engine never draws. Each tick it hands an immutable [`Snapshot`] to a
//! [`Renderer`], which is free to rasterise it however it likes.

pub mod shapes;
pub mod vertex;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use shapes::MeshRenderer;
pub use vertex::Vertex;

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    /// Build from a `0xRRGGBB` literal
    pub const fn from_rgb_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self([r, g, b, 1.0])
    }

    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Color = Color([0.0, 0.5, 0.0, 1.0]);
    pub const YELLOW: Color = Color([1.0, 1.0, 0.0, 1.0]);
    pub const ORANGE: Color = Color([1.0, 0.647, 0.0, 1.0]);
    pub const AZURE: Color = Color::from_rgb_hex(0x0095DD);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect { min: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
    /// Text anchored at its baseline-left corner
    Text { origin: Vec2, text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub shape: Shape,
    pub color: Color,
}

impl Drawable {
    pub fn rect(min: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            shape: Shape::Rect { min, size },
            color,
        }
    }

    pub fn circle(center: Vec2, radius: f32, color: Color) -> Self {
        Self {
            shape: Shape::Circle { center, radius },
            color,
        }
    }

    pub fn text(origin: Vec2, text: impl Into<String>, color: Color) -> Self {
        Self {
            shape: Shape::Text {
                origin,
                text: text.into(),
            },
            color,
        }
    }
}

/// Heads-up strings shown over the playfield
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    /// `Score: N`
    pub score: String,
    /// `Lives: N` or `Level: N`
    pub status: Option<String>,
    /// `Time: m:ss` or `Continue? 0:ss`
    pub timer: Option<String>,
    /// Win/lose banner once the session is over
    pub banner: Option<String>,
    pub paused: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub shapes: Vec<Drawable>,
    pub hud: Hud,
}

/// Pure consumer of snapshots
pub trait Renderer {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Renderer that keeps only the latest snapshot; handy for headless hosts
#[derive(Debug, Default)]
pub struct LatestSnapshot {
    pub latest: Option<Snapshot>,
    pub frames: u64,
}

impl Renderer for LatestSnapshot {
    fn present(&mut self, snapshot: &Snapshot) {
        self.latest = Some(snapshot.clone());
        self.frames += 1;
    }
}
