//! Shape tessellation for 2D primitives
//!
//! Turns a [`Snapshot`] into a flat triangle list. Text is left to the host's
//! text renderer and collected separately.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use super::{Drawable, Renderer, Shape, Snapshot};

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// A text label the host should draw on top of the mesh
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub origin: Vec2,
    pub text: String,
    pub color: [f32; 4],
}

/// CPU tessellator producing a vertex buffer per frame
#[derive(Debug)]
pub struct MeshRenderer {
    pub vertices: Vec<Vertex>,
    pub labels: Vec<TextLabel>,
    circle_segments: u32,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self::new(24)
    }
}

impl MeshRenderer {
    pub fn new(circle_segments: u32) -> Self {
        Self {
            vertices: Vec::new(),
            labels: Vec::new(),
            circle_segments: circle_segments.max(3),
        }
    }

    /// Vertex data ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn push(&mut self, drawable: &Drawable) {
        let color = drawable.color.0;
        match &drawable.shape {
            Shape::Rect { min, size } => self.vertices.extend_from_slice(&rect(*min, *size, color)),
            Shape::Circle { center, radius } => self
                .vertices
                .extend(circle(*center, *radius, color, self.circle_segments)),
            Shape::Text { origin, text } => self.labels.push(TextLabel {
                origin: *origin,
                text: text.clone(),
                color,
            }),
        }
    }
}

impl Renderer for MeshRenderer {
    fn present(&mut self, snapshot: &Snapshot) {
        self.vertices.clear();
        self.labels.clear();
        for drawable in &snapshot.shapes {
            self.push(drawable);
        }

        let hud = &snapshot.hud;
        let white = [1.0, 1.0, 1.0, 1.0];
        let mut hud_line = |origin: Vec2, text: &str| {
            self.labels.push(TextLabel {
                origin,
                text: text.to_string(),
                color: white,
            })
        };
        hud_line(Vec2::new(10.0, 20.0), &hud.score);
        if let Some(status) = &hud.status {
            hud_line(Vec2::new(10.0, 40.0), status);
        }
        if let Some(timer) = &hud.timer {
            hud_line(Vec2::new(10.0, 60.0), timer);
        }
        if let Some(banner) = &hud.banner {
            hud_line(Vec2::new(10.0, 80.0), banner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Color, Hud};

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), [1.0; 4]);
        assert!(v.iter().any(|v| v.position == [1.0, 2.0]));
        assert!(v.iter().any(|v| v.position == [4.0, 6.0]));
    }

    #[test]
    fn test_mesh_renderer_tessellates_snapshot() {
        let mut r = MeshRenderer::new(8);
        let snapshot = Snapshot {
            tick: 3,
            shapes: vec![
                Drawable::rect(Vec2::ZERO, Vec2::splat(10.0), Color::RED),
                Drawable::circle(Vec2::splat(50.0), 5.0, Color::WHITE),
                Drawable::text(Vec2::new(5.0, 5.0), "cat", Color::WHITE),
            ],
            hud: Hud {
                score: "Score: 3".into(),
                status: Some("Lives: 2".into()),
                ..Default::default()
            },
        };
        r.present(&snapshot);

        assert_eq!(r.vertices.len(), 6 + 8 * 3);
        assert_eq!(r.as_bytes().len(), r.vertices.len() * Vertex::STRIDE);
        let texts: Vec<_> = r.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["cat", "Score: 3", "Lives: 2"]);

        // Each frame starts from scratch
        r.present(&Snapshot::default());
        assert!(r.vertices.is_empty());
    }
}
