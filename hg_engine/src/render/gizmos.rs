/// Immediate-mode debug geometry.
///
/// Gizmos are accumulated during the frame by game code and drawn once at
/// the end of the render pass. The pipeline clears them after every pass.

use glam::{Vec3, Vec4};

/// One debug line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoLine {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Vec4,
}

/// Per-frame debug draw buffer
#[derive(Debug, Clone, Default)]
pub struct Gizmos {
    lines: Vec<GizmoLine>,
}

impl Gizmos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, from: Vec3, to: Vec3, color: Vec4) {
        self.lines.push(GizmoLine { from, to, color });
    }

    /// Wireframe axis-aligned box (12 lines)
    pub fn aabb(&mut self, min: Vec3, max: Vec3, color: Vec4) {
        let corner = |x: bool, y: bool, z: bool| {
            Vec3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        for a in [false, true] {
            for b in [false, true] {
                self.line(corner(false, a, b), corner(true, a, b), color);
                self.line(corner(a, false, b), corner(a, true, b), color);
                self.line(corner(a, b, false), corner(a, b, true), color);
            }
        }
    }

    pub fn lines(&self) -> &[GizmoLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
