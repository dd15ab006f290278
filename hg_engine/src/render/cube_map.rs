/// Cube map render data.
///
/// Six independent side textures, each possibly still loading. Backends
/// upload sides as they become available and remember which ones they have,
/// so a cube map can be streamed in progressively.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use bitflags::bitflags;
use super::data_type::DataType;
use super::render_data::{RenderData, Renderable};
use super::texture::Texture;

/// One face of a cube map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeSide {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl CubeSide {
    /// Sides in layer order (+X, -X, +Y, -Y, +Z, -Z)
    pub const ALL: [CubeSide; 6] = [
        CubeSide::Right,
        CubeSide::Left,
        CubeSide::Top,
        CubeSide::Bottom,
        CubeSide::Front,
        CubeSide::Back,
    ];

    /// Layer index of the side
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn flag(self) -> CubeSides {
        CubeSides::from_bits_truncate(1 << self.index())
    }
}

bitflags! {
    /// Set of cube map sides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CubeSides: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const FRONT = 1 << 4;
        const BACK = 1 << 5;
    }
}

/// Cube map render data
pub struct CubeMap {
    render_data: RenderData,
    sides: Mutex<[Option<Arc<Texture>>; 6]>,
}

impl CubeMap {
    pub fn new() -> Self {
        Self {
            render_data: RenderData::new(DataType::CubeMap),
            sides: Mutex::new(Default::default()),
        }
    }

    fn sides(&self) -> MutexGuard<'_, [Option<Arc<Texture>>; 6]> {
        self.sides.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace one side; the backend re-uploads it on next setup
    pub fn set_side(&self, side: CubeSide, texture: Arc<Texture>) {
        self.sides()[side.index()] = Some(texture);
        self.render_data.invalidate();
    }

    pub fn side(&self, side: CubeSide) -> Option<Arc<Texture>> {
        self.sides()[side.index()].clone()
    }

    /// Sides that have a texture assigned
    pub fn present_sides(&self) -> CubeSides {
        let sides = self.sides();
        CubeSide::ALL
            .iter()
            .filter(|side| sides[side.index()].is_some())
            .fold(CubeSides::empty(), |set, side| set | side.flag())
    }

    /// Sides whose pixels are available; with `guarantee` waits for pending loads
    pub fn ready_sides(&self, guarantee: bool) -> CubeSides {
        let textures: Vec<(CubeSide, Arc<Texture>)> = {
            let sides = self.sides();
            CubeSide::ALL
                .iter()
                .filter_map(|side| sides[side.index()].clone().map(|texture| (*side, texture)))
                .collect()
        };
        // Waiting happens outside the lock
        textures
            .iter()
            .filter(|(_, texture)| texture.surface(guarantee).is_some())
            .fold(CubeSides::empty(), |set, (side, _)| set | side.flag())
    }

    pub fn is_complete(&self) -> bool {
        self.present_sides() == CubeSides::all()
    }
}

impl Default for CubeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for CubeMap {
    fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "cube_map_tests.rs"]
mod tests;
