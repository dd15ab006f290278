/// Offscreen render target render data.
///
/// The logical size lives here; backends keep the size their framebuffer was
/// built with and rebuild when the two disagree. Changing the size therefore
/// does not need to invalidate anything. Changing attachments does.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use glam::UVec2;
use super::data_type::DataType;
use super::render_data::{RenderData, Renderable};
use super::texture::Texture;

struct TargetState {
    size: UVec2,
    color: BTreeMap<u32, Arc<Texture>>,
}

/// Framebuffer description: size + indexed color attachments
pub struct RenderTarget {
    render_data: RenderData,
    state: Mutex<TargetState>,
}

impl RenderTarget {
    pub fn new(size: UVec2) -> Self {
        Self {
            render_data: RenderData::new(DataType::RenderTarget),
            state: Mutex::new(TargetState {
                size,
                color: BTreeMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, TargetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn size(&self) -> UVec2 {
        self.state().size
    }

    pub fn set_size(&self, size: UVec2) {
        self.state().size = size;
    }

    /// Attach `texture` as color attachment `index`, replacing any previous one
    pub fn set_color_texture(&self, index: u32, texture: Arc<Texture>) {
        self.state().color.insert(index, texture);
        self.render_data.invalidate();
    }

    /// Detach color attachment `index`
    pub fn remove_color_texture(&self, index: u32) -> Option<Arc<Texture>> {
        let removed = self.state().color.remove(&index);
        if removed.is_some() {
            self.render_data.invalidate();
        }
        removed
    }

    pub fn color_texture(&self, index: u32) -> Option<Arc<Texture>> {
        self.state().color.get(&index).cloned()
    }

    /// Attachments sorted by index
    pub fn color_textures(&self) -> Vec<(u32, Arc<Texture>)> {
        self.state()
            .color
            .iter()
            .map(|(index, texture)| (*index, texture.clone()))
            .collect()
    }
}

impl Renderable for RenderTarget {
    fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
