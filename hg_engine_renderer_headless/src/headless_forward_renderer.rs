/// Forward mesh renderer: turns realized mesh renderers into draw calls
///
/// Nothing is rasterized. Each draw is recorded into a shared `DrawLog`
/// with the handles a real backend would bind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use glam::Mat4;
use hg_engine::hg::Result;
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{BehaviourRenderer, DataType, DrawContext, Renderable};
use hg_engine::hg::scene::{GameObjectKey, MeshRenderer, RenderBehaviour};
use crate::headless_cube_map::CubeMapSpecific;
use crate::headless_device::{lock_device, SharedDevice};
use crate::headless_handle_allocator::ObjectHandle;
use crate::headless_mesh::MeshSpecific;
use crate::headless_shader::ShaderSpecific;
use crate::headless_texture::TextureSpecific;

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub object: GameObjectKey,
    pub frame_index: u64,
    pub vertex_buffer: ObjectHandle,
    pub index_buffer: ObjectHandle,
    pub index_count: u32,
    /// None when the material has no (realized) shader
    pub program: Option<ObjectHandle>,
    /// Realized textures and cube maps of the material, sorted
    pub images: Vec<ObjectHandle>,
    pub world: Mat4,
    pub translucent: bool,
    pub lights: usize,
}

/// Shared, append-only list of draw calls
#[derive(Debug, Clone, Default)]
pub struct DrawLog(Arc<Mutex<Vec<DrawCall>>>);

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn calls(&self) -> MutexGuard<'_, Vec<DrawCall>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, call: DrawCall) {
        self.calls().push(call);
    }

    /// Copy of every recorded call
    pub fn snapshot(&self) -> Vec<DrawCall> {
        self.calls().clone()
    }

    /// Remove and return every recorded call
    pub fn take(&self) -> Vec<DrawCall> {
        std::mem::take(&mut *self.calls())
    }

    pub fn len(&self) -> usize {
        self.calls().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }

    pub fn clear(&self) {
        self.calls().clear();
    }
}

pub struct ForwardMeshRenderer {
    scope: LogScope,
    device: SharedDevice,
    log: DrawLog,
}

impl ForwardMeshRenderer {
    pub fn new(device: SharedDevice, log: DrawLog, scope: LogScope) -> Self {
        Self { scope, device, log }
    }
}

impl BehaviourRenderer for ForwardMeshRenderer {
    fn target(&self) -> DataType {
        DataType::Mesh
    }

    fn render(&mut self, behaviour: &dyn RenderBehaviour, ctx: &DrawContext<'_>) -> Result<()> {
        let Some(renderer) = behaviour.as_any().downcast_ref::<MeshRenderer>() else {
            hg_engine::engine_bail!(self.scope, "{} is not a mesh renderer", behaviour.data_type());
        };
        let Some(mesh) = renderer.render_data().specific_data_as::<MeshSpecific>() else {
            hg_engine::engine_bail!(self.scope, "Mesh of {:?} is not realized", ctx.object);
        };

        let material = renderer.material();
        let program = material
            .shader()
            .and_then(|shader| shader.render_data().specific_data_as::<ShaderSpecific>())
            .map(|program| program.handle());
        let mut images: Vec<ObjectHandle> = material
            .textures()
            .iter()
            .filter_map(|texture| texture.render_data().specific_data_as::<TextureSpecific>())
            .map(|image| image.handle())
            .chain(
                material
                    .cube_maps()
                    .iter()
                    .filter_map(|cube_map| cube_map.render_data().specific_data_as::<CubeMapSpecific>())
                    .map(|image| image.handle()),
            )
            .collect();
        images.sort();

        self.log.push(DrawCall {
            object: ctx.object,
            frame_index: ctx.frame_index,
            vertex_buffer: mesh.vertex_buffer(),
            index_buffer: mesh.index_buffer(),
            index_count: mesh.index_count(),
            program,
            images,
            world: ctx.world,
            translucent: behaviour.is_translucent(),
            lights: ctx.lighting.len(),
        });
        lock_device(&self.device).stats_mut().draw_calls += 1;
        Ok(())
    }
}
