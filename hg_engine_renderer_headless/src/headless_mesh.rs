/// Mesh realization: vertex + index buffers per shared `MeshData`
///
/// Mesh renderers pointing at the same `Arc<MeshData>` share one
/// `MeshSpecific`: the processor keeps a weak lookup keyed by the mesh
/// allocation, so N renderers of one mesh allocate a single buffer pair.

use std::sync::{Arc, Weak};
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{
    downcast_renderable, DataType, MeshData, RenderDataProcessor, Renderable, SpecificData, Validity,
};
use hg_engine::hg::scene::MeshRenderer;
use rustc_hash::FxHashMap;
use crate::headless_device::{BufferUsage, DeviceObject, ObjectRecord, SharedDevice};
use crate::headless_handle_allocator::ObjectHandle;

#[derive(Debug)]
pub struct MeshSpecific {
    vertex_buffer: DeviceObject,
    index_buffer: DeviceObject,
    index_count: u32,
    source: Weak<MeshData>,
    validity: Validity,
}

impl MeshSpecific {
    pub fn vertex_buffer(&self) -> ObjectHandle {
        self.vertex_buffer.handle()
    }

    pub fn index_buffer(&self) -> ObjectHandle {
        self.index_buffer.handle()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// True if built from this very `MeshData` allocation
    pub fn is_built_from(&self, mesh: &Arc<MeshData>) -> bool {
        std::ptr::eq(self.source.as_ptr(), Arc::as_ptr(mesh))
    }
}

impl SpecificData for MeshSpecific {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

pub struct MeshProcessor {
    scope: LogScope,
    device: SharedDevice,
    shared: FxHashMap<usize, Weak<MeshSpecific>>,
}

impl MeshProcessor {
    pub fn new(device: SharedDevice, scope: LogScope) -> Self {
        Self {
            scope,
            device,
            shared: FxHashMap::default(),
        }
    }

    /// Meshes currently realized and shareable
    pub fn shared_count(&self) -> usize {
        self.shared.values().filter(|specific| specific.strong_count() > 0).count()
    }

    fn lookup(&self, mesh: &Arc<MeshData>) -> Option<Arc<MeshSpecific>> {
        let key = Arc::as_ptr(mesh) as usize;
        self.shared
            .get(&key)
            .and_then(Weak::upgrade)
            .filter(|specific| specific.is_valid() && specific.is_built_from(mesh))
    }

    fn build(&mut self, mesh: &Arc<MeshData>) -> Arc<MeshSpecific> {
        let vertex_buffer = DeviceObject::create(&self.device, ObjectRecord::Buffer {
            usage: BufferUsage::Vertex,
            bytes: mesh.vertex_bytes().to_vec(),
        });
        let index_buffer = DeviceObject::create(&self.device, ObjectRecord::Buffer {
            usage: BufferUsage::Index,
            bytes: mesh.index_bytes().to_vec(),
        });
        let specific = Arc::new(MeshSpecific {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
            source: Arc::downgrade(mesh),
            validity: Validity::new(),
        });

        self.shared.retain(|_, specific| specific.strong_count() > 0);
        self.shared.insert(Arc::as_ptr(mesh) as usize, Arc::downgrade(&specific));
        specific
    }
}

impl RenderDataProcessor for MeshProcessor {
    fn target(&self) -> DataType {
        DataType::Mesh
    }

    fn need_setup(&self, data: &dyn Renderable) -> bool {
        let Some(renderer) = downcast_renderable::<MeshRenderer>(data) else {
            return true;
        };
        let Some(mesh) = renderer.mesh() else {
            return true;
        };
        match data.render_data().specific_data_as::<MeshSpecific>() {
            Some(specific) => !specific.is_valid() || !specific.is_built_from(mesh),
            None => true,
        }
    }

    fn setup(&mut self, data: &dyn Renderable, _guarantee: bool) -> bool {
        if !self.need_setup(data) {
            return true;
        }
        let Some(renderer) = downcast_renderable::<MeshRenderer>(data) else {
            hg_engine::engine_error!(self.scope, "Setup of {} routed to the mesh processor", data.data_type());
            return false;
        };
        let Some(mesh) = renderer.mesh() else {
            hg_engine::engine_debug!(self.scope, "Mesh renderer has no mesh");
            return false;
        };
        if mesh.is_empty() {
            hg_engine::engine_warn!(self.scope, "Refusing to realize an empty mesh");
            return false;
        }

        let specific = match self.lookup(mesh) {
            Some(existing) => {
                hg_engine::engine_trace!(self.scope,
                    "Sharing buffers {}/{}", existing.vertex_buffer(), existing.index_buffer());
                existing
            }
            None => {
                let built = self.build(mesh);
                hg_engine::engine_debug!(self.scope,
                    "Mesh realized: {} vertices, {} indices", mesh.vertex_count(), mesh.index_count());
                built
            }
        };
        data.render_data().set_specific_data(specific);
        true
    }
}

#[cfg(test)]
#[path = "headless_mesh_tests.rs"]
mod tests;
