/// Mesh render behaviour: shared geometry + material.

use std::any::Any;
use std::sync::Arc;
use crate::render::{DataType, Material, MeshData, RenderData, Renderable};
use super::behaviour::RenderBehaviour;

/// Render behaviour drawing a mesh with a material
pub struct MeshRenderer {
    render_data: RenderData,
    mesh: Option<Arc<MeshData>>,
    material: Material,
    enabled: bool,
}

impl MeshRenderer {
    pub fn new(mesh: Arc<MeshData>, material: Material) -> Self {
        Self {
            render_data: RenderData::new(DataType::Mesh),
            mesh: Some(mesh),
            material,
            enabled: true,
        }
    }

    /// Mesh renderer without geometry (fails setup until a mesh is assigned)
    pub fn without_mesh(material: Material) -> Self {
        Self {
            render_data: RenderData::new(DataType::Mesh),
            mesh: None,
            material,
            enabled: true,
        }
    }

    pub fn mesh(&self) -> Option<&Arc<MeshData>> {
        self.mesh.as_ref()
    }

    /// Replace the geometry; the previous backend buffers are dropped
    pub fn set_mesh(&mut self, mesh: Option<Arc<MeshData>>) {
        self.mesh = mesh;
        self.render_data.clear_specific_data();
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Renderable for MeshRenderer {
    fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RenderBehaviour for MeshRenderer {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_translucent(&self) -> bool {
        self.material.is_translucent()
    }

    fn visit_dependencies(&self, visitor: &mut dyn FnMut(&dyn Renderable)) {
        if let Some(shader) = self.material.shader() {
            let shader: &dyn Renderable = &*shader;
            visitor(shader);
        }
        for texture in self.material.textures() {
            let texture: &dyn Renderable = &*texture;
            visitor(texture);
        }
        for cube_map in self.material.cube_maps() {
            let cube_map: &dyn Renderable = &*cube_map;
            visitor(cube_map);
        }
    }
}
