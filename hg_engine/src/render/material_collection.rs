/// Shader pool keyed by material kind.
///
/// The first material requested for a kind builds its shader (embedded text,
/// or an asynchronous load through the resource manager). Every later
/// request for that kind reuses the same `Arc<Shader>`.

use std::any::TypeId;
use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::resource::{ResourceManager, StringLoader};
use super::material::{Material, MaterialKind, ShaderSource};
use super::shader::Shader;

/// One shader per material kind
#[derive(Default)]
pub struct MaterialCollection {
    shaders: FxHashMap<TypeId, Arc<Shader>>,
    resources: Option<Arc<ResourceManager>>,
}

impl MaterialCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection able to load `ShaderSource::Path` shaders through `resources`
    pub fn with_resource_manager(resources: Arc<ResourceManager>) -> Self {
        Self {
            shaders: FxHashMap::default(),
            resources: Some(resources),
        }
    }

    pub fn set_resource_manager(&mut self, resources: Arc<ResourceManager>) {
        self.resources = Some(resources);
    }

    /// Pooled shader of kind `M`, built on first use
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` if `M` loads its shader by path and no resource
    /// manager is attached.
    pub fn shader<M: MaterialKind>(&mut self) -> Result<Arc<Shader>> {
        if let Some(shader) = self.shaders.get(&TypeId::of::<M>()) {
            return Ok(shader.clone());
        }

        let shader = match M::SHADER {
            ShaderSource::Raw(text) => Shader::from_source(M::NAME, text),
            ShaderSource::Path(path) => {
                let resources = self.resources.as_ref().ok_or_else(|| {
                    Error::InvalidState(format!(
                        "Material {} loads '{}' but no resource manager is attached", M::NAME, path
                    ))
                })?;
                Shader::from_future(M::NAME, resources.load(path, StringLoader))
            }
        };

        crate::engine_debug!("hg::MaterialCollection", "Built shader for material {}", M::NAME);
        let shader = Arc::new(shader);
        self.shaders.insert(TypeId::of::<M>(), shader.clone());
        Ok(shader)
    }

    /// New material of kind `M` referencing the pooled shader
    pub fn get_material<M: MaterialKind>(&mut self) -> Result<Material> {
        let shader = self.shader::<M>()?;
        let mut material = Material::new(&shader);
        M::defaults(&mut material);
        Ok(material)
    }

    pub fn contains<M: MaterialKind>(&self) -> bool {
        self.shaders.contains_key(&TypeId::of::<M>())
    }

    /// Number of pooled shaders
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    pub fn shaders(&self) -> impl Iterator<Item = &Arc<Shader>> {
        self.shaders.values()
    }

    /// Drop every pooled shader (materials keep dangling weak refs)
    pub fn clear(&mut self) {
        self.shaders.clear();
    }
}

#[cfg(test)]
#[path = "material_collection_tests.rs"]
mod tests;
