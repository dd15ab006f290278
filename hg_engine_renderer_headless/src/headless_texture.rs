/// Texture realization: one image object per texture
///
/// An invalidated texture keeps its image handle; the processor uploads the
/// new contents into it instead of allocating another one.

use glam::UVec2;
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{
    downcast_renderable, DataType, RenderDataProcessor, Renderable, SpecificData,
    Texture, TextureParameters, Validity,
};
use crate::headless_device::{reclaim_specific, DeviceObject, ObjectRecord, SharedDevice};
use crate::headless_handle_allocator::ObjectHandle;

/// Backend state of a realized texture
#[derive(Debug)]
pub struct TextureSpecific {
    image: DeviceObject,
    size: UVec2,
    parameters: TextureParameters,
    validity: Validity,
}

impl TextureSpecific {
    pub fn handle(&self) -> ObjectHandle {
        self.image.handle()
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn parameters(&self) -> TextureParameters {
        self.parameters
    }
}

impl SpecificData for TextureSpecific {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

/// Realize `texture` as an image of `size`, reusing its previous image handle if possible
pub(crate) fn realize_image(
    device: &SharedDevice,
    texture: &Texture,
    size: UVec2,
    uploaded: usize,
) -> TextureSpecific {
    let parameters = texture.parameters();
    let record = ObjectRecord::Image { size, layers: 1, parameters, uploaded };

    let image = match reclaim_specific::<TextureSpecific>(texture.render_data()) {
        Some(previous) if previous.image.update(record.clone()).is_ok() => previous.image,
        _ => DeviceObject::create(device, record),
    };
    TextureSpecific { image, size, parameters, validity: Validity::new() }
}

pub struct TextureProcessor {
    scope: LogScope,
    device: SharedDevice,
}

impl TextureProcessor {
    pub fn new(device: SharedDevice, scope: LogScope) -> Self {
        Self { scope, device }
    }
}

impl RenderDataProcessor for TextureProcessor {
    fn target(&self) -> DataType {
        DataType::Texture
    }

    fn need_setup(&self, data: &dyn Renderable) -> bool {
        let Some(texture) = downcast_renderable::<Texture>(data) else {
            return true;
        };
        match data.render_data().specific_data_as::<TextureSpecific>() {
            None => true,
            Some(specific) => {
                // Storage-only images are sized by the render target they are attached to
                let size_owned = texture.is_ready() && !texture.is_storage_only();
                !specific.is_valid()
                    || specific.parameters != texture.parameters()
                    || (size_owned && specific.size != texture.size(false))
            }
        }
    }

    fn setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool {
        if !self.need_setup(data) {
            return true;
        }
        let Some(texture) = downcast_renderable::<Texture>(data) else {
            hg_engine::engine_error!(self.scope, "Setup of {} routed to the texture processor", data.data_type());
            return false;
        };

        if !texture.is_ready() && !guarantee {
            hg_engine::engine_trace!(self.scope, "Texture pixels still loading");
            return false;
        }

        let surface = texture.surface(guarantee);
        if surface.is_none() && !texture.is_storage_only() {
            hg_engine::engine_warn!(self.scope, "Texture pixels failed to load");
            return false;
        }

        let size = texture.size(guarantee);
        if size.x == 0 || size.y == 0 {
            hg_engine::engine_error!(self.scope, "Cannot create a {}x{} image", size.x, size.y);
            return false;
        }

        let uploaded = surface.as_ref().map_or(0, |surface| surface.pixels().len());
        let specific = realize_image(&self.device, texture, size, uploaded);
        hg_engine::engine_debug!(self.scope, "Texture realized as image {} ({}x{})", specific.handle(), size.x, size.y);
        data.render_data().set_specific_data(std::sync::Arc::new(specific));
        true
    }
}

#[cfg(test)]
#[path = "headless_texture_tests.rs"]
mod tests;
