/// Render target realization: framebuffer + storage images for attachments
///
/// The framebuffer remembers the size it was built with. A resized target
/// is rebuilt in place: same framebuffer handle, attachment images updated.

use std::sync::Arc;
use glam::UVec2;
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{
    downcast_renderable, DataType, RenderDataProcessor, RenderTarget, Renderable, SpecificData,
    Texture, Validity,
};
use crate::headless_device::{reclaim_specific, DeviceObject, ObjectRecord, SharedDevice};
use crate::headless_handle_allocator::ObjectHandle;
use crate::headless_texture::{realize_image, TextureSpecific};

#[derive(Debug)]
pub struct RenderTargetSpecific {
    framebuffer: DeviceObject,
    size: UVec2,
    attachments: Vec<(u32, ObjectHandle)>,
    validity: Validity,
}

impl RenderTargetSpecific {
    pub fn handle(&self) -> ObjectHandle {
        self.framebuffer.handle()
    }

    /// Size the framebuffer was built with
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn attachments(&self) -> &[(u32, ObjectHandle)] {
        &self.attachments
    }
}

impl SpecificData for RenderTargetSpecific {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

fn attachment_ready(texture: &Texture, size: UVec2) -> bool {
    texture
        .render_data()
        .specific_data_as::<TextureSpecific>()
        .is_some_and(|specific| specific.is_valid() && specific.size() == size)
}

pub struct RenderTargetProcessor {
    scope: LogScope,
    device: SharedDevice,
}

impl RenderTargetProcessor {
    pub fn new(device: SharedDevice, scope: LogScope) -> Self {
        Self { scope, device }
    }
}

impl RenderDataProcessor for RenderTargetProcessor {
    fn target(&self) -> DataType {
        DataType::RenderTarget
    }

    fn need_setup(&self, data: &dyn Renderable) -> bool {
        let Some(target) = downcast_renderable::<RenderTarget>(data) else {
            return true;
        };
        let Some(specific) = data.render_data().specific_data_as::<RenderTargetSpecific>() else {
            return true;
        };
        let size = target.size();
        !specific.is_valid()
            || specific.size != size
            || target
                .color_textures()
                .iter()
                .any(|(_, texture)| !attachment_ready(texture, size))
    }

    fn setup(&mut self, data: &dyn Renderable, _guarantee: bool) -> bool {
        if !self.need_setup(data) {
            return true;
        }
        let Some(target) = downcast_renderable::<RenderTarget>(data) else {
            hg_engine::engine_error!(self.scope, "Setup of {} routed to the render target processor", data.data_type());
            return false;
        };
        let size = target.size();
        if size.x == 0 || size.y == 0 {
            hg_engine::engine_error!(self.scope, "Cannot build a {}x{} framebuffer", size.x, size.y);
            return false;
        }

        let mut attachments = Vec::new();
        for (index, texture) in target.color_textures() {
            if !attachment_ready(&texture, size) {
                let image = realize_image(&self.device, &texture, size, 0);
                texture.render_data().set_specific_data(Arc::new(image));
            }
            match texture.render_data().specific_data_as::<TextureSpecific>() {
                Some(image) => attachments.push((index, image.handle())),
                None => {
                    hg_engine::engine_error!(self.scope, "Color attachment {} could not be realized", index);
                    return false;
                }
            }
        }

        let record = ObjectRecord::Framebuffer { size, attachments: attachments.clone() };
        let framebuffer = match reclaim_specific::<RenderTargetSpecific>(data.render_data()) {
            Some(previous) if previous.framebuffer.update(record.clone()).is_ok() => {
                hg_engine::engine_debug!(self.scope,
                    "Framebuffer {} rebuilt at {}x{}", previous.framebuffer.handle(), size.x, size.y);
                previous.framebuffer
            }
            _ => {
                let framebuffer = DeviceObject::create(&self.device, record);
                hg_engine::engine_debug!(self.scope,
                    "Framebuffer {} created at {}x{}", framebuffer.handle(), size.x, size.y);
                framebuffer
            }
        };

        data.render_data().set_specific_data(Arc::new(RenderTargetSpecific {
            framebuffer,
            size,
            attachments,
            validity: Validity::new(),
        }));
        true
    }
}

#[cfg(test)]
#[path = "headless_render_target_tests.rs"]
mod tests;
