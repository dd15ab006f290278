/// Cube map realization with partial streaming
///
/// The image is created as soon as one side is available. Later setups
/// upload the sides that finished loading since, tracked in a
/// `CubeSides` bitmask, without reallocating the image.

use std::sync::{Arc, Mutex, PoisonError};
use glam::UVec2;
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{
    downcast_renderable, CubeMap, CubeSide, CubeSides, DataType, RenderDataProcessor, Renderable,
    SpecificData, Validity,
};
use crate::headless_device::{reclaim_specific, DeviceObject, ObjectRecord, SharedDevice};
use crate::headless_handle_allocator::ObjectHandle;

#[derive(Debug)]
pub struct CubeMapSpecific {
    image: DeviceObject,
    face_size: UVec2,
    loaded: Mutex<CubeSides>,
    validity: Validity,
}

impl CubeMapSpecific {
    pub fn handle(&self) -> ObjectHandle {
        self.image.handle()
    }

    pub fn face_size(&self) -> UVec2 {
        self.face_size
    }

    /// Sides uploaded so far
    pub fn loaded_sides(&self) -> CubeSides {
        *self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SpecificData for CubeMapSpecific {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

/// RGBA8 byte size of one face
fn face_bytes(face_size: UVec2) -> usize {
    face_size.x as usize * face_size.y as usize * 4
}

pub struct CubeMapProcessor {
    scope: LogScope,
    device: SharedDevice,
}

impl CubeMapProcessor {
    pub fn new(device: SharedDevice, scope: LogScope) -> Self {
        Self { scope, device }
    }

    /// Upload the `ready` sides missing from `loaded` into the image
    fn upload(&self, cube_map: &CubeMap, image: &DeviceObject, face_size: UVec2, ready: CubeSides, loaded: CubeSides) -> CubeSides {
        let mut uploaded = loaded;
        for side in CubeSide::ALL {
            if !ready.contains(side.flag()) || loaded.contains(side.flag()) {
                continue;
            }
            let Some(surface) = cube_map.side(side).and_then(|texture| texture.surface(false)) else {
                continue;
            };
            if surface.size() != face_size {
                hg_engine::engine_warn!(self.scope,
                    "Side {:?} is {}x{}, expected {}x{}; skipped",
                    side, surface.width(), surface.height(), face_size.x, face_size.y);
                continue;
            }
            uploaded |= side.flag();
        }

        let bytes_per_face = face_bytes(face_size);
        let record = ObjectRecord::Image {
            size: face_size,
            layers: 6,
            parameters: Default::default(),
            uploaded: bytes_per_face * uploaded.bits().count_ones() as usize,
        };
        if let Err(err) = image.update(record) {
            hg_engine::engine_error!(self.scope, "Cube map upload failed: {}", err);
            return loaded;
        }
        uploaded
    }
}

impl RenderDataProcessor for CubeMapProcessor {
    fn target(&self) -> DataType {
        DataType::CubeMap
    }

    fn need_setup(&self, data: &dyn Renderable) -> bool {
        let Some(cube_map) = downcast_renderable::<CubeMap>(data) else {
            return true;
        };
        match data.render_data().specific_data_as::<CubeMapSpecific>() {
            None => true,
            Some(specific) => {
                !specific.is_valid() || !specific.loaded_sides().contains(cube_map.ready_sides(false))
            }
        }
    }

    fn setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool {
        if !self.need_setup(data) {
            return true;
        }
        let Some(cube_map) = downcast_renderable::<CubeMap>(data) else {
            hg_engine::engine_error!(self.scope, "Setup of {} routed to the cube map processor", data.data_type());
            return false;
        };

        // Streaming more sides into a valid realization
        if let Some(specific) = data.render_data().specific_data_as::<CubeMapSpecific>() {
            if specific.is_valid() {
                let ready = cube_map.ready_sides(guarantee);
                let loaded = specific.loaded_sides();
                let uploaded = self.upload(cube_map, &specific.image, specific.face_size, ready, loaded);
                *specific.loaded.lock().unwrap_or_else(PoisonError::into_inner) = uploaded;
                hg_engine::engine_trace!(self.scope, "Cube map sides loaded: {:?}", uploaded);
                return true;
            }
        }

        let ready = cube_map.ready_sides(guarantee);
        let Some(face_size) = CubeSide::ALL
            .iter()
            .filter(|side| ready.contains(side.flag()))
            .find_map(|side| cube_map.side(*side).and_then(|texture| texture.surface(false)))
            .map(|surface| surface.size())
        else {
            hg_engine::engine_trace!(self.scope, "No cube map side ready yet");
            return false;
        };

        let empty = ObjectRecord::Image {
            size: face_size,
            layers: 6,
            parameters: Default::default(),
            uploaded: 0,
        };
        let image = match reclaim_specific::<CubeMapSpecific>(data.render_data()) {
            Some(previous) if previous.image.update(empty.clone()).is_ok() => previous.image,
            _ => DeviceObject::create(&self.device, empty),
        };

        let loaded = self.upload(cube_map, &image, face_size, ready, CubeSides::empty());
        hg_engine::engine_debug!(self.scope,
            "Cube map realized as image {} with sides {:?}", image.handle(), loaded);
        data.render_data().set_specific_data(Arc::new(CubeMapSpecific {
            image,
            face_size,
            loaded: Mutex::new(loaded),
            validity: Validity::new(),
        }));
        true
    }
}

#[cfg(test)]
#[path = "headless_cube_map_tests.rs"]
mod tests;
