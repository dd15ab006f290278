/// Shader realization: "compiles" shader source into a program object
///
/// A recompiled shader keeps its program handle. Sources that failed to
/// compile are remembered until the shader is dropped, so the failure is
/// reported once instead of every frame.

use std::sync::{Arc, Weak};
use rustc_hash::FxHashMap;
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{
    downcast_renderable, DataType, RenderDataProcessor, Renderable, Shader, SpecificData, Validity,
};
use crate::headless_device::{reclaim_specific, DeviceObject, ObjectRecord, SharedDevice};
use crate::headless_handle_allocator::ObjectHandle;

#[derive(Debug)]
pub struct ShaderSpecific {
    program: DeviceObject,
    validity: Validity,
}

impl ShaderSpecific {
    pub fn handle(&self) -> ObjectHandle {
        self.program.handle()
    }
}

impl SpecificData for ShaderSpecific {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

pub struct ShaderProcessor {
    scope: LogScope,
    device: SharedDevice,
    /// Sources that failed to compile, by allocation address
    failed: FxHashMap<usize, Weak<String>>,
}

impl ShaderProcessor {
    pub fn new(device: SharedDevice, scope: LogScope) -> Self {
        Self { scope, device, failed: FxHashMap::default() }
    }

    fn has_failed(&self, source: &Arc<String>) -> bool {
        self.failed
            .get(&(Arc::as_ptr(source) as usize))
            .and_then(Weak::upgrade)
            .is_some_and(|failed| Arc::ptr_eq(&failed, source))
    }

    fn remember_failure(&mut self, source: &Arc<String>) {
        self.failed.retain(|_, failed| failed.strong_count() > 0);
        self.failed.insert(Arc::as_ptr(source) as usize, Arc::downgrade(source));
    }

    /// Number of live shaders whose compilation failed
    pub fn failed_count(&self) -> usize {
        self.failed.values().filter(|failed| failed.strong_count() > 0).count()
    }
}

impl RenderDataProcessor for ShaderProcessor {
    fn target(&self) -> DataType {
        DataType::Shader
    }

    fn need_setup(&self, data: &dyn Renderable) -> bool {
        !data.render_data().is_realized()
    }

    fn setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool {
        if !self.need_setup(data) {
            return true;
        }
        let Some(shader) = downcast_renderable::<Shader>(data) else {
            hg_engine::engine_error!(self.scope, "Setup of {} routed to the shader processor", data.data_type());
            return false;
        };

        let Some(source) = shader.source(guarantee) else {
            if shader.is_ready() || guarantee {
                hg_engine::engine_warn!(self.scope, "Source of shader '{}' failed to load", shader.name());
            }
            return false;
        };
        if self.has_failed(&source) {
            return false;
        }
        // An empty program is the headless equivalent of a compile error
        if source.trim().is_empty() {
            hg_engine::engine_error!(self.scope, "Shader '{}' failed to compile: empty source", shader.name());
            self.remember_failure(&source);
            return false;
        }

        let record = ObjectRecord::Program {
            name: shader.name().to_string(),
            source_len: source.len(),
        };
        let program = match reclaim_specific::<ShaderSpecific>(data.render_data()) {
            Some(previous) if previous.program.update(record.clone()).is_ok() => previous.program,
            _ => DeviceObject::create(&self.device, record),
        };
        hg_engine::engine_debug!(self.scope, "Shader '{}' compiled as program {}", shader.name(), program.handle());
        data.render_data().set_specific_data(Arc::new(ShaderSpecific {
            program,
            validity: Validity::new(),
        }));
        true
    }
}

#[cfg(test)]
#[path = "headless_shader_tests.rs"]
mod tests;
