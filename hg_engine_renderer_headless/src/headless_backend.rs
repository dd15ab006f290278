/// HeadlessBackend - frame boundaries and gizmos on the headless device

use hg_engine::hg::{Error, Result};
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{Config, FrameTarget, Gizmos, PipelineBackend, Rect, Renderable};
use crate::headless_device::{lock_device, SharedDevice};
use crate::headless_render_target::RenderTargetSpecific;

pub struct HeadlessBackend {
    scope: LogScope,
    device: SharedDevice,
    frame_open: bool,
    viewport: Rect,
}

impl HeadlessBackend {
    pub fn new(device: SharedDevice, scope: LogScope) -> Self {
        Self {
            scope,
            device,
            frame_open: false,
            viewport: Rect::default(),
        }
    }

    /// Viewport of the last frame begun
    pub fn viewport(&self) -> Rect {
        self.viewport
    }
}

impl PipelineBackend for HeadlessBackend {
    fn init(&mut self, config: &Config) -> Result<()> {
        let mut device = lock_device(&self.device);
        if device.is_initialized() {
            return Err(Error::InitializationFailed("Headless device already initialized".to_string()));
        }
        device.set_initialized(true);
        let (major, minor, patch) = config.app_version;
        hg_engine::engine_info!(self.scope,
            "Headless device ready for '{}' v{}.{}.{} (validation: {})",
            config.app_name, major, minor, patch, config.enable_validation);
        Ok(())
    }

    fn deinit(&mut self) {
        let mut device = lock_device(&self.device);
        device.set_initialized(false);
        device.bind_framebuffer(None);
        self.frame_open = false;
        hg_engine::engine_info!(self.scope,
            "Headless device released after {} frames", device.stats().frames);
    }

    fn begin_frame(&mut self, target: &FrameTarget<'_>) -> Result<()> {
        if self.frame_open {
            hg_engine::engine_bail!(self.scope, "begin_frame called twice without end_frame");
        }
        let framebuffer = match target.render_target {
            Some(render_target) => {
                let Some(specific) = render_target.render_data().specific_data_as::<RenderTargetSpecific>() else {
                    hg_engine::engine_bail!(self.scope, "Render target is not realized");
                };
                Some(specific.handle())
            }
            None => None,
        };

        let mut device = lock_device(&self.device);
        if !device.is_initialized() {
            return Err(Error::InvalidState("Headless device is not initialized".to_string()));
        }
        device.bind_framebuffer(framebuffer);
        self.viewport = target.viewport;
        self.frame_open = true;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        if !self.frame_open {
            hg_engine::engine_bail!(self.scope, "end_frame called without begin_frame");
        }
        let mut device = lock_device(&self.device);
        device.stats_mut().frames += 1;
        device.bind_framebuffer(None);
        self.frame_open = false;
        Ok(())
    }

    fn draw_gizmos(&mut self, gizmos: &Gizmos) -> Result<()> {
        lock_device(&self.device).stats_mut().gizmo_lines += gizmos.len() as u64;
        Ok(())
    }
}
