/// Renderer - frontend façade over the active pipeline.
///
/// Owns the pipeline, the material collection and the per-frame context
/// (active camera, viewport, gizmos). Game code sets things up through the
/// renderer; the renderer forwards to whatever pipeline is installed.

use std::sync::Arc;
use glam::Vec4;
use crate::error::{Error, Result};
use crate::log::LogScope;
use crate::scene::Scene;
use super::camera::{Camera, Rect};
use super::gizmos::Gizmos;
use super::material_collection::MaterialCollection;
use super::pipeline::{FrameContext, FrameStats, RenderingPipeline};
use super::render_data::Renderable;
use super::render_target::RenderTarget;

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
    /// Enable backend validation
    pub enable_validation: bool,
    /// Clear color of the default framebuffer
    pub clear_color: Vec4,
    /// Draw gizmos (when false they are discarded every frame)
    pub gizmos_enabled: bool,
    /// Wait for vertical sync when presenting
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "HG Application".to_string(),
            app_version: (1, 0, 0),
            enable_validation: cfg!(debug_assertions),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            gizmos_enabled: cfg!(debug_assertions),
            vsync: true,
        }
    }
}

/// Frontend renderer
pub struct Renderer {
    scope: LogScope,
    config: Config,
    pipeline: Option<RenderingPipeline>,
    materials: MaterialCollection,
    frame: FrameContext,
    render_target: Option<Arc<RenderTarget>>,
}

impl Renderer {
    pub fn new(config: Config) -> Self {
        let mut frame = FrameContext::default();
        frame.clear_color = config.clear_color;
        Self {
            scope: LogScope::new("hg::Renderer"),
            config,
            pipeline: None,
            materials: MaterialCollection::new(),
            frame,
            render_target: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== PIPELINE =====

    /// Install a pipeline, returning the previous one (deinitialized)
    pub fn set_pipeline(&mut self, pipeline: RenderingPipeline) -> Option<RenderingPipeline> {
        let previous = self.take_pipeline();
        self.pipeline = Some(pipeline);
        previous
    }

    /// Remove the pipeline, deinitializing it
    pub fn take_pipeline(&mut self) -> Option<RenderingPipeline> {
        let mut pipeline = self.pipeline.take()?;
        pipeline.deinit();
        Some(pipeline)
    }

    pub fn pipeline(&self) -> Option<&RenderingPipeline> {
        self.pipeline.as_ref()
    }

    pub fn pipeline_mut(&mut self) -> Option<&mut RenderingPipeline> {
        self.pipeline.as_mut()
    }

    fn require_pipeline(&mut self) -> Result<&mut RenderingPipeline> {
        self.pipeline
            .as_mut()
            .ok_or_else(|| Error::InvalidState("No rendering pipeline installed".to_string()))
    }

    /// Initialize the installed pipeline
    pub fn init(&mut self) -> Result<()> {
        let config = self.config.clone();
        self.require_pipeline()?.init(&config)
    }

    /// Deinitialize the installed pipeline (no-op without one)
    pub fn deinit(&mut self) {
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.deinit();
        }
    }

    /// Realize `data` through the pipeline; false without a pipeline
    pub fn setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool {
        match self.pipeline.as_mut() {
            Some(pipeline) => pipeline.setup(data, guarantee),
            None => {
                crate::engine_error!(self.scope,
                    "Cannot set up {}: no rendering pipeline installed", data.data_type());
                false
            }
        }
    }

    /// Whether `data` needs setup; false without a pipeline
    pub fn need_setup(&self, data: &dyn Renderable) -> bool {
        self.pipeline
            .as_ref()
            .is_some_and(|pipeline| pipeline.need_setup(data))
    }

    /// Render `scene` with the active camera into the active target
    pub fn render(&mut self, scene: &Scene) -> Result<FrameStats> {
        if !self.config.gizmos_enabled {
            self.frame.gizmos.clear();
        }
        let target = self.render_target.clone();
        let pipeline = self.pipeline
            .as_mut()
            .ok_or_else(|| Error::InvalidState("No rendering pipeline installed".to_string()))?;
        pipeline.render(scene, &mut self.frame, target.as_deref())
    }

    // ===== FRAME STATE =====

    pub fn materials(&self) -> &MaterialCollection {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut MaterialCollection {
        &mut self.materials
    }

    pub fn camera(&self) -> &Camera {
        &self.frame.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.frame.camera = camera;
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.frame.camera
    }

    pub fn gizmos(&mut self) -> &mut Gizmos {
        &mut self.frame.gizmos
    }

    pub fn viewport(&self) -> Rect {
        self.frame.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.frame.viewport = viewport;
    }

    /// Offscreen target for subsequent frames (None = default framebuffer)
    pub fn set_render_target(&mut self, target: Option<Arc<RenderTarget>>) {
        self.render_target = target;
    }

    pub fn render_target(&self) -> Option<&Arc<RenderTarget>> {
        self.render_target.as_ref()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame.frame_index()
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
