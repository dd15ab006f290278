/// Forward pipeline assembly for the headless backend

use hg_engine::hg::Result;
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{Config, PipelineBuilder, RenderingPipeline};
use crate::headless_backend::HeadlessBackend;
use crate::headless_cube_map::CubeMapProcessor;
use crate::headless_device::{HeadlessDevice, SharedDevice};
use crate::headless_forward_renderer::{DrawLog, ForwardMeshRenderer};
use crate::headless_mesh::MeshProcessor;
use crate::headless_render_target::RenderTargetProcessor;
use crate::headless_shader::ShaderProcessor;
use crate::headless_texture::TextureProcessor;

/// A built (not yet initialized) pipeline plus the handles to observe it
pub struct HeadlessPipeline {
    pub pipeline: RenderingPipeline,
    pub device: SharedDevice,
    pub draw_log: DrawLog,
}

/// Build a forward pipeline: one processor per built-in data type and a mesh renderer
///
/// # Example
///
/// ```
/// use hg_engine::hg::render::{Config, Renderer};
/// use hg_engine_renderer_headless::create_forward_pipeline;
///
/// let headless = create_forward_pipeline(&Config::default())?;
/// let mut renderer = Renderer::new(Config::default());
/// renderer.set_pipeline(headless.pipeline);
/// renderer.init()?;
/// # Ok::<(), hg_engine::hg::Error>(())
/// ```
pub fn create_forward_pipeline(config: &Config) -> Result<HeadlessPipeline> {
    let scope = LogScope::new("hg::headless::ForwardPipeline");
    let device = HeadlessDevice::shared(config.enable_validation);
    let draw_log = DrawLog::new();

    let pipeline = PipelineBuilder::new(HeadlessBackend::new(device.clone(), scope.child("Backend")))
        .scope(scope.clone())
        .processor(MeshProcessor::new(device.clone(), scope.child("MeshProcessor")))?
        .processor(TextureProcessor::new(device.clone(), scope.child("TextureProcessor")))?
        .processor(ShaderProcessor::new(device.clone(), scope.child("ShaderProcessor")))?
        .processor(RenderTargetProcessor::new(device.clone(), scope.child("RenderTargetProcessor")))?
        .processor(CubeMapProcessor::new(device.clone(), scope.child("CubeMapProcessor")))?
        .renderer(ForwardMeshRenderer::new(device.clone(), draw_log.clone(), scope.child("ForwardMeshRenderer")))?
        .build();

    hg_engine::engine_debug!(scope, "Forward pipeline assembled for '{}'", config.app_name);
    Ok(HeadlessPipeline { pipeline, device, draw_log })
}
