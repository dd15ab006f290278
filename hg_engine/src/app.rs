/// Application - main loop glue between the system layer, scene and renderer.
///
/// The system layer (window, input, presentation) is abstracted behind
/// `SystemController`; the application only drives it once per cycle.

use std::time::{Duration, Instant};
use crate::error::Result;
use crate::log::LogScope;
use crate::render::{FrameStats, Rect, Renderer};
use crate::scene::Scene;

/// Window-system collaborator driven by the application loop
pub trait SystemController {
    fn init(&mut self) -> Result<()>;

    fn deinit(&mut self);

    /// Pump pending window/input events
    fn poll_events(&mut self);

    /// Present the frame that was just rendered
    fn swap_buffers(&mut self) -> Result<()>;

    /// Current drawable area
    fn viewport(&self) -> Rect;

    /// True once the user asked to close the application
    fn is_closed(&self) -> bool;
}

/// Owns the system controller, the renderer and the running scene
pub struct Application {
    scope: LogScope,
    system: Box<dyn SystemController>,
    renderer: Renderer,
    scene: Option<Scene>,
    pending_scene: Option<Scene>,
    fixed_timestep: Option<Duration>,
    last_cycle: Option<Instant>,
    frames: u64,
    last_stats: FrameStats,
    initialized: bool,
}

impl Application {
    pub fn new(system: impl SystemController + 'static, renderer: Renderer) -> Self {
        Self {
            scope: LogScope::new("hg::Application"),
            system: Box::new(system),
            renderer,
            scene: None,
            pending_scene: None,
            fixed_timestep: None,
            last_cycle: None,
            frames: 0,
            last_stats: FrameStats::default(),
            initialized: false,
        }
    }

    /// Use a constant delta time instead of wall-clock time
    pub fn with_fixed_timestep(mut self, step: Duration) -> Self {
        self.fixed_timestep = Some(step);
        self
    }

    /// Initialize the system layer, then the renderer
    pub fn init(&mut self) -> Result<()> {
        self.system.init()?;
        if let Err(err) = self.renderer.init() {
            self.system.deinit();
            return Err(err);
        }
        self.renderer.set_viewport(self.system.viewport());
        self.initialized = true;
        crate::engine_info!(self.scope, "Application initialized");
        Ok(())
    }

    pub fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        self.scene = None;
        self.pending_scene = None;
        self.renderer.deinit();
        self.system.deinit();
        self.initialized = false;
        crate::engine_info!(self.scope, "Application shut down after {} frames", self.frames);
    }

    /// Schedule `scene`; it replaces the running scene at the start of the next cycle
    pub fn set_scene(&mut self, scene: Scene) {
        self.pending_scene = Some(scene);
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stats of the last rendered frame
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = self.last_cycle.map_or(Duration::ZERO, |last| now - last);
        self.last_cycle = Some(now);
        self.fixed_timestep.unwrap_or(elapsed).as_secs_f32()
    }

    /// Run one cycle: switch scene, poll, update, render, present
    ///
    /// Returns false once the system controller reports it was closed.
    pub fn perform_cycle(&mut self) -> Result<bool> {
        if let Some(scene) = self.pending_scene.take() {
            crate::engine_debug!(self.scope, "Switching to scene '{}'", scene.name());
            self.scene = Some(scene);
        }

        self.system.poll_events();
        if self.system.is_closed() {
            return Ok(false);
        }
        self.renderer.set_viewport(self.system.viewport());

        let delta_time = self.delta_time();
        if let Some(scene) = self.scene.as_mut() {
            scene.update(delta_time);
            self.last_stats = self.renderer.render(scene)?;
        }

        self.system.swap_buffers()?;
        self.frames += 1;
        Ok(true)
    }

    /// Cycle until the system closes or `max_frames` cycles ran
    pub fn exec(&mut self, max_frames: Option<u64>) -> Result<u64> {
        let mut cycles = 0;
        while max_frames.map_or(true, |max| cycles < max) {
            if !self.perform_cycle()? {
                break;
            }
            cycles += 1;
        }
        Ok(cycles)
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        self.deinit();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
