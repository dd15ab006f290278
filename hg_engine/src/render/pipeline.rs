/// Rendering pipeline - processor and renderer dispatch.
///
/// A pipeline owns one `RenderDataProcessor` per `DataType` (realizing
/// render data into backend state) and one `BehaviourRenderer` per
/// `DataType` (drawing render behaviours of that type). Both tables are
/// fixed at construction through `PipelineBuilder`; registering two entries
/// for the same type is an error.
///
/// # Frame
///
/// `render()` walks the enabled, non-removing game objects of a scene and
/// their enabled render behaviours. For each behaviour it sets up the
/// dependencies (shader, textures, cube maps) and the behaviour's own render
/// data, then hands it to the matching renderer. Opaque behaviours are
/// drawn in scene order, translucent ones afterwards from far to near.
/// A behaviour whose setup or draw fails is logged and skipped; the frame
/// always completes.
///
/// # State
///
/// ```text
/// Uninitialized -> Initialized -> [SetupPending -> Rendering -> Initialized]* -> Deinitialized
/// ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use glam::{Mat4, Vec4};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::log::LogScope;
use crate::scene::{GameObjectKey, LightingContext, RenderBehaviour, Scene};
use super::camera::{Camera, Rect};
use super::data_type::DataType;
use super::gizmos::Gizmos;
use super::processor::RenderDataProcessor;
use super::render_data::Renderable;
use super::render_target::RenderTarget;
use super::renderer::Config;

// ===== BACKEND SEAMS =====

/// Window-system and device specific part of a pipeline
pub trait PipelineBackend: Send {
    fn init(&mut self, config: &Config) -> Result<()>;

    fn deinit(&mut self);

    /// Bind the frame's target and clear it
    fn begin_frame(&mut self, target: &FrameTarget<'_>) -> Result<()>;

    fn end_frame(&mut self) -> Result<()>;

    fn draw_gizmos(&mut self, gizmos: &Gizmos) -> Result<()>;
}

/// Where a frame is drawn
pub struct FrameTarget<'a> {
    pub viewport: Rect,
    pub clear_color: Vec4,
    /// None for the default framebuffer
    pub render_target: Option<&'a RenderTarget>,
}

/// Backend draw routine for one kind of render behaviour
pub trait BehaviourRenderer: Send {
    /// Data type of the behaviours this renderer draws
    fn target(&self) -> DataType;

    /// Draw a behaviour whose render data and dependencies are set up
    fn render(&mut self, behaviour: &dyn RenderBehaviour, ctx: &DrawContext<'_>) -> Result<()>;
}

// ===== FRAME DATA =====

/// Per-frame state owned by the caller and threaded through `render`
#[derive(Debug, Clone)]
pub struct FrameContext {
    pub camera: Camera,
    pub viewport: Rect,
    pub clear_color: Vec4,
    /// Debug geometry, drawn then cleared by every pass
    pub gizmos: Gizmos,
    frame_index: u64,
}

impl FrameContext {
    pub fn new(viewport: Rect) -> Self {
        Self {
            camera: Camera::default(),
            viewport,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            gizmos: Gizmos::new(),
            frame_index: 0,
        }
    }

    /// Number of frames rendered with this context
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

/// What a behaviour renderer receives for one draw
pub struct DrawContext<'a> {
    pub camera: &'a Camera,
    pub lighting: &'a LightingContext,
    /// Local-to-world matrix of the owning game object
    pub world: Mat4,
    pub object: GameObjectKey,
    pub frame_index: u64,
}

/// Outcome of one `render` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Behaviours drawn successfully
    pub rendered: usize,
    /// Behaviours skipped (no renderer, setup failure, draw failure)
    pub skipped: usize,
    /// Behaviours drawn in the translucent pass
    pub translucent: usize,
}

/// Lifecycle state of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Initialized,
    SetupPending,
    Rendering,
    Deinitialized,
}

// ===== BUILDER =====

/// Assembles a pipeline from a backend, processors and renderers
pub struct PipelineBuilder {
    scope: LogScope,
    backend: Box<dyn PipelineBackend>,
    processors: FxHashMap<DataType, Box<dyn RenderDataProcessor>>,
    renderers: FxHashMap<DataType, Box<dyn BehaviourRenderer>>,
}

impl PipelineBuilder {
    pub fn new(backend: impl PipelineBackend + 'static) -> Self {
        Self {
            scope: LogScope::new("hg::Pipeline"),
            backend: Box::new(backend),
            processors: FxHashMap::default(),
            renderers: FxHashMap::default(),
        }
    }

    /// Log scope of the pipeline (default `hg::Pipeline`)
    pub fn scope(mut self, scope: LogScope) -> Self {
        self.scope = scope;
        self
    }

    /// Register a processor for its target type
    ///
    /// # Errors
    ///
    /// `Error::DuplicateRegistration` if a processor already handles that type.
    pub fn processor(mut self, processor: impl RenderDataProcessor + 'static) -> Result<Self> {
        let data_type = processor.target();
        if self.processors.contains_key(&data_type) {
            crate::engine_error!(self.scope, "Processor for {} registered twice", data_type);
            return Err(Error::DuplicateRegistration { kind: "processor", data_type });
        }
        self.processors.insert(data_type, Box::new(processor));
        Ok(self)
    }

    /// Register a behaviour renderer for its target type
    ///
    /// # Errors
    ///
    /// `Error::DuplicateRegistration` if a renderer already handles that type.
    pub fn renderer(mut self, renderer: impl BehaviourRenderer + 'static) -> Result<Self> {
        let data_type = renderer.target();
        if self.renderers.contains_key(&data_type) {
            crate::engine_error!(self.scope, "Renderer for {} registered twice", data_type);
            return Err(Error::DuplicateRegistration { kind: "renderer", data_type });
        }
        self.renderers.insert(data_type, Box::new(renderer));
        Ok(self)
    }

    pub fn build(self) -> RenderingPipeline {
        crate::engine_debug!(self.scope, "Pipeline built with {} processors and {} renderers",
            self.processors.len(), self.renderers.len());
        RenderingPipeline {
            scope: self.scope,
            backend: self.backend,
            processors: self.processors,
            renderers: self.renderers,
            state: PipelineState::Uninitialized,
            warned_types: FxHashSet::default(),
        }
    }
}

// ===== TRANSLUCENT ORDERING =====

/// Camera distance ordered far to near
#[derive(Debug, Clone, Copy)]
struct DistanceKey(f32);

impl PartialEq for DistanceKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DistanceKey {}

impl PartialOrd for DistanceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}

struct Draw<'s> {
    behaviour: &'s dyn RenderBehaviour,
    object: GameObjectKey,
    world: Mat4,
}

// ===== PIPELINE =====

/// Backend orchestrator owning the dispatch tables
pub struct RenderingPipeline {
    scope: LogScope,
    backend: Box<dyn PipelineBackend>,
    processors: FxHashMap<DataType, Box<dyn RenderDataProcessor>>,
    renderers: FxHashMap<DataType, Box<dyn BehaviourRenderer>>,
    state: PipelineState,
    /// Behaviour types already reported as having no renderer
    warned_types: FxHashSet<DataType>,
}

impl RenderingPipeline {
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn scope(&self) -> &LogScope {
        &self.scope
    }

    /// Types with a registered processor, sorted
    pub fn processor_types(&self) -> Vec<DataType> {
        let mut types: Vec<DataType> = self.processors.keys().copied().collect();
        types.sort();
        types
    }

    /// Types with a registered renderer, sorted
    pub fn renderer_types(&self) -> Vec<DataType> {
        let mut types: Vec<DataType> = self.renderers.keys().copied().collect();
        types.sort();
        types
    }

    pub fn has_processor(&self, data_type: DataType) -> bool {
        self.processors.contains_key(&data_type)
    }

    pub fn has_renderer(&self, data_type: DataType) -> bool {
        self.renderers.contains_key(&data_type)
    }

    /// Initialize the backend
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` if already initialized, or the backend error.
    pub fn init(&mut self, config: &Config) -> Result<()> {
        match self.state {
            PipelineState::Uninitialized | PipelineState::Deinitialized => {}
            state => {
                return Err(Error::InvalidState(format!("Pipeline init in state {:?}", state)));
            }
        }
        self.backend.init(config)?;
        self.state = PipelineState::Initialized;
        crate::engine_info!(self.scope, "Pipeline initialized for '{}'", config.app_name);
        Ok(())
    }

    /// Release the backend (no-op unless initialized)
    pub fn deinit(&mut self) {
        if self.state != PipelineState::Initialized {
            return;
        }
        self.backend.deinit();
        self.state = PipelineState::Deinitialized;
        crate::engine_info!(self.scope, "Pipeline deinitialized");
    }

    /// Realize `data` through its processor
    ///
    /// Returns false if no processor handles its type or the processor failed.
    pub fn setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool {
        let data_type = data.data_type();
        match self.processors.get_mut(&data_type) {
            Some(processor) => processor.setup(data, guarantee),
            None => {
                crate::engine_warn!(self.scope, "No processor registered for {}", data_type);
                false
            }
        }
    }

    /// Whether `data` must be set up before use
    ///
    /// False when no processor handles its type: there is nothing this
    /// pipeline could do for it.
    pub fn need_setup(&self, data: &dyn Renderable) -> bool {
        self.processors
            .get(&data.data_type())
            .is_some_and(|processor| processor.need_setup(data))
    }

    /// Set up `data` only if needed
    fn ensure_setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool {
        match self.processors.get_mut(&data.data_type()) {
            Some(processor) => !processor.need_setup(data) || processor.setup(data, guarantee),
            None => true,
        }
    }

    /// Set up the dependencies of a behaviour, then the behaviour itself
    fn prepare(&mut self, behaviour: &dyn RenderBehaviour) -> bool {
        let mut ready = true;
        behaviour.visit_dependencies(&mut |dependency: &dyn Renderable| {
            if ready && !self.ensure_setup(dependency, false) {
                ready = false;
            }
        });
        ready && self.ensure_setup(behaviour.as_renderable(), false)
    }

    /// Draw every enabled render behaviour of `scene`
    ///
    /// `target` selects an offscreen render target; it is set up (blocking on
    /// its attachments if needed) before the frame begins.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` if the pipeline is not initialized, or a backend
    /// error from beginning/ending the frame. Per-behaviour failures are not
    /// errors: they are logged and counted in `FrameStats::skipped`.
    pub fn render(
        &mut self,
        scene: &Scene,
        frame: &mut FrameContext,
        target: Option<&RenderTarget>,
    ) -> Result<FrameStats> {
        if self.state != PipelineState::Initialized {
            return Err(Error::InvalidState(format!("Pipeline render in state {:?}", self.state)));
        }

        self.state = PipelineState::SetupPending;
        if let Some(target) = target {
            if !self.ensure_setup(target, true) {
                self.state = PipelineState::Initialized;
                return Err(crate::engine_err!(self.scope, "Render target setup failed"));
            }
        }

        let frame_target = FrameTarget {
            viewport: frame.viewport,
            clear_color: frame.clear_color,
            render_target: target,
        };
        if let Err(err) = self.backend.begin_frame(&frame_target) {
            self.state = PipelineState::Initialized;
            return Err(err);
        }

        let mut stats = FrameStats::default();
        let mut opaque: Vec<Draw<'_>> = Vec::new();
        let mut translucent: BTreeMap<DistanceKey, Vec<Draw<'_>>> = BTreeMap::new();

        for (object_key, object) in scene.game_objects().iter() {
            if !object.is_enabled() {
                continue;
            }
            let world = object.transform().matrix();

            for (_, behaviour) in object.render_behaviours().iter() {
                let behaviour: &dyn RenderBehaviour = behaviour.as_ref();
                if !behaviour.is_enabled() {
                    continue;
                }

                let data_type = behaviour.data_type();
                if !self.renderers.contains_key(&data_type) {
                    if self.warned_types.insert(data_type) {
                        crate::engine_warn!(self.scope, "No renderer registered for {}", data_type);
                    }
                    stats.skipped += 1;
                    continue;
                }

                if !self.prepare(behaviour) {
                    crate::engine_debug!(self.scope,
                        "Skipping {} on '{}': setup failed", data_type, object.name());
                    stats.skipped += 1;
                    continue;
                }

                let draw = Draw { behaviour, object: object_key, world };
                if behaviour.is_translucent() {
                    let distance = frame.camera.distance_to(object.transform().position);
                    translucent.entry(DistanceKey(distance)).or_default().push(draw);
                } else {
                    opaque.push(draw);
                }
            }
        }

        self.state = PipelineState::Rendering;
        for draw in &opaque {
            self.dispatch(draw, scene.lighting(), frame, &mut stats);
        }
        for draw in translucent.values().flatten() {
            if self.dispatch(draw, scene.lighting(), frame, &mut stats) {
                stats.translucent += 1;
            }
        }

        if !frame.gizmos.is_empty() {
            if let Err(err) = self.backend.draw_gizmos(&frame.gizmos) {
                crate::engine_warn!(self.scope, "Gizmo drawing failed: {}", err);
            }
        }
        frame.gizmos.clear();

        let ended = self.backend.end_frame();
        frame.frame_index += 1;
        self.state = PipelineState::Initialized;
        ended?;
        Ok(stats)
    }

    /// Hand one behaviour to its renderer; true if it was drawn
    fn dispatch(
        &mut self,
        draw: &Draw<'_>,
        lighting: &LightingContext,
        frame: &FrameContext,
        stats: &mut FrameStats,
    ) -> bool {
        let data_type = draw.behaviour.data_type();
        let Some(renderer) = self.renderers.get_mut(&data_type) else {
            stats.skipped += 1;
            return false;
        };

        let ctx = DrawContext {
            camera: &frame.camera,
            lighting,
            world: draw.world,
            object: draw.object,
            frame_index: frame.frame_index,
        };
        match renderer.render(draw.behaviour, &ctx) {
            Ok(()) => {
                stats.rendered += 1;
                true
            }
            Err(err) => {
                crate::engine_warn!(self.scope, "Draw of {} failed, skipped: {}", data_type, err);
                stats.skipped += 1;
                false
            }
        }
    }
}

impl Drop for RenderingPipeline {
    fn drop(&mut self) {
        self.deinit();
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
