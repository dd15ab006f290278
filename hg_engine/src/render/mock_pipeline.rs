/// Mock pipeline parts for unit tests (no device required)
///
/// The mocks record what the pipeline asks of them into shared journals so
/// tests can inspect dispatch order, setup counts and frame boundaries.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use glam::UVec2;
use crate::engine_bail;
use crate::error::Result;
use crate::scene::RenderBehaviour;
use super::data_type::DataType;
use super::gizmos::Gizmos;
use super::pipeline::{BehaviourRenderer, DrawContext, FrameTarget, PipelineBackend};
use super::processor::{downcast_renderable, RenderDataProcessor};
use super::render_data::{RenderData, Renderable, SpecificData, Validity};
use super::renderer::Config;

static NEXT_MOCK_HANDLE: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// Mock Specific Data
// ============================================================================

#[derive(Debug)]
pub struct MockSpecific {
    pub handle: u64,
    validity: Validity,
}

impl MockSpecific {
    pub fn new() -> Self {
        Self {
            handle: NEXT_MOCK_HANDLE.fetch_add(1, Ordering::Relaxed),
            validity: Validity::new(),
        }
    }
}

impl SpecificData for MockSpecific {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

// ============================================================================
// Mock Processor
// ============================================================================

/// Attaches a `MockSpecific` on setup; fails for behaviours flagged `fail_setup`
pub struct MockProcessor {
    target: DataType,
    pub setups: Arc<Mutex<Vec<DataType>>>,
}

impl MockProcessor {
    pub fn new(target: DataType) -> Self {
        Self {
            target,
            setups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn setup_count(&self) -> usize {
        self.setups.lock().unwrap().len()
    }
}

impl RenderDataProcessor for MockProcessor {
    fn target(&self) -> DataType {
        self.target
    }

    fn need_setup(&self, data: &dyn Renderable) -> bool {
        !data.render_data().is_realized()
    }

    fn setup(&mut self, data: &dyn Renderable, _guarantee: bool) -> bool {
        if !self.need_setup(data) {
            return true;
        }
        if downcast_renderable::<MockBehaviour>(data).is_some_and(|mock| mock.fail_setup) {
            return false;
        }
        self.setups.lock().unwrap().push(data.data_type());
        data.render_data().set_specific_data(Arc::new(MockSpecific::new()));
        true
    }
}

// ============================================================================
// Mock Behaviour Renderer
// ============================================================================

/// Records the name of every behaviour it draws
pub struct MockRenderer {
    target: DataType,
    pub drawn: Arc<Mutex<Vec<String>>>,
}

impl MockRenderer {
    pub fn new(target: DataType) -> Self {
        Self {
            target,
            drawn: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl BehaviourRenderer for MockRenderer {
    fn target(&self) -> DataType {
        self.target
    }

    fn render(&mut self, behaviour: &dyn RenderBehaviour, _ctx: &DrawContext<'_>) -> Result<()> {
        let Some(mock) = behaviour.as_any().downcast_ref::<MockBehaviour>() else {
            engine_bail!("hg::MockRenderer", "Unexpected behaviour type");
        };
        if mock.fail_draw {
            engine_bail!("hg::MockRenderer", "Draw of '{}' failed", mock.name);
        }
        self.drawn.lock().unwrap().push(mock.name.clone());
        Ok(())
    }
}

// ============================================================================
// Mock Backend
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct BackendJournal {
    pub inits: usize,
    pub deinits: usize,
    pub frames_begun: usize,
    pub frames_ended: usize,
    pub gizmo_lines: usize,
    pub last_target_size: Option<UVec2>,
}

pub struct MockBackend {
    pub journal: Arc<Mutex<BackendJournal>>,
    pub fail_init: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            journal: Arc::new(Mutex::new(BackendJournal::default())),
            fail_init: false,
        }
    }
}

impl PipelineBackend for MockBackend {
    fn init(&mut self, _config: &Config) -> Result<()> {
        if self.fail_init {
            engine_bail!("hg::MockBackend", "Init failed");
        }
        self.journal.lock().unwrap().inits += 1;
        Ok(())
    }

    fn deinit(&mut self) {
        self.journal.lock().unwrap().deinits += 1;
    }

    fn begin_frame(&mut self, target: &FrameTarget<'_>) -> Result<()> {
        let mut journal = self.journal.lock().unwrap();
        journal.frames_begun += 1;
        journal.last_target_size = target.render_target.map(|target| target.size());
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.journal.lock().unwrap().frames_ended += 1;
        Ok(())
    }

    fn draw_gizmos(&mut self, gizmos: &Gizmos) -> Result<()> {
        self.journal.lock().unwrap().gizmo_lines += gizmos.len();
        Ok(())
    }
}

// ============================================================================
// Mock Render Behaviour
// ============================================================================

pub struct MockBehaviour {
    pub name: String,
    render_data: RenderData,
    pub translucent: bool,
    pub enabled: bool,
    pub fail_setup: bool,
    pub fail_draw: bool,
    pub dependencies: Vec<Arc<dyn Renderable>>,
}

impl MockBehaviour {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            render_data: RenderData::new(data_type),
            translucent: false,
            enabled: true,
            fail_setup: false,
            fail_draw: false,
            dependencies: Vec::new(),
        }
    }

    pub fn translucent(mut self) -> Self {
        self.translucent = true;
        self
    }
}

impl Renderable for MockBehaviour {
    fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RenderBehaviour for MockBehaviour {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_translucent(&self) -> bool {
        self.translucent
    }

    fn visit_dependencies(&self, visitor: &mut dyn FnMut(&dyn Renderable)) {
        for dependency in &self.dependencies {
            visitor(&**dependency);
        }
    }
}
