/// Tests for RenderingPipeline dispatch
///
/// These tests validate registration, setup routing, the frame state machine,
/// opaque/translucent ordering and partial-failure tolerance using the mock
/// backend, processors and renderers.

use super::*;
use crate::render::mock_pipeline::{MockBackend, MockBehaviour, MockProcessor, MockRenderer, MockSpecific};
use crate::render::render_data::RenderData;
use crate::render::shader::Shader;
use crate::scene::{Behaviour, GameObject, Transform};
use glam::Vec3;
use std::sync::{Arc, Mutex};

const SPRITE: DataType = DataType::Custom("Sprite");

// ============================================================================
// Helper Functions
// ============================================================================

struct Harness {
    pipeline: RenderingPipeline,
    drawn: Arc<Mutex<Vec<String>>>,
    setups: Arc<Mutex<Vec<DataType>>>,
    journal: Arc<Mutex<crate::render::mock_pipeline::BackendJournal>>,
}

fn harness() -> Harness {
    let backend = MockBackend::new();
    let journal = backend.journal.clone();
    let renderer = MockRenderer::new(SPRITE);
    let drawn = renderer.drawn.clone();
    let processor = MockProcessor::new(SPRITE);
    let setups = processor.setups.clone();

    let mut pipeline = PipelineBuilder::new(backend)
        .processor(processor).unwrap()
        .processor(MockProcessor::new(DataType::Shader)).unwrap()
        .renderer(renderer).unwrap()
        .build();
    pipeline.init(&Config::default()).unwrap();

    Harness { pipeline, drawn, setups, journal }
}

fn object_at(z: f32, behaviour: MockBehaviour) -> GameObject {
    GameObject::new(behaviour.name.clone())
        .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, z)))
        .with_behaviour(Behaviour::render(behaviour))
}

fn scene_with(objects: Vec<GameObject>) -> Scene {
    let mut scene = Scene::new("pipeline_tests");
    for object in objects {
        scene.add_game_object(object);
    }
    scene.update(0.0);
    scene
}

fn drawn(harness: &Harness) -> Vec<String> {
    harness.drawn.lock().unwrap().clone()
}

// ============================================================================
// Tests: registration
// ============================================================================

#[test]
fn test_duplicate_processor_is_rejected() {
    let result = PipelineBuilder::new(MockBackend::new())
        .processor(MockProcessor::new(DataType::Mesh)).unwrap()
        .processor(MockProcessor::new(DataType::Mesh));

    assert!(matches!(
        result,
        Err(Error::DuplicateRegistration { kind: "processor", data_type: DataType::Mesh })
    ));
}

#[test]
fn test_duplicate_renderer_is_rejected() {
    let result = PipelineBuilder::new(MockBackend::new())
        .renderer(MockRenderer::new(SPRITE)).unwrap()
        .renderer(MockRenderer::new(SPRITE));

    assert!(matches!(result, Err(Error::DuplicateRegistration { kind: "renderer", .. })));
}

#[test]
fn test_registered_types_are_introspectable() {
    let harness = harness();
    assert_eq!(harness.pipeline.processor_types(), vec![DataType::Shader, SPRITE]);
    assert_eq!(harness.pipeline.renderer_types(), vec![SPRITE]);
    assert!(harness.pipeline.has_processor(DataType::Shader));
    assert!(!harness.pipeline.has_renderer(DataType::Mesh));
}

// ============================================================================
// Tests: setup routing
// ============================================================================

#[test]
fn test_setup_without_processor_fails() {
    let mut harness = harness();
    let data = RenderData::new(DataType::CubeMap);
    assert!(!harness.pipeline.setup(&data, false));
    assert!(!harness.pipeline.need_setup(&data));
}

#[test]
fn test_setup_is_idempotent() {
    let mut harness = harness();
    let behaviour = MockBehaviour::new("a", SPRITE);

    assert!(harness.pipeline.need_setup(&behaviour));
    assert!(harness.pipeline.setup(&behaviour, false));
    assert!(!harness.pipeline.need_setup(&behaviour));
    let first = behaviour.render_data().specific_data_as::<MockSpecific>().unwrap();

    assert!(harness.pipeline.setup(&behaviour, false));
    let second = behaviour.render_data().specific_data_as::<MockSpecific>().unwrap();
    assert_eq!(first.handle, second.handle);
    assert_eq!(harness.setups.lock().unwrap().len(), 1);
}

#[test]
fn test_invalidate_forces_setup() {
    let mut harness = harness();
    let behaviour = MockBehaviour::new("a", SPRITE);
    harness.pipeline.setup(&behaviour, false);

    behaviour.render_data().invalidate();
    assert!(harness.pipeline.need_setup(&behaviour));
    assert!(harness.pipeline.setup(&behaviour, false));
    assert!(!harness.pipeline.need_setup(&behaviour));
}

// ============================================================================
// Tests: state machine
// ============================================================================

#[test]
fn test_render_before_init_fails() {
    let mut pipeline = PipelineBuilder::new(MockBackend::new()).build();
    let scene = Scene::new("empty");
    let mut frame = FrameContext::default();

    assert_eq!(pipeline.state(), PipelineState::Uninitialized);
    assert!(matches!(pipeline.render(&scene, &mut frame, None), Err(Error::InvalidState(_))));
}

#[test]
fn test_double_init_fails() {
    let mut harness = harness();
    assert!(matches!(harness.pipeline.init(&Config::default()), Err(Error::InvalidState(_))));
}

#[test]
fn test_failed_backend_init_keeps_uninitialized() {
    let mut backend = MockBackend::new();
    backend.fail_init = true;
    let mut pipeline = PipelineBuilder::new(backend).build();

    assert!(pipeline.init(&Config::default()).is_err());
    assert_eq!(pipeline.state(), PipelineState::Uninitialized);
}

#[test]
fn test_deinit_then_reinit() {
    let mut harness = harness();
    harness.pipeline.deinit();
    assert_eq!(harness.pipeline.state(), PipelineState::Deinitialized);
    harness.pipeline.deinit();
    assert_eq!(harness.journal.lock().unwrap().deinits, 1);

    harness.pipeline.init(&Config::default()).unwrap();
    assert_eq!(harness.pipeline.state(), PipelineState::Initialized);
}

#[test]
fn test_drop_deinitializes() {
    let harness = harness();
    let journal = harness.journal.clone();
    drop(harness);
    assert_eq!(journal.lock().unwrap().deinits, 1);
}

// ============================================================================
// Tests: frame
// ============================================================================

#[test]
fn test_render_draws_each_behaviour_once() {
    let mut harness = harness();
    let scene = scene_with(vec![
        object_at(0.0, MockBehaviour::new("a", SPRITE)),
        object_at(0.0, MockBehaviour::new("b", SPRITE)),
    ]);
    let mut frame = FrameContext::default();

    let stats = harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert_eq!(stats, FrameStats { rendered: 2, skipped: 0, translucent: 0 });
    assert_eq!(drawn(&harness), vec!["a", "b"]);
    assert_eq!(harness.pipeline.state(), PipelineState::Initialized);
    assert_eq!(frame.frame_index(), 1);

    let journal = harness.journal.lock().unwrap();
    assert_eq!(journal.frames_begun, 1);
    assert_eq!(journal.frames_ended, 1);
}

#[test]
fn test_translucent_drawn_after_opaque_far_to_near() {
    let mut harness = harness();
    // Default camera sits at z = 5
    let scene = scene_with(vec![
        object_at(4.0, MockBehaviour::new("near", SPRITE).translucent()),
        object_at(0.0, MockBehaviour::new("opaque", SPRITE)),
        object_at(-10.0, MockBehaviour::new("far", SPRITE).translucent()),
        object_at(0.0, MockBehaviour::new("mid_1", SPRITE).translucent()),
        object_at(0.0, MockBehaviour::new("mid_2", SPRITE).translucent()),
    ]);
    let mut frame = FrameContext::default();

    let stats = harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert_eq!(drawn(&harness), vec!["opaque", "far", "mid_1", "mid_2", "near"]);
    assert_eq!(stats.translucent, 4);
}

#[test]
fn test_failed_setup_skips_only_that_behaviour() {
    let mut harness = harness();
    let mut broken = MockBehaviour::new("broken", SPRITE);
    broken.fail_setup = true;
    let scene = scene_with(vec![
        object_at(0.0, MockBehaviour::new("a", SPRITE)),
        object_at(0.0, broken),
        object_at(0.0, MockBehaviour::new("b", SPRITE)),
    ]);
    let mut frame = FrameContext::default();

    let stats = harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert_eq!(stats.rendered, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(drawn(&harness), vec!["a", "b"]);
}

#[test]
fn test_failed_draw_does_not_abort_frame() {
    let mut harness = harness();
    let mut broken = MockBehaviour::new("broken", SPRITE);
    broken.fail_draw = true;
    let scene = scene_with(vec![object_at(0.0, broken), object_at(0.0, MockBehaviour::new("ok", SPRITE))]);
    let mut frame = FrameContext::default();

    let stats = harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert_eq!(stats.rendered, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(harness.journal.lock().unwrap().frames_ended, 1);
}

#[test]
fn test_behaviour_without_renderer_is_skipped() {
    let mut harness = harness();
    let scene = scene_with(vec![object_at(0.0, MockBehaviour::new("mesh", DataType::Mesh))]);
    let mut frame = FrameContext::default();

    let stats = harness.pipeline.render(&scene, &mut frame, None).unwrap();
    assert_eq!(stats, FrameStats { rendered: 0, skipped: 1, translucent: 0 });
}

#[test]
fn test_disabled_and_removing_objects_are_not_drawn() {
    let mut harness = harness();
    let mut hidden = MockBehaviour::new("hidden", SPRITE);
    hidden.enabled = false;
    let mut scene = scene_with(vec![
        object_at(0.0, hidden),
        object_at(0.0, MockBehaviour::new("disabled_object", SPRITE)),
        object_at(0.0, MockBehaviour::new("removed", SPRITE)),
        object_at(0.0, MockBehaviour::new("visible", SPRITE)),
    ]);
    let disabled = scene.find("disabled_object").unwrap();
    scene.game_object_mut(disabled).unwrap().set_enabled(false);
    let removed = scene.find("removed").unwrap();
    scene.remove_game_object(removed);

    let mut frame = FrameContext::default();
    harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert_eq!(drawn(&harness), vec!["visible"]);
}

#[test]
fn test_dependencies_set_up_before_draw() {
    let mut harness = harness();
    let shader = Arc::new(Shader::from_source("dep", "void main() {}"));
    let mut behaviour = MockBehaviour::new("a", SPRITE);
    behaviour.dependencies.push(shader.clone());
    let scene = scene_with(vec![object_at(0.0, behaviour)]);
    let mut frame = FrameContext::default();

    harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert!(shader.render_data().is_realized());
    assert_eq!(*harness.setups.lock().unwrap(), vec![SPRITE]);
}

#[test]
fn test_gizmos_drawn_then_cleared() {
    let mut harness = harness();
    let scene = scene_with(Vec::new());
    let mut frame = FrameContext::default();
    frame.gizmos.line(Vec3::ZERO, Vec3::X, glam::Vec4::ONE);
    frame.gizmos.line(Vec3::ZERO, Vec3::Y, glam::Vec4::ONE);

    harness.pipeline.render(&scene, &mut frame, None).unwrap();

    assert!(frame.gizmos.is_empty());
    assert_eq!(harness.journal.lock().unwrap().gizmo_lines, 2);
}

#[test]
fn test_render_target_set_up_and_bound() {
    let backend = MockBackend::new();
    let journal = backend.journal.clone();
    let mut pipeline = PipelineBuilder::new(backend)
        .processor(MockProcessor::new(DataType::RenderTarget)).unwrap()
        .build();
    pipeline.init(&Config::default()).unwrap();

    let target = RenderTarget::new(glam::UVec2::new(128, 64));
    let scene = Scene::new("offscreen");
    let mut frame = FrameContext::default();
    pipeline.render(&scene, &mut frame, Some(&target)).unwrap();

    assert!(target.render_data().is_realized());
    assert_eq!(journal.lock().unwrap().last_target_size, Some(glam::UVec2::new(128, 64)));
}
