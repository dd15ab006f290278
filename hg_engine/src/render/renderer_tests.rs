use super::*;
use crate::render::data_type::DataType;
use crate::render::mock_pipeline::{MockBackend, MockBehaviour, MockProcessor, MockRenderer};
use crate::render::pipeline::{PipelineBuilder, PipelineState};
use crate::scene::{Behaviour, GameObject};
use glam::Vec3;

fn mock_pipeline() -> (RenderingPipeline, std::sync::Arc<std::sync::Mutex<crate::render::mock_pipeline::BackendJournal>>) {
    let backend = MockBackend::new();
    let journal = backend.journal.clone();
    let pipeline = PipelineBuilder::new(backend)
        .processor(MockProcessor::new(DataType::Mesh)).unwrap()
        .renderer(MockRenderer::new(DataType::Mesh)).unwrap()
        .build();
    (pipeline, journal)
}

#[test]
fn test_without_pipeline() {
    let mut renderer = Renderer::new(Config::default());
    let behaviour = MockBehaviour::new("a", DataType::Mesh);

    assert!(matches!(renderer.init(), Err(Error::InvalidState(_))));
    assert!(!renderer.setup(&behaviour, true));
    assert!(!renderer.need_setup(&behaviour));
    assert!(renderer.render(&Scene::new("empty")).is_err());
    renderer.deinit();
}

#[test]
fn test_setup_goes_through_pipeline() {
    let mut renderer = Renderer::new(Config::default());
    let (pipeline, _) = mock_pipeline();
    renderer.set_pipeline(pipeline);
    renderer.init().unwrap();

    let behaviour = MockBehaviour::new("a", DataType::Mesh);
    assert!(renderer.need_setup(&behaviour));
    assert!(renderer.setup(&behaviour, false));
    assert!(!renderer.need_setup(&behaviour));
}

#[test]
fn test_set_pipeline_returns_previous_deinitialized() {
    let mut renderer = Renderer::new(Config::default());
    let (first, first_journal) = mock_pipeline();
    let (second, _) = mock_pipeline();

    assert!(renderer.set_pipeline(first).is_none());
    renderer.init().unwrap();

    let previous = renderer.set_pipeline(second).unwrap();
    assert_eq!(previous.state(), PipelineState::Deinitialized);
    assert_eq!(first_journal.lock().unwrap().deinits, 1);
    assert_eq!(renderer.pipeline().unwrap().state(), PipelineState::Uninitialized);
}

#[test]
fn test_render_scene() {
    let mut renderer = Renderer::new(Config::default());
    let (pipeline, journal) = mock_pipeline();
    renderer.set_pipeline(pipeline);
    renderer.init().unwrap();

    let mut scene = Scene::new("main");
    scene.add_game_object(
        GameObject::new("cube").with_behaviour(Behaviour::render(MockBehaviour::new("cube", DataType::Mesh))),
    );
    scene.update(0.016);

    let stats = renderer.render(&scene).unwrap();
    assert_eq!(stats.rendered, 1);
    assert_eq!(renderer.frame_index(), 1);
    assert_eq!(journal.lock().unwrap().frames_ended, 1);
}

#[test]
fn test_gizmos_discarded_when_disabled() {
    let config = Config { gizmos_enabled: false, ..Config::default() };
    let mut renderer = Renderer::new(config);
    let (pipeline, journal) = mock_pipeline();
    renderer.set_pipeline(pipeline);
    renderer.init().unwrap();

    renderer.gizmos().line(Vec3::ZERO, Vec3::X, glam::Vec4::ONE);
    renderer.render(&Scene::new("empty")).unwrap();

    assert_eq!(journal.lock().unwrap().gizmo_lines, 0);
    assert!(renderer.gizmos().is_empty());
}

#[test]
fn test_clear_color_from_config() {
    let config = Config { clear_color: glam::Vec4::new(0.2, 0.3, 0.4, 1.0), ..Config::default() };
    let renderer = Renderer::new(config);
    assert_eq!(renderer.config().clear_color, glam::Vec4::new(0.2, 0.3, 0.4, 1.0));
    assert_eq!(renderer.frame_index(), 0);
}
