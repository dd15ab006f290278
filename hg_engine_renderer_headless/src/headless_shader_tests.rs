use super::*;
use hg_engine::hg::resource::ResourceFuture;
use crate::headless_device::{lock_device, HeadlessDevice};

fn processor() -> (ShaderProcessor, SharedDevice) {
    let device = HeadlessDevice::shared(false);
    (ShaderProcessor::new(device.clone(), LogScope::new("test::ShaderProcessor")), device)
}

#[test]
fn test_compile_creates_program() {
    let (mut processor, device) = processor();
    let shader = Shader::from_source("unlit", "void main() {}");

    assert!(processor.setup(&shader, false));
    let specific = shader.render_data().specific_data_as::<ShaderSpecific>().unwrap();
    let device = lock_device(&device);
    match device.record(specific.handle()) {
        Some(ObjectRecord::Program { name, source_len }) => {
            assert_eq!(name, "unlit");
            assert_eq!(*source_len, 14);
        }
        other => panic!("unexpected record {:?}", other),
    }
}

#[test]
fn test_empty_source_fails() {
    let (mut processor, device) = processor();
    let shader = Shader::from_source("broken", "  \n");

    assert!(!processor.setup(&shader, true));
    assert!(processor.need_setup(&shader));
    assert_eq!(lock_device(&device).live_objects(), 0);
}

#[test]
fn test_pending_source() {
    let (mut processor, _device) = processor();
    let (future, promise) = ResourceFuture::<String>::pending();
    let shader = Shader::from_future("streamed", future);

    assert!(!processor.setup(&shader, false));
    promise.fulfill("void main() {}".to_string());
    assert!(processor.setup(&shader, false));
}

#[test]
fn test_invalidate_recompiles() {
    let (mut processor, device) = processor();
    let shader = Shader::from_source("unlit", "void main() {}");
    processor.setup(&shader, false);

    let first = shader.render_data().specific_data_as::<ShaderSpecific>().unwrap().handle();

    shader.render_data().invalidate();
    assert!(processor.need_setup(&shader));
    assert!(processor.setup(&shader, false));

    let second = shader.render_data().specific_data_as::<ShaderSpecific>().unwrap().handle();
    assert_eq!(first, second);
    let stats = lock_device(&device).stats();
    assert_eq!(stats.objects_created, 1);
    assert_eq!(stats.objects_updated, 1);
    assert_eq!(lock_device(&device).live_objects(), 1);
}

#[test]
fn test_failed_compile_not_retried() {
    let (mut processor, device) = processor();
    let broken = Shader::from_source("broken", "");

    for _ in 0..3 {
        assert!(!processor.setup(&broken, true));
    }
    assert_eq!(processor.failed_count(), 1);
    assert!(processor.need_setup(&broken));

    // A distinct shader is still compiled normally
    let fine = Shader::from_source("fine", "void main() {}");
    assert!(processor.setup(&fine, false));
    assert_eq!(lock_device(&device).live_objects(), 1);

    drop(broken);
    assert_eq!(processor.failed_count(), 0);
}
