use super::*;

fn buffer(len: usize) -> ObjectRecord {
    ObjectRecord::Buffer { usage: BufferUsage::Vertex, bytes: vec![0u8; len] }
}

#[test]
fn test_create_and_destroy() {
    let mut device = HeadlessDevice::new(true);
    let handle = device.create(buffer(16));

    assert!(device.is_alive(handle));
    assert_eq!(device.live_objects(), 1);
    assert_eq!(device.stats().bytes_uploaded, 16);

    assert!(device.destroy(handle));
    assert!(!device.is_alive(handle));
    assert_eq!(device.stats().live_objects(), 0);
}

#[test]
fn test_destroy_unknown_handle() {
    let mut device = HeadlessDevice::new(false);
    let handle = device.create(buffer(4));
    device.destroy(handle);
    assert!(!device.destroy(handle));
    assert_eq!(device.stats().objects_destroyed, 1);
}

#[test]
fn test_record_blocks_are_recycled() {
    let mut device = HeadlessDevice::new(false);
    let first = device.create(buffer(4));
    device.destroy(first);
    assert_eq!(device.record_blocks(), (0, 1));

    let second = device.create(ObjectRecord::Program { name: "p".to_string(), source_len: 10 });
    assert_eq!(device.record_blocks(), (1, 0));
    assert_eq!(second, first);
}

#[test]
fn test_update_keeps_handle() {
    let mut device = HeadlessDevice::new(false);
    let handle = device.create(buffer(4));
    device.update(handle, buffer(8)).unwrap();

    assert_eq!(device.record(handle), Some(&buffer(8)));
    assert_eq!(device.stats().objects_updated, 1);
    assert_eq!(device.stats().bytes_uploaded, 12);
}

#[test]
fn test_update_unknown_handle_fails() {
    let mut device = HeadlessDevice::new(false);
    let handle = device.create(buffer(4));
    device.destroy(handle);
    assert!(matches!(device.update(handle, buffer(1)), Err(Error::InvalidResource(_))));
}

#[test]
fn test_device_object_destroys_on_drop() {
    let device = HeadlessDevice::shared(false);
    let object = DeviceObject::create(&device, buffer(32));
    let handle = object.handle();
    assert!(lock_device(&device).is_alive(handle));
    assert_eq!(object.record(), Some(buffer(32)));

    drop(object);
    assert!(!lock_device(&device).is_alive(handle));
}

#[test]
fn test_device_object_outliving_device() {
    let device = HeadlessDevice::shared(false);
    let object = DeviceObject::create(&device, buffer(1));
    drop(device);

    assert!(object.record().is_none());
    assert!(matches!(object.update(buffer(2)), Err(Error::InvalidState(_))));
    drop(object);
}
