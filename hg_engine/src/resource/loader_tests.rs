/// Tests for asynchronous resource loading

use super::*;

fn surface_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    bytes.extend(std::iter::repeat(200u8).take((width * height * 4) as usize));
    bytes
}

fn manager_with(entries: &[(&str, Vec<u8>)]) -> ResourceManager {
    let accessor = MemoryAccessor::new();
    for (id, bytes) in entries {
        accessor.insert(*id, bytes.clone());
    }
    ResourceManager::new(Arc::new(accessor))
}

// ============================================================================
// Tests: accessor / loaders
// ============================================================================

#[test]
fn test_memory_accessor_missing_id() {
    let accessor = MemoryAccessor::new();
    assert!(matches!(accessor.load_raw("nope"), Err(Error::InvalidResource(_))));
}

#[test]
fn test_string_loader_rejects_invalid_utf8() {
    let data = Data { id: "bad.glsl".to_string(), bytes: vec![0xff, 0xfe] };
    assert!(StringLoader.load(data).is_err());
}

#[test]
fn test_surface_loader_decodes_header() {
    let data = Data { id: "grass.rgba".to_string(), bytes: surface_bytes(4, 2) };
    let surface = SurfaceLoader.load(data).unwrap();
    assert_eq!(surface.width(), 4);
    assert_eq!(surface.height(), 2);
    assert_eq!(surface.pixels().len(), 32);
}

#[test]
fn test_surface_loader_rejects_short_payload() {
    let mut bytes = surface_bytes(4, 4);
    bytes.truncate(20);
    let data = Data { id: "short.rgba".to_string(), bytes };
    assert!(SurfaceLoader.load(data).is_err());
}

// ============================================================================
// Tests: futures
// ============================================================================

#[test]
fn test_ready_future() {
    let future = ResourceFuture::ready(5u32);
    assert!(future.is_ready());
    assert_eq!(*future.get().unwrap(), 5);
    assert_eq!(*future.guarantee_get().unwrap(), 5);
}

#[test]
fn test_pending_future_get_is_none_until_fulfilled() {
    let (future, promise) = ResourceFuture::<String>::pending();
    assert!(future.get().is_none());
    assert!(!future.is_ready());

    promise.fulfill("done".to_string());
    assert_eq!(future.get().unwrap().as_str(), "done");
}

#[test]
fn test_dropped_promise_fails_future() {
    let (future, promise) = ResourceFuture::<u8>::pending();
    drop(promise);
    assert!(future.is_failed());
    assert!(future.guarantee_get().is_none());
}

#[test]
fn test_guarantee_get_waits_for_worker() {
    let (future, promise) = ResourceFuture::<u64>::pending();
    let worker = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(20));
        promise.fulfill(99);
    });
    assert_eq!(*future.guarantee_get().unwrap(), 99);
    worker.join().unwrap();
}

// ============================================================================
// Tests: manager
// ============================================================================

#[test]
fn test_manager_load_sync() {
    let manager = manager_with(&[("basic.glsl", b"void main() {}".to_vec())]);
    assert_eq!(manager.load_sync("basic.glsl", StringLoader).unwrap(), "void main() {}");
}

#[test]
fn test_manager_async_load_resolves() {
    let manager = manager_with(&[("sky.rgba", surface_bytes(2, 2))]);
    let future = manager.load("sky.rgba", SurfaceLoader);
    let surface = future.guarantee_get().unwrap();
    assert_eq!(surface.size(), glam::UVec2::new(2, 2));
}

#[test]
fn test_manager_async_load_failure_never_resolves() {
    let manager = manager_with(&[]);
    let future = manager.load("missing.rgba", SurfaceLoader);
    assert!(future.guarantee_get().is_none());
    assert!(future.get().is_none());
}

/// Records the worker thread each decode ran on
struct ThreadRecordingLoader {
    threads: Arc<std::sync::Mutex<rustc_hash::FxHashSet<String>>>,
}

impl ResourceLoader for ThreadRecordingLoader {
    type Output = usize;

    fn load(&self, data: Data) -> Result<usize> {
        let name = std::thread::current().name().unwrap_or("unnamed").to_string();
        self.threads.lock().unwrap().insert(name);
        std::thread::sleep(std::time::Duration::from_millis(5));
        Ok(data.bytes.len())
    }
}

#[test]
fn test_loads_share_a_bounded_pool() {
    let accessor = MemoryAccessor::new();
    for i in 0..32 {
        accessor.insert(format!("blob_{}", i), vec![0u8; i]);
    }
    let manager = ResourceManager::with_workers(Arc::new(accessor), 2);
    assert_eq!(manager.worker_count(), 2);

    let threads = Arc::new(std::sync::Mutex::new(rustc_hash::FxHashSet::default()));
    let futures: Vec<_> = (0..32)
        .map(|i| manager.load(&format!("blob_{}", i), ThreadRecordingLoader { threads: threads.clone() }))
        .collect();

    for (i, future) in futures.iter().enumerate() {
        assert_eq!(*future.guarantee_get().unwrap(), i);
    }
    let threads = threads.lock().unwrap();
    assert!(threads.len() <= 2);
    assert!(threads.iter().all(|name| name.starts_with("hg-loader-")));
}

#[test]
fn test_drop_finishes_queued_loads() {
    let manager = manager_with(&[("a.glsl", b"a".to_vec()), ("b.glsl", b"b".to_vec())]);
    let first = manager.load("a.glsl", StringLoader);
    let second = manager.load("b.glsl", StringLoader);
    drop(manager);

    assert_eq!(first.get().unwrap().as_str(), "a");
    assert_eq!(second.get().unwrap().as_str(), "b");
}

#[test]
fn test_future_clones_all_wake_on_fulfill() {
    let (future, promise) = ResourceFuture::<u32>::pending();
    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let future = future.clone();
            std::thread::spawn(move || future.guarantee_get().map(|value| *value))
        })
        .collect();
    std::thread::sleep(std::time::Duration::from_millis(10));
    promise.fulfill(7);

    for waiter in waiters {
        assert_eq!(waiter.join().unwrap(), Some(7));
    }
    assert!(!future.is_failed());
}
