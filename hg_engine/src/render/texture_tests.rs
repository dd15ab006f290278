/// Tests for Surface / Texture

use super::*;
use crate::render::render_data::{SpecificData, Validity};

struct FakeTextureHandle {
    validity: Validity,
}

impl SpecificData for FakeTextureHandle {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&self) {
        self.validity.invalidate();
    }
}

// ============================================================================
// Tests: Surface
// ============================================================================

#[test]
fn test_surface_rejects_wrong_pixel_count() {
    let result = Surface::from_rgba8(2, 2, vec![0u8; 15]);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_surface_accepts_exact_pixel_count() {
    let surface = Surface::from_rgba8(2, 3, vec![0u8; 24]).unwrap();
    assert_eq!(surface.size(), UVec2::new(2, 3));
}

#[test]
fn test_solid_surface_repeats_color() {
    let surface = Surface::solid(2, 1, [1, 2, 3, 4]);
    assert_eq!(surface.pixels(), &[1, 2, 3, 4, 1, 2, 3, 4]);
}

// ============================================================================
// Tests: Texture sources
// ============================================================================

#[test]
fn test_texture_from_surface_is_ready() {
    let texture = Texture::from_surface(Surface::solid(4, 4, [255; 4]));
    assert!(texture.is_ready());
    assert!(!texture.is_storage_only());
    assert_eq!(texture.size(false), UVec2::new(4, 4));
    assert_eq!(texture.data_type(), DataType::Texture);
}

#[test]
fn test_storage_only_texture_has_size_but_no_pixels() {
    let texture = Texture::with_size(UVec2::new(64, 32));
    assert!(texture.is_storage_only());
    assert_eq!(texture.size(false), UVec2::new(64, 32));
    assert!(texture.surface(true).is_none());
}

#[test]
fn test_pending_texture_size_depends_on_guarantee() {
    let (future, promise) = ResourceFuture::pending();
    let texture = Texture::from_future(future);

    assert!(!texture.is_ready());
    assert_eq!(texture.size(false), UVec2::ZERO);
    assert!(texture.surface(false).is_none());

    let worker = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(10));
        promise.fulfill(Surface::solid(8, 2, [0; 4]));
    });
    assert_eq!(texture.size(true), UVec2::new(8, 2));
    worker.join().unwrap();
    assert!(texture.is_ready());
}

#[test]
fn test_failed_load_never_provides_pixels() {
    let (future, promise) = ResourceFuture::<Surface>::pending();
    promise.fail();
    let texture = Texture::from_future(future);
    assert_eq!(texture.size(true), UVec2::ZERO);
    assert!(texture.surface(true).is_none());
}

// ============================================================================
// Tests: parameters
// ============================================================================

#[test]
fn test_set_parameters_invalidates_on_change() {
    let texture = Texture::from_surface(Surface::solid(1, 1, [0; 4]));
    texture.render_data().set_specific_data(Arc::new(FakeTextureHandle { validity: Validity::new() }));
    assert!(texture.render_data().is_realized());

    let parameters = TextureParameters {
        min_filter: Filtering::Nearest,
        ..TextureParameters::default()
    };
    texture.set_parameters(parameters);

    assert_eq!(texture.parameters(), parameters);
    assert!(!texture.render_data().is_realized());
}

#[test]
fn test_set_same_parameters_keeps_specific_data_valid() {
    let texture = Texture::from_surface(Surface::solid(1, 1, [0; 4]));
    texture.render_data().set_specific_data(Arc::new(FakeTextureHandle { validity: Validity::new() }));

    texture.set_parameters(TextureParameters::default());
    assert!(texture.render_data().is_realized());
}
