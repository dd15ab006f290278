/// Tests for RenderTarget

use super::*;
use crate::render::render_data::{SpecificData, Validity};

struct FakeFramebuffer(Validity);

impl SpecificData for FakeFramebuffer {
    fn is_valid(&self) -> bool {
        self.0.is_valid()
    }

    fn invalidate(&self) {
        self.0.invalidate();
    }
}

fn realized_target(size: UVec2) -> RenderTarget {
    let target = RenderTarget::new(size);
    target.render_data().set_specific_data(Arc::new(FakeFramebuffer(Validity::new())));
    target
}

#[test]
fn test_resize_keeps_specific_data_valid() {
    let target = realized_target(UVec2::new(320, 240));
    target.set_size(UVec2::new(640, 480));
    assert_eq!(target.size(), UVec2::new(640, 480));
    assert!(target.render_data().is_realized());
}

#[test]
fn test_attaching_texture_invalidates() {
    let target = realized_target(UVec2::new(16, 16));
    let color = Arc::new(Texture::with_size(UVec2::new(16, 16)));
    target.set_color_texture(0, color.clone());

    assert!(!target.render_data().is_realized());
    assert!(Arc::ptr_eq(&target.color_texture(0).unwrap(), &color));
}

#[test]
fn test_color_textures_sorted_by_index() {
    let target = RenderTarget::new(UVec2::new(8, 8));
    target.set_color_texture(2, Arc::new(Texture::with_size(UVec2::new(8, 8))));
    target.set_color_texture(0, Arc::new(Texture::with_size(UVec2::new(8, 8))));

    let indices: Vec<u32> = target.color_textures().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_removing_missing_attachment_keeps_validity() {
    let target = realized_target(UVec2::new(8, 8));
    assert!(target.remove_color_texture(3).is_none());
    assert!(target.render_data().is_realized());
}
