/// Mesh geometry shared between mesh renderers.
///
/// `MeshData` is plain CPU-side geometry. It is not render data by itself:
/// the `MeshRenderer` behaviour that references it is. Several behaviours may
/// reference the same `Arc<MeshData>`, in which case backends share one set
/// of buffers between them.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use crate::error::{Error, Result};

/// Interleaved vertex layout (32 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position, normal, uv }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Create a mesh, checking that every index points at a vertex
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidResource(format!(
                "Index count {} is not a multiple of 3", indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&index| index as usize >= vertices.len()) {
            return Err(Error::InvalidResource(format!(
                "Index {} out of range ({} vertices)", bad, vertices.len()
            )));
        }
        Ok(Self { vertices, indices })
    }

    /// Axis-aligned cube centered on the origin, 24 vertices / 36 indices
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = (normal + u * su + v * sv) * h;
                let uv = Vec2::new((su + 1.0) * 0.5, (1.0 - sv) * 0.5);
                vertices.push(Vertex::new(position, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }

    /// Square in the XZ plane facing +Y
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vertex::new(Vec3::new(-h, 0.0, h), Vec3::Y, Vec2::new(0.0, 1.0)),
            Vertex::new(Vec3::new(h, 0.0, h), Vec3::Y, Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(h, 0.0, -h), Vec3::Y, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(-h, 0.0, -h), Vec3::Y, Vec2::new(0.0, 0.0)),
        ];
        Self { vertices, indices: vec![0, 1, 2, 0, 2, 3] }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex buffer contents, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer contents (u32 indices), ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Radius of the origin-centered sphere enclosing every vertex
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|vertex| vertex.position.length())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
