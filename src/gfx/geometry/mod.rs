//! # Procedural Geometry Generation
//!
//! Generates primitive shapes in memory so the viewer never depends on an
//! external file for its placeholder.
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::gfx::geometry::generate_cube;
//!
//! let cube = generate_cube();
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::object::Mesh;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Converts into a renderable mesh
    pub fn into_mesh(self) -> Mesh {
        Mesh::new(self.vertices, self.normals, self.indices)
    }
}
