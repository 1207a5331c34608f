//! # Procedural Geometry Generation
//!
//! Generates the flat-shaded polyhedra used for the shapes, their outline
//! edges, and the reference grid. Nothing here touches the GPU; the output
//! is plain vertex data that [`Mesh`](crate::gfx::scene::Mesh) uploads.
//!
//! ## Usage
//!
//! ```rust
//! use geometry_wars::gfx::geometry::{dodecahedron, edges};
//! use cgmath::Deg;
//!
//! let solid = dodecahedron(1.0);
//! let outline = edges(&solid, Deg(1.0));
//! assert_eq!(outline.segment_count(), 30);
//! ```

pub mod edges;
pub mod primitives;

pub use edges::edges;
pub use primitives::*;

/// Triangle geometry ready for GPU upload
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
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Line segment geometry, two consecutive positions per segment
#[derive(Debug, Clone, Default)]
pub struct LineData {
    pub positions: Vec<[f32; 3]>,
}

impl LineData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_segment(&mut self, a: [f32; 3], b: [f32; 3]) {
        self.positions.push(a);
        self.positions.push(b);
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }
}
