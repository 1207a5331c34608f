use wgpu::Device;

use super::vertex::Vertex3D;
use crate::gfx::geometry::{GeometryData, LineData};

/// How a mesh's index buffer is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Lines,
}

/// Vertex data plus its GPU buffers, created lazily on first upload
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    topology: Topology,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let vertices = geometry
            .vertices
            .iter()
            .zip(&geometry.normals)
            .map(|(&position, &normal)| Vertex3D { position, normal })
            .collect();
        Self::new(vertices, geometry.indices.clone(), Topology::Triangles)
    }

    pub fn from_lines(lines: &LineData) -> Self {
        let vertices = lines
            .positions
            .iter()
            .map(|&position| Vertex3D {
                position,
                normal: [0.0, 1.0, 0.0],
            })
            .collect();
        let indices = (0..lines.positions.len() as u32).collect();
        Self::new(vertices, indices, Topology::Lines)
    }

    fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>, topology: Topology) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            topology,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Triangles or line segments, depending on topology
    pub fn primitive_count(&self) -> u32 {
        match self.topology {
            Topology::Triangles => self.index_count / 3,
            Topology::Lines => self.index_count / 2,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    /// Creates the vertex and index buffers; does nothing if they exist
    pub fn init_gpu_resources(&mut self, device: &Device) {
        if self.is_uploaded() {
            return;
        }

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    /// Does nothing until the mesh is uploaded
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{cuboid, grid};

    #[test]
    fn test_triangle_mesh_from_geometry() {
        let mesh = Mesh::from_geometry(&cuboid(1.0, 1.0, 1.0));
        assert_eq!(mesh.topology(), Topology::Triangles);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.primitive_count(), 12);
        assert!(!mesh.is_uploaded());
    }

    #[test]
    fn test_line_mesh_indexes_every_endpoint() {
        let mesh = Mesh::from_lines(&grid(2.0, 2));
        assert_eq!(mesh.topology(), Topology::Lines);
        assert_eq!(mesh.index_count(), mesh.vertex_count());
        assert_eq!(mesh.primitive_count(), 6);
    }
}
