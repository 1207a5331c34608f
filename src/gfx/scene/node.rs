//! Scene graph nodes
//!
//! A [`SceneNode`] owns its children. Shapes are a `Group` container holding
//! a shaded `Mesh` child and an outline `Lines` child; the reference grid is
//! a bare `Lines` node.

use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use uuid::Uuid;
use wgpu::Device;

use super::{
    layers::Layers,
    mesh::{Mesh, Topology},
};
use crate::{
    gfx::resources::material::MaterialId,
    wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Mesh,
    Lines,
}

/// One of the three animatable transform triples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformProperty {
    Position,
    Rotation,
    Scale,
}

/// Position, Euler XYZ rotation in radians, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Local matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }

    pub fn get(&self, property: TransformProperty) -> Vector3<f32> {
        match property {
            TransformProperty::Position => self.position,
            TransformProperty::Rotation => self.rotation,
            TransformProperty::Scale => self.scale,
        }
    }

    pub fn set(&mut self, property: TransformProperty, value: Vector3<f32>) {
        match property {
            TransformProperty::Position => self.position = value,
            TransformProperty::Rotation => self.rotation = value,
            TransformProperty::Scale => self.scale = value,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

/// Per-node transform buffer and its bind group (group 1 in the scene shader)
pub struct NodeGpuResources {
    transform_ubo: UniformBuffer<TransformUniform>,
    transform_bind_group: wgpu::BindGroup,
}

pub struct SceneNode {
    id: NodeId,
    pub name: String,
    kind: NodeKind,
    pub transform: Transform,
    pub layers: Layers,
    pub material: Option<MaterialId>,
    mesh: Option<Mesh>,
    children: Vec<SceneNode>,
    /// Set on shape containers
    pub character_id: Option<Uuid>,
    /// Rotation the node eases toward every frame, if any
    pub desired_rotation: Option<Vector3<f32>>,
    pub visible: bool,
    world: Matrix4<f32>,
    gpu_resources: Option<NodeGpuResources>,
}

impl SceneNode {
    fn new(name: &str, kind: NodeKind, mesh: Option<Mesh>) -> Self {
        Self {
            id: NodeId::next(),
            name: name.to_string(),
            kind,
            transform: Transform::default(),
            layers: Layers::default(),
            material: None,
            mesh,
            children: Vec::new(),
            character_id: None,
            desired_rotation: None,
            visible: true,
            world: Matrix4::identity(),
            gpu_resources: None,
        }
    }

    /// Empty container node
    pub fn group(name: &str) -> Self {
        Self::new(name, NodeKind::Group, None)
    }

    /// Renderable node; the kind follows the mesh topology
    pub fn with_mesh(name: &str, mesh: Mesh) -> Self {
        let kind = match mesh.topology() {
            Topology::Triangles => NodeKind::Mesh,
            Topology::Lines => NodeKind::Lines,
        };
        Self::new(name, kind, Some(mesh))
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = Some(material.to_string());
        self
    }

    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world
    }

    /// Nodes that produce draw calls: meshes and line sets
    pub fn is_renderable(&self) -> bool {
        self.kind != NodeKind::Group && self.mesh.is_some()
    }

    /// Depth-first, parent before children
    pub fn traverse<F: FnMut(&SceneNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.traverse(f);
        }
    }

    pub fn traverse_mut<F: FnMut(&mut SceneNode)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.children {
            child.traverse_mut(f);
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Recomputes world matrices for this subtree
    pub fn update_world(&mut self, parent: &Matrix4<f32>) {
        self.world = *parent * self.transform.matrix();
        let world = self.world;
        for child in &mut self.children {
            child.update_world(&world);
        }
    }

    /// Creates missing buffers for this subtree and uploads world matrices
    pub fn sync_gpu(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        transform_layout: &BindGroupLayoutWithDesc,
    ) {
        if self.is_renderable() {
            let content = TransformUniform {
                model: self.world.into(),
            };

            match &mut self.gpu_resources {
                Some(resources) => resources.transform_ubo.update_content(queue, content),
                None => {
                    let transform_ubo = UniformBuffer::new_with_data(device, &content);
                    let transform_bind_group = BindGroupBuilder::new(transform_layout)
                        .resource(transform_ubo.binding_resource())
                        .create(device, "Transform Bind Group");
                    self.gpu_resources = Some(NodeGpuResources {
                        transform_ubo,
                        transform_bind_group,
                    });
                }
            }

            if let Some(mesh) = &mut self.mesh {
                mesh.init_gpu_resources(device);
            }
        }

        for child in &mut self.children {
            child.sync_gpu(device, queue, transform_layout);
        }
    }

    /// Get the transform bind group for rendering
    pub fn transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{cuboid, grid};
    use cgmath::Vector4;
    use std::f32::consts::FRAC_PI_2;

    fn assert_close(actual: Vector4<f32>, expected: Vector4<f32>) {
        for i in 0..4 {
            assert!((actual[i] - expected[i]).abs() < 1e-6, "{:?} != {:?}", actual, expected);
        }
    }

    fn shape() -> SceneNode {
        let mut container = SceneNode::group("container");
        container.add_child(SceneNode::with_mesh("body", Mesh::from_geometry(&cuboid(1.0, 1.0, 1.0))));
        container.add_child(SceneNode::with_mesh("outline", Mesh::from_lines(&grid(1.0, 1))));
        container
    }

    #[test]
    fn test_node_ids_are_unique() {
        let a = SceneNode::group("a");
        let b = SceneNode::group("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_kind_follows_mesh_topology() {
        let node = shape();
        assert_eq!(node.kind(), NodeKind::Group);
        assert!(!node.is_renderable());
        assert_eq!(node.children()[0].kind(), NodeKind::Mesh);
        assert_eq!(node.children()[1].kind(), NodeKind::Lines);
        assert!(node.children().iter().all(SceneNode::is_renderable));
    }

    #[test]
    fn test_traverse_visits_parent_first() {
        let node = shape();
        let mut names = Vec::new();
        node.traverse(&mut |n| names.push(n.name.clone()));
        assert_eq!(names, ["container", "body", "outline"]);
    }

    #[test]
    fn test_find_descends_into_children() {
        let mut node = shape();
        let outline_id = node.children()[1].id();

        node.find_mut(outline_id).unwrap().visible = false;
        assert!(!node.find(outline_id).unwrap().visible);
        assert!(node.find(SceneNode::group("other").id()).is_none());
    }

    #[test]
    fn test_transform_property_access() {
        let mut transform = Transform::default();
        transform.set(TransformProperty::Scale, Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(transform.get(TransformProperty::Scale), Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(transform.get(TransformProperty::Position), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let mut parent = SceneNode::group("parent")
            .with_position(1.0, 2.0, 0.0)
            .with_uniform_scale(2.0);
        parent.add_child(SceneNode::group("child").with_position(1.0, 0.0, 0.0));
        parent.update_world(&Matrix4::identity());

        let origin = parent.children()[0].world_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_close(origin, Vector4::new(3.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_is_applied_about_x_first() {
        // A quarter turn about X maps +Y onto +Z.
        let node = SceneNode::group("grid").with_rotation(FRAC_PI_2, 0.0, 0.0);
        let up = node.transform.matrix() * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert_close(up, Vector4::new(0.0, 0.0, 1.0, 0.0));
    }
}
