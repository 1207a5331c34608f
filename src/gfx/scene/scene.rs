use cgmath::{Matrix4, SquareMatrix};
use wgpu::Device;

use crate::{
    gfx::{
        camera::FixedCamera,
        resources::material::{Material, MaterialManager},
    },
    wgpu_utils::BindGroupLayoutWithDesc,
};

use super::{
    mesh::Topology,
    node::{NodeId, NodeKind, SceneNode},
};

/// Main scene containing nodes, materials, and camera
pub struct Scene {
    pub camera: FixedCamera,
    nodes: Vec<SceneNode>,
    pub material_manager: MaterialManager, // Centralized material storage
}

impl Scene {
    /// Creates an empty scene with the built-in materials
    pub fn new(camera: FixedCamera) -> Self {
        Self {
            camera,
            nodes: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Adds a top-level node and returns its id
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Top-level nodes
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn traverse<F: FnMut(&SceneNode)>(&self, mut f: F) {
        for node in &self.nodes {
            node.traverse(&mut f);
        }
    }

    pub fn traverse_mut<F: FnMut(&mut SceneNode)>(&mut self, mut f: F) {
        for node in &mut self.nodes {
            node.traverse_mut(&mut f);
        }
    }

    pub fn find_node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find_map(|node| node.find(id))
    }

    pub fn find_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find_map(|node| node.find_mut(id))
    }

    /// Ids of the top-level container nodes (the spawned shapes)
    pub fn containers(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.kind() == NodeKind::Group)
            .map(SceneNode::id)
            .collect()
    }

    /// Updates camera matrices and world transforms
    pub fn update(&mut self) {
        self.camera.update_view_proj();
        let identity = Matrix4::identity();
        for node in &mut self.nodes {
            node.update_world(&identity);
        }
    }

    /// Creates GPU resources for anything added since the last call and
    /// uploads transforms and material parameters
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn sync_gpu(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        transform_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for node in &mut self.nodes {
            node.sync_gpu(device, queue, transform_layout);
        }
        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);
    }

    /// Gets material for rendering a node
    ///
    /// Returns the material assigned to the node, or the default material
    /// if no material is assigned or the assigned material doesn't exist.
    pub fn material_for(&self, node: &SceneNode) -> &Material {
        self.material_manager
            .get_material_for_node(node.material.as_ref())
    }

    /// Visible renderable nodes with the given topology, in traversal order
    pub fn renderables(&self, topology: Topology) -> Vec<&SceneNode> {
        let mut found = Vec::new();
        for node in &self.nodes {
            collect_renderables(node, topology, &mut found);
        }
        found
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            node_count: 0,
            material_count: self.material_manager.list_materials().len(),
            total_triangles: 0,
            total_line_segments: 0,
        };

        self.traverse(|node| {
            stats.node_count += 1;
            if let Some(mesh) = node.mesh() {
                match mesh.topology() {
                    Topology::Triangles => stats.total_triangles += mesh.primitive_count(),
                    Topology::Lines => stats.total_line_segments += mesh.primitive_count(),
                }
            }
        });

        stats
    }
}

// Hidden nodes hide their whole subtree.
fn collect_renderables<'a>(node: &'a SceneNode, topology: Topology, found: &mut Vec<&'a SceneNode>) {
    if !node.visible {
        return;
    }
    if node.is_renderable() && node.mesh().map(|m| m.topology()) == Some(topology) {
        found.push(node);
    }
    for child in node.children() {
        collect_renderables(child, topology, found);
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_line_segments: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CameraConfig,
        gfx::{
            geometry::{cuboid, grid},
            scene::Mesh,
        },
    };

    fn scene() -> Scene {
        Scene::new(FixedCamera::new(&CameraConfig::default(), 1.0))
    }

    fn shape() -> SceneNode {
        let mut container = SceneNode::group("shape");
        container.add_child(SceneNode::with_mesh("body", Mesh::from_geometry(&cuboid(1.0, 1.0, 1.0))));
        container.add_child(
            SceneNode::with_mesh("outline", Mesh::from_lines(&grid(1.0, 1)))
                .with_material(MaterialManager::OUTLINE),
        );
        container
    }

    #[test]
    fn test_containers_are_top_level_groups() {
        let mut scene = scene();
        scene.add(SceneNode::with_mesh("grid", Mesh::from_lines(&grid(10.0, 10))));
        let first = scene.add(shape());
        let second = scene.add(shape());

        assert_eq!(scene.containers(), vec![first, second]);
    }

    #[test]
    fn test_find_node_reaches_children() {
        let mut scene = scene();
        let container = scene.add(shape());
        let body = scene.find_node(container).unwrap().children()[0].id();

        scene.find_node_mut(body).unwrap().name = "renamed".to_string();
        assert_eq!(scene.find_node(body).unwrap().name, "renamed");
    }

    #[test]
    fn test_renderables_skip_hidden_subtrees() {
        let mut scene = scene();
        let visible = scene.add(shape());
        let hidden = scene.add(shape());
        scene.find_node_mut(hidden).unwrap().visible = false;

        let meshes = scene.renderables(Topology::Triangles);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].id(), scene.find_node(visible).unwrap().children()[0].id());
        assert_eq!(scene.renderables(Topology::Lines).len(), 1);
    }

    #[test]
    fn test_material_lookup() {
        let mut scene = scene();
        let container = scene.add(shape());
        let node = scene.find_node(container).unwrap();
        assert_eq!(scene.material_for(&node.children()[0]).name, MaterialManager::DEFAULT);
        assert_eq!(scene.material_for(&node.children()[1]).name, MaterialManager::OUTLINE);
    }

    #[test]
    fn test_statistics() {
        let mut scene = scene();
        scene.add(shape());
        let stats = scene.get_statistics();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_line_segments, 4);
    }

    #[test]
    fn test_update_propagates_world_matrices() {
        let mut scene = scene();
        let container = scene.add(shape());
        scene.find_node_mut(container).unwrap().transform.position.x = 5.0;
        scene.update();

        let body = &scene.find_node(container).unwrap().children()[0];
        assert_eq!(body.world_matrix().w.x, 5.0);
    }
}
