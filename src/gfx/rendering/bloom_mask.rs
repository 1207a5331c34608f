//! Material substitution for the bloom extraction pass
//!
//! While a [`BloomMask`] is alive, every renderable node that is not on the
//! bloom layer draws with the black mask material, so it occludes glowing
//! geometry without contributing any glow itself.

use std::collections::HashMap;

use log::trace;

use crate::gfx::{
    resources::material::MaterialId,
    scene::{Layers, NodeId, Scene},
};

/// Scope guard holding the original materials of masked nodes
///
/// The originals are put back by [`BloomMask::finish`], or on drop if the
/// pass bails out early. Either way the cache is empty once the guard is gone.
pub struct BloomMask<'a> {
    scene: &'a mut Scene,
    stored: HashMap<NodeId, Option<MaterialId>>,
}

impl<'a> BloomMask<'a> {
    /// Masks every renderable whose layers do not intersect `bloom_layer`
    pub fn apply(scene: &'a mut Scene, bloom_layer: Layers, mask_material: &str) -> Self {
        let mut stored = HashMap::new();
        scene.traverse_mut(|node| {
            if !node.is_renderable() || node.layers.test(&bloom_layer) {
                return;
            }
            let original = node.material.replace(mask_material.to_string());
            stored.insert(node.id(), original);
        });

        trace!("Bloom mask applied to {} nodes", stored.len());
        Self { scene, stored }
    }

    /// The masked scene, for drawing the bloom pass
    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    /// Number of nodes currently masked
    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    /// Restores all original materials and returns how many were restored
    pub fn finish(mut self) -> usize {
        self.restore()
    }

    // Entries are drained as they are restored; ids no longer in the scene
    // are skipped.
    fn restore(&mut self) -> usize {
        let mut restored = 0;
        for (id, original) in self.stored.drain() {
            if let Some(node) = self.scene.find_node_mut(id) {
                node.material = original;
                restored += 1;
            }
        }
        restored
    }
}

impl Drop for BloomMask<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CameraConfig,
        gfx::{
            camera::FixedCamera,
            geometry::{cuboid, edges, grid},
            resources::MaterialManager,
            scene::{Mesh, RenderLayer, SceneNode},
        },
    };
    use cgmath::Deg;

    struct Fixture {
        scene: Scene,
        glowing: NodeId,
        outline: NodeId,
        grid: NodeId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new(FixedCamera::new(&CameraConfig::default(), 1.0));
        let geometry = cuboid(1.0, 1.0, 1.0);

        let mesh = SceneNode::with_mesh("mesh", Mesh::from_geometry(&geometry))
            .with_material("red")
            .with_layers(Layers::default().with(RenderLayer::Bloom));
        let lines = SceneNode::with_mesh("edges", Mesh::from_lines(&edges(&geometry, Deg(1.0))))
            .with_material(MaterialManager::OUTLINE);
        let (glowing, outline) = (mesh.id(), lines.id());

        let mut container = SceneNode::group("shape");
        container.add_child(mesh);
        container.add_child(lines);
        scene.add(container);

        let grid = scene.add(SceneNode::with_mesh("grid", Mesh::from_lines(&grid(100.0, 100))));

        Fixture {
            scene,
            glowing,
            outline,
            grid,
        }
    }

    fn material_of(scene: &Scene, id: NodeId) -> Option<MaterialId> {
        scene.find_node(id).unwrap().material.clone()
    }

    #[test]
    fn test_only_non_bloom_renderables_are_masked() {
        let mut f = fixture();
        let mask = BloomMask::apply(&mut f.scene, RenderLayer::Bloom.layers(), MaterialManager::BLOOM_MASK);
        assert_eq!(mask.len(), 2);

        let scene = mask.scene();
        assert_eq!(material_of(scene, f.glowing).as_deref(), Some("red"));
        assert_eq!(material_of(scene, f.outline).as_deref(), Some(MaterialManager::BLOOM_MASK));
        assert_eq!(material_of(scene, f.grid).as_deref(), Some(MaterialManager::BLOOM_MASK));

        assert_eq!(mask.finish(), 2);
    }

    #[test]
    fn test_finish_restores_originals() {
        let mut f = fixture();
        let restored = BloomMask::apply(&mut f.scene, RenderLayer::Bloom.layers(), MaterialManager::BLOOM_MASK).finish();
        assert_eq!(restored, 2);

        assert_eq!(material_of(&f.scene, f.glowing).as_deref(), Some("red"));
        assert_eq!(material_of(&f.scene, f.outline).as_deref(), Some(MaterialManager::OUTLINE));
        // Nodes without a material go back to having none.
        assert_eq!(material_of(&f.scene, f.grid), None);
    }

    #[test]
    fn test_drop_restores_originals() {
        let mut f = fixture();
        {
            let mask = BloomMask::apply(&mut f.scene, RenderLayer::Bloom.layers(), MaterialManager::BLOOM_MASK);
            assert!(!mask.is_empty());
        }
        assert_eq!(material_of(&f.scene, f.outline).as_deref(), Some(MaterialManager::OUTLINE));
        assert_eq!(material_of(&f.scene, f.grid), None);
    }

    #[test]
    fn test_repeated_frames_leave_materials_unchanged() {
        let mut f = fixture();
        for _ in 0..3 {
            let mask = BloomMask::apply(&mut f.scene, RenderLayer::Bloom.layers(), MaterialManager::BLOOM_MASK);
            assert_eq!(mask.len(), 2);
            mask.finish();
        }
        assert_eq!(material_of(&f.scene, f.outline).as_deref(), Some(MaterialManager::OUTLINE));
    }
}
