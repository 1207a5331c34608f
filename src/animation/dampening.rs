//! Per-frame easing of rotations toward a node's desired rotation

use cgmath::Vector3;

use crate::gfx::scene::Scene;

/// Factor applied every frame; 1.0 snaps straight to the desired value
pub const ROTATION_DAMPENING: f32 = 1.0;

/// Moves `current` toward `desired` by `factor` of the remaining distance
pub fn dampen(current: f32, desired: f32, factor: f32) -> f32 {
    current + (desired - current) * factor
}

/// Eases every node carrying a desired rotation toward it.
///
/// Only the X components are read and the result is written to all three
/// axes. Nodes without a desired rotation are left alone.
pub fn apply_rotation_dampening(scene: &mut Scene) {
    scene.traverse_mut(|node| {
        let Some(desired) = node.desired_rotation else {
            return;
        };
        let value = dampen(node.transform.rotation.x, desired.x, ROTATION_DAMPENING);
        node.transform.rotation = Vector3::new(value, value, value);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CameraConfig,
        gfx::{camera::FixedCamera, scene::SceneNode},
    };

    #[test]
    fn test_dampen() {
        assert_eq!(dampen(0.0, 2.0, 0.5), 1.0);
        assert_eq!(dampen(1.0, 3.0, 1.0), 3.0);
        assert_eq!(dampen(1.0, 3.0, 0.0), 1.0);
    }

    #[test]
    fn test_x_axis_drives_every_component() {
        let mut scene = Scene::new(FixedCamera::new(&CameraConfig::default(), 1.0));
        let mut node = SceneNode::group("character").with_rotation(0.1, 0.2, 0.3);
        node.desired_rotation = Some(Vector3::new(0.5, 1.0, 2.0));
        let id = scene.add(node);
        let untouched = scene.add(SceneNode::group("plain").with_rotation(0.1, 0.2, 0.3));

        apply_rotation_dampening(&mut scene);

        let rotation = scene.find_node(id).unwrap().transform.rotation;
        assert_eq!(rotation, Vector3::new(0.5, 0.5, 0.5));
        let plain = scene.find_node(untouched).unwrap().transform.rotation;
        assert_eq!(plain, Vector3::new(0.1, 0.2, 0.3));
    }
}
