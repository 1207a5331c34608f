//! Owns the scene and everything that animates it
//!
//! [`SceneController`] is driven once per frame with the time elapsed since the
//! window opened. It runs the startup sequence, the ambient perturbation, the
//! tweens and rotation dampening, then refreshes world transforms so the scene
//! is ready to render.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use cgmath::Vector3;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use uuid::Uuid;

use crate::{
    animation::{apply_rotation_dampening, AmbientPerturbation, Easing, Tween, TweenManager, TweenTarget},
    config::{AppConfig, RenderSettings},
    gfx::{
        camera::FixedCamera,
        geometry::grid,
        resources::MaterialManager,
        scene::{Mesh, NodeId, Scene, SceneNode, TransformProperty},
    },
    shapes::{register_palette, ShapeFactory, ShapeKind, INITIAL_SCALE},
    startup::{StartupEvent, StartupSequence},
};

/// Spawn slots along X, one per [`ShapeKind::ALL`] entry
pub const SPAWN_X: [f32; 5] = [-8.0, -4.0, 0.0, 4.0, 8.0];
pub const SPAWN_Y: f32 = 2.0;
pub const GROW_IN_DURATION: Duration = Duration::from_millis(4000);

const GRID_SIZE: f32 = 100.0;
const GRID_DIVISIONS: u32 = 100;

pub struct SceneController {
    scene: Scene,
    tweens: TweenManager,
    perturbation: AmbientPerturbation,
    startup: StartupSequence,
    settings: RenderSettings,
    characters: Vec<NodeId>,
    grid: NodeId,
    rng: StdRng,
}

impl SceneController {
    pub fn new(config: &AppConfig, aspect: f32) -> Self {
        Self::with_rng(config, aspect, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests
    pub fn with_seed(config: &AppConfig, aspect: f32, seed: u64) -> Self {
        Self::with_rng(config, aspect, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &AppConfig, aspect: f32, rng: StdRng) -> Self {
        let mut scene = Scene::new(FixedCamera::new(&config.camera, aspect));
        register_palette(&mut scene.material_manager);

        let grid_node = SceneNode::with_mesh("Grid", Mesh::from_lines(&grid(GRID_SIZE, GRID_DIVISIONS)))
            .with_material(MaterialManager::GRID)
            .with_rotation(FRAC_PI_2, 0.0, 0.0)
            .with_position(0.0, 0.0, -2.0);
        let grid = scene.add(grid_node);
        scene.update();

        info!(
            "Scene ready: {} materials, startup in {:?}",
            scene.material_manager.list_materials().len(),
            config.startup_delay
        );

        Self {
            scene,
            tweens: TweenManager::new(),
            perturbation: AmbientPerturbation::new(config.perturbation_interval, Duration::ZERO),
            startup: StartupSequence::new(config.startup_delay),
            settings: config.render,
            characters: Vec::new(),
            grid,
            rng,
        }
    }

    /// Advances everything to `elapsed`, measured from controller creation
    pub fn update(&mut self, elapsed: Duration) {
        self.perturbation
            .poll(elapsed, &self.scene, &mut self.tweens, &mut self.rng);

        for event in self.startup.poll(elapsed) {
            if event == StartupEvent::SpawnShapes {
                self.spawn_shapes(elapsed);
            }
        }

        self.tweens.update(elapsed, &mut self.scene);
        apply_rotation_dampening(&mut self.scene);
        self.scene.update();
    }

    /// Adds one of each shape in a row and starts their grow-in
    pub fn spawn_shapes(&mut self, now: Duration) {
        for (kind, x) in ShapeKind::ALL.into_iter().zip(SPAWN_X) {
            let node = ShapeFactory::build(kind, &mut self.rng).with_position(x, SPAWN_Y, 0.0);
            let id = self.scene.add(node);
            self.characters.push(id);

            self.tweens.add(Tween::new(
                TweenTarget::new(id, TransformProperty::Scale),
                Vector3::new(INITIAL_SCALE, INITIAL_SCALE, INITIAL_SCALE),
                Vector3::new(1.0, 1.0, 1.0),
                now,
                GROW_IN_DURATION,
                Easing::CubicInOut,
            ));
            debug!("Spawned {} at x = {}", kind.name(), x);
        }
        info!("Spawned {} shapes", ShapeKind::ALL.len());
    }

    pub fn character_by_id(&self, id: Uuid) -> Option<&SceneNode> {
        self.characters
            .iter()
            .filter_map(|&node| self.scene.find_node(node))
            .find(|node| node.character_id == Some(id))
    }

    pub fn characters(&self) -> impl Iterator<Item = &SceneNode> + '_ {
        self.characters
            .iter()
            .filter_map(|&node| self.scene.find_node(node))
    }

    /// Logs every top-level scene object
    pub fn log_characters(&self) {
        let stats = self.scene.get_statistics();
        info!(
            "{} scene objects ({} nodes, {} triangles, {} line segments)",
            self.scene.nodes().len(),
            stats.node_count,
            stats.total_triangles,
            stats.total_line_segments
        );
        for node in self.scene.nodes() {
            let t = &node.transform;
            info!(
                "  {} [{:?}] pos ({:.2}, {:.2}, {:.2}) scale {:.3} rot ({:.2}, {:.2}, {:.2})",
                node.name,
                node.kind(),
                t.position.x,
                t.position.y,
                t.position.z,
                t.scale.x,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z
            );
        }
    }

    /// Logs the character id of each spawned shape
    pub fn log_character_ids(&self) {
        for node in self.characters() {
            if let Some(id) = node.character_id {
                info!("  {} -> {}", node.name, id);
            }
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn grid(&self) -> NodeId {
        self.grid
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Scene and settings together, for rendering
    pub fn render_parts(&mut self) -> (&mut Scene, &RenderSettings) {
        (&mut self.scene, &self.settings)
    }

    pub fn opacity(&self) -> f32 {
        self.startup.surface_opacity()
    }

    pub fn title(&self) -> &'static str {
        self.startup.visible_title()
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::NodeKind;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn controller() -> SceneController {
        SceneController::with_seed(&AppConfig::default(), 16.0 / 9.0, 7)
    }

    #[test]
    fn test_starts_with_grid_only() {
        let controller = controller();
        assert_eq!(controller.scene().nodes().len(), 1);
        assert!(controller.scene().containers().is_empty());
        assert_eq!(controller.opacity(), 0.0);

        let grid = controller.scene().find_node(controller.grid()).unwrap();
        assert_eq!(grid.kind(), NodeKind::Lines);
        assert_eq!(grid.material.as_deref(), Some(MaterialManager::GRID));
        assert_eq!(grid.transform.position.z, -2.0);
    }

    #[test]
    fn test_five_shapes_after_startup() {
        let mut controller = controller();
        // Sequence starts after the 1000 ms delay, shapes come 4000 ms later.
        controller.update(ms(4999));
        assert!(controller.scene().containers().is_empty());

        controller.update(ms(5001));
        let containers = controller.scene().containers();
        assert_eq!(containers.len(), 5);
        assert_eq!(controller.characters().count(), 5);

        let xs: Vec<f32> = controller
            .characters()
            .map(|node| node.transform.position.x)
            .collect();
        assert_eq!(xs, SPAWN_X.to_vec());
        assert!(controller.characters().all(|node| node.transform.position.y == SPAWN_Y));

        controller.update(ms(10_000));
        assert_eq!(controller.scene().containers().len(), 5);
    }

    #[test]
    fn test_opacity_and_title_follow_startup() {
        let mut controller = controller();
        controller.update(ms(2000));
        assert_eq!(controller.opacity(), 1.0);
        assert_eq!(controller.title(), "");

        controller.update(ms(5300));
        assert_eq!(controller.title(), "Geometry Wars");
    }

    #[test]
    fn test_lookup_by_character_id() {
        let mut controller = controller();
        controller.spawn_shapes(ms(0));

        let ids: Vec<Uuid> = controller
            .characters()
            .filter_map(|node| node.character_id)
            .collect();
        assert_eq!(ids.len(), 5);
        for id in ids {
            let node = controller.character_by_id(id).unwrap();
            assert_eq!(node.character_id, Some(id));
        }
        assert!(controller.character_by_id(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_scales_stay_in_range_while_animating() {
        let mut controller = controller();
        controller.spawn_shapes(ms(0));
        assert!(controller.is_animating());

        for step in 1..=100 {
            controller.update(ms(step * 50));
            for node in controller.characters() {
                let scale = node.transform.scale.x;
                assert!((INITIAL_SCALE..=1.2).contains(&scale), "scale {}", scale);
            }
        }
    }
}
