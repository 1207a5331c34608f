//! Time-based tweens over node transform properties
//!
//! Time is a [`Duration`] since application start, so tweens advance with the
//! wall clock and not with the frame count.

use std::time::Duration;

use cgmath::Vector3;

use super::easing::Easing;
use crate::gfx::scene::{NodeId, Scene, TransformProperty};

/// The (node, property) pair a tween writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenTarget {
    pub node: NodeId,
    pub property: TransformProperty,
}

impl TweenTarget {
    pub fn new(node: NodeId, property: TransformProperty) -> Self {
        Self { node, property }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: TweenTarget,
    pub from: Vector3<f32>,
    pub to: Vector3<f32>,
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(
        target: TweenTarget,
        from: Vector3<f32>,
        to: Vector3<f32>,
        start: Duration,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            target,
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }

    /// Value at `now`; exactly `to` once the duration has elapsed
    pub fn sample(&self, now: Duration) -> Vector3<f32> {
        if self.is_finished(now) {
            return self.to;
        }
        if self.duration.is_zero() {
            return self.from;
        }
        let elapsed = now.saturating_sub(self.start);
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.easing.apply(t);
        self.from + (self.to - self.from) * eased
    }
}

/// Active tweens, at most one per target
#[derive(Debug, Default)]
pub struct TweenManager {
    tweens: Vec<Tween>,
}

impl TweenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tween, replacing any tween already driving the same target
    pub fn add(&mut self, tween: Tween) {
        self.tweens.retain(|existing| existing.target != tween.target);
        self.tweens.push(tween);
    }

    /// Writes every tween's current value into the scene and drops finished
    /// tweens. Tweens whose node no longer exists are dropped too.
    ///
    /// Returns the number of tweens still running.
    pub fn update(&mut self, now: Duration, scene: &mut Scene) -> usize {
        self.tweens.retain(|tween| {
            let Some(node) = scene.find_node_mut(tween.target.node) else {
                return false;
            };
            node.transform.set(tween.target.property, tween.sample(now));
            !tween.is_finished(now)
        });
        self.tweens.len()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn is_animating(&self, target: TweenTarget) -> bool {
        self.tweens.iter().any(|tween| tween.target == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CameraConfig,
        gfx::{camera::FixedCamera, scene::SceneNode},
    };

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new(FixedCamera::new(&CameraConfig::default(), 1.0));
        let id = scene.add(SceneNode::group("node").with_uniform_scale(0.01));
        (scene, id)
    }

    fn scale_tween(node: NodeId, start: u64, duration: u64) -> Tween {
        Tween::new(
            TweenTarget::new(node, TransformProperty::Scale),
            Vector3::new(0.01, 0.01, 0.01),
            Vector3::new(1.0, 1.0, 1.0),
            ms(start),
            ms(duration),
            Easing::CubicInOut,
        )
    }

    fn scale_of(scene: &Scene, id: NodeId) -> Vector3<f32> {
        scene.find_node(id).unwrap().transform.scale
    }

    #[test]
    fn test_sample_interpolates_with_easing() {
        let (_, id) = scene_with_node();
        let tween = scale_tween(id, 1000, 4000);
        assert_eq!(tween.sample(ms(0)), tween.from);
        assert_eq!(tween.sample(ms(1000)), tween.from);

        let halfway = tween.sample(ms(3000));
        assert!((halfway.x - 0.505).abs() < 1e-5);
    }

    #[test]
    fn test_zero_duration_holds_start_value_until_start() {
        let (mut scene, id) = scene_with_node();
        let tween = scale_tween(id, 1000, 0);
        assert_eq!(tween.sample(ms(500)), tween.from);
        assert_eq!(tween.sample(ms(1000)), tween.to);

        let mut tweens = TweenManager::new();
        tweens.add(tween);
        assert_eq!(tweens.update(ms(500), &mut scene), 1);
        assert_eq!(scale_of(&scene, id), Vector3::new(0.01, 0.01, 0.01));
        assert_eq!(tweens.update(ms(1000), &mut scene), 0);
        assert_eq!(scale_of(&scene, id), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_completion_writes_target_exactly_then_stops() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenManager::new();
        tweens.add(scale_tween(id, 0, 4000));

        assert_eq!(tweens.update(ms(2000), &mut scene), 1);
        assert!(scale_of(&scene, id).x < 1.0);

        // A late frame overshoots the duration.
        assert_eq!(tweens.update(ms(4016), &mut scene), 0);
        assert_eq!(scale_of(&scene, id), Vector3::new(1.0, 1.0, 1.0));

        scene.find_node_mut(id).unwrap().transform.scale = Vector3::new(3.0, 3.0, 3.0);
        tweens.update(ms(5000), &mut scene);
        assert_eq!(scale_of(&scene, id), Vector3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_properties_animate_independently() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenManager::new();
        tweens.add(scale_tween(id, 0, 1000));
        tweens.add(Tween::new(
            TweenTarget::new(id, TransformProperty::Rotation),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 2.0, 3.0),
            ms(0),
            ms(2000),
            Easing::Linear,
        ));
        assert_eq!(tweens.len(), 2);

        assert_eq!(tweens.update(ms(1000), &mut scene), 1);
        let node = scene.find_node(id).unwrap();
        assert_eq!(node.transform.scale, Vector3::new(1.0, 1.0, 1.0));
        assert!((node.transform.rotation.z - 1.5).abs() < 1e-5);
        assert!(tweens.is_animating(TweenTarget::new(id, TransformProperty::Rotation)));
        assert!(!tweens.is_animating(TweenTarget::new(id, TransformProperty::Scale)));
    }

    #[test]
    fn test_new_tween_replaces_existing_on_same_target() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenManager::new();
        tweens.add(scale_tween(id, 0, 4000));

        let replacement = Tween::new(
            TweenTarget::new(id, TransformProperty::Scale),
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::new(1.2, 1.2, 1.2),
            ms(1000),
            ms(1000),
            Easing::QuadraticInOut,
        );
        tweens.add(replacement);
        assert_eq!(tweens.len(), 1);

        tweens.update(ms(2000), &mut scene);
        assert_eq!(scale_of(&scene, id), Vector3::new(1.2, 1.2, 1.2));
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_tweens_on_missing_nodes_are_dropped() {
        let (mut scene, _) = scene_with_node();
        let orphan = SceneNode::group("orphan").id();
        let mut tweens = TweenManager::new();
        tweens.add(scale_tween(orphan, 0, 1000));

        assert_eq!(tweens.update(ms(10), &mut scene), 0);
    }
}
