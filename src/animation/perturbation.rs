//! Fixed-interval random jitter of the shape containers

use std::{f32::consts::PI, time::Duration};

use cgmath::Vector3;
use log::trace;
use rand::Rng;

use super::{
    easing::Easing,
    tween::{Tween, TweenManager, TweenTarget},
};
use crate::gfx::scene::{Scene, TransformProperty};

/// Wall-clock interval timer, polled once per frame
#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    interval: Duration,
    next_fire: Duration,
}

impl IntervalTimer {
    /// First fire happens one full interval after `start`
    pub fn new(interval: Duration, start: Duration) -> Self {
        Self {
            interval,
            next_fire: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if the interval elapsed since the last fire. Missed
    /// intervals after a stall are skipped, so this fires at most once per poll.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_fire || self.interval.is_zero() {
            return false;
        }
        while self.next_fire <= now {
            self.next_fire += self.interval;
        }
        true
    }
}

/// Uniform scale factor in [0.8, 1.2)
pub fn random_scale<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(0.8..1.2)
}

/// Per-axis rotation in [0, π)
pub fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Vector3<f32> {
    Vector3::new(
        rng.random::<f32>() * PI,
        rng.random::<f32>() * PI,
        rng.random::<f32>() * PI,
    )
}

/// Retargets every container's scale and rotation on each timer fire
#[derive(Debug)]
pub struct AmbientPerturbation {
    timer: IntervalTimer,
}

impl AmbientPerturbation {
    pub fn new(interval: Duration, start: Duration) -> Self {
        Self {
            timer: IntervalTimer::new(interval, start),
        }
    }

    /// Starts new tweens when the timer fires. The tweens run over one interval
    /// with quadratic in-out easing and replace whatever was animating the same
    /// properties, including the grow-in.
    ///
    /// Returns the number of containers retargeted.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        scene: &Scene,
        tweens: &mut TweenManager,
        rng: &mut R,
    ) -> usize {
        if !self.timer.poll(now) {
            return 0;
        }

        let duration = self.timer.interval();
        let containers = scene.containers();
        for &id in &containers {
            let Some(node) = scene.find_node(id) else {
                continue;
            };

            let scale = random_scale(rng);
            tweens.add(Tween::new(
                TweenTarget::new(id, TransformProperty::Scale),
                node.transform.scale,
                Vector3::new(scale, scale, scale),
                now,
                duration,
                Easing::QuadraticInOut,
            ));
            tweens.add(Tween::new(
                TweenTarget::new(id, TransformProperty::Rotation),
                node.transform.rotation,
                random_rotation(rng),
                now,
                duration,
                Easing::QuadraticInOut,
            ));
        }

        trace!("Perturbed {} containers", containers.len());
        containers.len()
    }
}
