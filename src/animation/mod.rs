//! Frame-rate independent animation of node transforms
//!
//! [`TweenManager`] interpolates position, rotation and scale over wall-clock
//! time. [`AmbientPerturbation`] feeds it new random targets on a fixed
//! interval, and [`apply_rotation_dampening`] runs after the tweens each frame.

pub mod dampening;
pub mod easing;
pub mod perturbation;
pub mod tween;

pub use dampening::{apply_rotation_dampening, dampen};
pub use easing::Easing;
pub use perturbation::{random_rotation, random_scale, AmbientPerturbation, IntervalTimer};
pub use tween::{Tween, TweenManager, TweenTarget};
