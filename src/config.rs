//! Application and render configuration
//!
//! Everything tunable lives here as plain structs with `Default` values. The
//! debug panel mutates [`RenderSettings`] in place; the renderer reads it
//! every frame.

use std::time::Duration;

use cgmath::{Deg, Vector3};

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    /// Delay between the window opening and the start of the startup sequence
    pub startup_delay: Duration,
    /// Period of the ambient scale/rotation perturbation
    pub perturbation_interval: Duration,
    pub camera: CameraConfig,
    pub render: RenderSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Geometry Wars".to_string(),
            window_size: (1280, 720),
            startup_delay: Duration::from_millis(1000),
            perturbation_interval: Duration::from_millis(1000),
            camera: CameraConfig::default(),
            render: RenderSettings::default(),
        }
    }
}


/// Perspective camera setup
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub fov: Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: Deg(60.0),
            near: 0.01,
            far: 1000.0,
            eye: Vector3::new(0.0, 0.0, 20.0),
            target: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Live render parameters, bound to the debug panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub bloom: BloomSettings,
    pub ambient: AmbientLightSettings,
    pub hemisphere: HemisphereLightSettings,
    /// Clear color of the scene, linear RGB
    pub background: [f32; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bloom: BloomSettings::default(),
            ambient: AmbientLightSettings::default(),
            hemisphere: HemisphereLightSettings::default(),
            background: [2.0 / 255.0, 2.0 / 255.0, 2.0 / 255.0],
        }
    }
}

/// Bloom pass parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub enabled: bool,
    /// Tone mapping exposure applied in the final composite
    pub exposure: f32,
    /// Luminance below which pixels do not bloom
    pub threshold: f32,
    pub strength: f32,
    /// Blur spread, in texels per tap
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            exposure: 1.0,
            threshold: 0.0,
            strength: 0.8,
            radius: 2.0,
        }
    }
}

impl BloomSettings {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength.max(0.0);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.max(0.0);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLightSettings {
    pub visible: bool,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLightSettings {
    fn default() -> Self {
        Self {
            visible: true,
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }
    }
}

impl AmbientLightSettings {
    /// Contribution fed to the shader, zero when the light is switched off
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }
}

/// Sky/ground gradient light, sky direction is +Y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLightSettings {
    pub visible: bool,
    pub sky_color: [f32; 3],
    pub ground_color: [f32; 3],
    pub intensity: f32,
}

impl Default for HemisphereLightSettings {
    fn default() -> Self {
        Self {
            visible: true,
            sky_color: [1.0, 1.0, 1.0],
            ground_color: [0.0, 0.0, 0.0],
            intensity: 0.8,
        }
    }
}

impl HemisphereLightSettings {
    pub fn effective_intensity(&self) -> f32 {
        if self.visible {
            self.intensity
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bloom_defaults() {
        let bloom = BloomSettings::default();
        assert!(bloom.enabled);
        assert_eq!(bloom.exposure, 1.0);
        assert_eq!(bloom.threshold, 0.0);
        assert!((bloom.strength - 0.8).abs() < f32::EPSILON);
        assert_eq!(bloom.radius, 2.0);
    }

    #[test]
    fn test_bloom_builders_clamp_negative_values() {
        let bloom = BloomSettings::default()
            .with_strength(-1.0)
            .with_threshold(-0.5)
            .with_radius(-3.0)
            .with_enabled(false);
        assert_eq!(bloom.strength, 0.0);
        assert_eq!(bloom.threshold, 0.0);
        assert_eq!(bloom.radius, 0.0);
        assert!(!bloom.enabled);
    }

    #[test]
    fn test_hidden_lights_contribute_nothing() {
        let mut ambient = AmbientLightSettings::default();
        assert!((ambient.effective_intensity() - 0.1).abs() < f32::EPSILON);
        ambient.visible = false;
        assert_eq!(ambient.effective_intensity(), 0.0);

        let mut hemisphere = HemisphereLightSettings::default();
        assert!((hemisphere.effective_intensity() - 0.8).abs() < f32::EPSILON);
        hemisphere.visible = false;
        assert_eq!(hemisphere.effective_intensity(), 0.0);
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.startup_delay, Duration::from_millis(1000));
        assert_eq!(config.perturbation_interval, Duration::from_millis(1000));
        assert_eq!(config.camera.eye, Vector3::new(0.0, 0.0, 20.0));
        assert_eq!(config.camera.fov, Deg(60.0));
        assert_eq!(config.window_size, (1280, 720));
    }
}
