//! # Graphics Module
//!
//! Everything that touches geometry or the GPU.
//!
//! - **Geometry** ([`geometry`]) - Polyhedra, the reference grid and edge extraction
//! - **Scene** ([`scene`]) - Node hierarchy, render layers and meshes
//! - **Camera** ([`camera`]) - Fixed perspective camera
//! - **Resources** ([`resources`]) - Materials, global uniforms and render targets
//! - **Rendering** ([`rendering`]) - Pipelines, selective bloom and post-processing
//!
//! ```no_run
//! use geometry_wars::{config::CameraConfig, gfx::{scene::Scene, FixedCamera}};
//!
//! let scene = Scene::new(FixedCamera::new(&CameraConfig::default(), 16.0 / 9.0));
//! // let engine = RenderEngine::new(window, width, height).await?;
//! // engine.render_frame(&mut scene, &settings, 1.0, None::<fn(_, _, _, _)>)?;
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::fixed_camera::FixedCamera;
pub use rendering::render_engine::RenderEngine;
