// src/lib.rs
//! Geometry Wars
//!
//! Five glowing polyhedra drifting over a grid, rendered with wgpu through a
//! selective bloom pipeline and FXAA, with an ImGui debug panel.

pub mod animation;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod gfx;
pub mod shapes;
pub mod startup;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GeometryWarsApp;
pub use controller::SceneController;
pub use error::RenderError;
