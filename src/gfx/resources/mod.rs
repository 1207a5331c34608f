// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles materials, render targets, and the global uniform bind group.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use material::{Material, MaterialId, MaterialManager};
pub use texture_resource::{DepthTexture, TextureResource};
