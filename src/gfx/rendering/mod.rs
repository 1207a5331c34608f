// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, the selective bloom chain, post-processing and
//! frame rendering.

pub mod bloom;
pub mod bloom_mask;
pub mod pipeline_manager;
pub mod post;
pub mod render_engine;

// Re-export main types
pub use bloom::{BloomChain, BloomUniform};
pub use bloom_mask::BloomMask;
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use post::{CompositeUniform, Compositor, OutputUniform};
pub use render_engine::RenderEngine;
