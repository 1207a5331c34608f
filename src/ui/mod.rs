//! # User Interface Module
//!
//! Dear ImGui overlay: a collapsed debug panel bound to the live
//! [`RenderSettings`] and the title text revealed during startup.
//!
//! - [`UiManager`] - ImGui context, winit input and wgpu rendering
//! - [`debug_panel`] - Bloom and light controls plus diagnostic actions
//! - [`title_overlay`] - Centered title text
//!
//! [`RenderSettings`]: crate::config::RenderSettings

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{debug_panel, title_overlay, PanelAction};
