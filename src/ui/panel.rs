// src/ui/panel.rs
//! Debug panel and title overlay
//!
//! The panel edits [`RenderSettings`] in place. Its buttons do not touch the
//! scene directly; they come back as [`PanelAction`]s for the caller to run.

use imgui::{Condition, TreeNodeFlags};

use crate::config::{AmbientLightSettings, BloomSettings, HemisphereLightSettings, RenderSettings};

/// Slider granularity for light intensities
pub const INTENSITY_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    LogCharacters,
    LogCharacterIds,
}

/// Collapsible debug panel in the top-right corner, collapsed on first show
///
/// Returns the actions whose buttons were pressed this frame.
pub fn debug_panel(ui: &imgui::Ui, settings: &mut RenderSettings) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return actions;
    }
    let panel_width = (display_size[0] * 0.25).clamp(300.0, 420.0);

    ui.window("Controls")
        .size([panel_width, 0.0], Condition::FirstUseEver)
        .position([display_size[0] - panel_width - 10.0, 10.0], Condition::FirstUseEver)
        .collapsed(true, Condition::FirstUseEver)
        .always_auto_resize(true)
        .collapsible(true)
        .build(|| {
            if ui.collapsing_header("Rendering", TreeNodeFlags::empty()) {
                ui.checkbox("Enable Bloom", &mut settings.bloom.enabled);
            }
            if ui.collapsing_header("Bloom Parameters", TreeNodeFlags::empty()) {
                render_bloom_controls(ui, &mut settings.bloom);
            }
            if ui.collapsing_header("Ambient Light", TreeNodeFlags::empty()) {
                render_ambient_controls(ui, &mut settings.ambient);
            }
            if ui.collapsing_header("Hemisphere Light", TreeNodeFlags::empty()) {
                render_hemisphere_controls(ui, &mut settings.hemisphere);
            }
            if ui.collapsing_header("Functions", TreeNodeFlags::empty()) {
                if ui.button("printCharacters()") {
                    actions.push(PanelAction::LogCharacters);
                }
                if ui.button("printCharacterIDs()") {
                    actions.push(PanelAction::LogCharacterIds);
                }
            }
        });

    actions
}

fn render_bloom_controls(ui: &imgui::Ui, bloom: &mut BloomSettings) {
    ui.slider("Exposure", 0.1, 2.0, &mut bloom.exposure);
    ui.slider("Threshold", 0.0, 1.0, &mut bloom.threshold);
    ui.slider("Strength", 0.0, 3.0, &mut bloom.strength);
    ui.slider("Radius", 0.0, 4.0, &mut bloom.radius);
}

fn render_ambient_controls(ui: &imgui::Ui, ambient: &mut AmbientLightSettings) {
    ui.checkbox("Active##ambient", &mut ambient.visible);
    if ui.slider("Intensity##ambient", 0.0, 1.0, &mut ambient.intensity) {
        ambient.intensity = snap_to_step(ambient.intensity, INTENSITY_STEP);
    }
}

fn render_hemisphere_controls(ui: &imgui::Ui, hemisphere: &mut HemisphereLightSettings) {
    ui.checkbox("Active##hemisphere", &mut hemisphere.visible);
    if ui.slider("Intensity##hemisphere", 0.0, 1.0, &mut hemisphere.intensity) {
        hemisphere.intensity = snap_to_step(hemisphere.intensity, INTENSITY_STEP);
    }
}

/// Centered title text near the top of the frame; hidden while empty
pub fn title_overlay(ui: &imgui::Ui, title: &str) {
    if title.is_empty() {
        return;
    }
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("##title")
        .position([display_size[0] * 0.5, display_size[1] * 0.08], Condition::Always)
        .position_pivot([0.5, 0.0])
        .no_decoration()
        .no_inputs()
        .bg_alpha(0.0)
        .always_auto_resize(true)
        .build(|| {
            ui.set_window_font_scale(2.0);
            ui.text(title);
        });
}

/// Rounds to the nearest multiple of `step`, clamped to [0, 1]
pub fn snap_to_step(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value.clamp(0.0, 1.0);
    }
    ((value / step).round() * step).clamp(0.0, 1.0)
}
