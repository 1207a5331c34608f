//! Global uniform bindings for camera and lighting
//!
//! One uniform block shared by every scene draw (group 0), holding the camera
//! matrices and the pre-multiplied ambient and hemisphere light colors.

use crate::{
    config::RenderSettings,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `scene.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Ambient color × intensity, w unused
    ambient: [f32; 4],
    /// Hemisphere sky color × intensity, w unused
    sky: [f32; 4],
    /// Hemisphere ground color × intensity, w unused
    ground: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: &CameraUniform, settings: &RenderSettings) -> Self {
        let scaled = |color: [f32; 3], intensity: f32| {
            [color[0] * intensity, color[1] * intensity, color[2] * intensity, 0.0]
        };

        let hemisphere = &settings.hemisphere;
        let hemisphere_intensity = hemisphere.effective_intensity();

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: scaled(settings.ambient.color, settings.ambient.effective_intensity()),
            sky: scaled(hemisphere.sky_color, hemisphere_intensity),
            ground: scaled(hemisphere.ground_color, hemisphere_intensity),
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called every frame; the upload is skipped when nothing changed.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: &CameraUniform,
    settings: &RenderSettings,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, settings));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
