//! Bloom extraction and blur chain
//!
//! Reads the masked scene target and produces a blurred glow texture:
//! bright pass (source -> A), horizontal blur (A -> B), vertical blur (B -> A).
//! Pipelines live in the [`PipelineManager`] under the names below.

use crate::{
    config::BloomSettings,
    error::Result,
    gfx::resources::TextureResource,
    wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

use super::pipeline_manager::PipelineManager;

pub const BRIGHT_PIPELINE: &str = "Bloom Bright";
pub const BLUR_H_PIPELINE: &str = "Bloom Blur H";
pub const BLUR_V_PIPELINE: &str = "Bloom Blur V";

/// MUST match `BloomUniform` in `bloom.wgsl`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BloomUniform {
    /// 1 / width, 1 / height
    pub texel_size: [f32; 2],
    pub threshold: f32,
    pub radius: f32,
}

impl BloomUniform {
    pub fn new(settings: &BloomSettings, width: u32, height: u32) -> Self {
        Self {
            texel_size: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32],
            threshold: settings.threshold.max(0.0),
            radius: settings.radius.max(0.0),
        }
    }
}

pub struct BloomChain {
    layout: BindGroupLayoutWithDesc,
    uniform: UniformBuffer<BloomUniform>,
    ping: TextureResource,
    pong: TextureResource,
    bright_bind_group: wgpu::BindGroup,
    blur_h_bind_group: wgpu::BindGroup,
    blur_v_bind_group: wgpu::BindGroup,
}

impl BloomChain {
    /// `source` is the target the masked scene is drawn into
    pub fn new(device: &wgpu::Device, source: &TextureResource, width: u32, height: u32) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Bloom Bind Group Layout");
        let uniform = UniformBuffer::new_with_data(
            device,
            &BloomUniform::new(&BloomSettings::default(), width, height),
        );

        let ping = TextureResource::create_render_target(device, width, height, "Bloom Ping");
        let pong = TextureResource::create_render_target(device, width, height, "Bloom Pong");
        let (bright_bind_group, blur_h_bind_group, blur_v_bind_group) =
            Self::create_bind_groups(device, &layout, &uniform, source, &ping, &pong);

        Self {
            layout,
            uniform,
            ping,
            pong,
            bright_bind_group,
            blur_h_bind_group,
            blur_v_bind_group,
        }
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        uniform: &UniformBuffer<BloomUniform>,
        source: &TextureResource,
        ping: &TextureResource,
        pong: &TextureResource,
    ) -> (wgpu::BindGroup, wgpu::BindGroup, wgpu::BindGroup) {
        let bind = |input: &TextureResource, label: &str| {
            BindGroupBuilder::new(layout)
                .resource(uniform.binding_resource())
                .texture(&input.view)
                .sampler(&input.sampler)
                .create(device, label)
        };
        (
            bind(source, "Bloom Bright Bind Group"),
            bind(ping, "Bloom Blur H Bind Group"),
            bind(pong, "Bloom Blur V Bind Group"),
        )
    }

    /// Layout shared by all three bloom pipelines
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    /// Recreates the intermediate targets; `source` must already be resized
    pub fn resize(&mut self, device: &wgpu::Device, source: &TextureResource, width: u32, height: u32) {
        self.ping = TextureResource::create_render_target(device, width, height, "Bloom Ping");
        self.pong = TextureResource::create_render_target(device, width, height, "Bloom Pong");
        let (bright, blur_h, blur_v) =
            Self::create_bind_groups(device, &self.layout, &self.uniform, source, &self.ping, &self.pong);
        self.bright_bind_group = bright;
        self.blur_h_bind_group = blur_h;
        self.blur_v_bind_group = blur_v;
    }

    pub fn update_uniforms(&mut self, queue: &wgpu::Queue, settings: &BloomSettings, width: u32, height: u32) {
        self.uniform
            .update_content(queue, BloomUniform::new(settings, width, height));
    }

    /// Records the three bloom passes
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, pipelines: &PipelineManager) -> Result<()> {
        let passes = [
            (BRIGHT_PIPELINE, &self.bright_bind_group, &self.ping.view),
            (BLUR_H_PIPELINE, &self.blur_h_bind_group, &self.pong.view),
            (BLUR_V_PIPELINE, &self.blur_v_bind_group, &self.ping.view),
        ];

        for (name, bind_group, target) in passes {
            let pipeline = pipelines.pipeline(name)?;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(name),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        Ok(())
    }

    /// Blurred glow, valid after [`BloomChain::render`]
    pub fn output(&self) -> &TextureResource {
        &self.ping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<BloomUniform>(), 16);
    }

    #[test]
    fn test_uniform_from_settings() {
        let settings = BloomSettings::default().with_threshold(0.25).with_radius(3.0);
        let uniform = BloomUniform::new(&settings, 800, 400);
        assert_eq!(uniform.texel_size, [1.0 / 800.0, 1.0 / 400.0]);
        assert_eq!(uniform.threshold, 0.25);
        assert_eq!(uniform.radius, 3.0);
    }

    #[test]
    fn test_zero_size_does_not_divide_by_zero() {
        let uniform = BloomUniform::new(&BloomSettings::default(), 0, 0);
        assert_eq!(uniform.texel_size, [1.0, 1.0]);
    }
}
