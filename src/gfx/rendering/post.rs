//! Final frame assembly
//!
//! The composite pass adds the bloom texture onto the base scene and tone
//! maps the sum. The output pass anti-aliases the result with FXAA, applies
//! the fade-in opacity and writes to the surface.

use crate::{
    config::RenderSettings,
    error::Result,
    gfx::resources::TextureResource,
    wgpu_utils::{binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

use super::pipeline_manager::PipelineManager;

pub const COMPOSITE_PIPELINE: &str = "Composite";
pub const OUTPUT_PIPELINE: &str = "Output";

/// MUST match `CompositeUniform` in `composite.wgsl`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    pub bloom_strength: f32,
    pub exposure: f32,
    _padding: [f32; 2],
}

impl CompositeUniform {
    /// Bloom contributes nothing while it is switched off
    pub fn new(settings: &RenderSettings) -> Self {
        let bloom = &settings.bloom;
        Self {
            bloom_strength: if bloom.enabled { bloom.strength.max(0.0) } else { 0.0 },
            exposure: bloom.exposure.max(0.0),
            _padding: [0.0; 2],
        }
    }
}

/// MUST match `OutputUniform` in `fxaa.wgsl`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutputUniform {
    pub inverse_resolution: [f32; 2],
    pub opacity: f32,
    /// 1.0 when the surface format does not encode sRGB itself
    pub encode_srgb: f32,
}

impl OutputUniform {
    pub fn new(width: u32, height: u32, opacity: f32, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            inverse_resolution: [1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32],
            opacity: opacity.clamp(0.0, 1.0),
            encode_srgb: if surface_format.is_srgb() { 0.0 } else { 1.0 },
        }
    }
}

pub struct Compositor {
    composite_layout: BindGroupLayoutWithDesc,
    output_layout: BindGroupLayoutWithDesc,
    composite_uniform: UniformBuffer<CompositeUniform>,
    output_uniform: UniformBuffer<OutputUniform>,
    target: TextureResource,
    composite_bind_group: wgpu::BindGroup,
    output_bind_group: wgpu::BindGroup,
    surface_format: wgpu::TextureFormat,
}

impl Compositor {
    pub fn new(
        device: &wgpu::Device,
        base: &TextureResource,
        bloom: &TextureResource,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let composite_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Composite Bind Group Layout");
        let output_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Output Bind Group Layout");

        let composite_uniform =
            UniformBuffer::new_with_data(device, &CompositeUniform::new(&RenderSettings::default()));
        let output_uniform =
            UniformBuffer::new_with_data(device, &OutputUniform::new(width, height, 0.0, surface_format));

        let target = TextureResource::create_render_target(device, width, height, "Composite Target");
        let composite_bind_group =
            Self::create_composite_bind_group(device, &composite_layout, &composite_uniform, base, bloom);
        let output_bind_group = Self::create_output_bind_group(device, &output_layout, &output_uniform, &target);

        Self {
            composite_layout,
            output_layout,
            composite_uniform,
            output_uniform,
            target,
            composite_bind_group,
            output_bind_group,
            surface_format,
        }
    }

    fn create_composite_bind_group(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        uniform: &UniformBuffer<CompositeUniform>,
        base: &TextureResource,
        bloom: &TextureResource,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .texture(&base.view)
            .texture(&bloom.view)
            .sampler(&base.sampler)
            .create(device, "Composite Bind Group")
    }

    fn create_output_bind_group(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        uniform: &UniformBuffer<OutputUniform>,
        input: &TextureResource,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .texture(&input.view)
            .sampler(&input.sampler)
            .create(device, "Output Bind Group")
    }

    pub fn composite_layout(&self) -> &wgpu::BindGroupLayout {
        &self.composite_layout.layout
    }

    pub fn output_layout(&self) -> &wgpu::BindGroupLayout {
        &self.output_layout.layout
    }

    /// Rebuilds the composite target; `base` and `bloom` must already be resized
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        base: &TextureResource,
        bloom: &TextureResource,
        width: u32,
        height: u32,
    ) {
        self.target = TextureResource::create_render_target(device, width, height, "Composite Target");
        self.composite_bind_group = Self::create_composite_bind_group(
            device,
            &self.composite_layout,
            &self.composite_uniform,
            base,
            bloom,
        );
        self.output_bind_group =
            Self::create_output_bind_group(device, &self.output_layout, &self.output_uniform, &self.target);
    }

    pub fn update_uniforms(
        &mut self,
        queue: &wgpu::Queue,
        settings: &RenderSettings,
        opacity: f32,
        width: u32,
        height: u32,
    ) {
        self.composite_uniform
            .update_content(queue, CompositeUniform::new(settings));
        self.output_uniform.update_content(
            queue,
            OutputUniform::new(width, height, opacity, self.surface_format),
        );
    }

    /// Records the composite pass and the output pass into `surface`
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipelines: &PipelineManager,
        surface: &wgpu::TextureView,
    ) -> Result<()> {
        let passes = [
            (COMPOSITE_PIPELINE, &self.composite_bind_group, &self.target.view),
            (OUTPUT_PIPELINE, &self.output_bind_group, surface),
        ];

        for (name, bind_group, target) in passes {
            let pipeline = pipelines.pipeline(name)?;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(name),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
}
