//! WGPU-based rendering engine
//!
//! Frame structure:
//! 1. bloom pass (bloom enabled only): the scene with every non-bloom
//!    renderable masked black, then bright-pass extraction and blur
//! 2. base pass: the full scene with real materials
//! 3. composite: base + bloom, tone mapped
//! 4. output: FXAA and fade-in opacity onto the surface
//! 5. optional UI overlay

use std::sync::Arc;

use log::{info, warn};
use wgpu::{Device, TextureFormat};

use crate::{
    config::RenderSettings,
    error::{RenderError, Result},
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            texture_resource::{DepthTexture, TextureResource},
            MaterialManager,
        },
        scene::{DrawMesh, RenderLayer, Scene, Topology},
    },
    wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

use super::{
    bloom::{BloomChain, BRIGHT_PIPELINE, BLUR_H_PIPELINE, BLUR_V_PIPELINE},
    bloom_mask::BloomMask,
    pipeline_manager::{PipelineConfig, PipelineManager},
    post::{Compositor, COMPOSITE_PIPELINE, OUTPUT_PIPELINE},
};

const MESH_PIPELINE: &str = "Mesh";
const LINES_PIPELINE: &str = "Lines";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: DepthTexture,
    base_target: TextureResource,
    bloom_scene_target: TextureResource,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
    bloom: BloomChain,
    compositor: Compositor,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let width = width.max(1);
        let height = height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, width, height, "Depth Texture");
        let base_target = TextureResource::create_render_target(&device, width, height, "Base Target");
        let bloom_scene_target = TextureResource::create_render_target(&device, width, height, "Bloom Scene Target");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let transform_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Transform Bind Group Layout");
        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(&device, "Material Bind Group Layout");

        let bloom = BloomChain::new(&device, &bloom_scene_target, width, height);
        let compositor = Compositor::new(&device, &base_target, bloom.output(), format, width, height);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("bloom", include_str!("bloom.wgsl"));
        pipeline_manager.load_shader("composite", include_str!("composite.wgsl"));
        pipeline_manager.load_shader("fxaa", include_str!("fxaa.wgsl"));

        let scene_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            transform_layout.layout.clone(),
            material_layout.layout.clone(),
        ];

        pipeline_manager.register_pipeline(
            MESH_PIPELINE,
            PipelineConfig::default_with_shader("scene")
                .with_label("MESH")
                .with_depth(TextureResource::DEPTH_FORMAT, true, wgpu::CompareFunction::Less)
                .with_bind_group_layouts(scene_layouts.clone())
                .with_color_target(TextureResource::HDR_FORMAT, Some(wgpu::BlendState::REPLACE)),
        );

        // Outlines sit exactly on the mesh surface, so they test with LessEqual
        // and never write depth.
        pipeline_manager.register_pipeline(
            LINES_PIPELINE,
            PipelineConfig::default_with_shader("scene")
                .with_label("LINES")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT, false, wgpu::CompareFunction::LessEqual)
                .with_bind_group_layouts(scene_layouts)
                .with_color_target(TextureResource::HDR_FORMAT, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );

        for (name, entry) in [
            (BRIGHT_PIPELINE, "fs_bright"),
            (BLUR_H_PIPELINE, "fs_blur_h"),
            (BLUR_V_PIPELINE, "fs_blur_v"),
        ] {
            pipeline_manager.register_pipeline(
                name,
                PipelineConfig::default_with_shader("bloom")
                    .with_label(name)
                    .with_fragment_entry(entry)
                    .with_bind_group_layouts(vec![bloom.bind_group_layout().clone()])
                    .with_color_target(TextureResource::HDR_FORMAT, None)
                    .with_cull_mode(None)
                    .with_no_vertex_buffers(),
            );
        }

        pipeline_manager.register_pipeline(
            COMPOSITE_PIPELINE,
            PipelineConfig::default_with_shader("composite")
                .with_label("COMPOSITE")
                .with_bind_group_layouts(vec![compositor.composite_layout().clone()])
                .with_color_target(TextureResource::HDR_FORMAT, None)
                .with_cull_mode(None)
                .with_no_vertex_buffers(),
        );

        pipeline_manager.register_pipeline(
            OUTPUT_PIPELINE,
            PipelineConfig::default_with_shader("fxaa")
                .with_label("OUTPUT")
                .with_bind_group_layouts(vec![compositor.output_layout().clone()])
                .with_color_target(format, None)
                .with_cull_mode(None)
                .with_no_vertex_buffers(),
        );

        pipeline_manager.create_all_pipelines()?;
        info!(
            "Render engine ready: {}x{} {:?}, {} pipelines",
            width,
            height,
            format,
            pipeline_manager.get_stats().total_pipelines
        );

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            base_target,
            bloom_scene_target,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
            bloom,
            compositor,
        })
    }

    /// Renders one frame with an optional UI overlay
    ///
    /// A lost, outdated or timed-out surface skips the frame and returns
    /// `Ok`; any other surface error is returned.
    ///
    /// # Arguments
    /// * `scene` - Scene to draw; borrowed mutably for the bloom mask
    /// * `settings` - Live bloom and light parameters
    /// * `opacity` - Fade-in factor of the final image, 0..=1
    /// * `ui_callback` - Optional function that records the UI pass
    pub fn render_frame<F>(
        &mut self,
        scene: &mut Scene,
        settings: &RenderSettings,
        opacity: f32,
        ui_callback: Option<F>,
    ) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let (width, height) = self.get_surface_size();
        update_global_ubo(&mut self.global_ubo, &self.queue, &scene.camera.uniform, settings);
        self.bloom
            .update_uniforms(&self.queue, &settings.bloom, width, height);
        self.compositor
            .update_uniforms(&self.queue, settings, opacity, width, height);
        scene.sync_gpu(&self.device, &self.queue, &self.transform_layout, &self.material_layout);

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let background = wgpu::Color {
            r: settings.background[0] as f64,
            g: settings.background[1] as f64,
            b: settings.background[2] as f64,
            a: 1.0,
        };

        // PASS 1: Bloom-only scene, then extraction and blur
        if settings.bloom.enabled {
            let mask = BloomMask::apply(scene, RenderLayer::Bloom.layers(), MaterialManager::BLOOM_MASK);
            self.draw_scene(
                &mut encoder,
                mask.scene(),
                &self.bloom_scene_target.view,
                wgpu::Color::BLACK,
                "Bloom Scene Pass",
            )?;
            mask.finish();
            self.bloom.render(&mut encoder, &self.pipeline_manager)?;
        }

        // PASS 2: Full scene
        self.draw_scene(&mut encoder, scene, &self.base_target.view, background, "Base Scene Pass")?;

        // PASS 3 + 4: Composite and anti-aliased output
        self.compositor
            .render(&mut encoder, &self.pipeline_manager, &surface_view)?;

        // PASS 5: UI overlay (if provided)
        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Draws triangle meshes, then line sets, into `target`
    fn draw_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
        label: &str,
    ) -> Result<()> {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

        for (topology, pipeline_name) in [(Topology::Triangles, MESH_PIPELINE), (Topology::Lines, LINES_PIPELINE)] {
            render_pass.set_pipeline(self.pipeline_manager.pipeline(pipeline_name)?);

            for node in scene.renderables(topology) {
                let material = scene.material_for(node);
                let (Some(transform_bind_group), Some(material_bind_group), Some(mesh)) =
                    (node.transform_bind_group(), material.bind_group(), node.mesh())
                else {
                    continue;
                };
                render_pass.set_bind_group(1, transform_bind_group, &[]);
                render_pass.set_bind_group(2, material_bind_group, &[]);
                render_pass.draw_mesh(mesh);
            }
        }

        Ok(())
    }

    /// Resizes the surface and every size-dependent target
    ///
    /// Zero-sized requests (minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(&self.device, width, height, "Depth Texture");
        self.base_target = TextureResource::create_render_target(&self.device, width, height, "Base Target");
        self.bloom_scene_target =
            TextureResource::create_render_target(&self.device, width, height, "Bloom Scene Target");
        self.bloom
            .resize(&self.device, &self.bloom_scene_target, width, height);
        self.compositor
            .resize(&self.device, &self.base_target, self.bloom.output(), width, height);
    }

    /// Returns current surface dimensions
    ///
    /// # Returns
    /// Tuple of (width, height) in pixels
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating the UI renderer.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
