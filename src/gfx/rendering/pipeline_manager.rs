//! Render pipeline management system for wgpu
//!
//! Pipelines are described by a [`PipelineConfig`], registered by name and
//! created in one batch at startup. Draw code then looks them up by name.

use std::{collections::HashMap, sync::Arc};

use log::{debug, error};
use wgpu::*;

use crate::{
    error::{RenderError, Result},
    gfx::scene::vertex::Vertex3D,
};

/// Configuration for creating a render pipeline
///
/// Defines all parameters needed to create a wgpu render pipeline,
/// including shaders, bind group layouts, and render state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_write_enabled: bool,
    pub depth_compare: CompareFunction,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
    pub no_vertex_buffers: bool, // for fullscreen passes
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "scene".to_string(),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            multisample: MultisampleState::default(),
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Rgba16Float,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            no_vertex_buffers: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a new config with a specific shader
    ///
    /// # Arguments
    /// * `shader` - Shader identifier to use for this pipeline
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets the shader for this pipeline (builder pattern)
    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Selects the fragment entry point; shaders with several passes share one module
    pub fn with_fragment_entry(mut self, entry: &str) -> Self {
        self.fragment_entry = entry.to_string();
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    ///
    /// # Arguments
    /// * `layouts` - Vector of bind group layouts to use, in group order
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against an attachment of the given format
    pub fn with_depth(mut self, format: TextureFormat, write: bool, compare: CompareFunction) -> Self {
        self.depth_format = Some(format);
        self.depth_write_enabled = write;
        self.depth_compare = compare;
        self
    }

    /// Sets color targets for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `targets` - Vector of color target states
    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }

    /// Single color target with the given format and blend state
    pub fn with_color_target(self, format: TextureFormat, blend: Option<BlendState>) -> Self {
        self.with_color_targets(vec![Some(ColorTargetState {
            format,
            blend,
            write_mask: ColorWrites::ALL,
        })])
    }

    /// Sets primitive topology for this pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `topology` - Primitive topology (TriangleList, LineList, etc.)
    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    /// Configures pipeline for fullscreen triangle rendering (no vertex buffers needed)
    ///
    /// Used for the bloom, composite and anti-aliasing passes
    pub fn with_no_vertex_buffers(mut self) -> Self {
        self.no_vertex_buffers = true;
        self
    }
}

/// Manages render pipelines by name
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    /// Creates a new pipeline manager
    ///
    /// # Arguments
    /// * `device` - Shared wgpu device for creating resources
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// Pipelines are created by [`PipelineManager::create_all_pipelines`].
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pending_pipelines.push(name.to_string());
    }

    /// Compiles a WGSL shader module under `name`
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        debug!("Loaded shader '{}'", name);
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Creates all pending pipelines immediately
    ///
    /// Stops at the first pipeline whose shader is missing.
    pub fn create_all_pipelines(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_pipelines);

        for name in pending {
            let Some(config) = self.pipeline_configs.get(&name) else {
                continue;
            };
            match self.create_pipeline_from_config(&name, config) {
                Ok(pipeline) => {
                    debug!("Created pipeline '{}'", name);
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => {
                    error!("Failed to create pipeline '{}': {}", name, e);
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Looks up a created pipeline
    pub fn pipeline(&self, name: &str) -> Result<&RenderPipeline> {
        self.pipelines
            .get(name)
            .ok_or_else(|| RenderError::PipelineNotFound(name.to_string()))
    }

    /// Creates a render pipeline from configuration
    fn create_pipeline_from_config(&self, name: &str, config: &PipelineConfig) -> Result<RenderPipeline> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| RenderError::ShaderNotFound(config.shader.clone()))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> = config.bind_group_layouts.iter().collect();
        let pipeline_layout = self.device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", name)),
            bind_group_layouts: &bind_group_layout_refs,
            push_constant_ranges: &[],
        });

        let vertex_layout = [Vertex3D::desc()];
        let vertex_buffers: &[VertexBufferLayout] = if config.no_vertex_buffers {
            &[]
        } else {
            &vertex_layout
        };

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: config.depth_write_enabled,
            depth_compare: config.depth_compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self.device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&config.label),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some(config.vertex_entry.as_str()),
                buffers: vertex_buffers,
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some(config.fragment_entry.as_str()),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: config.primitive_topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: config.multisample,
            multiview: None,
            cache: None,
        });

        Ok(pipeline)
    }

    /// Returns pipeline manager statistics
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            total_pipelines: self.pipelines.len(),
            pending_pipelines: self.pending_pipelines.len(),
            loaded_shaders: self.shader_modules.len(),
        }
    }
}

/// Statistics about pipeline manager state
#[derive(Debug)]
pub struct PipelineStats {
    pub total_pipelines: usize,
    pub pending_pipelines: usize,
    pub loaded_shaders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullscreen_config_builder() {
        let config = PipelineConfig::default_with_shader("bloom")
            .with_label("Bloom Bright")
            .with_fragment_entry("fs_bright")
            .with_cull_mode(None)
            .with_no_vertex_buffers();

        assert_eq!(config.shader, "bloom");
        assert_eq!(config.vertex_entry, "vs_main");
        assert_eq!(config.fragment_entry, "fs_bright");
        assert!(config.no_vertex_buffers);
        assert!(config.cull_mode.is_none());
        assert!(config.depth_format.is_none());
    }

    #[test]
    fn test_line_depth_settings() {
        let config = PipelineConfig::default()
            .with_primitive_topology(PrimitiveTopology::LineList)
            .with_depth(TextureFormat::Depth32Float, false, CompareFunction::LessEqual);

        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
        assert!(!config.depth_write_enabled);
        assert_eq!(config.depth_compare, CompareFunction::LessEqual);
    }
}
