//! Material system
//!
//! Materials are stored in [`MaterialManager`] and nodes reference them by
//! name. All materials share one bind group layout (group 2 in the scene
//! shader), owned by the render engine.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer};

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// 1.0 skips lighting
    pub unlit: f32,
    _padding: [f32; 3],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

struct MaterialGpuResources {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

/// Linear RGBA color with a lit/unlit switch
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub unlit: bool,

    // Shared by all nodes using this material
    gpu_resources: Option<MaterialGpuResources>,
}

impl Material {
    /// Creates a lit, opaque material
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            unlit: false,
            gpu_resources: None,
        }
    }

    /// Builds a lit material from a `0xRRGGBB` sRGB hex color
    pub fn from_hex(name: &str, hex: u32) -> Self {
        let [r, g, b] = hex_to_linear(hex);
        Self::new(name, [r, g, b, 1.0])
    }

    pub fn with_unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            unlit: if self.unlit { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }

    /// Creates GPU resources on first call, then syncs the uniform
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let content = self.uniform();
        match &mut self.gpu_resources {
            Some(resources) => resources.ubo.update_content(queue, content),
            None => {
                let ubo = MaterialUBO::new_with_data(device, &content);
                let bind_group = BindGroupBuilder::new(layout)
                    .resource(ubo.binding_resource())
                    .create(device, &format!("Material Bind Group: {}", self.name));
                self.gpu_resources = Some(MaterialGpuResources { ubo, bind_group });
            }
        }
    }

    /// Gets the bind group for rendering
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }
}

/// Converts one sRGB-encoded channel to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` sRGB to linear RGB
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

/// Manages all materials in the engine
///
/// Centralized storage for all materials. Nodes reference materials by ID
/// rather than storing material data directly, so GPU resources are shared.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub const DEFAULT: &'static str = "default";
    /// Unlit black placeholder swapped in during the bloom pass
    pub const BLOOM_MASK: &'static str = "bloom_mask";
    /// Black shape outlines
    pub const OUTLINE: &'static str = "outline";
    /// Translucent reference grid
    pub const GRID: &'static str = "grid";

    /// Creates a new material manager with the built-in materials
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: Self::DEFAULT.to_string(),
        };

        manager.add_material(Material::new(Self::DEFAULT, [0.8, 0.8, 0.8, 1.0]));
        manager.add_material(Material::new(Self::BLOOM_MASK, [0.0, 0.0, 0.0, 1.0]).with_unlit());
        manager.add_material(Material::new(Self::OUTLINE, [0.0, 0.0, 0.0, 1.0]).with_unlit());
        manager.add_material(
            Material::from_hex(Self::GRID, 0x888888)
                .with_unlit()
                .with_alpha(0.2),
        );

        manager
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    /// Gets the default material
    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Material for a node, falling back to the default when the node has
    /// none or names one that does not exist
    pub fn get_material_for_node(&self, material_id: Option<&MaterialId>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}
