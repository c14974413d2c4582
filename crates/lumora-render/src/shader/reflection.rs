//! Named-parameter reflection of WGSL shaders using `naga`.
//!
//! Every member of a uniform struct becomes a constant parameter addressed by
//! its member name; texture and sampler globals are addressed by variable name.

use ahash::HashMap;

use super::{ParameterKind, ShaderError, ShaderStage};

/// Location of a constant inside one of the program's uniform blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConstantSlot {
    pub block: usize,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UniformBlock {
    pub name: String,
    pub binding: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResourceKind {
    Texture,
    Sampler { comparison: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResourceSlot {
    pub name: String,
    pub binding: u32,
    pub kind: ResourceKind,
}

impl ResourceKind {
    pub fn parameter_kind(self) -> ParameterKind {
        match self {
            ResourceKind::Texture => ParameterKind::Texture,
            ResourceKind::Sampler { .. } => ParameterKind::Sampler,
        }
    }
}

/// What a shader exposes: entry point, bind group, named constants and resources.
#[derive(Debug, Clone)]
pub struct ShaderReflection {
    pub(crate) entry_point: String,
    /// `None` when the shader binds nothing.
    pub(crate) group: Option<u32>,
    pub(crate) blocks: Vec<UniformBlock>,
    pub(crate) constants: HashMap<String, ConstantSlot>,
    /// Sorted by binding index.
    pub(crate) resources: Vec<ResourceSlot>,
}

impl ShaderReflection {
    /// Parse `source` and collect the parameters visible to `stage`.
    pub fn from_wgsl(shader: &str, source: &str, stage: ShaderStage) -> Result<Self, ShaderError> {
        let module = naga::front::wgsl::parse_str(source).map_err(|err| ShaderError::Parse {
            shader: shader.to_string(),
            message: err.emit_to_string(source),
        })?;

        let entry_point = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage.to_naga())
            .map(|ep| ep.name.clone())
            .ok_or_else(|| ShaderError::MissingEntryPoint {
                shader: shader.to_string(),
                stage,
            })?;

        let reflection_error = |message: String| ShaderError::Reflection {
            shader: shader.to_string(),
            message,
        };

        let mut group = None;
        let mut blocks = Vec::new();
        let mut constants = HashMap::default();
        let mut resources: Vec<ResourceSlot> = Vec::new();

        for (_, var) in module.global_variables.iter() {
            let Some(binding) = var.binding.as_ref() else {
                continue;
            };
            if !matches!(var.space, naga::AddressSpace::Uniform | naga::AddressSpace::Handle) {
                return Err(reflection_error(format!(
                    "binding {} uses unsupported address space {:?}",
                    binding.binding, var.space
                )));
            }

            let name = var.name.clone().ok_or_else(|| {
                reflection_error(format!("binding {} has no name", binding.binding))
            })?;

            match group {
                None => group = Some(binding.group),
                Some(existing) if existing != binding.group => {
                    return Err(reflection_error(format!(
                        "'{}' is in group {} but earlier bindings use group {}",
                        name, binding.group, existing
                    )));
                }
                Some(_) => {}
            }

            let inner = &module.types[var.ty].inner;

            if var.space == naga::AddressSpace::Uniform {
                let block = blocks.len();
                let size = inner.size(module.to_ctx());

                match inner {
                    naga::TypeInner::Struct { members, .. } => {
                        for member in members {
                            let Some(member_name) = member.name.clone() else {
                                continue;
                            };
                            let slot = ConstantSlot {
                                block,
                                offset: member.offset,
                                size: module.types[member.ty].inner.size(module.to_ctx()),
                            };
                            if constants.insert(member_name.clone(), slot).is_some() {
                                return Err(reflection_error(format!(
                                    "constant '{}' is declared twice",
                                    member_name
                                )));
                            }
                        }
                    }
                    _ => {
                        let slot = ConstantSlot {
                            block,
                            offset: 0,
                            size,
                        };
                        if constants.insert(name.clone(), slot).is_some() {
                            return Err(reflection_error(format!(
                                "constant '{}' is declared twice",
                                name
                            )));
                        }
                    }
                }

                blocks.push(UniformBlock {
                    name,
                    binding: binding.binding,
                    size,
                });
                continue;
            }

            let kind = match inner {
                naga::TypeInner::Image {
                    dim: naga::ImageDimension::D2,
                    arrayed: false,
                    class:
                        naga::ImageClass::Sampled {
                            kind: naga::ScalarKind::Float,
                            multi: false,
                        },
                } => ResourceKind::Texture,
                naga::TypeInner::Sampler { comparison } => ResourceKind::Sampler {
                    comparison: *comparison,
                },
                other => {
                    return Err(reflection_error(format!(
                        "'{}' has unsupported resource type {:?}",
                        name, other
                    )));
                }
            };
            resources.push(ResourceSlot {
                name,
                binding: binding.binding,
                kind,
            });
        }

        for resource in &resources {
            if constants.contains_key(&resource.name) {
                return Err(reflection_error(format!(
                    "'{}' names both a constant and a resource",
                    resource.name
                )));
            }
        }
        resources.sort_by_key(|resource| resource.binding);

        Ok(Self {
            entry_point,
            group,
            blocks,
            constants,
            resources,
        })
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// The bind group index all of the shader's resources live in.
    pub fn group(&self) -> Option<u32> {
        self.group
    }

    pub fn parameter_kind(&self, name: &str) -> Option<ParameterKind> {
        if self.constants.contains_key(name) {
            return Some(ParameterKind::Constant);
        }
        self.resource_index(name)
            .map(|index| self.resources[index].kind.parameter_kind())
    }

    /// Byte size of a constant parameter.
    pub fn constant_size(&self, name: &str) -> Option<u32> {
        self.constants.get(name).map(|slot| slot.size)
    }

    pub(crate) fn resource_index(&self, name: &str) -> Option<usize> {
        self.resources.iter().position(|resource| resource.name == name)
    }

    pub(crate) fn layout_entries(&self, stage: ShaderStage) -> Vec<wgpu::BindGroupLayoutEntry> {
        let visibility = stage.to_wgpu();
        let buffers = self.blocks.iter().map(|block| wgpu::BindGroupLayoutEntry {
            binding: block.binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(block.size as u64),
            },
            count: None,
        });
        let resources = self.resources.iter().map(|resource| wgpu::BindGroupLayoutEntry {
            binding: resource.binding,
            visibility,
            ty: match resource.kind {
                ResourceKind::Texture => wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                ResourceKind::Sampler { comparison: false } => {
                    wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
                }
                ResourceKind::Sampler { comparison: true } => {
                    wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison)
                }
            },
            count: None,
        });
        buffers.chain(resources).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = r#"
struct Light {
    Color: vec4<f32>,
    Position: vec3<f32>,
}

struct Constants {
    Light0: Light,
    Tint: vec4<f32>,
    Eye: vec3<f32>,
    Power: f32,
}

@group(1) @binding(0) var<uniform> constants: Constants;
@group(1) @binding(2) var Sampler0: sampler;
@group(1) @binding(1) var Albedo: texture_2d<f32>;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(Albedo, Sampler0, uv) * constants.Tint * constants.Power;
}
"#;

    #[test]
    fn test_reflects_constants_and_resources() {
        let reflection = ShaderReflection::from_wgsl("pixel", PIXEL, ShaderStage::Pixel).unwrap();

        assert_eq!(reflection.entry_point(), "fs_main");
        assert_eq!(reflection.group(), Some(1));
        assert_eq!(reflection.blocks.len(), 1);
        assert_eq!(reflection.blocks[0].size, 64);

        assert_eq!(
            reflection.constants["Light0"],
            ConstantSlot {
                block: 0,
                offset: 0,
                size: 32
            }
        );
        assert_eq!(reflection.constants["Tint"].offset, 32);
        assert_eq!(reflection.constants["Eye"].offset, 48);
        assert_eq!(reflection.constants["Eye"].size, 12);
        assert_eq!(reflection.constants["Power"].offset, 60);

        assert_eq!(reflection.resources[0].name, "Albedo");
        assert_eq!(reflection.resources[1].name, "Sampler0");
        assert_eq!(reflection.parameter_kind("Albedo"), Some(ParameterKind::Texture));
        assert_eq!(reflection.parameter_kind("Sampler0"), Some(ParameterKind::Sampler));
        assert_eq!(reflection.parameter_kind("Missing"), None);
        assert_eq!(reflection.layout_entries(ShaderStage::Pixel).len(), 3);
    }

    #[test]
    fn test_missing_entry_point() {
        let result = ShaderReflection::from_wgsl("pixel", PIXEL, ShaderStage::Vertex);
        assert!(matches!(
            result,
            Err(ShaderError::MissingEntryPoint {
                stage: ShaderStage::Vertex,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_error() {
        let result = ShaderReflection::from_wgsl("broken", "fn main( {", ShaderStage::Pixel);
        assert!(matches!(result, Err(ShaderError::Parse { .. })));
    }

    #[test]
    fn test_mixed_groups_are_rejected() {
        let source = r#"
@group(0) @binding(0) var<uniform> A: vec4<f32>;
@group(1) @binding(0) var<uniform> B: vec4<f32>;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return A + B;
}
"#;
        let result = ShaderReflection::from_wgsl("mixed", source, ShaderStage::Pixel);
        assert!(matches!(result, Err(ShaderError::Reflection { .. })));
    }
}
