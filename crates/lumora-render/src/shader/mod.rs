//! Shader programs with named parameters.
//!
//! A [`ShaderProgram`] wraps one WGSL stage. Parameters are addressed by the
//! names the shader declares: uniform struct members are written into a CPU
//! shadow of each uniform block, textures and samplers are held as shared
//! handles. [`ShaderProgram::upload`] pushes everything to the device.

mod reflection;

pub use reflection::ShaderReflection;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use lumora_core::profiling::profile_function;
use lumora_test_utils::{
    GpuBindGroup, GpuBindGroupEntry, GpuBindGroupLayout, GpuBindingResource, GpuBuffer,
    GpuSampler, GpuShaderModule, RenderContext,
};

use crate::resource::{SamplerSettings, Texture, create_solid_texture, update_resource};
use reflection::{ConstantSlot, ResourceKind};

/// Pipeline stage a program is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    pub fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Pixel => naga::ShaderStage::Fragment,
        }
    }

    pub fn to_wgpu(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Pixel => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Pixel => write!(f, "pixel"),
        }
    }
}

/// The kind of slot a parameter name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Constant,
    Texture,
    Sampler,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Constant => write!(f, "constant"),
            ParameterKind::Texture => write!(f, "texture"),
            ParameterKind::Sampler => write!(f, "sampler"),
        }
    }
}

/// Errors raised while loading a shader or setting its parameters.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// WGSL failed to parse.
    Parse { shader: String, message: String },
    /// The shader declares bindings this wrapper cannot drive.
    Reflection { shader: String, message: String },
    MissingEntryPoint { shader: String, stage: ShaderStage },
    UnknownParameter { shader: String, name: String },
    SizeMismatch {
        name: String,
        expected: u32,
        actual: usize,
    },
    KindMismatch {
        name: String,
        expected: ParameterKind,
        actual: ParameterKind,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io { path, source } => {
                write!(f, "Failed to read shader '{}': {}", path.display(), source)
            }
            ShaderError::Parse { shader, message } => {
                write!(f, "Failed to parse shader '{}':\n{}", shader, message)
            }
            ShaderError::Reflection { shader, message } => {
                write!(f, "Unsupported bindings in shader '{}': {}", shader, message)
            }
            ShaderError::MissingEntryPoint { shader, stage } => {
                write!(f, "Shader '{}' has no {} entry point", shader, stage)
            }
            ShaderError::UnknownParameter { shader, name } => {
                write!(f, "Shader '{}' has no parameter named '{}'", shader, name)
            }
            ShaderError::SizeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Parameter '{}' is {} bytes but {} bytes were provided",
                name, expected, actual
            ),
            ShaderError::KindMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Parameter '{}' is a {} but was set as a {}",
                name, actual, expected
            ),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum BoundResource {
    Texture(Option<Arc<Texture>>),
    Sampler(Option<Arc<GpuSampler>>),
}

impl BoundResource {
    fn empty(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Texture => BoundResource::Texture(None),
            ResourceKind::Sampler { .. } => BoundResource::Sampler(None),
        }
    }
}

/// A single compiled shader stage and the parameter values it will be drawn with.
#[derive(Debug)]
pub struct ShaderProgram {
    label: String,
    stage: ShaderStage,
    module: GpuShaderModule,
    reflection: Arc<ShaderReflection>,
    layout: Option<GpuBindGroupLayout>,
    /// CPU copy of each uniform block, written in full on every upload.
    shadow: Vec<Vec<u8>>,
    /// Created on first upload.
    uniform_buffers: Vec<GpuBuffer>,
    resources: Vec<BoundResource>,
    bind_group: Option<GpuBindGroup>,
    bindings_dirty: bool,
    fallback_texture: Option<Arc<Texture>>,
    fallback_sampler: Option<Arc<GpuSampler>>,
}

impl ShaderProgram {
    /// Load a WGSL file and reflect its parameters.
    pub fn load(
        gpu: &dyn RenderContext,
        stage: ShaderStage,
        path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        profile_function!();
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(gpu, stage, &path.display().to_string(), &source)
    }

    /// Build a program from WGSL source already in memory.
    pub fn from_source(
        gpu: &dyn RenderContext,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> Result<Self, ShaderError> {
        let reflection = ShaderReflection::from_wgsl(label, source, stage)?;

        let module = gpu.create_shader_module(&wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let layout = reflection.group().map(|_| {
            let entries = reflection.layout_entries(stage);
            gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &entries,
            })
        });

        tracing::debug!(
            "Loaded {} shader '{}' ({} constants, {} resources)",
            stage,
            label,
            reflection.constants.len(),
            reflection.resources.len()
        );

        Ok(Self::with_reflection(
            label.to_string(),
            stage,
            module,
            Arc::new(reflection),
            layout,
        ))
    }

    fn with_reflection(
        label: String,
        stage: ShaderStage,
        module: GpuShaderModule,
        reflection: Arc<ShaderReflection>,
        layout: Option<GpuBindGroupLayout>,
    ) -> Self {
        let shadow = reflection
            .blocks
            .iter()
            .map(|block| vec![0u8; block.size as usize])
            .collect();
        let resources = reflection
            .resources
            .iter()
            .map(|resource| BoundResource::empty(resource.kind))
            .collect();

        Self {
            label,
            stage,
            module,
            reflection,
            layout,
            shadow,
            uniform_buffers: Vec::new(),
            resources,
            bind_group: None,
            bindings_dirty: true,
            fallback_texture: None,
            fallback_sampler: None,
        }
    }

    /// A program sharing this one's compiled module, starting from a copy of its
    /// parameter values and bindings. Uniform buffers and the bind group are its own.
    pub fn share(&self) -> Self {
        let mut shared = Self::with_reflection(
            self.label.clone(),
            self.stage,
            self.module.clone(),
            self.reflection.clone(),
            self.layout.clone(),
        );
        shared.shadow = self.shadow.clone();
        shared.resources = self.resources.clone();
        shared.fallback_texture = self.fallback_texture.clone();
        shared.fallback_sampler = self.fallback_sampler.clone();
        shared
    }

    /// Copy raw bytes into a constant. The length must match the declared size.
    pub fn set_data(&mut self, name: &str, data: &[u8]) -> Result<(), ShaderError> {
        let slot = self.constant_slot(name)?;
        if slot.size as usize != data.len() {
            return Err(ShaderError::SizeMismatch {
                name: name.to_string(),
                expected: slot.size,
                actual: data.len(),
            });
        }
        let start = slot.offset as usize;
        self.shadow[slot.block][start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.set_data(name, bytemuck::bytes_of(&value))
    }

    pub fn set_float3(&mut self, name: &str, value: Vec3) -> Result<(), ShaderError> {
        self.set_data(name, bytemuck::bytes_of(&value))
    }

    pub fn set_float4(&mut self, name: &str, value: impl Into<Vec4>) -> Result<(), ShaderError> {
        self.set_data(name, bytemuck::bytes_of(&value.into()))
    }

    pub fn set_matrix4(&mut self, name: &str, value: &Mat4) -> Result<(), ShaderError> {
        self.set_data(name, bytemuck::bytes_of(value))
    }

    /// Bind a texture, or clear the slot with `None`.
    pub fn set_texture(
        &mut self,
        name: &str,
        texture: Option<&Arc<Texture>>,
    ) -> Result<(), ShaderError> {
        let index = self.resource_slot(name, ParameterKind::Texture)?;
        if let BoundResource::Texture(slot) = &mut self.resources[index] {
            let changed = !same_resource(slot.as_ref(), texture);
            update_resource(slot, texture);
            self.bindings_dirty |= changed;
        }
        Ok(())
    }

    /// Bind a sampler, or clear the slot with `None`.
    pub fn set_sampler(
        &mut self,
        name: &str,
        sampler: Option<&Arc<GpuSampler>>,
    ) -> Result<(), ShaderError> {
        let index = self.resource_slot(name, ParameterKind::Sampler)?;
        if let BoundResource::Sampler(slot) = &mut self.resources[index] {
            let changed = !same_resource(slot.as_ref(), sampler);
            update_resource(slot, sampler);
            self.bindings_dirty |= changed;
        }
        Ok(())
    }

    /// Write all uniform blocks and refresh the bind group if bindings changed.
    pub fn upload(&mut self, gpu: &dyn RenderContext) {
        profile_function!();
        let Some(layout) = self.layout.clone() else {
            return;
        };

        if self.uniform_buffers.len() != self.reflection.blocks.len() {
            self.uniform_buffers = self
                .reflection
                .blocks
                .iter()
                .map(|block| {
                    gpu.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(block.name.as_str()),
                        size: block.size as u64,
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    })
                })
                .collect();
            self.bindings_dirty = true;
        }

        for (buffer, data) in self.uniform_buffers.iter().zip(&self.shadow) {
            gpu.write_buffer(buffer, 0, data);
        }

        if self.bindings_dirty || self.bind_group.is_none() {
            self.rebuild_bind_group(gpu, &layout);
        }
    }

    fn rebuild_bind_group(&mut self, gpu: &dyn RenderContext, layout: &GpuBindGroupLayout) {
        let needs_texture = self
            .resources
            .iter()
            .any(|resource| matches!(resource, BoundResource::Texture(None)));
        if needs_texture && self.fallback_texture.is_none() {
            self.fallback_texture = Some(create_solid_texture(gpu, [255; 4], "Fallback Texture"));
        }
        let needs_sampler = self
            .resources
            .iter()
            .any(|resource| matches!(resource, BoundResource::Sampler(None)));
        if needs_sampler && self.fallback_sampler.is_none() {
            let desc = SamplerSettings::default().to_descriptor(Some("Fallback Sampler"));
            self.fallback_sampler = Some(Arc::new(gpu.create_sampler(&desc)));
        }

        let mut entries: Vec<GpuBindGroupEntry<'_>> = self
            .reflection
            .blocks
            .iter()
            .zip(&self.uniform_buffers)
            .map(|(block, buffer)| GpuBindGroupEntry {
                binding: block.binding,
                resource: GpuBindingResource::Buffer(buffer),
            })
            .collect();

        for (slot, bound) in self.reflection.resources.iter().zip(&self.resources) {
            let resource = match bound {
                BoundResource::Texture(texture) => texture
                    .as_ref()
                    .or(self.fallback_texture.as_ref())
                    .map(|texture| GpuBindingResource::TextureView(texture.view())),
                BoundResource::Sampler(sampler) => sampler
                    .as_ref()
                    .or(self.fallback_sampler.as_ref())
                    .map(|sampler| GpuBindingResource::Sampler(sampler.as_ref())),
            };
            if let Some(resource) = resource {
                entries.push(GpuBindGroupEntry {
                    binding: slot.binding,
                    resource,
                });
            }
        }

        let bind_group = gpu.create_bind_group(Some(self.label.as_str()), layout, &entries);
        self.bind_group = Some(bind_group);
        self.bindings_dirty = false;
    }

    fn constant_slot(&self, name: &str) -> Result<ConstantSlot, ShaderError> {
        if let Some(slot) = self.reflection.constants.get(name) {
            return Ok(*slot);
        }
        match self.reflection.parameter_kind(name) {
            Some(actual) => Err(ShaderError::KindMismatch {
                name: name.to_string(),
                expected: ParameterKind::Constant,
                actual,
            }),
            None => Err(self.unknown(name)),
        }
    }

    fn resource_slot(&self, name: &str, expected: ParameterKind) -> Result<usize, ShaderError> {
        match self.reflection.parameter_kind(name) {
            Some(actual) if actual == expected => self
                .reflection
                .resource_index(name)
                .ok_or_else(|| self.unknown(name)),
            Some(actual) => Err(ShaderError::KindMismatch {
                name: name.to_string(),
                expected,
                actual,
            }),
            None => Err(self.unknown(name)),
        }
    }

    fn unknown(&self, name: &str) -> ShaderError {
        ShaderError::UnknownParameter {
            shader: self.label.clone(),
            name: name.to_string(),
        }
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.reflection.parameter_kind(name).is_some()
    }

    /// Current bytes of a constant parameter.
    pub fn constant(&self, name: &str) -> Option<&[u8]> {
        let slot = self.reflection.constants.get(name)?;
        let start = slot.offset as usize;
        self.shadow
            .get(slot.block)
            .map(|block| &block[start..start + slot.size as usize])
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.constant(name)
            .filter(|bytes| bytes.len() == 4)
            .map(bytemuck::pod_read_unaligned)
    }

    pub fn float4(&self, name: &str) -> Option<Vec4> {
        self.constant(name)
            .filter(|bytes| bytes.len() == 16)
            .map(|bytes| Vec4::from_array(bytemuck::pod_read_unaligned(bytes)))
    }

    pub fn matrix4(&self, name: &str) -> Option<Mat4> {
        self.constant(name)
            .filter(|bytes| bytes.len() == 64)
            .map(|bytes| Mat4::from_cols_array(&bytemuck::pod_read_unaligned(bytes)))
    }

    pub fn bound_texture(&self, name: &str) -> Option<&Arc<Texture>> {
        let index = self.reflection.resource_index(name)?;
        match &self.resources[index] {
            BoundResource::Texture(texture) => texture.as_ref(),
            BoundResource::Sampler(_) => None,
        }
    }

    pub fn bound_sampler(&self, name: &str) -> Option<&Arc<GpuSampler>> {
        let index = self.reflection.resource_index(name)?;
        match &self.resources[index] {
            BoundResource::Sampler(sampler) => sampler.as_ref(),
            BoundResource::Texture(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn entry_point(&self) -> &str {
        self.reflection.entry_point()
    }

    pub fn module(&self) -> &GpuShaderModule {
        &self.module
    }

    pub fn reflection(&self) -> &ShaderReflection {
        &self.reflection
    }

    /// Layout of the program's bind group, `None` if it binds nothing.
    pub fn bind_group_layout(&self) -> Option<&GpuBindGroupLayout> {
        self.layout.as_ref()
    }

    /// The bind group built by the last [`upload`](Self::upload).
    pub fn bind_group(&self) -> Option<&GpuBindGroup> {
        self.bind_group.as_ref()
    }

    pub fn bind_group_index(&self) -> Option<u32> {
        self.reflection.group()
    }

    pub fn uniform_buffers(&self) -> &[GpuBuffer] {
        &self.uniform_buffers
    }
}

fn same_resource<T>(current: Option<&Arc<T>>, new: Option<&Arc<T>>) -> bool {
    match (current, new) {
        (Some(current), Some(new)) => Arc::ptr_eq(current, new),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumora_test_utils::{MockRenderContext, RenderCall};

    const SOURCE: &str = r#"
struct Params {
    Tint: vec4<f32>,
    Offset: vec3<f32>,
    Strength: f32,
}

@group(1) @binding(0) var<uniform> params: Params;
@group(1) @binding(1) var Albedo: texture_2d<f32>;
@group(1) @binding(2) var Sampler0: sampler;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(Albedo, Sampler0, uv) * params.Tint * params.Strength;
}
"#;

    fn program(mock: &MockRenderContext) -> ShaderProgram {
        ShaderProgram::from_source(mock, ShaderStage::Pixel, "test", SOURCE).unwrap()
    }

    #[test]
    fn test_from_source_creates_module_and_layout() {
        let mock = MockRenderContext::new();
        let program = program(&mock);

        assert_eq!(program.entry_point(), "fs_main");
        assert_eq!(program.bind_group_index(), Some(1));
        assert!(program.has_parameter("Tint"));
        assert!(program.has_parameter("Albedo"));
        assert!(!program.has_parameter("World"));
        assert_eq!(mock.count_shader_creates(), 1);
        assert!(mock.calls().iter().any(|call| matches!(
            call,
            RenderCall::CreateBindGroupLayout { entries: 3, .. }
        )));
    }

    #[test]
    fn test_set_constants() {
        let mock = MockRenderContext::new();
        let mut program = program(&mock);

        program.set_float("Strength", 0.5).unwrap();
        program.set_float3("Offset", Vec3::new(1.0, 2.0, 3.0)).unwrap();
        program.set_float4("Tint", Vec4::new(0.1, 0.2, 0.3, 1.0)).unwrap();

        assert_eq!(program.float("Strength"), Some(0.5));
        assert_eq!(program.float4("Tint"), Some(Vec4::new(0.1, 0.2, 0.3, 1.0)));
        assert_eq!(
            program.constant("Offset"),
            Some(bytemuck::bytes_of(&Vec3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_bad_set_leaves_state_untouched() {
        let mock = MockRenderContext::new();
        let mut program = program(&mock);
        program.set_float("Strength", 2.0).unwrap();

        let wrong_size = program.set_data("Strength", &[0u8; 8]);
        assert!(matches!(
            wrong_size,
            Err(ShaderError::SizeMismatch {
                expected: 4,
                actual: 8,
                ..
            })
        ));

        let unknown = program.set_float("Missing", 1.0);
        assert!(matches!(unknown, Err(ShaderError::UnknownParameter { .. })));

        let wrong_kind = program.set_float("Albedo", 1.0);
        assert!(matches!(
            wrong_kind,
            Err(ShaderError::KindMismatch {
                expected: ParameterKind::Constant,
                actual: ParameterKind::Texture,
                ..
            })
        ));

        let wrong_slot = program.set_texture("Sampler0", None);
        assert!(matches!(wrong_slot, Err(ShaderError::KindMismatch { .. })));

        assert_eq!(program.float("Strength"), Some(2.0));
    }

    #[test]
    fn test_upload_writes_every_call() {
        let mock = MockRenderContext::new();
        let mut program = program(&mock);

        program.upload(&mock);
        program.upload(&mock);

        assert_eq!(mock.count_buffer_creates(), 1);
        assert_eq!(mock.count_buffer_writes(), 2);
        // Bindings did not change between uploads.
        assert_eq!(mock.count_bind_group_creates(), 1);
        assert!(program.bind_group().is_some());
    }

    #[test]
    fn test_upload_uses_fallbacks_for_unset_slots() {
        let mock = MockRenderContext::new();
        let mut program = program(&mock);

        program.upload(&mock);

        assert_eq!(mock.count_texture_creates(), 1);
        assert_eq!(mock.count_sampler_creates(), 1);
        assert!(program.bound_texture("Albedo").is_none());
        assert!(mock.calls().iter().any(|call| matches!(
            call,
            RenderCall::CreateBindGroup { entries: 3, .. }
        )));
    }

    #[test]
    fn test_rebinding_rebuilds_bind_group() {
        let mock = MockRenderContext::new();
        let mut program = program(&mock);
        let texture = create_solid_texture(&mock, [0, 0, 255, 255], "blue");

        program.upload(&mock);
        program.set_texture("Albedo", Some(&texture)).unwrap();
        program.upload(&mock);
        assert_eq!(mock.count_bind_group_creates(), 2);

        program.set_texture("Albedo", Some(&texture)).unwrap();
        program.upload(&mock);
        assert_eq!(mock.count_bind_group_creates(), 2);

        assert!(Arc::ptr_eq(program.bound_texture("Albedo").unwrap(), &texture));
        assert_eq!(Arc::strong_count(&texture), 2);
    }

    #[test]
    fn test_share_copies_parameters_into_own_buffers() {
        let mock = MockRenderContext::new();
        let mut program = program(&mock);
        let texture = create_solid_texture(&mock, [0, 255, 0, 255], "green");
        program.set_float("Strength", 3.0).unwrap();
        program.set_texture("Albedo", Some(&texture)).unwrap();
        program.upload(&mock);

        let mut shared = program.share();

        assert_eq!(shared.float("Strength"), Some(3.0));
        assert!(Arc::ptr_eq(shared.bound_texture("Albedo").unwrap(), &texture));
        assert!(shared.bind_group().is_none());
        assert!(shared.uniform_buffers().is_empty());
        assert_eq!(shared.entry_point(), program.entry_point());
        assert_eq!(mock.count_shader_creates(), 1);

        // Later writes stay with the program they were made on.
        shared.set_float("Strength", 5.0).unwrap();
        assert_eq!(program.float("Strength"), Some(3.0));
        shared.upload(&mock);
        assert_eq!(mock.count_buffer_creates(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let mock = MockRenderContext::new();
        let result = ShaderProgram::load(&mock, ShaderStage::Pixel, "does/not/exist.wgsl");

        assert!(matches!(result, Err(ShaderError::Io { .. })));
        assert_eq!(mock.count_shader_creates(), 0);
    }
}
