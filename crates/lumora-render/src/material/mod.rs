//! Materials: a vertex/pixel shader pair plus the named parameters they need each frame.
//!
//! A concrete material implements [`Material::bind_parameters`] to push its own
//! state. Callers drive it through [`MaterialExt::update_shader_data`], which
//! always runs the shared finalize step afterwards (world matrix, upload), so a
//! material cannot skip or reorder it.
//!
//! # Example
//!
//! ```ignore
//! use lumora_render::*;
//!
//! let mut material = DefaultMaterial::new(&*gpu, &config, ObjectId(1))?;
//! material.load_diffuse_map(&*gpu, "textures/crate.png");
//!
//! let frame = FrameContext::new(&camera, world);
//! material.update_shader_data(&*gpu, &frame)?;
//! material.set_on_pass(&mut pass);
//! ```

mod default;
mod text;

pub use default::{DEFAULT_PIXEL_SHADER, DEFAULT_VERTEX_SHADER, DefaultMaterial};
pub use text::{TEXT_PIXEL_SHADER, TEXT_VERTEX_SHADER, TextMaterial};

use std::fmt;
use std::path::Path;

use glam::Mat4;
use lumora_core::Time;
use lumora_core::profiling::profile_function;
use lumora_test_utils::RenderContext;

use crate::camera::Camera;
use crate::context::GraphicsError;
use crate::shader::{ShaderError, ShaderProgram, ShaderStage};

/// Handle of the scene object a material is attached to. It does not keep the object alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Per-draw state handed to materials.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub camera: &'a Camera,
    /// World matrix of the object being drawn.
    pub world: Mat4,
}

impl<'a> FrameContext<'a> {
    pub fn new(camera: &'a Camera, world: Mat4) -> Self {
        Self { camera, world }
    }
}

/// Errors from creating or updating a material.
#[derive(Debug)]
pub enum MaterialError {
    Shader(ShaderError),
    Graphics(GraphicsError),
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::Shader(err) => write!(f, "Material shader error: {}", err),
            MaterialError::Graphics(err) => write!(f, "Material graphics error: {}", err),
        }
    }
}

impl std::error::Error for MaterialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterialError::Shader(err) => Some(err),
            MaterialError::Graphics(err) => Some(err),
        }
    }
}

impl From<ShaderError> for MaterialError {
    fn from(err: ShaderError) -> Self {
        MaterialError::Shader(err)
    }
}

impl From<GraphicsError> for MaterialError {
    fn from(err: GraphicsError) -> Self {
        MaterialError::Graphics(err)
    }
}

/// The state every material has: its owner and its two shader programs.
#[derive(Debug)]
pub struct MaterialShaders {
    owner: ObjectId,
    vertex_shader: ShaderProgram,
    pixel_shader: ShaderProgram,
}

impl MaterialShaders {
    /// Load both stages. Fails if either shader is missing or malformed.
    pub fn load(
        gpu: &dyn RenderContext,
        owner: ObjectId,
        vertex_path: impl AsRef<Path>,
        pixel_path: impl AsRef<Path>,
    ) -> Result<Self, MaterialError> {
        let vertex_shader = ShaderProgram::load(gpu, ShaderStage::Vertex, vertex_path)?;
        let pixel_shader = ShaderProgram::load(gpu, ShaderStage::Pixel, pixel_path)?;
        Ok(Self {
            owner,
            vertex_shader,
            pixel_shader,
        })
    }

    pub fn owner(&self) -> ObjectId {
        self.owner
    }

    pub fn vertex_shader(&self) -> &ShaderProgram {
        &self.vertex_shader
    }

    pub fn vertex_shader_mut(&mut self) -> &mut ShaderProgram {
        &mut self.vertex_shader
    }

    pub fn pixel_shader(&self) -> &ShaderProgram {
        &self.pixel_shader
    }

    pub fn pixel_shader_mut(&mut self) -> &mut ShaderProgram {
        &mut self.pixel_shader
    }

    /// Push the camera's view and projection matrices to the vertex shader.
    pub fn apply_camera(&mut self, camera: &Camera) -> Result<(), ShaderError> {
        self.vertex_shader.set_matrix4("View", &camera.view_matrix())?;
        self.vertex_shader.set_matrix4("Projection", &camera.projection_matrix())?;
        Ok(())
    }

    /// Take on `other`'s shader programs and their parameter values. The owner is not changed.
    pub fn copy_from(&mut self, other: &MaterialShaders) {
        self.vertex_shader = other.vertex_shader.share();
        self.pixel_shader = other.pixel_shader.share();
    }

    /// Bind both programs' bind groups. Call after `update_shader_data`.
    pub fn set_on_pass(&self, pass: &mut wgpu::RenderPass<'_>) {
        for program in [&self.vertex_shader, &self.pixel_shader] {
            if let (Some(index), Some(bind_group)) = (program.bind_group_index(), program.bind_group())
            {
                pass.set_bind_group(index, bind_group.as_wgpu(), &[]);
            }
        }
    }

    fn finalize(&mut self, gpu: &dyn RenderContext, world: &Mat4) -> Result<(), MaterialError> {
        self.vertex_shader.set_matrix4("World", world)?;
        self.vertex_shader.upload(gpu);
        self.pixel_shader.upload(gpu);
        Ok(())
    }
}

impl Clone for MaterialShaders {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            vertex_shader: self.vertex_shader.share(),
            pixel_shader: self.pixel_shader.share(),
        }
    }
}

/// A material's own per-frame behavior.
pub trait Material {
    fn shaders(&self) -> &MaterialShaders;

    fn shaders_mut(&mut self) -> &mut MaterialShaders;

    /// Per-frame simulation hook.
    fn update(&mut self, _time: &Time) {}

    /// Write this material's parameters. Only called from
    /// [`MaterialExt::update_shader_data`].
    fn bind_parameters(&mut self, frame: &FrameContext<'_>) -> Result<(), MaterialError>;
}

/// Operations shared by every material. Implemented for all [`Material`]s.
pub trait MaterialExt: Material {
    /// Bind this material's parameters, then set the world matrix and upload
    /// both shader programs. Call once before each draw.
    fn update_shader_data(
        &mut self,
        gpu: &dyn RenderContext,
        frame: &FrameContext<'_>,
    ) -> Result<(), MaterialError>;

    fn owner(&self) -> ObjectId;

    fn set_on_pass(&self, pass: &mut wgpu::RenderPass<'_>);
}

impl<T: Material + ?Sized> MaterialExt for T {
    fn update_shader_data(
        &mut self,
        gpu: &dyn RenderContext,
        frame: &FrameContext<'_>,
    ) -> Result<(), MaterialError> {
        profile_function!();
        self.bind_parameters(frame)?;
        self.shaders_mut().finalize(gpu, &frame.world)
    }

    fn owner(&self) -> ObjectId {
        self.shaders().owner()
    }

    fn set_on_pass(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.shaders().set_on_pass(pass);
    }
}
