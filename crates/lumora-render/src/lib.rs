//! Lumora Render
//!
//! Materials for the Lumora renderer: they bind per-object shader state
//! (textures, sampler, lighting parameters, text color) to a vertex/pixel
//! shader pair and push it to the device before each draw.
//!
//! Device access goes through [`lumora_test_utils::RenderContext`], implemented
//! by [`GraphicsContext`] for real GPUs and by `MockRenderContext` in tests.

mod camera;
mod color;
mod context;
mod context_impl;
mod light;
pub mod material;
pub mod resource;
pub mod shader;

pub use camera::*;
pub use color::*;
pub use context::*;
pub use light::*;
pub use material::{
    DefaultMaterial, FrameContext, Material, MaterialError, MaterialExt, MaterialShaders,
    ObjectId, TextMaterial,
};
pub use resource::{
    SamplerSettings, Texture, TextureError, create_sampler_state, create_solid_texture,
    load_texture_from_file, update_resource,
};
pub use shader::{ParameterKind, ShaderError, ShaderProgram, ShaderReflection, ShaderStage};

pub use lumora_test_utils::RenderContext;
