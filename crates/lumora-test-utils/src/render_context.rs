//! Trait abstracting GPU operations.
//!
//! Materials and shader programs only talk to the device through
//! [`RenderContext`], so they can run against `MockRenderContext` in tests.

use crate::gpu_types::*;
use wgpu::{
    BindGroupLayoutDescriptor, BufferDescriptor, Extent3d, SamplerDescriptor,
    ShaderModuleDescriptor, TexelCopyBufferLayout, TextureDescriptor, TextureViewDescriptor,
};

/// Trait abstracting GPU resource creation and uploads.
///
/// Methods take `&self` and return owned wrapper types, so one context can be
/// shared (via `Arc`) and no lifetimes leak into material types.
///
/// ```rust,no_run
/// use lumora_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload_constants(ctx: &dyn RenderContext, bytes: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: Some("constants"),
///         size: bytes.len() as u64,
///         usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, bytes);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    // Buffer operations

    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data to a buffer through the queue.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    // Texture operations

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Upload texels into mip level 0 of `texture`.
    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        layout: TexelCopyBufferLayout,
        size: Extent3d,
    );

    /// Create a shader-bindable view of a texture.
    fn create_texture_view(
        &self,
        texture: &GpuTexture,
        desc: &TextureViewDescriptor,
    ) -> GpuTextureView;

    // Shader operations

    /// Create a shader module from source code.
    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule;

    // Bind group operations

    /// Create a bind group layout.
    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout;

    /// Create a bind group from wrapped resources.
    ///
    /// `wgpu::BindGroupDescriptor` borrows concrete `wgpu` objects, which mock
    /// resources cannot provide, so entries are passed as [`GpuBindGroupEntry`].
    fn create_bind_group(
        &self,
        label: Option<&str>,
        layout: &GpuBindGroupLayout,
        entries: &[GpuBindGroupEntry<'_>],
    ) -> GpuBindGroup;

    // Sampler operations

    /// Create a texture sampler.
    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler;
}
