//! GPU resource wrappers that can be real or mock.
//!
//! Each wrapper hides whether it holds a real `wgpu` object or a mock id.
//! Cloning is cheap: `wgpu` handles are reference counted internally and
//! mocks are plain ids.

/// Wrapper around a GPU buffer.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    inner: GpuBufferInner,
}

#[derive(Clone, Debug)]
enum GpuBufferInner {
    Real(wgpu::Buffer),
    #[cfg(feature = "mock")]
    Mock { id: usize, size: u64 },
}

impl GpuBuffer {
    /// Create from real WGPU buffer
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        Self {
            inner: GpuBufferInner::Real(buffer),
        }
    }

    /// Create mock buffer (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            inner: GpuBufferInner::Mock { id, size },
        }
    }

    /// Get the underlying wgpu::Buffer
    ///
    /// # Panics
    /// Panics if this is a mock buffer
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer,
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Buffer from mock buffer - this is a test-only buffer")
            }
        }
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer.size(),
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { size, .. } => *size,
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBufferInner::Mock { .. })
    }

    /// Get mock ID (for test assertions)
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBufferInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a GPU texture.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    inner: GpuTextureInner,
}

#[derive(Clone, Debug)]
enum GpuTextureInner {
    Real(wgpu::Texture),
    #[cfg(feature = "mock")]
    Mock {
        id: usize,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    },
}

impl GpuTexture {
    /// Create from real WGPU texture
    pub fn from_wgpu(texture: wgpu::Texture) -> Self {
        Self {
            inner: GpuTextureInner::Real(texture),
        }
    }

    /// Create mock texture (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            inner: GpuTextureInner::Mock {
                id,
                width,
                height,
                format,
            },
        }
    }

    /// Get the underlying wgpu::Texture
    ///
    /// # Panics
    /// Panics if this is a mock texture
    pub fn as_wgpu(&self) -> &wgpu::Texture {
        match &self.inner {
            GpuTextureInner::Real(texture) => texture,
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Texture from mock texture")
            }
        }
    }

    /// Texel format of the texture.
    pub fn format(&self) -> wgpu::TextureFormat {
        match &self.inner {
            GpuTextureInner::Real(texture) => texture.format(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { format, .. } => *format,
        }
    }

    /// Width and height of mip level 0.
    pub fn dimensions(&self) -> (u32, u32) {
        match &self.inner {
            GpuTextureInner::Real(texture) => (texture.width(), texture.height()),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { width, height, .. } => (*width, *height),
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuTextureInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuTextureInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a shader-bindable texture view.
#[derive(Clone, Debug)]
pub struct GpuTextureView {
    inner: GpuTextureViewInner,
}

#[derive(Clone, Debug)]
enum GpuTextureViewInner {
    Real(wgpu::TextureView),
    #[cfg(feature = "mock")]
    Mock { id: usize, texture_id: usize },
}

impl GpuTextureView {
    pub fn from_wgpu(view: wgpu::TextureView) -> Self {
        Self {
            inner: GpuTextureViewInner::Real(view),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize, texture_id: usize) -> Self {
        Self {
            inner: GpuTextureViewInner::Mock { id, texture_id },
        }
    }

    /// Get the underlying wgpu::TextureView
    ///
    /// # Panics
    /// Panics if this is a mock view
    pub fn as_wgpu(&self) -> &wgpu::TextureView {
        match &self.inner {
            GpuTextureViewInner::Real(view) => view,
            #[cfg(feature = "mock")]
            GpuTextureViewInner::Mock { .. } => {
                panic!("Attempted to get wgpu::TextureView from mock")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuTextureViewInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuTextureViewInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Mock id of the texture this view was created from.
    #[cfg(feature = "mock")]
    pub fn mock_texture_id(&self) -> Option<usize> {
        match &self.inner {
            GpuTextureViewInner::Mock { texture_id, .. } => Some(*texture_id),
            _ => None,
        }
    }
}

/// Wrapper around a GPU shader module.
#[derive(Clone, Debug)]
pub struct GpuShaderModule {
    inner: GpuShaderModuleInner,
}

#[derive(Clone, Debug)]
enum GpuShaderModuleInner {
    Real(wgpu::ShaderModule),
    #[cfg(feature = "mock")]
    Mock { id: usize },
}

impl GpuShaderModule {
    pub fn from_wgpu(module: wgpu::ShaderModule) -> Self {
        Self {
            inner: GpuShaderModuleInner::Real(module),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize) -> Self {
        Self {
            inner: GpuShaderModuleInner::Mock { id },
        }
    }

    /// Get the underlying wgpu::ShaderModule
    ///
    /// # Panics
    /// Panics if this is a mock module
    pub fn as_wgpu(&self) -> &wgpu::ShaderModule {
        match &self.inner {
            GpuShaderModuleInner::Real(module) => module,
            #[cfg(feature = "mock")]
            GpuShaderModuleInner::Mock { .. } => {
                panic!("Attempted to get wgpu::ShaderModule from mock")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuShaderModuleInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuShaderModuleInner::Mock { id } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a GPU bind group layout.
#[derive(Clone, Debug)]
pub struct GpuBindGroupLayout {
    inner: GpuBindGroupLayoutInner,
}

#[derive(Clone, Debug)]
enum GpuBindGroupLayoutInner {
    Real(wgpu::BindGroupLayout),
    #[cfg(feature = "mock")]
    Mock { id: usize },
}

impl GpuBindGroupLayout {
    pub fn from_wgpu(layout: wgpu::BindGroupLayout) -> Self {
        Self {
            inner: GpuBindGroupLayoutInner::Real(layout),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize) -> Self {
        Self {
            inner: GpuBindGroupLayoutInner::Mock { id },
        }
    }

    /// Get the underlying wgpu::BindGroupLayout
    ///
    /// # Panics
    /// Panics if this is a mock layout
    pub fn as_wgpu(&self) -> &wgpu::BindGroupLayout {
        match &self.inner {
            GpuBindGroupLayoutInner::Real(layout) => layout,
            #[cfg(feature = "mock")]
            GpuBindGroupLayoutInner::Mock { .. } => {
                panic!("Attempted to get wgpu::BindGroupLayout from mock")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBindGroupLayoutInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBindGroupLayoutInner::Mock { id } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a GPU bind group.
#[derive(Clone, Debug)]
pub struct GpuBindGroup {
    inner: GpuBindGroupInner,
}

#[derive(Clone, Debug)]
enum GpuBindGroupInner {
    Real(wgpu::BindGroup),
    #[cfg(feature = "mock")]
    Mock { id: usize },
}

impl GpuBindGroup {
    pub fn from_wgpu(bind_group: wgpu::BindGroup) -> Self {
        Self {
            inner: GpuBindGroupInner::Real(bind_group),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize) -> Self {
        Self {
            inner: GpuBindGroupInner::Mock { id },
        }
    }

    /// Get the underlying wgpu::BindGroup
    ///
    /// # Panics
    /// Panics if this is a mock bind group
    pub fn as_wgpu(&self) -> &wgpu::BindGroup {
        match &self.inner {
            GpuBindGroupInner::Real(bind_group) => bind_group,
            #[cfg(feature = "mock")]
            GpuBindGroupInner::Mock { .. } => {
                panic!("Attempted to get wgpu::BindGroup from mock")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBindGroupInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBindGroupInner::Mock { id } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a GPU sampler.
#[derive(Clone, Debug)]
pub struct GpuSampler {
    inner: GpuSamplerInner,
}

#[derive(Clone, Debug)]
enum GpuSamplerInner {
    Real(wgpu::Sampler),
    #[cfg(feature = "mock")]
    Mock { id: usize },
}

impl GpuSampler {
    pub fn from_wgpu(sampler: wgpu::Sampler) -> Self {
        Self {
            inner: GpuSamplerInner::Real(sampler),
        }
    }

    #[cfg(feature = "mock")]
    pub fn mock(id: usize) -> Self {
        Self {
            inner: GpuSamplerInner::Mock { id },
        }
    }

    /// Get the underlying wgpu::Sampler
    ///
    /// # Panics
    /// Panics if this is a mock sampler
    pub fn as_wgpu(&self) -> &wgpu::Sampler {
        match &self.inner {
            GpuSamplerInner::Real(sampler) => sampler,
            #[cfg(feature = "mock")]
            GpuSamplerInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Sampler from mock")
            }
        }
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuSamplerInner::Mock { .. })
    }

    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuSamplerInner::Mock { id } => Some(*id),
            _ => None,
        }
    }
}

/// A resource bound at one slot of a bind group.
#[derive(Clone, Copy, Debug)]
pub enum GpuBindingResource<'a> {
    Buffer(&'a GpuBuffer),
    TextureView(&'a GpuTextureView),
    Sampler(&'a GpuSampler),
}

/// One entry of a bind group, built from wrapped resources.
#[derive(Clone, Copy, Debug)]
pub struct GpuBindGroupEntry<'a> {
    pub binding: u32,
    pub resource: GpuBindingResource<'a>,
}
