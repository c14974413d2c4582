//! Mock implementation of RenderContext for testing.
//!
//! Records every operation without touching a GPU.

use crate::{gpu_types::*, render_context::RenderContext};
use parking_lot::Mutex;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone)]
pub enum RenderCall {
    CreateBuffer {
        buffer_id: usize,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        data: Vec<u8>,
    },
    CreateTexture {
        texture_id: usize,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture_id: usize,
        size: usize,
    },
    CreateTextureView {
        view_id: usize,
        texture_id: usize,
    },
    CreateShaderModule {
        label: Option<String>,
    },
    CreateBindGroupLayout {
        label: Option<String>,
        entries: usize,
    },
    CreateBindGroup {
        label: Option<String>,
        entries: usize,
    },
    CreateSampler {
        label: Option<String>,
        anisotropy_clamp: u16,
    },
}

/// Mock implementation of RenderContext for testing.
///
/// Methods take `&self` but need to record calls, so state lives behind
/// `parking_lot::Mutex` (the trait requires `Send + Sync`, ruling out `RefCell`).
///
/// # Example
///
/// ```rust
/// use lumora_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
///
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 16,
///     usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
///     mapped_at_creation: false,
/// });
/// mock.write_buffer(&buffer, 0, &[1u8; 16]);
///
/// assert_eq!(mock.count_buffer_writes(), 1);
/// assert_eq!(mock.last_buffer_write(buffer.mock_id().unwrap()), Some(vec![1u8; 16]));
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,

    /// Counters for generating IDs
    next_buffer_id: Mutex<usize>,
    next_texture_id: Mutex<usize>,
    next_view_id: Mutex<usize>,
    next_shader_id: Mutex<usize>,
    next_bind_group_layout_id: Mutex<usize>,
    next_bind_group_id: Mutex<usize>,
    next_sampler_id: Mutex<usize>,
}

fn next_id(counter: &Mutex<usize>) -> usize {
    let mut id = counter.lock();
    let current = *id;
    *id += 1;
    current
}

impl MockRenderContext {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_buffer_id: Mutex::new(0),
            next_texture_id: Mutex::new(0),
            next_view_id: Mutex::new(0),
            next_shader_id: Mutex::new(0),
            next_bind_group_layout_id: Mutex::new(0),
            next_bind_group_id: Mutex::new(0),
            next_sampler_id: Mutex::new(0),
        }
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    pub fn count_texture_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteTexture { .. }))
    }

    pub fn count_shader_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateShaderModule { .. }))
    }

    pub fn count_bind_group_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBindGroup { .. }))
    }

    pub fn count_sampler_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateSampler { .. }))
    }

    /// Bytes of the most recent write to the given mock buffer.
    pub fn last_buffer_write(&self, buffer_id: usize) -> Option<Vec<u8>> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::WriteBuffer {
                buffer_id: id,
                data,
                ..
            } if *id == buffer_id => Some(data.clone()),
            _ => None,
        })
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let buffer_id = next_id(&self.next_buffer_id);

        self.calls.lock().push(RenderCall::CreateBuffer {
            buffer_id,
            size: desc.size,
            usage: desc.usage,
        });

        GpuBuffer::mock(buffer_id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        if let Some(buffer_id) = buffer.mock_id() {
            self.calls.lock().push(RenderCall::WriteBuffer {
                buffer_id,
                offset,
                data: data.to_vec(),
            });
        }
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texture_id = next_id(&self.next_texture_id);

        self.calls.lock().push(RenderCall::CreateTexture {
            texture_id,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        GpuTexture::mock(texture_id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        _layout: TexelCopyBufferLayout,
        _size: Extent3d,
    ) {
        if let Some(texture_id) = texture.mock_id() {
            self.calls.lock().push(RenderCall::WriteTexture {
                texture_id,
                size: data.len(),
            });
        }
    }

    fn create_texture_view(
        &self,
        texture: &GpuTexture,
        _desc: &TextureViewDescriptor,
    ) -> GpuTextureView {
        let view_id = next_id(&self.next_view_id);
        let texture_id = texture.mock_id().unwrap_or(usize::MAX);

        self.calls.lock().push(RenderCall::CreateTextureView {
            view_id,
            texture_id,
        });

        GpuTextureView::mock(view_id, texture_id)
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        let shader_id = next_id(&self.next_shader_id);

        self.calls.lock().push(RenderCall::CreateShaderModule {
            label: desc.label.map(|s| s.to_string()),
        });

        GpuShaderModule::mock(shader_id)
    }

    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout {
        let layout_id = next_id(&self.next_bind_group_layout_id);

        self.calls.lock().push(RenderCall::CreateBindGroupLayout {
            label: desc.label.map(|s| s.to_string()),
            entries: desc.entries.len(),
        });

        GpuBindGroupLayout::mock(layout_id)
    }

    fn create_bind_group(
        &self,
        label: Option<&str>,
        _layout: &GpuBindGroupLayout,
        entries: &[GpuBindGroupEntry<'_>],
    ) -> GpuBindGroup {
        let bind_group_id = next_id(&self.next_bind_group_id);

        self.calls.lock().push(RenderCall::CreateBindGroup {
            label: label.map(|s| s.to_string()),
            entries: entries.len(),
        });

        GpuBindGroup::mock(bind_group_id)
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler {
        let sampler_id = next_id(&self.next_sampler_id);

        self.calls.lock().push(RenderCall::CreateSampler {
            label: desc.label.map(|s| s.to_string()),
            anisotropy_clamp: desc.anisotropy_clamp,
        });

        GpuSampler::mock(sampler_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_buffer(mock: &MockRenderContext) -> GpuBuffer {
        mock.create_buffer(&BufferDescriptor {
            label: Some("test_buffer"),
            size: 64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    #[test]
    fn test_mock_buffer_write_keeps_bytes() {
        let mock = MockRenderContext::new();
        let buffer = uniform_buffer(&mock);

        mock.write_buffer(&buffer, 0, &[1, 2, 3, 4]);
        mock.write_buffer(&buffer, 0, &[5, 6, 7, 8]);

        assert!(buffer.is_mock());
        assert_eq!(buffer.size(), 64);
        assert_eq!(mock.count_buffer_creates(), 1);
        assert_eq!(mock.count_buffer_writes(), 2);
        assert_eq!(mock.last_buffer_write(0), Some(vec![5, 6, 7, 8]));
        assert_eq!(mock.last_buffer_write(1), None);
    }

    #[test]
    fn test_mock_texture_and_view() {
        let mock = MockRenderContext::new();

        let texture = mock.create_texture(&TextureDescriptor {
            label: Some("test_texture"),
            size: Extent3d {
                width: 4,
                height: 2,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        mock.write_texture(
            &texture,
            &[0u8; 32],
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(16),
                rows_per_image: Some(2),
            },
            Extent3d {
                width: 4,
                height: 2,
                depth_or_array_layers: 1,
            },
        );
        let view = mock.create_texture_view(&texture, &TextureViewDescriptor::default());

        assert_eq!(texture.dimensions(), (4, 2));
        assert_eq!(texture.format(), TextureFormat::Rgba8UnormSrgb);
        assert_eq!(view.mock_texture_id(), texture.mock_id());
        assert_eq!(mock.count_texture_creates(), 1);
        assert_eq!(mock.count_texture_writes(), 1);
    }

    #[test]
    fn test_mock_bind_group_counts_entries() {
        let mock = MockRenderContext::new();
        let buffer = uniform_buffer(&mock);
        let sampler = mock.create_sampler(&SamplerDescriptor::default());
        let layout = mock.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("layout"),
            entries: &[],
        });

        mock.create_bind_group(
            Some("group"),
            &layout,
            &[
                GpuBindGroupEntry {
                    binding: 0,
                    resource: GpuBindingResource::Buffer(&buffer),
                },
                GpuBindGroupEntry {
                    binding: 1,
                    resource: GpuBindingResource::Sampler(&sampler),
                },
            ],
        );

        assert_eq!(mock.count_bind_group_creates(), 1);
        assert!(matches!(
            mock.calls().last(),
            Some(RenderCall::CreateBindGroup { entries: 2, .. })
        ));
    }

    #[test]
    fn test_clear_calls() {
        let mock = MockRenderContext::new();
        uniform_buffer(&mock);

        assert_eq!(mock.call_count(), 1);

        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }
}
