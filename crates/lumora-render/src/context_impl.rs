//! Implementation of RenderContext trait for GraphicsContext.
//!
//! This lets materials run on the real device or on `MockRenderContext`.

use crate::context::GraphicsContext;
use lumora_test_utils::{
    GpuBindGroup, GpuBindGroupEntry, GpuBindGroupLayout, GpuBindingResource, GpuBuffer,
    GpuSampler, GpuShaderModule, GpuTexture, GpuTextureView, RenderContext,
};
use wgpu::{
    BindGroupLayoutDescriptor, BufferDescriptor, Extent3d, SamplerDescriptor,
    ShaderModuleDescriptor, TexelCopyBufferLayout, TextureDescriptor, TextureViewDescriptor,
};

impl RenderContext for GraphicsContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let buffer = self.device.create_buffer(desc);
        GpuBuffer::from_wgpu(buffer)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer.as_wgpu(), offset, data);
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let texture = self.device.create_texture(desc);
        GpuTexture::from_wgpu(texture)
    }

    fn write_texture(
        &self,
        texture: &GpuTexture,
        data: &[u8],
        layout: TexelCopyBufferLayout,
        size: Extent3d,
    ) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.as_wgpu(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            layout,
            size,
        );
    }

    fn create_texture_view(
        &self,
        texture: &GpuTexture,
        desc: &TextureViewDescriptor,
    ) -> GpuTextureView {
        GpuTextureView::from_wgpu(texture.as_wgpu().create_view(desc))
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        let module = self.device.create_shader_module(desc.clone());
        GpuShaderModule::from_wgpu(module)
    }

    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout {
        let layout = self.device.create_bind_group_layout(desc);
        GpuBindGroupLayout::from_wgpu(layout)
    }

    fn create_bind_group(
        &self,
        label: Option<&str>,
        layout: &GpuBindGroupLayout,
        entries: &[GpuBindGroupEntry<'_>],
    ) -> GpuBindGroup {
        let entries: Vec<wgpu::BindGroupEntry<'_>> = entries
            .iter()
            .map(|entry| wgpu::BindGroupEntry {
                binding: entry.binding,
                resource: match entry.resource {
                    GpuBindingResource::Buffer(buffer) => buffer.as_wgpu().as_entire_binding(),
                    GpuBindingResource::TextureView(view) => {
                        wgpu::BindingResource::TextureView(view.as_wgpu())
                    }
                    GpuBindingResource::Sampler(sampler) => {
                        wgpu::BindingResource::Sampler(sampler.as_wgpu())
                    }
                },
            })
            .collect();

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout: layout.as_wgpu(),
            entries: &entries,
        });
        GpuBindGroup::from_wgpu(bind_group)
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler {
        let sampler = self.device.create_sampler(desc);
        GpuSampler::from_wgpu(sampler)
    }
}
