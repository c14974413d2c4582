//! Default Material Demo - Offscreen Lit Triangle
//!
//! Draws one triangle into an offscreen texture with a [`DefaultMaterial`]:
//! - Loading the default shaders relative to the asset root
//! - Setting the directional and point lights
//! - Passing the camera and world matrix through a `FrameContext`
//! - Binding the material's bind groups on a render pass
//!
//! Run with `LUMORA_LOG=trace` for per-shader logging, or
//! `LUMORA_PROFILING=webserver` to inspect frames in puffin_viewer.

use glam::{Mat4, Vec3};
use lumora_core::config::ASSET_ROOT_ENV;
use lumora_core::{Config, Time, logging, profiling};
use lumora_render::{
    Camera, Color, DefaultMaterial, DirectionalLight, FrameContext, GraphicsContext, Material,
    MaterialExt, ObjectId, PointLight,
};
use wgpu::util::DeviceExt;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const FRAMES: u32 = 3;

// position, normal, tangent, uv
#[rustfmt::skip]
const VERTICES: [[f32; 11]; 3] = [
    [-0.5, -0.5, 0.0,  0.0, 0.0, -1.0,  1.0, 0.0, 0.0,  0.0, 1.0],
    [ 0.0,  0.5, 0.0,  0.0, 0.0, -1.0,  1.0, 0.0, 0.0,  0.5, 0.0],
    [ 0.5, -0.5, 0.0,  0.0, 0.0, -1.0,  1.0, 0.0, 0.0,  1.0, 1.0],
];

fn main() {
    let mut config = Config::from_env();
    if std::env::var_os(ASSET_ROOT_ENV).is_none() {
        config = config.with_asset_root(env!("CARGO_MANIFEST_DIR"));
    }
    logging::init_with_filter(&config.log_filter);
    profiling::init_profiling(config.profiling);

    let ctx = GraphicsContext::new_owned_sync().expect("Failed to create graphics context");

    let mut material =
        DefaultMaterial::new(&*ctx, &config, ObjectId(1)).expect("Failed to create material");
    material
        .set_directional_light(&DirectionalLight::new(
            Color::rgb(0.1, 0.1, 0.1),
            Color::rgb(0.9, 0.85, 0.8),
            Vec3::new(0.0, -1.0, 1.0),
        ))
        .expect("Light0 layout mismatch");
    material
        .set_point_light(&PointLight::new(
            Color::rgb(0.2, 0.4, 1.0),
            Vec3::new(1.0, 1.0, -2.0),
        ))
        .expect("Light1 layout mismatch");

    let shaders = material.shaders();
    let layouts = [
        shaders.vertex_shader().bind_group_layout(),
        shaders.pixel_shader().bind_group_layout(),
    ]
    .map(|layout| layout.expect("default shaders bind resources").as_wgpu());

    let pipeline_layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Default Material Pipeline Layout"),
            bind_group_layouts: &layouts,
            push_constant_ranges: &[],
        });

    let pipeline = ctx
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Default Material Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shaders.vertex_shader().module().as_wgpu(),
                entry_point: Some(shaders.vertex_shader().entry_point()),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 11]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x3,
                        3 => Float32x2,
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shaders.pixel_shader().module().as_wgpu(),
                entry_point: Some(shaders.pixel_shader().entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

    let vertex_buffer = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Triangle Vertices"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

    let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: 256,
            height: 256,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0);
    camera.look_at(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, Vec3::Y);
    let mut time = Time::new();

    for _ in 0..FRAMES {
        profiling::new_frame();
        time.update();
        material.update(&time);

        let world = Mat4::from_rotation_y(time.elapsed_seconds());
        material
            .update_shader_data(&*ctx, &FrameContext::new(&camera, world))
            .expect("Failed to update material");

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Default Material Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Default Material Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            material.set_on_pass(&mut pass);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.draw(0..3, 0..1);
        }
        ctx.queue.submit(Some(encoder.finish()));

        tracing::info!(
            "Frame {} drawn (dt = {:.3}s)",
            time.frame_count(),
            time.delta_seconds()
        );
    }
}
