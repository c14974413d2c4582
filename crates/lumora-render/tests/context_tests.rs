//! Graphics context and materials on a real device.

use std::sync::Arc;

use glam::Mat4;
use lumora_core::Config;
use lumora_render::{
    Camera, DefaultMaterial, FrameContext, GraphicsContext, Material, MaterialExt, ObjectId,
    TextMaterial,
};

#[test]
#[ignore] // Requires GPU - run with: cargo test --test context_tests -- --ignored
fn test_context_creation_sync() {
    match GraphicsContext::new_owned_sync() {
        Ok(ctx) => {
            assert_eq!(Arc::strong_count(&ctx), 1);
            assert!(ctx.limits().max_texture_dimension_2d > 0);
        }
        Err(e) => {
            // Allow test to pass if no GPU (CI environments)
            println!("GPU not available: {:?}", e);
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn test_materials_on_device() {
    let Ok(ctx) = GraphicsContext::new_owned_sync() else {
        return;
    };
    let config = Config::default().with_asset_root(env!("CARGO_MANIFEST_DIR"));
    let camera = Camera::default();
    let frame = FrameContext::new(&camera, Mat4::IDENTITY);

    let mut lit = DefaultMaterial::new(&*ctx, &config, ObjectId(1)).unwrap();
    lit.update_shader_data(&*ctx, &frame).unwrap();
    assert!(lit.shaders().pixel_shader().bind_group().is_some());

    let mut text = TextMaterial::new(&*ctx, &config, ObjectId(2)).unwrap();
    text.update_shader_data(&*ctx, &frame).unwrap();
    assert!(text.shaders().vertex_shader().bind_group().is_some());
}
