//! The bundled shaders expose the parameters materials write, with matching layouts.

use std::path::PathBuf;

use lumora_render::material::{
    DEFAULT_PIXEL_SHADER, DEFAULT_VERTEX_SHADER, TEXT_PIXEL_SHADER, TEXT_VERTEX_SHADER,
};
use lumora_render::{DirectionalLight, ParameterKind, PointLight, ShaderProgram, ShaderStage};
use lumora_test_utils::MockRenderContext;

fn asset(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path)
}

fn load(mock: &MockRenderContext, stage: ShaderStage, path: &str) -> ShaderProgram {
    ShaderProgram::load(mock, stage, asset(path)).unwrap()
}

#[test]
fn test_default_pixel_shader_layout() {
    let mock = MockRenderContext::new();
    let pixel = load(&mock, ShaderStage::Pixel, DEFAULT_PIXEL_SHADER);
    let reflection = pixel.reflection();

    assert_eq!(
        reflection.constant_size("Light0"),
        Some(size_of::<DirectionalLight>() as u32)
    );
    assert_eq!(
        reflection.constant_size("Light1"),
        Some(size_of::<PointLight>() as u32)
    );
    assert_eq!(reflection.constant_size("AmbientColor"), Some(16));
    assert_eq!(reflection.constant_size("CameraPosition"), Some(12));
    for flag in ["SpecularPower", "UseNormalMap", "UseSpecularity"] {
        assert_eq!(reflection.constant_size(flag), Some(4), "{flag}");
    }

    assert_eq!(
        reflection.parameter_kind("DiffuseMap"),
        Some(ParameterKind::Texture)
    );
    assert_eq!(
        reflection.parameter_kind("NormalMap"),
        Some(ParameterKind::Texture)
    );
    assert_eq!(
        reflection.parameter_kind("TextureSampler"),
        Some(ParameterKind::Sampler)
    );
    assert_eq!(pixel.bind_group_index(), Some(1));
}

#[test]
fn test_default_vertex_shader_layout() {
    let mock = MockRenderContext::new();
    let vertex = load(&mock, ShaderStage::Vertex, DEFAULT_VERTEX_SHADER);

    for matrix in ["World", "View", "Projection"] {
        assert_eq!(vertex.reflection().constant_size(matrix), Some(64), "{matrix}");
    }
    assert_eq!(vertex.bind_group_index(), Some(0));
    assert_eq!(vertex.entry_point(), "vs_main");
}

#[test]
fn test_text_shaders_layout() {
    let mock = MockRenderContext::new();
    let vertex = load(&mock, ShaderStage::Vertex, TEXT_VERTEX_SHADER);
    let pixel = load(&mock, ShaderStage::Pixel, TEXT_PIXEL_SHADER);

    assert_eq!(vertex.reflection().constant_size("World"), Some(64));
    assert_eq!(pixel.reflection().constant_size("TextColor"), Some(16));
    assert_ne!(vertex.bind_group_index(), pixel.bind_group_index());
}

#[test]
fn test_shader_loaded_for_wrong_stage() {
    let mock = MockRenderContext::new();
    let result = ShaderProgram::load(&mock, ShaderStage::Vertex, asset(DEFAULT_PIXEL_SHADER));

    assert!(result.is_err());
    assert_eq!(mock.count_shader_creates(), 0);
}
