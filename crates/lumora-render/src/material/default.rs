use std::path::Path;
use std::sync::Arc;

use lumora_core::Config;
use lumora_test_utils::{GpuSampler, RenderContext};

use super::{FrameContext, Material, MaterialError, MaterialShaders, ObjectId};
use crate::color::Color;
use crate::light::{DirectionalLight, PointLight};
use crate::resource::{
    SamplerSettings, Texture, create_sampler_state, load_texture_from_file, update_resource,
};

pub const DEFAULT_VERTEX_SHADER: &str = "shaders/default_vertex.wgsl";
pub const DEFAULT_PIXEL_SHADER: &str = "shaders/default_pixel.wgsl";

const DEFAULT_AMBIENT_COLOR: Color = Color::rgba(0.05, 0.05, 0.05, 1.0);
const DEFAULT_SPECULAR_POWER: f32 = 64.0;

/// Lit, textured material with a diffuse map, an optional normal map and
/// Blinn-Phong specular highlights from one directional and one point light.
///
/// Textures and the sampler are shared handles: cloning a material, or
/// [`copy_from`](Self::copy_from), shares them instead of duplicating texels.
#[derive(Debug)]
pub struct DefaultMaterial {
    shaders: MaterialShaders,
    diffuse_map: Option<Arc<Texture>>,
    normal_map: Option<Arc<Texture>>,
    sampler: Option<Arc<GpuSampler>>,
    ambient_color: Color,
    specular_power: f32,
    use_normal_map: bool,
    use_specularity: bool,
}

impl DefaultMaterial {
    /// Load the default shaders (relative to the asset root) and create the sampler.
    pub fn new(
        gpu: &dyn RenderContext,
        config: &Config,
        owner: ObjectId,
    ) -> Result<Self, MaterialError> {
        let shaders = MaterialShaders::load(
            gpu,
            owner,
            config.resolve(DEFAULT_VERTEX_SHADER),
            config.resolve(DEFAULT_PIXEL_SHADER),
        )?;
        let sampler = create_sampler_state(gpu, &SamplerSettings::default())?;

        Ok(Self {
            sampler: Some(sampler),
            ..Self::with_shaders(shaders)
        })
    }

    fn with_shaders(shaders: MaterialShaders) -> Self {
        Self {
            shaders,
            diffuse_map: None,
            normal_map: None,
            sampler: None,
            ambient_color: DEFAULT_AMBIENT_COLOR,
            specular_power: DEFAULT_SPECULAR_POWER,
            use_normal_map: false,
            use_specularity: true,
        }
    }

    /// Load and bind a diffuse texture. On failure the current texture stays bound.
    pub fn load_diffuse_map(&mut self, gpu: &dyn RenderContext, path: impl AsRef<Path>) -> bool {
        match load_texture_from_file(gpu, path) {
            Ok(texture) => {
                update_resource(&mut self.diffuse_map, Some(&texture));
                true
            }
            Err(err) => {
                tracing::warn!("Failed to load diffuse map: {}", err);
                false
            }
        }
    }

    /// Load and bind a normal map. Returns whether normal mapping is now enabled.
    pub fn load_normal_map(&mut self, gpu: &dyn RenderContext, path: impl AsRef<Path>) -> bool {
        match load_texture_from_file(gpu, path) {
            Ok(texture) => {
                update_resource(&mut self.normal_map, Some(&texture));
                self.use_normal_map = true;
            }
            Err(err) => {
                tracing::warn!("Failed to load normal map: {}", err);
                update_resource(&mut self.normal_map, None);
                self.use_normal_map = false;
            }
        }
        self.use_normal_map
    }

    pub fn set_directional_light(&mut self, light: &DirectionalLight) -> Result<(), MaterialError> {
        self.shaders
            .pixel_shader_mut()
            .set_data("Light0", bytemuck::bytes_of(light))?;
        Ok(())
    }

    pub fn set_point_light(&mut self, light: &PointLight) -> Result<(), MaterialError> {
        self.shaders
            .pixel_shader_mut()
            .set_data("Light1", bytemuck::bytes_of(light))?;
        Ok(())
    }

    /// Take `other`'s programs with their parameter values (lights included),
    /// share its textures and sampler, and take its normal map flag.
    ///
    /// Ambient color and specular settings are left as they are.
    pub fn copy_from(&mut self, other: &DefaultMaterial) {
        self.shaders.copy_from(&other.shaders);
        self.copy_resources_from(other);
    }

    fn copy_resources_from(&mut self, other: &DefaultMaterial) {
        update_resource(&mut self.diffuse_map, other.diffuse_map.as_ref());
        update_resource(&mut self.normal_map, other.normal_map.as_ref());
        update_resource(&mut self.sampler, other.sampler.as_ref());
        self.use_normal_map = other.use_normal_map;
    }

    pub fn diffuse_map(&self) -> Option<&Arc<Texture>> {
        self.diffuse_map.as_ref()
    }

    pub fn normal_map(&self) -> Option<&Arc<Texture>> {
        self.normal_map.as_ref()
    }

    pub fn sampler(&self) -> Option<&Arc<GpuSampler>> {
        self.sampler.as_ref()
    }

    pub fn ambient_color(&self) -> Color {
        self.ambient_color
    }

    pub fn set_ambient_color(&mut self, color: Color) {
        self.ambient_color = color;
    }

    pub fn specular_power(&self) -> f32 {
        self.specular_power
    }

    pub fn set_specular_power(&mut self, power: f32) {
        self.specular_power = power;
    }

    pub fn use_normal_map(&self) -> bool {
        self.use_normal_map
    }

    pub fn use_specularity(&self) -> bool {
        self.use_specularity
    }

    pub fn set_use_specularity(&mut self, enabled: bool) {
        self.use_specularity = enabled;
    }
}

impl Clone for DefaultMaterial {
    /// Attached to the same owner, with default ambient and specular settings.
    fn clone(&self) -> Self {
        let mut material = Self::with_shaders(self.shaders.clone());
        material.copy_resources_from(self);
        material
    }

    fn clone_from(&mut self, source: &Self) {
        self.copy_from(source);
    }
}

impl Material for DefaultMaterial {
    fn shaders(&self) -> &MaterialShaders {
        &self.shaders
    }

    fn shaders_mut(&mut self) -> &mut MaterialShaders {
        &mut self.shaders
    }

    fn bind_parameters(&mut self, frame: &FrameContext<'_>) -> Result<(), MaterialError> {
        self.shaders.apply_camera(frame.camera)?;

        let pixel = self.shaders.pixel_shader_mut();
        pixel.set_float3("CameraPosition", frame.camera.position())?;
        pixel.set_texture("DiffuseMap", self.diffuse_map.as_ref())?;
        pixel.set_texture("NormalMap", self.normal_map.as_ref())?;
        pixel.set_sampler("TextureSampler", self.sampler.as_ref())?;
        pixel.set_float4("AmbientColor", self.ambient_color)?;
        pixel.set_float("SpecularPower", self.specular_power)?;
        pixel.set_float("UseNormalMap", flag(self.use_normal_map))?;
        pixel.set_float("UseSpecularity", flag(self.use_specularity))?;
        Ok(())
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}
