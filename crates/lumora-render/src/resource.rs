//! Device resource helpers: samplers, textures and shared-handle reassignment.
//!
//! GPU resources that materials share are held as `Arc` handles. Copying a
//! material clones the `Arc` (adds a reference) and dropping or reassigning a
//! slot releases it, so a resource is freed exactly when its last holder lets go.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumora_core::profiling::profile_function;
use lumora_test_utils::{GpuSampler, GpuTexture, GpuTextureView, RenderContext};

use crate::context::GraphicsError;

/// Filtering, addressing and LOD settings for [`create_sampler_state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    /// Min, mag and mip filter
    pub filter: wgpu::FilterMode,
    /// Address mode for U, V and W
    pub address_mode: wgpu::AddressMode,
    /// Anisotropy clamp (1-16)
    pub max_anisotropy: u16,
    pub min_lod: f32,
    pub max_lod: f32,
}

impl Default for SamplerSettings {
    /// Linear min/mag/mip filtering with wrap addressing over the full LOD range.
    fn default() -> Self {
        Self {
            filter: wgpu::FilterMode::Linear,
            address_mode: wgpu::AddressMode::Repeat,
            max_anisotropy: 1,
            min_lod: 0.0,
            max_lod: f32::MAX,
        }
    }
}

impl SamplerSettings {
    /// Reject settings the device validation layer would refuse.
    pub fn validate(&self) -> Result<(), GraphicsError> {
        if !(1..=16).contains(&self.max_anisotropy) {
            return Err(GraphicsError::InvalidSampler(format!(
                "anisotropy must be within 1..=16, got {}",
                self.max_anisotropy
            )));
        }
        if self.max_anisotropy > 1 && self.filter != wgpu::FilterMode::Linear {
            return Err(GraphicsError::InvalidSampler(
                "anisotropic filtering requires linear min/mag/mip filters".to_string(),
            ));
        }
        if self.min_lod.is_nan() || self.max_lod.is_nan() || self.min_lod < 0.0 {
            return Err(GraphicsError::InvalidSampler(format!(
                "invalid LOD clamp {}..{}",
                self.min_lod, self.max_lod
            )));
        }
        if self.min_lod > self.max_lod {
            return Err(GraphicsError::InvalidSampler(format!(
                "min LOD {} is greater than max LOD {}",
                self.min_lod, self.max_lod
            )));
        }
        Ok(())
    }

    /// Create a descriptor from these settings.
    pub fn to_descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode,
            address_mode_v: self.address_mode,
            address_mode_w: self.address_mode,
            mag_filter: self.filter,
            min_filter: self.filter,
            mipmap_filter: self.filter,
            lod_min_clamp: self.min_lod,
            lod_max_clamp: self.max_lod,
            compare: None,
            anisotropy_clamp: self.max_anisotropy,
            border_color: None,
        }
    }
}

/// Create a sampler, failing instead of handing invalid settings to the device.
pub fn create_sampler_state(
    gpu: &dyn RenderContext,
    settings: &SamplerSettings,
) -> Result<Arc<GpuSampler>, GraphicsError> {
    settings.validate()?;
    let sampler = gpu.create_sampler(&settings.to_descriptor(Some("Material Sampler")));
    Ok(Arc::new(sampler))
}

/// Errors from [`load_texture_from_file`].
#[derive(Debug)]
pub enum TextureError {
    /// The file does not exist.
    NotFound(PathBuf),
    /// The file exists but could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The format is unsupported or the data is corrupt.
    Decode { path: PathBuf, message: String },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::NotFound(path) => write!(f, "Texture not found: {}", path.display()),
            TextureError::Io { path, source } => {
                write!(f, "IO error loading texture '{}': {}", path.display(), source)
            }
            TextureError::Decode { path, message } => {
                write!(f, "Failed to decode texture '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A 2D texture together with its shader-bindable view.
#[derive(Debug)]
pub struct Texture {
    texture: GpuTexture,
    view: GpuTextureView,
    width: u32,
    height: u32,
    label: String,
}

impl Texture {
    /// Create an RGBA8 sRGB texture and upload `rgba` (tightly packed rows).
    pub fn from_rgba8(
        gpu: &dyn RenderContext,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        gpu.write_texture(
            &texture,
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = gpu.create_texture_view(&texture, &wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
            label: label.to_string(),
        }
    }

    pub fn texture(&self) -> &GpuTexture {
        &self.texture
    }

    pub fn view(&self) -> &GpuTextureView {
        &self.view
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The source path for loaded textures, a descriptive name otherwise.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Load an image file into a shader-bindable texture.
pub fn load_texture_from_file(
    gpu: &dyn RenderContext,
    path: impl AsRef<Path>,
) -> Result<Arc<Texture>, TextureError> {
    profile_function!();
    let path = path.as_ref();

    let image = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(source) if source.kind() == std::io::ErrorKind::NotFound => {
            TextureError::NotFound(path.to_path_buf())
        }
        image::ImageError::IoError(source) => TextureError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => TextureError::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let label = path.display().to_string();
    let texture = Texture::from_rgba8(gpu, &label, width, height, rgba.as_raw());

    tracing::debug!("Loaded texture '{}' ({}x{})", label, width, height);
    Ok(Arc::new(texture))
}

/// A 1x1 texture of a single color, bound where no texture was provided.
pub fn create_solid_texture(gpu: &dyn RenderContext, rgba: [u8; 4], label: &str) -> Arc<Texture> {
    Arc::new(Texture::from_rgba8(gpu, label, 1, 1, &rgba))
}

/// Point `slot` at `value`, releasing the previously held resource first.
///
/// Assigning the resource the slot already holds leaves it untouched.
pub fn update_resource<T>(slot: &mut Option<Arc<T>>, value: Option<&Arc<T>>) {
    let unchanged = match (slot.as_ref(), value) {
        (Some(current), Some(new)) => Arc::ptr_eq(current, new),
        (None, None) => true,
        _ => false,
    };
    if !unchanged {
        *slot = value.cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumora_test_utils::MockRenderContext;

    #[test]
    fn test_default_sampler_is_linear_wrap() {
        let settings = SamplerSettings::default();
        let desc = settings.to_descriptor(None);

        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.mipmap_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.anisotropy_clamp, 1);
        assert_eq!(desc.lod_max_clamp, f32::MAX);
    }

    #[test]
    fn test_create_sampler_state() {
        let mock = MockRenderContext::new();
        let sampler = create_sampler_state(&mock, &SamplerSettings::default()).unwrap();

        assert!(sampler.is_mock());
        assert_eq!(mock.count_sampler_creates(), 1);
    }

    #[test]
    fn test_invalid_sampler_settings_fail_without_device_call() {
        let mock = MockRenderContext::new();
        let invalid = [
            SamplerSettings {
                max_anisotropy: 0,
                ..Default::default()
            },
            SamplerSettings {
                max_anisotropy: 17,
                ..Default::default()
            },
            SamplerSettings {
                filter: wgpu::FilterMode::Nearest,
                max_anisotropy: 4,
                ..Default::default()
            },
            SamplerSettings {
                min_lod: 4.0,
                max_lod: 1.0,
                ..Default::default()
            },
            SamplerSettings {
                min_lod: -1.0,
                ..Default::default()
            },
        ];

        for settings in &invalid {
            let result = create_sampler_state(&mock, settings);
            assert!(
                matches!(result, Err(GraphicsError::InvalidSampler(_))),
                "{:?} should be rejected",
                settings
            );
        }
        assert_eq!(mock.count_sampler_creates(), 0);
    }

    #[test]
    fn test_anisotropic_linear_is_valid() {
        let settings = SamplerSettings {
            max_anisotropy: 16,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_update_resource_releases_previous() {
        let first = Arc::new(1u32);
        let second = Arc::new(2u32);
        let mut slot = None;

        update_resource(&mut slot, Some(&first));
        assert_eq!(Arc::strong_count(&first), 2);

        update_resource(&mut slot, Some(&second));
        assert_eq!(Arc::strong_count(&first), 1);
        assert_eq!(Arc::strong_count(&second), 2);

        update_resource(&mut slot, Some(&second));
        assert_eq!(Arc::strong_count(&second), 2);

        update_resource(&mut slot, None);
        assert!(slot.is_none());
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[test]
    fn test_solid_texture() {
        let mock = MockRenderContext::new();
        let texture = create_solid_texture(&mock, [255; 4], "white");

        assert_eq!(texture.dimensions(), (1, 1));
        assert_eq!(texture.label(), "white");
        assert_eq!(mock.count_texture_writes(), 1);
    }
}
