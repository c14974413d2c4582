//! Test lights consumed by [`DefaultMaterial`](crate::DefaultMaterial).
//!
//! Both structs are copied verbatim into the pixel shader's constant block, so
//! their layout must match the WGSL structs in `shaders/default_pixel.wgsl`
//! (a `vec3` is padded to 16 bytes at the end of a struct).

use glam::Vec3;
use static_assertions::const_assert_eq;

use crate::Color;

/// A light shining uniformly along one direction.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLight {
    pub ambient_color: [f32; 4],
    pub diffuse_color: [f32; 4],
    pub direction: [f32; 3],
    pub _padding: f32,
}

const_assert_eq!(std::mem::size_of::<DirectionalLight>(), 48);

impl DirectionalLight {
    pub fn new(ambient: Color, diffuse: Color, direction: Vec3) -> Self {
        Self {
            ambient_color: ambient.to_array(),
            diffuse_color: diffuse.to_array(),
            direction: direction.normalize_or_zero().to_array(),
            _padding: 0.0,
        }
    }
}

/// A light radiating from a point.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLight {
    pub diffuse_color: [f32; 4],
    pub position: [f32; 3],
    pub _padding: f32,
}

const_assert_eq!(std::mem::size_of::<PointLight>(), 32);

impl PointLight {
    pub fn new(diffuse: Color, position: Vec3) -> Self {
        Self {
            diffuse_color: diffuse.to_array(),
            position: position.to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_light_normalizes_direction() {
        let light = DirectionalLight::new(Color::BLACK, Color::WHITE, Vec3::new(0.0, -4.0, 0.0));
        assert_eq!(light.direction, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_point_light_bytes() {
        let light = PointLight::new(Color::RED, Vec3::new(1.0, 2.0, 3.0));
        let bytes = bytemuck::bytes_of(&light);

        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[16..20], &1.0f32.to_ne_bytes());
    }
}
