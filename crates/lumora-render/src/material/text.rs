use lumora_core::Config;
use lumora_test_utils::RenderContext;

use super::{FrameContext, Material, MaterialError, MaterialShaders, ObjectId};
use crate::color::Color;

pub const TEXT_VERTEX_SHADER: &str = "shaders/text_vertex.wgsl";
pub const TEXT_PIXEL_SHADER: &str = "shaders/text_pixel.wgsl";

/// Unlit material that tints glyphs with a single color.
#[derive(Debug, Clone)]
pub struct TextMaterial {
    shaders: MaterialShaders,
    text_color: Color,
}

impl TextMaterial {
    pub fn new(
        gpu: &dyn RenderContext,
        config: &Config,
        owner: ObjectId,
    ) -> Result<Self, MaterialError> {
        let shaders = MaterialShaders::load(
            gpu,
            owner,
            config.resolve(TEXT_VERTEX_SHADER),
            config.resolve(TEXT_PIXEL_SHADER),
        )?;
        Ok(Self {
            shaders,
            text_color: Color::WHITE,
        })
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }
}

impl Material for TextMaterial {
    fn shaders(&self) -> &MaterialShaders {
        &self.shaders
    }

    fn shaders_mut(&mut self) -> &mut MaterialShaders {
        &mut self.shaders
    }

    // TODO: bind the camera once text is drawn in world space rather than screen space.
    fn bind_parameters(&mut self, _frame: &FrameContext<'_>) -> Result<(), MaterialError> {
        self.shaders
            .pixel_shader_mut()
            .set_float4("TextColor", self.text_color)?;
        Ok(())
    }
}
