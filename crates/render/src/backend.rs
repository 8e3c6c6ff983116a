use deskscene_common::{PrimitiveKind, Uniform, UniformValue};
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Errors a backend can report while creating GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("texture {label} is empty ({width}x{height})")]
    EmptyTexture {
        label: String,
        width: u32,
        height: u32,
    },
    #[error("texture {label} has {actual} bytes of pixel data, expected {expected}")]
    PixelDataMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },
}

/// Opaque handle to a texture owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Pixel layout of an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TexelFormat {
    Rgb8,
    Rgba8,
}

impl TexelFormat {
    /// Upload format for a decoded channel count, if it is supported.
    pub fn from_channels(channels: u8) -> Option<TexelFormat> {
        match channels {
            3 => Some(TexelFormat::Rgb8),
            4 => Some(TexelFormat::Rgba8),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TexelFormat::Rgb8 => 3,
            TexelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

/// Sampling parameters applied to an uploaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerSettings {
    pub wrap_u: TextureWrap,
    pub wrap_v: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub generate_mipmaps: bool,
}

impl SamplerSettings {
    /// Repeat in both axes, linear filtering, full mip chain.
    pub const TILED: SamplerSettings = SamplerSettings {
        wrap_u: TextureWrap::Repeat,
        wrap_v: TextureWrap::Repeat,
        min_filter: TextureFilter::Linear,
        mag_filter: TextureFilter::Linear,
        generate_mipmaps: true,
    };
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::TILED
    }
}

/// Pixel data plus parameters for one texture upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: TexelFormat,
    pub pixels: &'a [u8],
    pub sampler: SamplerSettings,
}

impl TextureUpload<'_> {
    /// Check that the pixel buffer matches the declared size and format.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyTexture {
                label: self.label.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width as usize * self.height as usize * self.format.bytes_per_pixel();
        if self.pixels.len() != expected {
            return Err(RenderError::PixelDataMismatch {
                label: self.label.to_string(),
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// A compiled shader program with name-keyed uniform setters.
///
/// Setting a name the program does not declare is silently ignored.
pub trait ShaderProgram {
    fn set_mat4_value(&mut self, name: &str, value: Mat4);
    fn set_vec4_value(&mut self, name: &str, value: Vec4);
    fn set_vec3_value(&mut self, name: &str, value: Vec3);
    fn set_vec2_value(&mut self, name: &str, value: Vec2);
    fn set_float_value(&mut self, name: &str, value: f32);
    fn set_int_value(&mut self, name: &str, value: i32);
    fn set_sampler2d_value(&mut self, name: &str, unit: i32);

    /// Write a uniform through the shared name table.
    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        let name = uniform.name();
        match value {
            UniformValue::Mat4(v) => self.set_mat4_value(&name, v),
            UniformValue::Vec4(v) => self.set_vec4_value(&name, v),
            UniformValue::Vec3(v) => self.set_vec3_value(&name, v),
            UniformValue::Vec2(v) => self.set_vec2_value(&name, v),
            UniformValue::Float(v) => self.set_float_value(&name, v),
            UniformValue::Int(v) => self.set_int_value(&name, v),
            UniformValue::Sampler2D(v) => self.set_sampler2d_value(&name, v),
        }
    }
}

/// Unit-sized primitive meshes, loaded once and drawn many times.
pub trait MeshLibrary {
    /// Make `kind` drawable. Loading the same kind twice is a no-op.
    fn load_mesh(&mut self, kind: PrimitiveKind);

    /// Draw one instance of `kind` with the current uniform state.
    fn draw_mesh(&mut self, kind: PrimitiveKind);
}

/// GPU texture storage with numbered texture units.
pub trait TextureDevice {
    fn upload_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureHandle, RenderError>;

    /// Bind `texture` to texture unit `unit`; sampler uniforms refer to units.
    fn bind_texture_unit(&mut self, unit: u32, texture: TextureHandle);

    fn delete_texture(&mut self, texture: TextureHandle);
}

/// Everything the scene and view layers need from a backend.
pub trait RenderBackend: ShaderProgram + MeshLibrary + TextureDevice {}

impl<T: ShaderProgram + MeshLibrary + TextureDevice> RenderBackend for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_and_four_channels_upload() {
        assert_eq!(TexelFormat::from_channels(3), Some(TexelFormat::Rgb8));
        assert_eq!(TexelFormat::from_channels(4), Some(TexelFormat::Rgba8));
        for channels in [0, 1, 2, 5] {
            assert_eq!(TexelFormat::from_channels(channels), None);
        }
    }

    #[test]
    fn upload_validation() {
        let pixels = [0u8; 12];
        let mut upload = TextureUpload {
            label: "wood",
            width: 2,
            height: 2,
            format: TexelFormat::Rgb8,
            pixels: &pixels,
            sampler: SamplerSettings::TILED,
        };
        assert!(upload.validate().is_ok());

        upload.format = TexelFormat::Rgba8;
        assert!(matches!(
            upload.validate(),
            Err(RenderError::PixelDataMismatch { expected: 16, actual: 12, .. })
        ));

        upload.width = 0;
        assert!(matches!(upload.validate(), Err(RenderError::EmptyTexture { .. })));
    }

    #[test]
    fn tiled_sampler_repeats_and_mipmaps() {
        let s = SamplerSettings::default();
        assert_eq!(s.wrap_u, TextureWrap::Repeat);
        assert_eq!(s.wrap_v, TextureWrap::Repeat);
        assert_eq!(s.min_filter, TextureFilter::Linear);
        assert_eq!(s.mag_filter, TextureFilter::Linear);
        assert!(s.generate_mipmaps);
    }
}
