use deskscene_common::{LIGHT_COUNT, LightField, Uniform, UniformValue};
use deskscene_render::ShaderProgram;
use glam::Vec3;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSource {
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub specular_intensity: f32,
}

/// Key light, soft fill, warm red lamp glow.
pub const SCENE_LIGHTS: [LightSource; LIGHT_COUNT] = [
    LightSource {
        ambient_color: Vec3::splat(0.2),
        diffuse_color: Vec3::splat(0.7),
        specular_color: Vec3::splat(0.9),
        specular_intensity: 0.5,
    },
    LightSource {
        ambient_color: Vec3::splat(0.05),
        diffuse_color: Vec3::splat(0.25),
        specular_color: Vec3::splat(0.3),
        specular_intensity: 0.2,
    },
    LightSource {
        ambient_color: Vec3::new(0.1, 0.05, 0.05),
        diffuse_color: Vec3::new(0.9, 0.3, 0.3),
        specular_color: Vec3::new(1.0, 0.5, 0.5),
        specular_intensity: 0.6,
    },
];

/// Static light configuration pushed once during scene preparation.
///
/// Positions are optional: when absent the shader keeps whatever it
/// already has for `lightSources[i].position`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightRig {
    pub sources: [LightSource; LIGHT_COUNT],
    pub positions: Option<[Vec3; LIGHT_COUNT]>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            sources: SCENE_LIGHTS,
            positions: None,
        }
    }
}

impl LightRig {
    pub fn with_positions(mut self, positions: [Vec3; LIGHT_COUNT]) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Write every light field and enable lighting.
    pub fn apply(&self, shader: &mut impl ShaderProgram) {
        for (i, light) in self.sources.iter().enumerate() {
            shader.set_uniform(
                Uniform::Light(i, LightField::AmbientColor),
                light.ambient_color.into(),
            );
            shader.set_uniform(
                Uniform::Light(i, LightField::DiffuseColor),
                light.diffuse_color.into(),
            );
            shader.set_uniform(
                Uniform::Light(i, LightField::SpecularColor),
                light.specular_color.into(),
            );
            shader.set_uniform(
                Uniform::Light(i, LightField::SpecularIntensity),
                light.specular_intensity.into(),
            );
        }
        if let Some(positions) = &self.positions {
            for (i, position) in positions.iter().enumerate() {
                shader.set_uniform(Uniform::Light(i, LightField::Position), (*position).into());
            }
        }
        shader.set_uniform(Uniform::UseLighting, UniformValue::Int(1));
    }
}
