use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Number of light slots the shader program declares.
pub const LIGHT_COUNT: usize = 3;

/// A field of one `lightSources[i]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LightField {
    Position,
    AmbientColor,
    DiffuseColor,
    SpecularColor,
    SpecularIntensity,
}

impl LightField {
    pub const ALL: [LightField; 5] = [
        LightField::Position,
        LightField::AmbientColor,
        LightField::DiffuseColor,
        LightField::SpecularColor,
        LightField::SpecularIntensity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LightField::Position => "position",
            LightField::AmbientColor => "ambientColor",
            LightField::DiffuseColor => "diffuseColor",
            LightField::SpecularColor => "specularColor",
            LightField::SpecularIntensity => "specularIntensity",
        }
    }
}

/// Every uniform the scene writes. Names are bit-exact with the shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Uniform {
    Model,
    View,
    Projection,
    ViewPosition,
    ObjectColor,
    ObjectTexture,
    UseTexture,
    UseLighting,
    UvScale,
    MaterialAmbientColor,
    MaterialAmbientStrength,
    MaterialDiffuseColor,
    MaterialSpecularColor,
    MaterialShininess,
    Light(usize, LightField),
}

const NAME_TABLE: [(Uniform, &str); 14] = [
    (Uniform::Model, "model"),
    (Uniform::View, "view"),
    (Uniform::Projection, "projection"),
    (Uniform::ViewPosition, "viewPosition"),
    (Uniform::ObjectColor, "objectColor"),
    (Uniform::ObjectTexture, "objectTexture"),
    (Uniform::UseTexture, "bUseTexture"),
    (Uniform::UseLighting, "bUseLighting"),
    (Uniform::UvScale, "UVscale"),
    (Uniform::MaterialAmbientColor, "material.ambientColor"),
    (Uniform::MaterialAmbientStrength, "material.ambientStrength"),
    (Uniform::MaterialDiffuseColor, "material.diffuseColor"),
    (Uniform::MaterialSpecularColor, "material.specularColor"),
    (Uniform::MaterialShininess, "material.shininess"),
];

impl Uniform {
    /// Shader-side name of this uniform.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Uniform::Light(index, field) => {
                Cow::Owned(format!("lightSources[{index}].{}", field.name()))
            }
            other => NAME_TABLE
                .iter()
                .find(|(u, _)| u == other)
                .map(|(_, name)| Cow::Borrowed(*name))
                .unwrap_or(Cow::Borrowed("")),
        }
    }

    /// Resolve a shader-side name back to its uniform. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Uniform> {
        if let Some((_, u)) = NAME_TABLE.iter().map(|(u, n)| (*n, *u)).find(|(n, _)| *n == name) {
            return Some(u);
        }
        let rest = name.strip_prefix("lightSources[")?;
        let (index, field) = rest.split_once("].")?;
        let index: usize = index.parse().ok()?;
        if index >= LIGHT_COUNT {
            return None;
        }
        let field = LightField::ALL.into_iter().find(|f| f.name() == field)?;
        Some(Uniform::Light(index, field))
    }
}

impl std::fmt::Display for Uniform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// A value written to a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UniformValue {
    Mat4(Mat4),
    Vec4(Vec4),
    Vec3(Vec3),
    Vec2(Vec2),
    Float(f32),
    Int(i32),
    Sampler2D(i32),
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for UniformValue {
            fn from(v: $ty) -> Self {
                UniformValue::$variant(v)
            }
        })*
    };
}

impl_from_value!(Mat4 => Mat4, Vec4 => Vec4, Vec3 => Vec3, Vec2 => Vec2, f32 => Float, i32 => Int);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_bit_exact() {
        assert_eq!(Uniform::Model.name(), "model");
        assert_eq!(Uniform::UseTexture.name(), "bUseTexture");
        assert_eq!(Uniform::UvScale.name(), "UVscale");
        assert_eq!(Uniform::MaterialShininess.name(), "material.shininess");
        assert_eq!(
            Uniform::Light(2, LightField::SpecularIntensity).name(),
            "lightSources[2].specularIntensity"
        );
    }

    #[test]
    fn parse_round_trips_every_name() {
        for (u, name) in NAME_TABLE {
            assert_eq!(Uniform::parse(name), Some(u));
        }
        for i in 0..LIGHT_COUNT {
            for field in LightField::ALL {
                let u = Uniform::Light(i, field);
                assert_eq!(Uniform::parse(&u.name()), Some(u));
            }
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(Uniform::parse("modelView"), None);
        assert_eq!(Uniform::parse("lightSources[3].ambientColor"), None);
        assert_eq!(Uniform::parse("lightSources[0].color"), None);
        assert_eq!(Uniform::parse("lightSources[x].position"), None);
    }

    #[test]
    fn plain_ints_are_not_samplers() {
        assert_eq!(UniformValue::from(2i32), UniformValue::Int(2));
        assert_eq!(UniformValue::from(0.5f32), UniformValue::Float(0.5));
    }
}
