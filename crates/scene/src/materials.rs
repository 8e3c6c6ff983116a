use deskscene_common::Uniform;
use deskscene_render::ShaderProgram;
use glam::Vec3;
use serde::Serialize;

/// Phong material preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub tag: String,
    pub ambient_strength: f32,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    /// Phong exponent.
    pub shininess: f32,
}

impl Material {
    pub fn new(
        tag: &str,
        ambient_strength: f32,
        ambient: f32,
        diffuse: f32,
        specular: f32,
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            ambient_strength,
            ambient_color: Vec3::splat(ambient),
            diffuse_color: Vec3::splat(diffuse),
            specular_color: Vec3::splat(specular),
            shininess,
        }
    }

    /// Write the `material.*` uniform block.
    pub fn apply(&self, shader: &mut impl ShaderProgram) {
        shader.set_uniform(Uniform::MaterialAmbientColor, self.ambient_color.into());
        shader.set_uniform(Uniform::MaterialAmbientStrength, self.ambient_strength.into());
        shader.set_uniform(Uniform::MaterialDiffuseColor, self.diffuse_color.into());
        shader.set_uniform(Uniform::MaterialSpecularColor, self.specular_color.into());
        shader.set_uniform(Uniform::MaterialShininess, self.shininess.into());
    }
}

/// The five presets the desk scene uses, in library order.
pub fn scene_materials() -> Vec<Material> {
    vec![
        Material::new("steel", 0.2, 0.2, 0.7, 1.0, 64.0),
        Material::new("plastic", 0.1, 0.1, 0.5, 0.3, 8.0),
        Material::new("darkplastic", 0.1, 0.05, 0.2, 0.2, 4.0),
        Material::new("gold", 0.25, 0.3, 0.6, 1.0, 64.0),
        Material::new("burntsand", 0.1, 0.2, 0.45, 0.2, 8.0),
    ]
}

/// Ordered material presets with linear lookup by tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry. A later duplicate of a tag is dropped.
    pub fn rebuild(&mut self, materials: impl IntoIterator<Item = Material>) {
        self.materials.clear();
        for material in materials {
            if self.find(&material.tag).is_some() {
                tracing::warn!(tag = %material.tag, "duplicate material tag ignored");
                continue;
            }
            self.materials.push(material);
        }
    }

    pub fn find(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskscene_render::UniformState;

    fn library() -> MaterialLibrary {
        let mut lib = MaterialLibrary::new();
        lib.rebuild(scene_materials());
        lib
    }

    #[test]
    fn gold_preset() {
        let lib = library();
        let gold = lib.find("gold").unwrap();
        assert_eq!(gold.shininess, 64.0);
        assert_eq!(gold.specular_color, Vec3::ONE);
        assert_eq!(gold.ambient_strength, 0.25);
    }

    #[test]
    fn library_order_and_size() {
        let lib = library();
        let tags: Vec<&str> = lib.iter().map(|m| m.tag.as_str()).collect();
        assert_eq!(tags, ["steel", "plastic", "darkplastic", "gold", "burntsand"]);
    }

    #[test]
    fn rebuild_clears_previous_entries() {
        let mut lib = library();
        lib.rebuild([Material::new("only", 1.0, 1.0, 1.0, 1.0, 2.0)]);
        assert_eq!(lib.len(), 1);
        assert!(lib.find("gold").is_none());
    }

    #[test]
    fn duplicate_tags_keep_first() {
        let mut lib = MaterialLibrary::new();
        lib.rebuild([
            Material::new("x", 0.1, 0.1, 0.1, 0.1, 1.0),
            Material::new("x", 0.9, 0.9, 0.9, 0.9, 9.0),
        ]);
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.find("x").unwrap().shininess, 1.0);
    }

    #[test]
    fn apply_writes_material_block() {
        let mut shader = UniformState::new();
        library().find("darkplastic").unwrap().apply(&mut shader);
        assert_eq!(shader.len(), 5);
        assert_eq!(shader.float(Uniform::MaterialShininess), Some(4.0));
        assert_eq!(shader.vec3(Uniform::MaterialAmbientColor), Some(Vec3::splat(0.05)));
        assert_eq!(shader.float(Uniform::MaterialAmbientStrength), Some(0.1));
    }
}
