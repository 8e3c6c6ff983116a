use crate::error::SceneError;
use crate::layout::{ObjectPlacement, Shading, desk_scene};
use crate::lights::LightRig;
use crate::materials::{Material, MaterialLibrary, scene_materials};
use crate::textures::{SCENE_TEXTURES, TextureRegistry};
use deskscene_common::{Trs, Uniform, UniformValue};
use deskscene_render::{
    RenderBackend, SamplerSettings, ShaderProgram, TexelFormat, TextureDevice, TextureHandle,
    TextureUpload,
};
use glam::{Vec2, Vec3, Vec4};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Loads the scene's textures, materials and lights once, then emits the
/// desk still life every frame.
#[derive(Debug)]
pub struct SceneComposer {
    texture_dir: PathBuf,
    textures: TextureRegistry,
    materials: MaterialLibrary,
    lights: LightRig,
    placements: Vec<ObjectPlacement>,
}

impl SceneComposer {
    /// Composer for the desk scene, loading textures from `texture_dir`.
    pub fn new(texture_dir: impl Into<PathBuf>) -> Self {
        Self {
            texture_dir: texture_dir.into(),
            textures: TextureRegistry::new(),
            materials: MaterialLibrary::new(),
            lights: LightRig::default(),
            placements: desk_scene(),
        }
    }

    pub fn with_lights(mut self, lights: LightRig) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_placements(mut self, placements: Vec<ObjectPlacement>) -> Self {
        self.placements = placements;
        self
    }

    pub fn texture_dir(&self) -> &Path {
        &self.texture_dir
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn placements(&self) -> &[ObjectPlacement] {
        &self.placements
    }

    /// One-shot setup: lights, textures, texture units, materials, meshes.
    ///
    /// Texture failures are logged and skipped. Returns how many textures
    /// were registered.
    pub fn prepare_scene(&mut self, backend: &mut impl RenderBackend) -> usize {
        self.setup_lights(backend);
        let loaded = self.load_scene_textures(backend);
        self.bind_textures(backend);
        self.setup_materials();

        let mut seen = BTreeSet::new();
        for placement in &self.placements {
            if seen.insert(placement.kind) {
                backend.load_mesh(placement.kind);
            }
        }
        tracing::info!(
            textures = loaded,
            materials = self.materials.len(),
            meshes = seen.len(),
            "scene prepared"
        );
        loaded
    }

    pub fn setup_lights(&self, shader: &mut impl ShaderProgram) {
        self.lights.apply(shader);
    }

    /// Rebuild the material library from the scene presets.
    pub fn setup_materials(&mut self) {
        self.materials.rebuild(scene_materials());
    }

    /// Load every scene texture from the texture directory.
    pub fn load_scene_textures(&mut self, backend: &mut impl TextureDevice) -> usize {
        let mut loaded = 0;
        for (file, tag) in SCENE_TEXTURES {
            let path = self.texture_dir.join(file);
            match self.create_texture(backend, &path, tag) {
                Ok(_) => loaded += 1,
                Err(e) => tracing::error!(path = %path.display(), tag, "could not load image: {e}"),
            }
        }
        loaded
    }

    /// Decode `path` (flipped vertically), upload it and register it as `tag`.
    ///
    /// Returns the texture's slot. Nothing is registered on failure.
    pub fn create_texture(
        &mut self,
        backend: &mut impl TextureDevice,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> Result<usize, SceneError> {
        let path = path.as_ref();
        self.textures.ensure_room(tag)?;

        let image = deskscene_assets::load_image(path, true)?;
        let Some(format) = TexelFormat::from_channels(image.channels) else {
            return Err(SceneError::UnsupportedChannels {
                path: path.display().to_string(),
                channels: image.channels,
            });
        };
        tracing::info!(
            path = %path.display(),
            width = image.width,
            height = image.height,
            channels = image.channels,
            "loaded image"
        );

        let handle = backend.upload_texture(&TextureUpload {
            label: tag,
            width: image.width,
            height: image.height,
            format,
            pixels: &image.pixels,
            sampler: SamplerSettings::TILED,
        })?;
        self.textures.register(tag, handle)
    }

    /// Bind each registered texture to the unit matching its slot.
    pub fn bind_textures(&self, backend: &mut impl TextureDevice) {
        for (slot, entry) in self.textures.entries().iter().enumerate() {
            backend.bind_texture_unit(slot as u32, entry.handle);
        }
    }

    /// Release every texture and empty the registry.
    pub fn destroy_textures(&mut self, backend: &mut impl TextureDevice) {
        let handles = self.textures.drain();
        for handle in &handles {
            backend.delete_texture(*handle);
        }
        tracing::debug!(count = handles.len(), "textures destroyed");
    }

    pub fn find_texture_id(&self, tag: &str) -> Option<TextureHandle> {
        self.textures.find_id(tag)
    }

    pub fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        self.textures.find_slot(tag)
    }

    pub fn find_material(&self, tag: &str) -> Option<&Material> {
        self.materials.find(tag)
    }

    /// Push `model = T * Rx * Ry * Rz * S`.
    pub fn set_transformations(
        shader: &mut impl ShaderProgram,
        scale: Vec3,
        x_degrees: f32,
        y_degrees: f32,
        z_degrees: f32,
        translation: Vec3,
    ) {
        let trs = Trs::new(scale, translation).with_rotation(x_degrees, y_degrees, z_degrees);
        shader.set_uniform(Uniform::Model, trs.matrix().into());
    }

    /// Solid-color mode.
    pub fn set_shader_color(shader: &mut impl ShaderProgram, color: Vec4) {
        shader.set_uniform(Uniform::UseTexture, UniformValue::Int(0));
        shader.set_uniform(Uniform::ObjectColor, color.into());
    }

    /// Textured mode. An unknown tag sends sampler slot `-1`.
    pub fn set_shader_texture(&self, shader: &mut impl ShaderProgram, tag: &str) {
        let slot = self.textures.sampler_slot(tag);
        if slot < 0 {
            tracing::warn!(tag, "texture tag not registered");
        }
        shader.set_uniform(Uniform::UseTexture, UniformValue::Int(1));
        shader.set_uniform(Uniform::ObjectTexture, UniformValue::Sampler2D(slot));
    }

    pub fn set_texture_uv_scale(shader: &mut impl ShaderProgram, u: f32, v: f32) {
        shader.set_uniform(Uniform::UvScale, Vec2::new(u, v).into());
    }

    /// Push the material block for `tag`. Unknown tags change nothing.
    pub fn set_shader_material(&self, shader: &mut impl ShaderProgram, tag: &str) {
        match self.materials.find(tag) {
            Some(material) => material.apply(shader),
            None => tracing::warn!(tag, "material tag not found"),
        }
    }

    /// Write one placement's model matrix and the shading it names.
    pub fn apply_placement(&self, shader: &mut impl ShaderProgram, placement: &ObjectPlacement) {
        shader.set_uniform(Uniform::Model, placement.transform.matrix().into());
        let Shading {
            color,
            texture,
            uv_scale,
            material,
        } = placement.shading;
        if let Some(color) = color {
            Self::set_shader_color(shader, color);
        }
        if let Some(tag) = texture {
            self.set_shader_texture(shader, tag);
        }
        if let Some(uv) = uv_scale {
            Self::set_texture_uv_scale(shader, uv.x, uv.y);
        }
        if let Some(tag) = material {
            self.set_shader_material(shader, tag);
        }
    }

    /// Draw every placement in order. Returns the number of draws issued.
    pub fn render_scene(&self, backend: &mut impl RenderBackend) -> usize {
        for placement in &self.placements {
            self.apply_placement(backend, placement);
            backend.draw_mesh(placement.kind);
        }
        tracing::debug!(draws = self.placements.len(), "scene rendered");
        self.placements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskscene_render::{RecordingBackend, UniformState};
    use glam::{Mat4, Vec4};

    fn write_texture(dir: &Path, file: &str) {
        image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]))
            .save_with_format(dir.join(file), image::ImageFormat::Jpeg)
            .unwrap();
    }

    fn texture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (file, _) in SCENE_TEXTURES {
            write_texture(dir.path(), file);
        }
        dir
    }

    #[test]
    fn set_transformations_composes_trs() {
        let mut shader = UniformState::new();
        let scale = Vec3::new(2.0, 3.0, 4.0);
        let pos = Vec3::new(1.0, -2.0, 5.0);
        SceneComposer::set_transformations(&mut shader, scale, 0.0, 0.0, 0.0, pos);
        let model = shader.mat4(Uniform::Model).unwrap();
        assert!(model.abs_diff_eq(Mat4::from_translation(pos) * Mat4::from_scale(scale), 1e-6));
        assert_eq!(model * Vec4::W, pos.extend(1.0));
    }

    #[test]
    fn color_mode_disables_texture() {
        let mut shader = UniformState::new();
        SceneComposer::set_shader_color(&mut shader, Vec4::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(shader.flag(Uniform::UseTexture), Some(false));
        assert_eq!(shader.vec4(Uniform::ObjectColor), Some(Vec4::new(1.0, 0.0, 0.0, 0.5)));
    }

    #[test]
    fn missing_texture_sends_minus_one() {
        let composer = SceneComposer::new("unused");
        let mut shader = UniformState::new();
        composer.set_shader_texture(&mut shader, "nonexistent");
        assert_eq!(shader.flag(Uniform::UseTexture), Some(true));
        assert_eq!(shader.get_uniform(Uniform::ObjectTexture), Some(UniformValue::Sampler2D(-1)));
    }

    #[test]
    fn material_miss_leaves_uniforms_untouched() {
        let mut composer = SceneComposer::new("unused");
        let mut shader = UniformState::new();
        composer.set_shader_material(&mut shader, "gold");
        assert!(shader.is_empty());

        composer.setup_materials();
        composer.set_shader_material(&mut shader, "gold");
        let before = shader.clone();
        composer.set_shader_material(&mut shader, "unobtainium");
        assert_eq!(shader, before);
        assert_eq!(shader.float(Uniform::MaterialShininess), Some(64.0));
    }

    #[test]
    fn create_texture_registers_in_order() {
        let dir = texture_dir();
        let mut composer = SceneComposer::new(dir.path());
        let mut backend = RecordingBackend::new();
        assert_eq!(composer.load_scene_textures(&mut backend), 5);
        for (slot, (_, tag)) in SCENE_TEXTURES.iter().enumerate() {
            assert_eq!(composer.find_texture_slot(tag), Some(slot));
            let id = composer.find_texture_id(tag).unwrap();
            let record = backend.texture(id).unwrap();
            assert_eq!(record.label, *tag);
            assert_eq!(record.format, TexelFormat::Rgb8);
            assert_eq!(record.sampler, SamplerSettings::TILED);
        }
    }

    #[test]
    fn unsupported_channels_are_not_registered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(2, 2, image::Luma([7])).save(&path).unwrap();

        let mut composer = SceneComposer::new(dir.path());
        let mut backend = RecordingBackend::new();
        let err = composer.create_texture(&mut backend, &path, "gray").unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedChannels { channels: 1, .. }));
        assert!(composer.textures().is_empty());
        assert!(backend.textures().is_empty());
    }

    #[test]
    fn missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_texture(dir.path(), "wood_cherry_seamless.jpg");
        let mut composer = SceneComposer::new(dir.path());
        let mut backend = RecordingBackend::new();
        assert_eq!(composer.load_scene_textures(&mut backend), 1);
        assert_eq!(composer.find_texture_slot("wood"), Some(0));
        assert_eq!(composer.find_texture_slot("stainless"), None);
    }

    #[test]
    fn duplicate_tag_is_rejected_before_upload() {
        let dir = texture_dir();
        let mut composer = SceneComposer::new(dir.path());
        let mut backend = RecordingBackend::new();
        let path = dir.path().join("stainless.jpg");
        composer.create_texture(&mut backend, &path, "stainless").unwrap();
        let err = composer.create_texture(&mut backend, &path, "stainless").unwrap_err();
        assert!(matches!(err, SceneError::DuplicateTag(_)));
        assert_eq!(backend.textures().len(), 1);
    }

    #[test]
    fn bind_and_destroy_textures() {
        let dir = texture_dir();
        let mut composer = SceneComposer::new(dir.path());
        let mut backend = RecordingBackend::new();
        composer.load_scene_textures(&mut backend);
        composer.bind_textures(&mut backend);
        for slot in 0..5u32 {
            let tag = SCENE_TEXTURES[slot as usize].1;
            assert_eq!(backend.bound_unit(slot), composer.find_texture_id(tag));
        }

        composer.destroy_textures(&mut backend);
        assert!(composer.textures().is_empty());
        assert!(backend.textures().is_empty());
        assert_eq!(backend.bound_unit(0), None);
    }

    #[test]
    fn solid_placement_uses_color_mode() {
        let composer = SceneComposer::new("unused");
        let mut shader = UniformState::new();
        let placement = ObjectPlacement {
            name: "marker",
            kind: deskscene_common::PrimitiveKind::Sphere,
            transform: Trs::default(),
            shading: Shading::solid(Vec4::new(0.0, 1.0, 0.0, 1.0)),
        };
        composer.apply_placement(&mut shader, &placement);
        assert_eq!(shader.flag(Uniform::UseTexture), Some(false));
        assert_eq!(shader.mat4(Uniform::Model), Some(Mat4::IDENTITY));
    }
}
