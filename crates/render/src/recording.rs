use crate::backend::{
    MeshLibrary, RenderError, SamplerSettings, ShaderProgram, TexelFormat, TextureDevice,
    TextureHandle, TextureUpload,
};
use crate::state::UniformState;
use deskscene_common::{PrimitiveKind, Uniform};
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// One draw call as the backend saw it.
#[derive(Debug, Clone, Serialize)]
pub struct DrawRecord {
    pub kind: PrimitiveKind,
    /// Full uniform state at the moment of the draw.
    pub uniforms: UniformState,
    /// Texture bound to each unit at the moment of the draw.
    pub units: BTreeMap<u32, TextureHandle>,
}

impl DrawRecord {
    pub fn model(&self) -> Option<Mat4> {
        self.uniforms.mat4(Uniform::Model)
    }

    pub fn uses_texture(&self) -> bool {
        self.uniforms.flag(Uniform::UseTexture).unwrap_or(false)
    }

    /// Texture the sampler uniform points at, if any.
    pub fn sampled_texture(&self) -> Option<TextureHandle> {
        let unit = self.uniforms.int(Uniform::ObjectTexture)?;
        u32::try_from(unit).ok().and_then(|u| self.units.get(&u).copied())
    }
}

/// A texture held by the recording backend.
#[derive(Debug, Clone, Serialize)]
pub struct TextureRecord {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TexelFormat,
    pub sampler: SamplerSettings,
}

/// In-memory backend that records uniform writes, texture traffic and draws.
///
/// Used by the CLI frame dump and by every headless test of the frame
/// pipeline.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    uniforms: UniformState,
    loaded: BTreeSet<PrimitiveKind>,
    textures: BTreeMap<TextureHandle, TextureRecord>,
    units: BTreeMap<u32, TextureHandle>,
    draws: Vec<DrawRecord>,
    next_texture: u32,
    uniform_writes: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            next_texture: 1,
            ..Self::default()
        }
    }

    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Hand back the draws recorded so far and start a fresh frame.
    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }

    pub fn loaded_meshes(&self) -> &BTreeSet<PrimitiveKind> {
        &self.loaded
    }

    pub fn textures(&self) -> &BTreeMap<TextureHandle, TextureRecord> {
        &self.textures
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureRecord> {
        self.textures.get(&handle)
    }

    pub fn bound_unit(&self, unit: u32) -> Option<TextureHandle> {
        self.units.get(&unit).copied()
    }

    /// Number of setter calls that named a declared uniform.
    pub fn uniform_writes(&self) -> usize {
        self.uniform_writes
    }

    /// Human-readable dump of the recorded frame.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (draws={}, textures={}, meshes={}) ===",
            self.draws.len(),
            self.textures.len(),
            self.loaded.len()
        );
        if let Some(eye) = self.uniforms.vec3(Uniform::ViewPosition) {
            let _ = writeln!(out, "Camera: eye=({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z);
        }
        for (i, draw) in self.draws.iter().enumerate() {
            let p = draw.model().map(|m| m.w_axis.truncate()).unwrap_or(Vec3::ZERO);
            let texture = match draw.sampled_texture().and_then(|h| self.textures.get(&h)) {
                Some(t) if draw.uses_texture() => t.label.as_str(),
                _ => "-",
            };
            let _ = writeln!(
                out,
                "  [{i:02}] {:<16} pos=({:.3}, {:.3}, {:.3}) texture={texture}",
                draw.kind.name(),
                p.x,
                p.y,
                p.z
            );
        }
        out
    }

    fn record_write(&mut self, accepted: bool) {
        if accepted {
            self.uniform_writes += 1;
        }
    }
}

impl ShaderProgram for RecordingBackend {
    fn set_mat4_value(&mut self, name: &str, value: Mat4) {
        let ok = self.uniforms.set(name, value.into());
        self.record_write(ok);
    }

    fn set_vec4_value(&mut self, name: &str, value: Vec4) {
        let ok = self.uniforms.set(name, value.into());
        self.record_write(ok);
    }

    fn set_vec3_value(&mut self, name: &str, value: Vec3) {
        let ok = self.uniforms.set(name, value.into());
        self.record_write(ok);
    }

    fn set_vec2_value(&mut self, name: &str, value: Vec2) {
        let ok = self.uniforms.set(name, value.into());
        self.record_write(ok);
    }

    fn set_float_value(&mut self, name: &str, value: f32) {
        let ok = self.uniforms.set(name, value.into());
        self.record_write(ok);
    }

    fn set_int_value(&mut self, name: &str, value: i32) {
        let ok = self.uniforms.set(name, value.into());
        self.record_write(ok);
    }

    fn set_sampler2d_value(&mut self, name: &str, unit: i32) {
        let ok = self
            .uniforms
            .set(name, deskscene_common::UniformValue::Sampler2D(unit));
        self.record_write(ok);
    }
}

impl MeshLibrary for RecordingBackend {
    fn load_mesh(&mut self, kind: PrimitiveKind) {
        if self.loaded.insert(kind) {
            tracing::debug!(%kind, "mesh loaded");
        }
    }

    fn draw_mesh(&mut self, kind: PrimitiveKind) {
        if !self.loaded.contains(&kind) {
            tracing::warn!(%kind, "draw of unloaded mesh skipped");
            return;
        }
        self.draws.push(DrawRecord {
            kind,
            uniforms: self.uniforms.clone(),
            units: self.units.clone(),
        });
    }
}

impl TextureDevice for RecordingBackend {
    fn upload_texture(&mut self, upload: &TextureUpload<'_>) -> Result<TextureHandle, RenderError> {
        upload.validate()?;
        let handle = TextureHandle(self.next_texture.max(1));
        self.next_texture = handle.0 + 1;
        self.textures.insert(
            handle,
            TextureRecord {
                label: upload.label.to_string(),
                width: upload.width,
                height: upload.height,
                format: upload.format,
                sampler: upload.sampler,
            },
        );
        Ok(handle)
    }

    fn bind_texture_unit(&mut self, unit: u32, texture: TextureHandle) {
        self.units.insert(unit, texture);
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            self.units.retain(|_, bound| *bound != texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(backend: &mut RecordingBackend, label: &str) -> TextureHandle {
        let pixels = [0u8; 4 * 3];
        backend
            .upload_texture(&TextureUpload {
                label,
                width: 2,
                height: 2,
                format: TexelFormat::Rgb8,
                pixels: &pixels,
                sampler: SamplerSettings::TILED,
            })
            .unwrap()
    }

    #[test]
    fn draw_snapshots_current_uniforms() {
        let mut backend = RecordingBackend::new();
        backend.load_mesh(PrimitiveKind::Box);
        backend.set_mat4_value("model", Mat4::from_translation(Vec3::X));
        backend.draw_mesh(PrimitiveKind::Box);
        backend.set_mat4_value("model", Mat4::from_translation(Vec3::Y));
        backend.draw_mesh(PrimitiveKind::Box);

        let draws = backend.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].model().unwrap().w_axis.truncate(), Vec3::X);
        assert_eq!(draws[1].model().unwrap().w_axis.truncate(), Vec3::Y);
    }

    #[test]
    fn unloaded_mesh_is_not_drawn() {
        let mut backend = RecordingBackend::new();
        backend.draw_mesh(PrimitiveKind::Sphere);
        assert!(backend.draws().is_empty());
        backend.load_mesh(PrimitiveKind::Sphere);
        backend.load_mesh(PrimitiveKind::Sphere);
        assert_eq!(backend.loaded_meshes().len(), 1);
    }

    #[test]
    fn handles_are_nonzero_and_unique() {
        let mut backend = RecordingBackend::new();
        let a = upload(&mut backend, "wood");
        let b = upload(&mut backend, "gold");
        assert_ne!(a, b);
        assert!(a.0 > 0 && b.0 > 0);
        assert_eq!(backend.texture(b).unwrap().label, "gold");
    }

    #[test]
    fn delete_unbinds_units() {
        let mut backend = RecordingBackend::new();
        let a = upload(&mut backend, "wood");
        backend.bind_texture_unit(0, a);
        assert_eq!(backend.bound_unit(0), Some(a));
        backend.delete_texture(a);
        assert_eq!(backend.bound_unit(0), None);
        assert!(backend.textures().is_empty());
    }

    #[test]
    fn sampled_texture_follows_unit_binding() {
        let mut backend = RecordingBackend::new();
        let wood = upload(&mut backend, "wood");
        let gold = upload(&mut backend, "gold");
        backend.bind_texture_unit(0, wood);
        backend.bind_texture_unit(1, gold);
        backend.load_mesh(PrimitiveKind::Plane);
        backend.set_int_value("bUseTexture", 1);
        backend.set_sampler2d_value("objectTexture", 1);
        backend.draw_mesh(PrimitiveKind::Plane);

        let draw = &backend.draws()[0];
        assert!(draw.uses_texture());
        assert_eq!(draw.sampled_texture(), Some(gold));
        assert!(backend.describe().contains("texture=gold"));
    }

    #[test]
    fn undeclared_writes_are_not_counted() {
        let mut backend = RecordingBackend::new();
        backend.set_float_value("material.shininess", 8.0);
        backend.set_float_value("material.roughness", 8.0);
        assert_eq!(backend.uniform_writes(), 1);
    }
}
