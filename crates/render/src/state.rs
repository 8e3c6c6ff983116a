use crate::backend::ShaderProgram;
use deskscene_common::{Uniform, UniformValue};
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::Serialize;
use std::collections::BTreeMap;

/// Current value of every uniform written so far, keyed by shader name.
///
/// Only names in the uniform table are stored; anything else is dropped the
/// way a GL program ignores a uniform location of -1.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UniformState {
    values: BTreeMap<String, UniformValue>,
}

impl UniformState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`. Returns false if the name is not a known uniform.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        if Uniform::parse(name).is_none() {
            tracing::debug!(name, "ignoring write to undeclared uniform");
            return false;
        }
        self.values.insert(name.to_string(), value);
        true
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    pub fn get_uniform(&self, uniform: Uniform) -> Option<UniformValue> {
        self.get(&uniform.name())
    }

    pub fn mat4(&self, uniform: Uniform) -> Option<Mat4> {
        match self.get_uniform(uniform)? {
            UniformValue::Mat4(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec4(&self, uniform: Uniform) -> Option<Vec4> {
        match self.get_uniform(uniform)? {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec3(&self, uniform: Uniform) -> Option<Vec3> {
        match self.get_uniform(uniform)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2(&self, uniform: Uniform) -> Option<Vec2> {
        match self.get_uniform(uniform)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn float(&self, uniform: Uniform) -> Option<f32> {
        match self.get_uniform(uniform)? {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value; sampler uniforms read back as their unit index.
    pub fn int(&self, uniform: Uniform) -> Option<i32> {
        match self.get_uniform(uniform)? {
            UniformValue::Int(v) | UniformValue::Sampler2D(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean flag stored as an int, e.g. `bUseTexture`.
    pub fn flag(&self, uniform: Uniform) -> Option<bool> {
        self.int(uniform).map(|v| v != 0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl ShaderProgram for UniformState {
    fn set_mat4_value(&mut self, name: &str, value: Mat4) {
        self.set(name, UniformValue::Mat4(value));
    }

    fn set_vec4_value(&mut self, name: &str, value: Vec4) {
        self.set(name, UniformValue::Vec4(value));
    }

    fn set_vec3_value(&mut self, name: &str, value: Vec3) {
        self.set(name, UniformValue::Vec3(value));
    }

    fn set_vec2_value(&mut self, name: &str, value: Vec2) {
        self.set(name, UniformValue::Vec2(value));
    }

    fn set_float_value(&mut self, name: &str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    fn set_int_value(&mut self, name: &str, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    fn set_sampler2d_value(&mut self, name: &str, unit: i32) {
        self.set(name, UniformValue::Sampler2D(unit));
    }
}
