//! Rendering Adapter: renderer-agnostic interface.
//!
//! The scene and view layers talk to three seams: a shader program with
//! name-keyed uniform setters, a mesh library of unit primitives, and a
//! texture device. `RecordingBackend` implements all three in memory so the
//! full frame pipeline runs headless; the GPU backend lives in
//! `deskscene-render-wgpu`.
//!
//! # Invariants
//! - Uniform writes are sticky: a value stays until the same name is written again.
//! - A draw uses the uniform state current at the moment `draw_mesh` is called.
//! - Unknown uniform names are ignored, never an error.

mod backend;
mod mesh;
mod recording;
mod state;

pub use backend::{
    MeshLibrary, RenderBackend, RenderError, SamplerSettings, ShaderProgram, TexelFormat,
    TextureDevice, TextureFilter, TextureHandle, TextureUpload, TextureWrap,
};
pub use mesh::{MeshData, MeshVertex};
pub use recording::{DrawRecord, RecordingBackend, TextureRecord};
pub use state::UniformState;

pub fn crate_info() -> &'static str {
    "deskscene-render v0.1.0"
}
