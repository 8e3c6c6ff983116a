//! wgpu render backend for the desk scene.
//!
//! Implements the shader, mesh and texture seams of `deskscene-render` on a
//! single Phong pipeline. Uniform writes are recorded on the CPU and
//! snapshotted per draw; a frame is recorded between `begin_frame` and
//! `end_frame` and submitted as one render pass.
//!
//! # Invariants
//! - Every draw sees exactly the uniform values current when it was issued.
//! - A sampler value that names no bound unit samples a 1x1 white texture.
//! - Primitive meshes are uploaded at most once per kind.

mod gpu;
mod shaders;

pub use gpu::{MAX_DRAWS_PER_FRAME, WgpuBackend};

pub fn crate_info() -> &'static str {
    "deskscene-render-wgpu v0.1.0"
}
