//! Scene composition for the desk still life.
//!
//! `SceneComposer` prepares resources once (lights, textures, texture units,
//! materials, meshes) and then issues the same 25 draws every frame: ground
//! plane, desk, articulated lamp, laptop, mug and three books. The lamp's
//! joints come from forward kinematics in `kinematics`.
//!
//! # Invariants
//! - A texture's registry slot equals the texture unit it is bound to.
//! - At most `MAX_TEXTURES` textures are registered; tags are unique.
//! - Shading uniforms are sticky across draws; each placement writes only
//!   the fields it names.
//! - Rendering a frame never fails. Missing textures sample unit `-1` and
//!   missing materials leave the previous material in place.

pub mod composer;
pub mod error;
pub mod kinematics;
pub mod layout;
pub mod lights;
pub mod materials;
pub mod textures;

pub use composer::SceneComposer;
pub use error::SceneError;
pub use kinematics::{LampPose, LampRig, Segment};
pub use layout::{ObjectPlacement, Shading, desk_scene, desk_scene_with_lamp};
pub use lights::{LightRig, LightSource, SCENE_LIGHTS};
pub use materials::{Material, MaterialLibrary, scene_materials};
pub use textures::{MAX_TEXTURES, SCENE_TEXTURES, TextureEntry, TextureRegistry};

pub fn crate_info() -> &'static str {
    "deskscene-scene v0.1.0"
}
