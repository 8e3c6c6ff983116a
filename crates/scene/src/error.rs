use deskscene_assets::AssetError;
use deskscene_render::RenderError;

/// Errors from loading scene resources. Per-frame drawing never fails.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Image(#[from] AssetError),
    #[error("image {path} has {channels} channels, only 3 or 4 are supported")]
    UnsupportedChannels { path: String, channels: u8 },
    #[error("texture registry is full ({capacity} entries)")]
    RegistryFull { capacity: usize },
    #[error("texture tag {0:?} is already registered")]
    DuplicateTag(String),
    #[error("render backend rejected texture: {0}")]
    Backend(#[from] RenderError),
}
