//! Image decoding for scene textures.
//!
//! Images are decoded to 8 bits per channel, keeping the file's own channel
//! count (1 to 4). Callers decide which channel counts they can upload.
//!
//! # Invariants
//! - `pixels.len() == width * height * channels`.
//! - With `flip_vertically`, row 0 of `pixels` is the bottom row of the file,
//!   which is what a texture sampler with a bottom-left UV origin expects.

use std::path::Path;

/// Errors from image loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Raw 8-bit pixel data decoded from an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl DecodedImage {
    /// Bytes of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels as usize;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = x as usize * c;
        &self.row(y)[start..start + c]
    }
}

/// Decode an image file from disk.
pub fn load_image(
    path: impl AsRef<Path>,
    flip_vertically: bool,
) -> Result<DecodedImage, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode_image(&bytes, flip_vertically).map_err(|source| AssetError::Decode {
        path: path.display().to_string(),
        source,
    })
}

/// Decode an in-memory image file (format sniffed from its header).
pub fn decode_image(
    bytes: &[u8],
    flip_vertically: bool,
) -> Result<DecodedImage, image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    if flip_vertically {
        img = img.flipv();
    }
    let (width, height) = (img.width(), img.height());
    let channels = img.color().channel_count();
    let pixels = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        3 => img.into_rgb8().into_raw(),
        _ => img.into_rgba8().into_raw(),
    };
    tracing::debug!(width, height, channels, "decoded image");
    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

pub fn crate_info() -> &'static str {
    "deskscene-assets v0.1.0"
}
