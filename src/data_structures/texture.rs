//! Decoded textures.
//!
//! This module provides [`Texture`], an RGBA8 image decoded on the CPU and
//! shared cheaply between materials. Uploading it to the GPU is up to the
//! renderer.

use std::sync::Arc;

use image::{ImageFormat, load_from_memory, load_from_memory_with_format};

use crate::error::SceneError;

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Where the texture came from, used as a debug label.
    pub label: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows.
    pub pixels: Arc<Vec<u8>>,
}

impl Texture {
    /// Decodes an encoded image.
    ///
    /// `format` is a file extension hint such as `"png"` or `"jpg"`. When it is
    /// missing or unknown the image library guesses from the bytes.
    pub fn from_bytes(bytes: &[u8], label: &str, format: Option<&str>) -> Result<Self, SceneError> {
        let format = format.and_then(ImageFormat::from_extension);
        let img = match format {
            Some(format) => load_from_memory_with_format(bytes, format),
            None => load_from_memory(bytes),
        }
        .map_err(|source| SceneError::Decode {
            url: label.to_string(),
            source,
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            label: label.to_string(),
            width,
            height,
            pixels: Arc::new(rgba.into_raw()),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The extension of `url`, ignoring any query string.
pub fn extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').map(|(_, ext)| ext)
}
