//! Decoded-image loading
//!
//! Image decoding is delegated to the `image` crate. The loader is a trait so
//! the assembler can be driven from in-memory images as well as files.

use crate::error::ExportError;
use image::RgbaImage;
use std::path::Path;

/// A decoded RGBA8 bitmap
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
    /// Whether the source declared an alpha channel; without one every pixel
    /// is treated as opaque
    pub has_alpha: bool,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage, has_alpha: bool) -> Self {
        Self { pixels, has_alpha }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Source of decoded texture bitmaps
pub trait TextureLoader {
    fn load(&self, path: &Path) -> Result<DecodedImage, ExportError>;
}

/// Loads PNG and JPEG textures from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileLoader;

impl TextureLoader for ImageFileLoader {
    fn load(&self, path: &Path) -> Result<DecodedImage, ExportError> {
        let img = image::open(path).map_err(|e| ExportError::TextureLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let has_alpha = img.color().has_alpha();
        Ok(DecodedImage::new(img.to_rgba8(), has_alpha))
    }
}
