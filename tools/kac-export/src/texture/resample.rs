//! Image resampling
//!
//! Downsizing for mip levels and tolerant-mode fixups is delegated to
//! `image::imageops`.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::config::ResizeFilter;

/// Resizes a bitmap to a square of the given side length
pub trait Resampler {
    fn resize(&self, image: &RgbaImage, side_length: u32) -> RgbaImage;
}

/// [`Resampler`] backed by `image::imageops::resize`
#[derive(Debug, Clone, Copy)]
pub struct ImageResampler {
    filter: FilterType,
}

impl ImageResampler {
    pub fn new(filter: ResizeFilter) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

impl Default for ImageResampler {
    fn default() -> Self {
        Self::new(ResizeFilter::default())
    }
}

impl Resampler for ImageResampler {
    fn resize(&self, image: &RgbaImage, side_length: u32) -> RgbaImage {
        imageops::resize(image, side_length, side_length, self.filter)
    }
}
