//! Mip chain generation
//!
//! Level `m` of a texture with base side length `L` is `L >> m` pixels wide.
//! The chain stops before the first level that would be smaller than 2×2 and
//! may hold at most [`MAX_MIP_LEVELS`] levels. Every level is quantized to
//! 5551 pixels.

use image::RgbaImage;
use kac_common::formats::mip_side_length;
use kac_common::{
    quantize_rgba8_5551, DomainError, FormatError, MipLevel, MAX_MIP_LEVELS,
    MIN_TEXTURE_SIDE_LENGTH,
};
use std::borrow::Cow;

use super::resample::Resampler;

/// Build the quantized mip chain of a square power-of-two bitmap
///
/// Level 0 is `base` itself; each further level is the previous level
/// downsized by `resampler`.
pub fn generate_mip_chain(
    base: &RgbaImage,
    has_alpha: bool,
    resampler: &dyn Resampler,
) -> Result<Vec<MipLevel>, FormatError> {
    let (width, height) = base.dimensions();
    if width != height {
        return Err(FormatError::MipLevelSize {
            side_length: width,
            expected: width as usize * width as usize,
            actual: width as usize * height as usize,
        });
    }
    if width < MIN_TEXTURE_SIDE_LENGTH {
        return Err(FormatError::EmptyMipChain);
    }
    if !width.is_power_of_two() {
        return Err(DomainError::SideLength(width).into());
    }

    let mut levels = vec![quantize_level(base, has_alpha)?];
    let mut previous = Cow::Borrowed(base);

    for m in 1.. {
        let side_length = mip_side_length(width, m);
        if side_length < MIN_TEXTURE_SIDE_LENGTH {
            break;
        }
        if m >= MAX_MIP_LEVELS {
            return Err(FormatError::MipOverflow {
                max: MAX_MIP_LEVELS,
            });
        }

        let bitmap = resampler.resize(&previous, side_length);
        levels.push(quantize_level(&bitmap, has_alpha)?);
        previous = Cow::Owned(bitmap);
    }

    Ok(levels)
}

/// Quantize a square bitmap to a 5551 mip level
fn quantize_level(bitmap: &RgbaImage, has_alpha: bool) -> Result<MipLevel, FormatError> {
    let pixels = bitmap
        .pixels()
        .map(|p| quantize_rgba8_5551(p.0, has_alpha))
        .collect();
    MipLevel::new(bitmap.width(), pixels)
}
