//! Texture pipeline (decoded image -> KAC texture)
//!
//! 1. Load and decode the image ([`TextureLoader`])
//! 2. Check its geometry, or resample it to a valid square in tolerant mode
//! 3. Build the 5551 mip chain ([`generate_mip_chain`])
//! 4. Hash level 0 ([`pixel_hash`])

mod hash;
mod loader;
mod mipmap;
mod resample;

pub use hash::pixel_hash;
pub use loader::{DecodedImage, ImageFileLoader, TextureLoader};
pub use mipmap::generate_mip_chain;
pub use resample::{ImageResampler, Resampler};

use kac_common::{
    side_length_to_exponent, FormatError, KacTexture, TextureMetadata, MIN_TEXTURE_SIDE_LENGTH,
};
use std::path::Path;

use crate::config::{ExportConfig, TexturePolicy};
use crate::error::ExportError;

/// Make sure `image` is a square power of two within the configured bounds
///
/// Strict mode rejects anything else; tolerant mode resamples to the nearest
/// valid square and logs the change.
pub fn fit_texture_geometry(
    image: DecodedImage,
    path: &Path,
    config: &ExportConfig,
    resampler: &dyn Resampler,
) -> Result<DecodedImage, ExportError> {
    let (width, height) = (image.width(), image.height());
    let max_side = config.max_side_length();

    let problem = if width != height {
        Some("texture is not square")
    } else if width < MIN_TEXTURE_SIDE_LENGTH || width > max_side {
        Some("texture side length is out of range")
    } else if !width.is_power_of_two() {
        Some("texture side length is not a power of two")
    } else {
        None
    };

    let Some(reason) = problem else {
        return Ok(image);
    };

    match config.texture_policy {
        TexturePolicy::Strict => Err(ExportError::InvalidTextureGeometry {
            path: path.to_path_buf(),
            width,
            height,
            reason,
        }),
        TexturePolicy::Tolerant => {
            let side = nearest_power_of_two(width.max(height))
                .clamp(MIN_TEXTURE_SIDE_LENGTH, max_side);
            tracing::warn!(
                "Resizing texture {:?} from {}x{} to {}x{} ({})",
                path,
                width,
                height,
                side,
                side,
                reason
            );
            Ok(DecodedImage::new(
                resampler.resize(&image.pixels, side),
                image.has_alpha,
            ))
        }
    }
}

/// Power of two closest to `n` (ties resolve upward)
pub fn nearest_power_of_two(n: u32) -> u32 {
    if n <= 1 {
        return 1;
    }
    let lower = 1u32 << (u32::BITS - 1 - n.leading_zeros());
    if lower == n {
        return n;
    }
    let upper = lower.saturating_mul(2);
    if n - lower < upper - n {
        lower
    } else {
        upper
    }
}

/// Build a KAC texture from a valid square bitmap
///
/// `pixel_data_offset` is where level 0 starts in the `TXPX` pixel array.
pub fn build_texture(
    image: &DecodedImage,
    pixel_data_offset: u32,
    resampler: &dyn Resampler,
) -> Result<KacTexture, ExportError> {
    let side_length_exponent =
        side_length_to_exponent(image.width()).map_err(FormatError::from)?;
    let levels = generate_mip_chain(&image.pixels, image.has_alpha, resampler)?;

    let metadata = TextureMetadata {
        side_length_exponent,
        pixel_data_offset,
        pixel_hash: pixel_hash(&levels[0]),
    };

    tracing::debug!(
        "Texture {}x{}: {} mip levels, pixel offset {}, hash {}",
        image.width(),
        image.height(),
        levels.len(),
        pixel_data_offset,
        hex::encode(metadata.pixel_hash)
    );

    Ok(KacTexture::new(metadata, levels)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(
            RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            false,
        )
    }

    fn tolerant() -> ExportConfig {
        ExportConfig {
            texture_policy: TexturePolicy::Tolerant,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn test_nearest_power_of_two() {
        assert_eq!(nearest_power_of_two(1), 1);
        assert_eq!(nearest_power_of_two(2), 2);
        assert_eq!(nearest_power_of_two(3), 4);
        assert_eq!(nearest_power_of_two(5), 4);
        assert_eq!(nearest_power_of_two(6), 8);
        assert_eq!(nearest_power_of_two(300), 256);
        assert_eq!(nearest_power_of_two(384), 512);
    }

    #[test]
    fn test_strict_accepts_valid_texture() {
        let config = ExportConfig::default();
        let fitted = fit_texture_geometry(
            image(64, 64),
            Path::new("ok.png"),
            &config,
            &ImageResampler::default(),
        )
        .unwrap();
        assert_eq!(fitted.width(), 64);
    }

    #[test]
    fn test_strict_rejects_bad_geometry() {
        let config = ExportConfig::default();
        for (w, h) in [(64, 32), (1, 1), (512, 512), (48, 48)] {
            let result = fit_texture_geometry(
                image(w, h),
                Path::new("bad.png"),
                &config,
                &ImageResampler::default(),
            );
            assert!(
                matches!(result, Err(ExportError::InvalidTextureGeometry { width, height, .. }) if width == w && height == h),
                "{}x{} should be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_strict_respects_max_side() {
        let config = ExportConfig::default().with_max_texture_side(32);
        let result = fit_texture_geometry(
            image(64, 64),
            Path::new("big.png"),
            &config,
            &ImageResampler::default(),
        );
        assert!(matches!(
            result,
            Err(ExportError::InvalidTextureGeometry { .. })
        ));
    }

    #[test]
    fn test_tolerant_resizes() {
        let resampler = ImageResampler::default();
        let cases = [((300, 200), 256), ((48, 20), 64), ((1, 1), 2), ((1024, 1024), 256)];

        for ((w, h), expected) in cases {
            let fitted =
                fit_texture_geometry(image(w, h), Path::new("t.png"), &tolerant(), &resampler)
                    .unwrap();
            assert_eq!((fitted.width(), fitted.height()), (expected, expected));
        }

        let capped = tolerant().with_max_texture_side(16);
        let fitted =
            fit_texture_geometry(image(64, 64), Path::new("t.png"), &capped, &resampler).unwrap();
        assert_eq!(fitted.width(), 16);
    }

    #[test]
    fn test_build_texture() {
        let texture = build_texture(&image(8, 8), 100, &ImageResampler::default()).unwrap();

        let meta = texture.metadata();
        assert_eq!(meta.side_length_exponent, 2);
        assert_eq!(meta.pixel_data_offset, 100);
        assert_eq!(meta.pixel_hash, pixel_hash(texture.base_level()));
        assert_eq!(texture.levels().len(), 3);
        assert!(texture.base_level().pixels().iter().all(|&p| p == 0xFFFF));
    }

    #[test]
    fn test_identical_images_hash_identically() {
        let resampler = ImageResampler::default();
        let a = build_texture(&image(4, 4), 0, &resampler).unwrap();
        let b = build_texture(&image(4, 4), 16, &resampler).unwrap();
        assert_eq!(a.metadata().pixel_hash, b.metadata().pixel_hash);
        assert_ne!(a.metadata().pixel_data_offset, b.metadata().pixel_data_offset);
    }
}
