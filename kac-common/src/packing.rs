//! Color and texture metadata packing utilities
//!
//! Provides the small fixed-width conversions the KAC 1.0 runtime expects:
//! - u8 channel → 1/4/5-bit channel (material colors, texture pixels)
//! - RGBA 4-bit → 16-bit 4444 material color word
//! - RGBA 5/5/5/1-bit → 16-bit 5551 pixel word
//! - texture side length ↔ 3-bit exponent
//!
//! Used by both `kac-export` (asset pipeline) and any runtime reading KAC files.

// ============================================================================
// Texture Side-Length Constants
// ============================================================================

/// Smallest texture side length (and smallest mip level) in pixels
pub const MIN_TEXTURE_SIDE_LENGTH: u32 = 2;
/// Largest texture side length in pixels
pub const MAX_TEXTURE_SIDE_LENGTH: u32 = 256;
/// Largest value of the 3-bit side-length exponent
pub const MAX_SIDE_LENGTH_EXPONENT: u8 = 7;

/// Side-length codec input outside of its valid domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("side-length exponent {0} is out of range (must be 0-7)")]
    Exponent(u8),

    #[error("texture side length {0} is not a power of two in 2-256")]
    SideLength(u32),
}

// ============================================================================
// Color Quantization
// ============================================================================

/// Reduce an 8-bit channel to 1 bit (any non-zero value is set)
///
/// Only used for alpha.
#[inline]
pub const fn to_1bit(value: u8) -> u8 {
    (value != 0) as u8
}

/// Reduce an 8-bit channel to 4 bits: `floor(value / (255 / 15))`
///
/// Scales rather than shifts, so 0 maps to 0 and 255 maps to 15.
#[inline]
pub const fn to_4bit(value: u8) -> u8 {
    ((value as u32 * 15 / 255) & 0b1111) as u8
}

/// Reduce an 8-bit channel to 5 bits: `floor(value / (255 / 31))`, exact
/// in integer arithmetic (255 maps to 31)
#[inline]
pub const fn to_5bit(value: u8) -> u8 {
    ((value as u32 * 31 / 255) & 0b1_1111) as u8
}

// ============================================================================
// Color Packing
// ============================================================================

/// Pack four 4-bit channels into a 4444 word, red in the lowest nibble
#[inline]
pub const fn pack_color_4444(r: u8, g: u8, b: u8, a: u8) -> u16 {
    ((r as u16 & 0xF) << 0)
        | ((g as u16 & 0xF) << 4)
        | ((b as u16 & 0xF) << 8)
        | ((a as u16 & 0xF) << 12)
}

/// Pack 5-bit RGB and 1-bit alpha into a 5551 word
///
/// Bits [0:5) red, [5:10) green, [10:15) blue, bit 15 alpha.
#[inline]
pub const fn pack_pixel_5551(r: u8, g: u8, b: u8, a: u8) -> u16 {
    ((r as u16 & 0x1F) << 0)
        | ((g as u16 & 0x1F) << 5)
        | ((b as u16 & 0x1F) << 10)
        | ((a as u16 & 0x1) << 15)
}

/// Split a 5551 word back into `[r, g, b, a]` channel values
#[inline]
pub const fn unpack_pixel_5551(pixel: u16) -> [u8; 4] {
    [
        (pixel & 0x1F) as u8,
        ((pixel >> 5) & 0x1F) as u8,
        ((pixel >> 10) & 0x1F) as u8,
        (pixel >> 15) as u8,
    ]
}

/// Quantize an RGBA8 pixel to 5551
///
/// When the source image has no alpha channel the pixel is opaque no matter
/// what its alpha byte holds.
#[inline]
pub const fn quantize_rgba8_5551(rgba: [u8; 4], has_alpha: bool) -> u16 {
    let alpha = if has_alpha { rgba[3] } else { u8::MAX };
    pack_pixel_5551(
        to_5bit(rgba[0]),
        to_5bit(rgba[1]),
        to_5bit(rgba[2]),
        to_1bit(alpha),
    )
}

// ============================================================================
// Texture Side-Length Codec
// ============================================================================

/// Decode a 3-bit exponent into a side length: `2^(exponent + 1)`
pub fn exponent_to_side_length(exponent: u8) -> Result<u32, DomainError> {
    if exponent > MAX_SIDE_LENGTH_EXPONENT {
        return Err(DomainError::Exponent(exponent));
    }
    Ok(1u32 << (exponent + 1))
}

/// Encode a power-of-two side length in 2-256 as a 3-bit exponent
pub fn side_length_to_exponent(side_length: u32) -> Result<u8, DomainError> {
    if !is_valid_side_length(side_length) {
        return Err(DomainError::SideLength(side_length));
    }
    Ok(((side_length.trailing_zeros() - 1) & 0b111) as u8)
}

/// Whether `side_length` is a power of two in 2-256
#[inline]
pub const fn is_valid_side_length(side_length: u32) -> bool {
    side_length >= MIN_TEXTURE_SIDE_LENGTH
        && side_length <= MAX_TEXTURE_SIDE_LENGTH
        && side_length.is_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_1bit() {
        assert_eq!(to_1bit(0), 0);
        assert_eq!(to_1bit(1), 1);
        assert_eq!(to_1bit(255), 1);
    }

    #[test]
    fn test_to_4bit_range() {
        assert_eq!(to_4bit(0), 0);
        assert_eq!(to_4bit(16), 0);
        assert_eq!(to_4bit(17), 1);
        assert_eq!(to_4bit(128), 7);
        assert_eq!(to_4bit(254), 14);
        assert_eq!(to_4bit(255), 15);
    }

    #[test]
    fn test_to_5bit_range() {
        assert_eq!(to_5bit(0), 0);
        assert_eq!(to_5bit(8), 0);
        assert_eq!(to_5bit(9), 1);
        assert_eq!(to_5bit(254), 30);
        assert_eq!(to_5bit(255), 31);
    }

    #[test]
    fn test_quantizers_are_monotonic() {
        for v in 0..u8::MAX {
            assert!(to_4bit(v) <= to_4bit(v + 1));
            assert!(to_5bit(v) <= to_5bit(v + 1));
        }
    }

    #[test]
    fn test_pack_color_4444() {
        assert_eq!(pack_color_4444(0xF, 0, 0, 0), 0x000F);
        assert_eq!(pack_color_4444(0, 0, 0, 0xF), 0xF000);
        assert_eq!(pack_color_4444(1, 2, 3, 4), 0x4321);
        assert_eq!(pack_color_4444(0xF, 0xF, 0xF, 0xF), 0xFFFF);
    }

    #[test]
    fn test_pack_pixel_5551_red_opaque() {
        let packed = pack_pixel_5551(31, 0, 0, 1);
        assert_eq!(packed, 0x801F);
        assert_eq!(unpack_pixel_5551(packed), [31, 0, 0, 1]);
    }

    #[test]
    fn test_pack_pixel_5551_channels() {
        assert_eq!(pack_pixel_5551(0, 31, 0, 0), 0x03E0);
        assert_eq!(pack_pixel_5551(0, 0, 31, 0), 0x7C00);
        assert_eq!(unpack_pixel_5551(0x7FFF), [31, 31, 31, 0]);
    }

    #[test]
    fn test_quantize_rgba8_alpha_handling() {
        // Transparent pixel keeps its alpha only when the image declares one
        assert_eq!(quantize_rgba8_5551([255, 0, 0, 0], true), 0x001F);
        assert_eq!(quantize_rgba8_5551([255, 0, 0, 0], false), 0x801F);
        assert_eq!(quantize_rgba8_5551([0, 0, 0, 1], true), 0x8000);
    }

    #[test]
    fn test_side_length_codec_roundtrip() {
        for e in 0..=MAX_SIDE_LENGTH_EXPONENT {
            let side = exponent_to_side_length(e).unwrap();
            assert_eq!(side_length_to_exponent(side).unwrap(), e);
        }

        let mut side = MIN_TEXTURE_SIDE_LENGTH;
        while side <= MAX_TEXTURE_SIDE_LENGTH {
            let e = side_length_to_exponent(side).unwrap();
            assert_eq!(exponent_to_side_length(e).unwrap(), side);
            side *= 2;
        }
    }

    #[test]
    fn test_side_length_codec_bounds() {
        assert_eq!(exponent_to_side_length(0), Ok(2));
        assert_eq!(exponent_to_side_length(7), Ok(256));
        assert_eq!(exponent_to_side_length(8), Err(DomainError::Exponent(8)));

        for bad in [0, 1, 3, 48, 255, 512] {
            assert_eq!(
                side_length_to_exponent(bad),
                Err(DomainError::SideLength(bad))
            );
        }
    }
}
