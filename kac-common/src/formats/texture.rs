//! KAC texture records (`TXMD`, `TXPX`, and draft `TXTR` payloads)
//!
//! Textures are square, power-of-two, 2-256 pixels per side, stored as 16-bit
//! 5551 pixels. Every texture carries its mip chain: level `m` is
//! `side >> m` pixels wide, down to (and including) 2×2.
//!
//! # Layout (KAC 1.0 `TXMD` entry)
//! ```text
//! 0x00: metadata u32  ([0:3) side length exponent, [3:28) pixel data offset)
//! 0x04: pixel_hash [u8; 16]
//! ```
//!
//! # Layout (KAC 1.0 draft `TXTR` entry)
//! ```text
//! 0x00: side_length u32 (low 16 bits)
//! 0x04: pixel_hash [u8; 16]
//! 0x14: pixels u16 × (sum of all mip level areas), level 0 first
//! ```

use super::FormatError;
use crate::packing::{MIN_TEXTURE_SIDE_LENGTH, exponent_to_side_length};

/// Upper bound on the mip chain length of a texture
pub const MAX_MIP_LEVELS: usize = 8;

/// Size of the stored pixel hash in bytes (first 128 bits of a SHA-256)
pub const PIXEL_HASH_SIZE: usize = 16;

/// Largest pixel offset the 25-bit `TXMD` field can hold
pub const MAX_PIXEL_DATA_OFFSET: u32 = (1 << 25) - 1;

/// Side length of mip level `level` for a base side length, before bounds checks
#[inline]
pub const fn mip_side_length(base_side_length: u32, level: usize) -> u32 {
    if level >= u32::BITS as usize {
        0
    } else {
        base_side_length >> level
    }
}

/// Per-texture metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureMetadata {
    /// Level-0 side length as `2^(exponent + 1)`
    pub side_length_exponent: u8,
    /// Offset of level 0 in the `TXPX` pixel array, in pixels
    pub pixel_data_offset: u32,
    /// Truncated content hash of level 0
    pub pixel_hash: [u8; PIXEL_HASH_SIZE],
}

impl TextureMetadata {
    /// Size of a `TXMD` entry
    pub const SIZE: usize = 4 + PIXEL_HASH_SIZE;

    /// Level-0 side length in pixels
    pub fn side_length(&self) -> Result<u32, FormatError> {
        Ok(exponent_to_side_length(self.side_length_exponent)?)
    }

    /// Canonical 32-bit metadata word
    pub fn packed(&self) -> Result<u32, FormatError> {
        // Validates the exponent
        self.side_length()?;

        if self.pixel_data_offset > MAX_PIXEL_DATA_OFFSET {
            return Err(FormatError::PixelOffsetOverflow {
                offset: self.pixel_data_offset,
            });
        }

        Ok(u32::from(self.side_length_exponent & 0b111) | (self.pixel_data_offset << 3))
    }

    /// Serialize as a `TXMD` entry
    pub fn to_bytes(&self) -> Result<[u8; Self::SIZE], FormatError> {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.packed()?.to_le_bytes());
        bytes[4..].copy_from_slice(&self.pixel_hash);
        Ok(bytes)
    }

    /// Serialize the draft `TXTR` entry header (side length + hash)
    pub fn to_draft_header_bytes(&self) -> Result<[u8; Self::SIZE], FormatError> {
        let side_length = self.side_length()? & 0xFFFF;

        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&side_length.to_le_bytes());
        bytes[4..].copy_from_slice(&self.pixel_hash);
        Ok(bytes)
    }
}

/// One level of a mip chain: `side_length²` packed 5551 pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    side_length: u32,
    pixels: Vec<u16>,
}

impl MipLevel {
    pub fn new(side_length: u32, pixels: Vec<u16>) -> Result<Self, FormatError> {
        let expected = side_length as usize * side_length as usize;
        if pixels.len() != expected {
            return Err(FormatError::MipLevelSize {
                side_length,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            side_length,
            pixels,
        })
    }

    pub fn side_length(&self) -> u32 {
        self.side_length
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixels as little-endian bytes
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect()
    }
}

/// A texture with its metadata and complete mip chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KacTexture {
    metadata: TextureMetadata,
    levels: Vec<MipLevel>,
}

impl KacTexture {
    /// Build a texture, checking the mip chain against the metadata
    ///
    /// The chain must start at the metadata's side length, halve at every
    /// level, stop right before a level would drop below 2×2, and hold at
    /// most [`MAX_MIP_LEVELS`] levels.
    pub fn new(metadata: TextureMetadata, levels: Vec<MipLevel>) -> Result<Self, FormatError> {
        let base_side_length = metadata.side_length()?;

        if levels.is_empty() {
            return Err(FormatError::EmptyMipChain);
        }
        if levels.len() > MAX_MIP_LEVELS {
            return Err(FormatError::MipOverflow {
                max: MAX_MIP_LEVELS,
            });
        }

        for (m, level) in levels.iter().enumerate() {
            let expected = mip_side_length(base_side_length, m);
            if level.side_length() != expected {
                return Err(FormatError::MipLevelSize {
                    side_length: level.side_length(),
                    expected: expected as usize * expected as usize,
                    actual: level.pixels().len(),
                });
            }
        }

        let next = mip_side_length(base_side_length, levels.len());
        if next >= MIN_TEXTURE_SIDE_LENGTH {
            return Err(FormatError::IncompleteMipChain {
                levels: levels.len(),
                next_side_length: next,
            });
        }

        Ok(Self { metadata, levels })
    }

    pub fn metadata(&self) -> &TextureMetadata {
        &self.metadata
    }

    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Level 0 (always present)
    pub fn base_level(&self) -> &MipLevel {
        &self.levels[0]
    }

    pub fn side_length(&self) -> u32 {
        self.base_level().side_length()
    }

    /// Number of pixels in level 0
    pub fn base_pixel_count(&self) -> usize {
        self.base_level().pixels().len()
    }

    /// Number of pixels across all levels
    pub fn total_pixel_count(&self) -> usize {
        self.levels.iter().map(|l| l.pixels().len()).sum()
    }
}
