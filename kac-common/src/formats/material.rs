//! KAC material records (`MATE` payload entries)
//!
//! # Layout (KAC 1.0)
//! ```text
//! 0x00: color u16     (4 bits each: r [0:4), g [4:8), b [8:12), a [12:16))
//! 0x02: metadata u16  ([0:9) texture metadata index,
//!                      9 has_texture, 10 has_texture_filtering,
//!                      11 has_smooth_shading)
//! ```
//!
//! # Layout (KAC 1.0 draft)
//! ```text
//! 0x00: color u16     (as above)
//! 0x02: metadata u32  ([0:16) texture index,
//!                      16 has_texture, 17 has_texture_filtering,
//!                      18 has_smooth_shading)
//! ```

use super::{FormatError, FormatVersion};
use crate::packing::{pack_color_4444, to_4bit};

const KAC10_TEXTURE_IDX_MASK: u16 = 0x1FF;

/// Material base color with 4 bits per channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl MaterialColor {
    /// Quantize an 8-bit RGBA color
    pub const fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: to_4bit(rgba[0]),
            g: to_4bit(rgba[1]),
            b: to_4bit(rgba[2]),
            a: to_4bit(rgba[3]),
        }
    }

    /// Packed 4444 word
    pub const fn packed(&self) -> u16 {
        pack_color_4444(self.r, self.g, self.b, self.a)
    }
}

/// Surface description shared by triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub color: MaterialColor,
    /// Index into the scene's textures (and `TXMD` entries)
    pub texture_idx: Option<u16>,
    pub has_texture_filtering: bool,
    /// Cleared for good once any triangle using the material asks for flat shading
    pub has_smooth_shading: bool,
}

impl Material {
    /// Untextured, filtered, smooth-shaded material
    pub fn new(color: MaterialColor) -> Self {
        Self {
            color,
            texture_idx: None,
            has_texture_filtering: true,
            has_smooth_shading: true,
        }
    }

    pub fn has_texture(&self) -> bool {
        self.texture_idx.is_some()
    }

    /// Record size in the `MATE` segment of `version`
    pub const fn size(version: FormatVersion) -> usize {
        match version {
            FormatVersion::Kac10 => 4,
            FormatVersion::Kac10Draft => 6,
        }
    }

    /// Canonical 16-bit metadata word
    pub fn packed_metadata(&self) -> Result<u16, FormatError> {
        let texture_idx = self.texture_idx.unwrap_or(0);
        if texture_idx > KAC10_TEXTURE_IDX_MASK {
            return Err(FormatError::TextureIndexOverflow {
                index: texture_idx,
                version: FormatVersion::Kac10,
            });
        }

        Ok(texture_idx
            | (u16::from(self.has_texture()) << 9)
            | (u16::from(self.has_texture_filtering) << 10)
            | (u16::from(self.has_smooth_shading) << 11))
    }

    /// Draft 32-bit metadata word
    pub fn packed_metadata_draft(&self) -> u32 {
        u32::from(self.texture_idx.unwrap_or(0))
            | (u32::from(self.has_texture()) << 16)
            | (u32::from(self.has_texture_filtering) << 17)
            | (u32::from(self.has_smooth_shading) << 18)
    }

    /// Serialize the record as laid out by `version`
    pub fn to_bytes(&self, version: FormatVersion) -> Result<Vec<u8>, FormatError> {
        let mut bytes = Vec::with_capacity(Self::size(version));
        bytes.extend_from_slice(&self.color.packed().to_le_bytes());

        match version {
            FormatVersion::Kac10 => {
                bytes.extend_from_slice(&self.packed_metadata()?.to_le_bytes());
            }
            FormatVersion::Kac10Draft => {
                bytes.extend_from_slice(&self.packed_metadata_draft().to_le_bytes());
            }
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_quantization() {
        let color = MaterialColor::from_rgba8([255, 0, 128, 255]);
        assert_eq!(color, MaterialColor { r: 15, g: 0, b: 7, a: 15 });
        assert_eq!(color.packed(), 0xF70F);
    }

    #[test]
    fn test_new_material_defaults() {
        let material = Material::new(MaterialColor::default());
        assert!(!material.has_texture());
        assert!(material.has_texture_filtering);
        assert!(material.has_smooth_shading);
        // filtering (bit 10) and smooth shading (bit 11)
        assert_eq!(material.packed_metadata().unwrap(), 0x0C00);
    }

    #[test]
    fn test_kac10_metadata_bits() {
        let material = Material {
            color: MaterialColor::default(),
            texture_idx: Some(0x1FF),
            has_texture_filtering: false,
            has_smooth_shading: false,
        };
        assert_eq!(material.packed_metadata().unwrap(), 0x03FF);

        let too_far = Material {
            texture_idx: Some(512),
            ..material
        };
        assert!(matches!(
            too_far.packed_metadata(),
            Err(FormatError::TextureIndexOverflow { index: 512, .. })
        ));
    }

    #[test]
    fn test_draft_metadata_bits() {
        let material = Material {
            color: MaterialColor::default(),
            texture_idx: Some(0xABCD),
            has_texture_filtering: true,
            has_smooth_shading: false,
        };
        assert_eq!(material.packed_metadata_draft(), 0x0003_ABCD);
    }

    #[test]
    fn test_record_sizes() {
        let material = Material::new(MaterialColor::from_rgba8([255; 4]));
        let kac10 = material.to_bytes(FormatVersion::Kac10).unwrap();
        let draft = material.to_bytes(FormatVersion::Kac10Draft).unwrap();

        assert_eq!(kac10.len(), Material::size(FormatVersion::Kac10));
        assert_eq!(draft.len(), Material::size(FormatVersion::Kac10Draft));
        assert_eq!(kac10, [0xFF, 0xFF, 0x00, 0x0C]);
        assert_eq!(draft, [0xFF, 0xFF, 0x00, 0x00, 0x06, 0x00]);
    }
}
