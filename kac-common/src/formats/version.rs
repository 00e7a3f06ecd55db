//! KAC format versions and their segment tables
//!
//! A KAC file is a sequence of tagged segments (4 ASCII bytes followed by a
//! payload). Which segments appear, and in which order, depends only on the
//! format version; the encoder walks [`FormatVersion::segments`] and never
//! hardcodes an order of its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Float written in the `KAC ` header segment
pub const KAC_FORMAT_VERSION_NUMBER: f32 = 1.0;

/// One tagged chunk of a KAC file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// `KAC ` - format version float
    Header,
    /// `NORM` - vertex normals
    Normals,
    /// `UV  ` - texture coordinates
    UvCoordinates,
    /// `VERT` - vertex positions
    VertexCoordinates,
    /// `3MSH` - triangles
    Triangles,
    /// `MATE` - materials
    Materials,
    /// `TXMD` - texture metadata (side length exponent, pixel offset, hash)
    TextureMetadata,
    /// `TXPX` - level-0 pixel data of every texture, concatenated
    TexturePixels,
    /// `TXTR` - draft layout: metadata and full mip chain per texture
    Textures,
    /// `ENDS` - terminator, no payload
    Ending,
}

impl Segment {
    /// 4-byte ASCII tag written in front of the segment payload
    pub const fn tag(self) -> &'static [u8; 4] {
        match self {
            Segment::Header => b"KAC ",
            Segment::Normals => b"NORM",
            Segment::UvCoordinates => b"UV  ",
            Segment::VertexCoordinates => b"VERT",
            Segment::Triangles => b"3MSH",
            Segment::Materials => b"MATE",
            Segment::TextureMetadata => b"TXMD",
            Segment::TexturePixels => b"TXPX",
            Segment::Textures => b"TXTR",
            Segment::Ending => b"ENDS",
        }
    }

    /// Tag as a printable string (for logs and error messages)
    pub fn tag_str(self) -> &'static str {
        // Every tag is ASCII
        std::str::from_utf8(self.tag()).unwrap_or("????")
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.tag_str())
    }
}

const KAC_1_0_SEGMENTS: &[Segment] = &[
    Segment::Header,
    Segment::Normals,
    Segment::UvCoordinates,
    Segment::VertexCoordinates,
    Segment::Triangles,
    Segment::Materials,
    Segment::TextureMetadata,
    Segment::TexturePixels,
    Segment::Ending,
];

const KAC_1_0_DRAFT_SEGMENTS: &[Segment] = &[
    Segment::Header,
    Segment::Normals,
    Segment::UvCoordinates,
    Segment::VertexCoordinates,
    Segment::Triangles,
    Segment::Materials,
    Segment::Textures,
];

/// On-disk layout variant
///
/// Both variants carry `1.0` in their header; they differ in how materials
/// reference textures and where texture pixels live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatVersion {
    /// Canonical layout: separate `TXMD`/`TXPX` segments, `ENDS` terminator
    #[default]
    #[serde(rename = "kac-1.0")]
    Kac10,
    /// Earlier draft: per-texture `TXTR` blocks with full mip chains, no terminator
    #[serde(rename = "kac-1.0-draft")]
    Kac10Draft,
}

impl FormatVersion {
    /// Segments of this version in the order they must be written
    pub const fn segments(self) -> &'static [Segment] {
        match self {
            FormatVersion::Kac10 => KAC_1_0_SEGMENTS,
            FormatVersion::Kac10Draft => KAC_1_0_DRAFT_SEGMENTS,
        }
    }

    /// Whether `segment` is part of this version's layout
    pub fn has_segment(self, segment: Segment) -> bool {
        self.segments().contains(&segment)
    }

    /// Number of textures a material can address
    ///
    /// 9-bit metadata index in the canonical layout, 16-bit texture index in
    /// the draft.
    pub const fn max_textures(self) -> usize {
        match self {
            FormatVersion::Kac10 => 1 << 9,
            FormatVersion::Kac10Draft => 1 << 16,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVersion::Kac10 => write!(f, "KAC 1.0"),
            FormatVersion::Kac10Draft => write!(f, "KAC 1.0 (draft)"),
        }
    }
}
