//! KAC 1.0 binary records and format versions
//!
//! Little-endian throughout, floats are 32-bit IEEE. Each record type knows
//! its own byte layout (`to_bytes`); the segment framing (tags and counts)
//! and segment ordering per [`FormatVersion`] live with the encoder.

pub mod geometry;
pub mod material;
pub mod scene;
pub mod texture;
pub mod version;

pub use geometry::*;
pub use material::*;
pub use scene::*;
pub use texture::*;
pub use version::*;

use crate::packing::DomainError;

/// Scene or record that cannot be represented in a KAC file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Mip chain longer than the metadata can describe
    #[error("texture needs more than {max} mip levels")]
    MipOverflow { max: usize },

    #[error("texture has no mip level of at least 2x2 pixels")]
    EmptyMipChain,

    #[error("mip chain stops after {levels} levels, but a {next_side_length}x{next_side_length} level is still required")]
    IncompleteMipChain { levels: usize, next_side_length: u32 },

    #[error("mip level of side length {side_length} holds {actual} pixels, expected {expected}")]
    MipLevelSize {
        side_length: u32,
        expected: usize,
        actual: usize,
    },

    #[error("{record} {record_idx} references {target} {reference}, but only {len} exist")]
    IndexOutOfBounds {
        record: &'static str,
        record_idx: usize,
        target: &'static str,
        reference: usize,
        len: usize,
    },

    #[error("texture index {index} cannot be stored in {version} material metadata")]
    TextureIndexOverflow { index: u16, version: FormatVersion },

    #[error("{count} textures exceed the {max} addressable in {version}")]
    TextureCapacity {
        count: usize,
        max: usize,
        version: FormatVersion,
    },

    #[error("texture pixel offset {offset} does not fit in 25 bits")]
    PixelOffsetOverflow { offset: u32 },

    #[error("texture pixel offset {offset} does not follow the previous texture (expected {expected})")]
    PixelOffsetMismatch { offset: u32, expected: usize },

    #[error("{count} records do not fit a 32-bit segment count")]
    RecordCount { count: usize },
}
