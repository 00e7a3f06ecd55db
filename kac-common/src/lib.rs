//! Shared types and utilities for the KAC 1.0 mesh format
//!
//! This crate provides the format-level pieces shared between:
//! - `kac-export` (asset pipeline)
//! - runtimes and tools that consume `.kac` files
//!
//! # Modules
//!
//! - [`packing`] - Color quantization (8 → 1/4/5 bits), 4444/5551 packing, side-length codec
//! - [`formats`] - KAC records, format versions and scene validation

pub mod formats;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{
    DomainError, MAX_TEXTURE_SIDE_LENGTH, MIN_TEXTURE_SIDE_LENGTH, exponent_to_side_length,
    is_valid_side_length, pack_color_4444, pack_pixel_5551, quantize_rgba8_5551,
    side_length_to_exponent, to_1bit, to_4bit, to_5bit, unpack_pixel_5551,
};

// Re-export commonly used format items
pub use formats::{
    FormatError,
    FormatVersion,
    // Constants
    KAC_FORMAT_VERSION_NUMBER,
    // Records
    KacScene,
    KacTexture,
    MAX_MIP_LEVELS,
    Material,
    MaterialColor,
    MipLevel,
    Normal,
    PIXEL_HASH_SIZE,
    Segment,
    TextureMetadata,
    Triangle,
    TriangleVertex,
    UvCoordinates,
    VertexCoordinates,
};
