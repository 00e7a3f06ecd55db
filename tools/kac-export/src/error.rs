//! Conversion errors
//!
//! Every error is fatal to the conversion in progress: the scene is only
//! valid when every record is present, so nothing is skipped or patched up.

use kac_common::FormatError;
use std::path::PathBuf;

/// Failure while turning parsed mesh input into a [`kac_common::KacScene`]
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("the mesh must define at least one material")]
    EmptyMaterialSet,

    #[error("texture {path:?} is {width}x{height}: {reason}")]
    InvalidTextureGeometry {
        path: PathBuf,
        width: u32,
        height: u32,
        reason: &'static str,
    },

    #[error("failed to load texture {path:?}: {reason}")]
    TextureLoad { path: PathBuf, reason: String },

    #[error("face {face} has {vertex_count} vertices; only triangles are supported")]
    NonTriangularFace { face: usize, vertex_count: usize },

    #[error("face {face} has a vertex without {attribute} index")]
    MissingVertexAttribute {
        face: usize,
        attribute: &'static str,
    },

    #[error("face {face} references {attribute} {index}, beyond the 16-bit index range")]
    IndexOverflow {
        face: usize,
        attribute: &'static str,
        index: usize,
    },

    #[error("face {face} references {attribute} {index}, but only {len} exist")]
    IndexOutOfBounds {
        face: usize,
        attribute: &'static str,
        index: usize,
        len: usize,
    },

    #[error("face {face} has no material")]
    MissingMaterial { face: usize },

    #[error("face {face} references material {index}, but only {len} exist")]
    MaterialIndexOutOfRange {
        face: usize,
        index: usize,
        len: usize,
    },

    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: {reason}")]
    ObjParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Format(#[from] FormatError),
}
