//! Mesh readers (OBJ/MTL -> SourceScene)

mod mtl;
mod obj;
mod types;

// Re-export public API
pub use mtl::parse_mtl_file;
pub use obj::{parse_obj_file, parse_obj_str};
pub use types::{SourceFace, SourceFaceVertex, SourceMaterial, SourceScene};
