//! Parsed mesh input
//!
//! The assembler consumes these arrays as produced by a mesh reader; indices
//! are zero-based positions in the arrays of the same [`SourceScene`].

use std::path::PathBuf;

/// Geometry, materials and faces of a parsed mesh file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceScene {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub materials: Vec<SourceMaterial>,
    pub faces: Vec<SourceFace>,
}

/// A material as declared by the mesh file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMaterial {
    pub name: String,
    /// Diffuse color, 0.0-1.0 per channel
    pub diffuse: [f32; 3],
    /// Diffuse texture map, already resolved against the material file's directory
    pub diffuse_texture: Option<PathBuf>,
}

/// A polygon; arity is kept as written so non-triangles can be rejected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFace {
    pub material: Option<usize>,
    /// 0 = flat shading
    pub smoothing_group: u32,
    pub vertices: Vec<SourceFaceVertex>,
}

/// One corner of a face; attributes the file did not give are `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceFaceVertex {
    pub position: Option<usize>,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

impl SourceFaceVertex {
    /// Corner with all three attributes present
    pub fn new(position: usize, uv: usize, normal: usize) -> Self {
        Self {
            position: Some(position),
            uv: Some(uv),
            normal: Some(normal),
        }
    }
}
