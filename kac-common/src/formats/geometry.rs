//! KAC geometry records (`NORM`, `UV  `, `VERT`, `3MSH` payload entries)
//!
//! # Layout
//! ```text
//! VertexCoordinates / Normal: x f32, y f32, z f32     (12 bytes)
//! UvCoordinates:              u f32, v f32            (8 bytes)
//! Triangle:                   material_idx u16,
//!                             3 × (vertex_coordinates_idx u16,
//!                                  normal_idx u16,
//!                                  uv_idx u16)        (20 bytes)
//! ```
//!
//! Records are referenced by their position in the scene's arrays.

/// Vertex position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexCoordinates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl VertexCoordinates {
    pub const SIZE: usize = 12;

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        pack_f32x3(self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for VertexCoordinates {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Vertex normal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Normal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Normal {
    pub const SIZE: usize = 12;

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        pack_f32x3(self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Normal {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Texture coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UvCoordinates {
    pub u: f32,
    pub v: f32,
}

impl UvCoordinates {
    pub const SIZE: usize = 8;

    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.u.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.v.to_le_bytes());
        bytes
    }
}

impl From<[f32; 2]> for UvCoordinates {
    fn from([u, v]: [f32; 2]) -> Self {
        Self { u, v }
    }
}

/// One corner of a triangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangleVertex {
    pub vertex_coordinates_idx: u16,
    pub normal_idx: u16,
    pub uv_idx: u16,
}

/// Triangle referencing a material and three vertex corners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triangle {
    pub material_idx: u16,
    pub vertices: [TriangleVertex; 3],
}

impl Triangle {
    pub const SIZE: usize = 20;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.material_idx.to_le_bytes());

        for (i, vertex) in self.vertices.iter().enumerate() {
            let base = 2 + i * 6;
            bytes[base..base + 2].copy_from_slice(&vertex.vertex_coordinates_idx.to_le_bytes());
            bytes[base + 2..base + 4].copy_from_slice(&vertex.normal_idx.to_le_bytes());
            bytes[base + 4..base + 6].copy_from_slice(&vertex.uv_idx.to_le_bytes());
        }

        bytes
    }
}

fn pack_f32x3(x: f32, y: f32, z: f32) -> [u8; 12] {
    let mut bytes = [0u8; 12];
    bytes[0..4].copy_from_slice(&x.to_le_bytes());
    bytes[4..8].copy_from_slice(&y.to_le_bytes());
    bytes[8..12].copy_from_slice(&z.to_le_bytes());
    bytes
}
