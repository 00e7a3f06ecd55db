//! Test helpers: a standalone KAC reader and test asset generators
//!
//! The reader only knows the byte layout of the segments, so it checks what
//! the encoder wrote without sharing any of its code.

#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// ============================================================================
// Reader
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTriangle {
    pub material_idx: u16,
    /// (vertex, normal, uv) per corner
    pub corners: [[u16; 3]; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMaterial {
    pub color: u16,
    /// u16 in KAC 1.0, u32 in the draft
    pub metadata: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDraftTexture {
    pub side_length: u32,
    pub hash: [u8; 16],
    /// All mip levels, level 0 first
    pub pixels: Vec<u16>,
}

#[derive(Debug, Default)]
pub struct ParsedKac {
    /// Segment tags in file order
    pub tags: Vec<String>,
    pub version: f32,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<ParsedTriangle>,
    pub materials: Vec<ParsedMaterial>,
    /// (packed metadata, hash)
    pub texture_metadata: Vec<(u32, [u8; 16])>,
    pub pixels: Vec<u16>,
    pub draft_textures: Vec<ParsedDraftTexture>,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        assert!(
            self.pos + n <= self.data.len(),
            "unexpected end of data at {} (need {} bytes)",
            self.pos,
            n
        );
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        bytes
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take(2).try_into().unwrap())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    fn vec3(&mut self) -> [f32; 3] {
        [self.f32(), self.f32(), self.f32()]
    }

    fn hash(&mut self) -> [u8; 16] {
        self.take(16).try_into().unwrap()
    }

    fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }
}

/// Parse a KAC file; `draft` selects the draft `MATE` record size
pub fn parse_kac(data: &[u8], draft: bool) -> ParsedKac {
    let mut cursor = Cursor { data, pos: 0 };
    let mut parsed = ParsedKac::default();

    while !cursor.at_end() {
        let tag = String::from_utf8(cursor.take(4).to_vec()).expect("tag should be ASCII");
        parsed.tags.push(tag.clone());

        match tag.as_str() {
            "KAC " => parsed.version = cursor.f32(),
            "NORM" => {
                let count = cursor.u32();
                parsed.normals = (0..count).map(|_| cursor.vec3()).collect();
            }
            "UV  " => {
                let count = cursor.u32();
                parsed.uvs = (0..count).map(|_| [cursor.f32(), cursor.f32()]).collect();
            }
            "VERT" => {
                let count = cursor.u32();
                parsed.vertices = (0..count).map(|_| cursor.vec3()).collect();
            }
            "3MSH" => {
                let count = cursor.u32();
                parsed.triangles = (0..count)
                    .map(|_| {
                        let material_idx = cursor.u16();
                        let mut corners = [[0u16; 3]; 3];
                        for corner in &mut corners {
                            *corner = [cursor.u16(), cursor.u16(), cursor.u16()];
                        }
                        ParsedTriangle {
                            material_idx,
                            corners,
                        }
                    })
                    .collect();
            }
            "MATE" => {
                let count = cursor.u32();
                parsed.materials = (0..count)
                    .map(|_| ParsedMaterial {
                        color: cursor.u16(),
                        metadata: if draft {
                            cursor.u32()
                        } else {
                            u32::from(cursor.u16())
                        },
                    })
                    .collect();
            }
            "TXMD" => {
                let count = cursor.u32();
                parsed.texture_metadata =
                    (0..count).map(|_| (cursor.u32(), cursor.hash())).collect();
            }
            "TXPX" => {
                let count = cursor.u32();
                parsed.pixels = (0..count).map(|_| cursor.u16()).collect();
            }
            "TXTR" => {
                let count = cursor.u32();
                for _ in 0..count {
                    let side_length = cursor.u32() & 0xFFFF;
                    let hash = cursor.hash();
                    let mut pixel_count = 0;
                    let mut side = side_length;
                    while side >= 2 {
                        pixel_count += side * side;
                        side /= 2;
                    }
                    let pixels = (0..pixel_count).map(|_| cursor.u16()).collect();
                    parsed.draft_textures.push(ParsedDraftTexture {
                        side_length,
                        hash,
                        pixels,
                    });
                }
            }
            "ENDS" => assert!(cursor.at_end(), "data after ENDS"),
            other => panic!("unknown segment tag {:?}", other),
        }
    }

    parsed
}

/// Split a `TXMD` metadata word into (side length, pixel offset)
pub fn unpack_texture_metadata(packed: u32) -> (u32, u32) {
    let exponent = packed & 0b111;
    (1 << (exponent + 1), packed >> 3)
}

// ============================================================================
// Test assets
// ============================================================================

/// One textured triangle: `triangle.obj` + `triangle.mtl`, texture `texture_name`
pub fn write_triangle_obj(dir: &Path, texture_name: Option<&str>) -> std::io::Result<()> {
    let mut mtl = String::from("newmtl surface\nKd 1.0 0.5 0.0\n");
    if let Some(name) = texture_name {
        mtl.push_str(&format!("map_Kd {}\n", name));
    }
    std::fs::write(dir.join("triangle.mtl"), mtl)?;

    std::fs::write(
        dir.join("triangle.obj"),
        "# single triangle\n\
         mtllib triangle.mtl\n\
         o triangle\n\
         v 0.0 0.0 0.0\n\
         v 1.0 0.0 0.0\n\
         v 0.0 1.0 0.0\n\
         vt 0.25 0.75\n\
         vn 0.0 0.0 1.0\n\
         usemtl surface\n\
         s 1\n\
         f 1/1/1 2/1/1 3/1/1\n",
    )
}

/// A quad face, which KAC cannot store
pub fn write_quad_obj(path: &Path) -> std::io::Result<()> {
    std::fs::write(path.with_extension("mtl"), "newmtl flat\nKd 0 0 1\n")?;
    let mtl_name = path
        .with_extension("mtl")
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap()
        .to_string();

    std::fs::write(
        path,
        format!(
            "mtllib {}\n\
             v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvn 0 0 1\n\
             usemtl flat\n\
             f 1/1/1 2/1/1 3/1/1 4/1/1\n",
            mtl_name
        ),
    )
}

/// Red/blue checkerboard with alpha channel
pub fn write_checkerboard_png(path: &Path, width: u32, height: u32) -> image::ImageResult<()> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 0])
        }
    });
    img.save(path)
}

/// Solid opaque image without an alpha channel
pub fn write_rgb_png(path: &Path, width: u32, height: u32) -> image::ImageResult<()> {
    RgbImage::from_pixel(width, height, Rgb([0, 255, 0])).save(path)
}
