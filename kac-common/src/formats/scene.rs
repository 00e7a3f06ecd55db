//! In-memory KAC scene
//!
//! The scene is the ordered collection of every record a KAC file holds.
//! Array positions are the indices other records refer to, so records are
//! only ever appended.

use super::{
    FormatError, FormatVersion, KacTexture, MAX_PIXEL_DATA_OFFSET, Material, Normal, Triangle,
    UvCoordinates, VertexCoordinates,
};

/// Every record of a KAC file, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KacScene {
    pub vertex_coordinates: Vec<VertexCoordinates>,
    pub normals: Vec<Normal>,
    pub uv_coordinates: Vec<UvCoordinates>,
    pub materials: Vec<Material>,
    pub textures: Vec<KacTexture>,
    pub triangles: Vec<Triangle>,
}

impl KacScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of level-0 pixels across all textures (the `TXPX` count)
    pub fn base_pixel_count(&self) -> usize {
        self.textures.iter().map(KacTexture::base_pixel_count).sum()
    }

    /// Check that every cross-reference resolves and that the scene fits
    /// the limits of `version`
    pub fn validate(&self, version: FormatVersion) -> Result<(), FormatError> {
        for (t, triangle) in self.triangles.iter().enumerate() {
            check_index(
                "triangle",
                t,
                "material",
                triangle.material_idx,
                self.materials.len(),
            )?;

            for vertex in &triangle.vertices {
                check_index(
                    "triangle",
                    t,
                    "vertex",
                    vertex.vertex_coordinates_idx,
                    self.vertex_coordinates.len(),
                )?;
                check_index("triangle", t, "normal", vertex.normal_idx, self.normals.len())?;
                check_index("triangle", t, "uv", vertex.uv_idx, self.uv_coordinates.len())?;
            }
        }

        for (m, material) in self.materials.iter().enumerate() {
            if let Some(texture_idx) = material.texture_idx {
                check_index("material", m, "texture", texture_idx, self.textures.len())?;
            }
        }

        if self.textures.len() > version.max_textures() {
            return Err(FormatError::TextureCapacity {
                count: self.textures.len(),
                max: version.max_textures(),
                version,
            });
        }

        if version == FormatVersion::Kac10 {
            let mut expected_offset = 0usize;
            for texture in &self.textures {
                let offset = texture.metadata().pixel_data_offset;
                if offset > MAX_PIXEL_DATA_OFFSET {
                    return Err(FormatError::PixelOffsetOverflow { offset });
                }
                if offset as usize != expected_offset {
                    return Err(FormatError::PixelOffsetMismatch {
                        offset,
                        expected: expected_offset,
                    });
                }
                expected_offset += texture.base_pixel_count();
            }

            if u32::try_from(expected_offset).is_err() {
                return Err(FormatError::RecordCount {
                    count: expected_offset,
                });
            }
        }

        for count in [
            self.vertex_coordinates.len(),
            self.normals.len(),
            self.uv_coordinates.len(),
            self.materials.len(),
            self.textures.len(),
            self.triangles.len(),
        ] {
            if u32::try_from(count).is_err() {
                return Err(FormatError::RecordCount { count });
            }
        }

        Ok(())
    }
}

fn check_index(
    record: &'static str,
    record_idx: usize,
    target: &'static str,
    reference: u16,
    len: usize,
) -> Result<(), FormatError> {
    if usize::from(reference) >= len {
        return Err(FormatError::IndexOutOfBounds {
            record,
            record_idx,
            target,
            reference: usize::from(reference),
            len,
        });
    }
    Ok(())
}
