//! KAC binary segment encoder
//!
//! A file is a sequence of segments, each a 4-byte ASCII tag followed by its
//! payload. [`KacWriter`] has one method per segment and only accepts them in
//! the order of its [`FormatVersion`]'s segment table. The first failed write
//! poisons the writer: every later call fails with
//! [`EncodeError::StreamInvalid`] without touching the output.

pub use kac_common::formats::{FormatVersion, Segment};

use kac_common::{
    FormatError, KacScene, KacTexture, Material, Normal, Triangle, UvCoordinates,
    VertexCoordinates, KAC_FORMAT_VERSION_NUMBER,
};
use std::io::Write;

/// Failure while writing a KAC stream
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("write failed")]
    Io(#[from] std::io::Error),

    #[error("output stream is no longer valid after an earlier failure")]
    StreamInvalid,

    #[error("segment {segment} written out of order (expected {expected:?})")]
    OutOfOrder {
        segment: Segment,
        expected: Option<Segment>,
    },

    #[error("segment {segment} is not part of {version}")]
    UnsupportedSegment {
        segment: Segment,
        version: FormatVersion,
    },

    #[error("stream finished before segment {missing} was written")]
    Incomplete { missing: Segment },

    #[error("scene cannot be encoded")]
    InvalidScene(#[from] FormatError),
}

/// Segment-by-segment KAC writer
pub struct KacWriter<W: Write> {
    writer: W,
    version: FormatVersion,
    /// Position of the next segment in `version.segments()`
    next_segment: usize,
    poisoned: bool,
    bytes_written: u64,
}

impl<W: Write> KacWriter<W> {
    pub fn new(writer: W, version: FormatVersion) -> Self {
        Self {
            writer,
            version,
            next_segment: 0,
            poisoned: false,
            bytes_written: 0,
        }
    }

    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// False once any write has failed
    pub fn is_valid(&self) -> bool {
        !self.poisoned
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ========================================================================
    // Segments
    // ========================================================================

    /// `KAC ` - format version float
    pub fn write_header(&mut self) -> Result<(), EncodeError> {
        self.segment(Segment::Header, |w| {
            w.write_all(&KAC_FORMAT_VERSION_NUMBER.to_le_bytes())
        })
    }

    /// `NORM`
    pub fn write_normals(&mut self, normals: &[Normal]) -> Result<(), EncodeError> {
        self.segment(Segment::Normals, |w| {
            w.write_count(normals.len())?;
            normals.iter().try_for_each(|n| w.write_all(&n.to_bytes()))
        })
    }

    /// `UV  `
    pub fn write_uv_coordinates(&mut self, uvs: &[UvCoordinates]) -> Result<(), EncodeError> {
        self.segment(Segment::UvCoordinates, |w| {
            w.write_count(uvs.len())?;
            uvs.iter().try_for_each(|uv| w.write_all(&uv.to_bytes()))
        })
    }

    /// `VERT`
    pub fn write_vertex_coordinates(
        &mut self,
        vertices: &[VertexCoordinates],
    ) -> Result<(), EncodeError> {
        self.segment(Segment::VertexCoordinates, |w| {
            w.write_count(vertices.len())?;
            vertices.iter().try_for_each(|v| w.write_all(&v.to_bytes()))
        })
    }

    /// `3MSH`
    pub fn write_triangles(&mut self, triangles: &[Triangle]) -> Result<(), EncodeError> {
        self.segment(Segment::Triangles, |w| {
            w.write_count(triangles.len())?;
            triangles.iter().try_for_each(|t| w.write_all(&t.to_bytes()))
        })
    }

    /// `MATE` - record layout depends on the format version
    pub fn write_materials(&mut self, materials: &[Material]) -> Result<(), EncodeError> {
        let version = self.version;
        self.segment(Segment::Materials, |w| {
            w.write_count(materials.len())?;
            materials
                .iter()
                .try_for_each(|m| w.write_all(&m.to_bytes(version)?))
        })
    }

    /// `TXMD` - one metadata entry per texture
    pub fn write_texture_metadata(&mut self, textures: &[KacTexture]) -> Result<(), EncodeError> {
        self.segment(Segment::TextureMetadata, |w| {
            w.write_count(textures.len())?;
            textures
                .iter()
                .try_for_each(|t| w.write_all(&t.metadata().to_bytes()?))
        })
    }

    /// `TXPX` - level-0 pixels of every texture, in texture order
    pub fn write_texture_pixels(&mut self, textures: &[KacTexture]) -> Result<(), EncodeError> {
        self.segment(Segment::TexturePixels, |w| {
            w.write_count(textures.iter().map(KacTexture::base_pixel_count).sum())?;
            textures
                .iter()
                .try_for_each(|t| w.write_all(&t.base_level().to_le_bytes()))
        })
    }

    /// `TXTR` (draft) - per texture: side length, hash and the whole mip chain
    pub fn write_textures(&mut self, textures: &[KacTexture]) -> Result<(), EncodeError> {
        self.segment(Segment::Textures, |w| {
            w.write_count(textures.len())?;
            for texture in textures {
                w.write_all(&texture.metadata().to_draft_header_bytes()?)?;
                for level in texture.levels() {
                    w.write_all(&level.to_le_bytes())?;
                }
            }
            Ok(())
        })
    }

    /// `ENDS` - no payload
    pub fn write_ending(&mut self) -> Result<(), EncodeError> {
        self.segment(Segment::Ending, |_| Ok(()))
    }

    // ========================================================================
    // Whole scene
    // ========================================================================

    /// Validate `scene` and write every segment of the format version in order
    ///
    /// Stops at the first failing segment.
    pub fn encode_scene(&mut self, scene: &KacScene) -> Result<(), EncodeError> {
        if self.poisoned {
            return Err(EncodeError::StreamInvalid);
        }
        scene.validate(self.version)?;

        for &segment in self.version.segments() {
            self.write_scene_segment(scene, segment)?;
        }

        Ok(())
    }

    /// Flush and hand back the underlying writer
    ///
    /// Fails if the stream was poisoned or a segment is still missing.
    pub fn finish(mut self) -> Result<W, EncodeError> {
        if self.poisoned {
            return Err(EncodeError::StreamInvalid);
        }
        if let Some(&missing) = self.version.segments().get(self.next_segment) {
            return Err(EncodeError::Incomplete { missing });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn write_scene_segment(&mut self, scene: &KacScene, segment: Segment) -> Result<(), EncodeError> {
        match segment {
            Segment::Header => self.write_header(),
            Segment::Normals => self.write_normals(&scene.normals),
            Segment::UvCoordinates => self.write_uv_coordinates(&scene.uv_coordinates),
            Segment::VertexCoordinates => self.write_vertex_coordinates(&scene.vertex_coordinates),
            Segment::Triangles => self.write_triangles(&scene.triangles),
            Segment::Materials => self.write_materials(&scene.materials),
            Segment::TextureMetadata => self.write_texture_metadata(&scene.textures),
            Segment::TexturePixels => self.write_texture_pixels(&scene.textures),
            Segment::Textures => self.write_textures(&scene.textures),
            Segment::Ending => self.write_ending(),
        }
    }

    /// Check stream state and ordering, write the tag, then the payload
    fn segment<F>(&mut self, segment: Segment, payload: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        if self.poisoned {
            return Err(EncodeError::StreamInvalid);
        }

        let segments = self.version.segments();
        let position = segments
            .iter()
            .position(|&s| s == segment)
            .ok_or(EncodeError::UnsupportedSegment {
                segment,
                version: self.version,
            })?;
        if position != self.next_segment {
            return Err(EncodeError::OutOfOrder {
                segment,
                expected: segments.get(self.next_segment).copied(),
            });
        }

        let start = self.bytes_written;
        let result = self
            .write_all(segment.tag())
            .and_then(|()| payload(self));

        match result {
            Ok(()) => {
                self.next_segment += 1;
                tracing::debug!(
                    "Wrote segment {} ({} bytes)",
                    segment,
                    self.bytes_written - start
                );
                Ok(())
            }
            Err(err) => {
                self.poisoned = true;
                Err(err)
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    fn write_count(&mut self, count: usize) -> Result<(), EncodeError> {
        let count = u32::try_from(count).map_err(|_| FormatError::RecordCount { count })?;
        self.write_all(&count.to_le_bytes())
    }
}

/// Encode a whole scene into memory
pub fn encode_scene_to_vec(
    scene: &KacScene,
    version: FormatVersion,
) -> Result<Vec<u8>, EncodeError> {
    let mut writer = KacWriter::new(Vec::new(), version);
    writer.encode_scene(scene)?;
    writer.finish()
}
