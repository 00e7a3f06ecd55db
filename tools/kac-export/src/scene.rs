//! Scene assembly (SourceScene -> KacScene)
//!
//! Materials and their textures are converted first, then faces are checked
//! and appended in file order. Records are only ever appended, so the index
//! of a record never changes once something refers to it.

use kac_common::{
    FormatError, KacScene, Material, MaterialColor, Normal, Triangle, TriangleVertex,
    UvCoordinates, VertexCoordinates,
};

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::mesh::{SourceFace, SourceFaceVertex, SourceMaterial, SourceScene};
use crate::texture::{build_texture, fit_texture_geometry, Resampler, TextureLoader};

/// Turn a parsed mesh into a validated KAC scene
///
/// Fails on the first problem; nothing is skipped or repaired (apart from
/// texture resizing in tolerant mode).
pub fn assemble_scene(
    source: &SourceScene,
    config: &ExportConfig,
    loader: &dyn TextureLoader,
    resampler: &dyn Resampler,
) -> Result<KacScene, ExportError> {
    if source.materials.is_empty() {
        return Err(ExportError::EmptyMaterialSet);
    }

    let mut scene = KacScene::new();

    for material in &source.materials {
        add_material(&mut scene, material, config, loader, resampler)?;
    }

    scene.vertex_coordinates = source
        .positions
        .iter()
        .map(|&p| VertexCoordinates::from(p))
        .collect();
    scene.normals = source.normals.iter().map(|&n| Normal::from(n)).collect();
    scene.uv_coordinates = source
        .uvs
        .iter()
        .map(|&uv| UvCoordinates::from(uv))
        .collect();

    for (face_idx, face) in source.faces.iter().enumerate() {
        let triangle = build_triangle(&scene, face_idx, face)?;

        if face.smoothing_group == 0 {
            // Flat shading anywhere wins over smooth shading everywhere else
            scene.materials[usize::from(triangle.material_idx)].has_smooth_shading = false;
        }
        scene.triangles.push(triangle);
    }

    scene.validate(config.format)?;

    tracing::debug!(
        "Assembled scene: {} vertices, {} normals, {} uvs, {} materials, {} textures, {} triangles",
        scene.vertex_coordinates.len(),
        scene.normals.len(),
        scene.uv_coordinates.len(),
        scene.materials.len(),
        scene.textures.len(),
        scene.triangles.len()
    );

    Ok(scene)
}

fn add_material(
    scene: &mut KacScene,
    source: &SourceMaterial,
    config: &ExportConfig,
    loader: &dyn TextureLoader,
    resampler: &dyn Resampler,
) -> Result<(), ExportError> {
    let mut material = Material::new(MaterialColor::from_rgba8(diffuse_to_rgba8(
        source.diffuse,
    )));
    material.has_texture_filtering = config.texture_filtering;

    if let Some(path) = &source.diffuse_texture {
        let image = loader.load(path)?;
        let image = fit_texture_geometry(image, path, config, resampler)?;

        let pixel_data_offset = u32::try_from(scene.base_pixel_count()).map_err(|_| {
            FormatError::RecordCount {
                count: scene.base_pixel_count(),
            }
        })?;
        let texture_idx =
            u16::try_from(scene.textures.len()).map_err(|_| FormatError::TextureCapacity {
                count: scene.textures.len() + 1,
                max: config.format.max_textures(),
                version: config.format,
            })?;

        tracing::debug!("Material '{}': texture {} from {:?}", source.name, texture_idx, path);

        scene
            .textures
            .push(build_texture(&image, pixel_data_offset, resampler)?);
        material.texture_idx = Some(texture_idx);
    }

    scene.materials.push(material);
    Ok(())
}

/// 0.0-1.0 diffuse color to opaque RGBA8 (OBJ materials have no alpha)
fn diffuse_to_rgba8(diffuse: [f32; 3]) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).floor() as u8;
    [channel(diffuse[0]), channel(diffuse[1]), channel(diffuse[2]), 255]
}

/// Check a face completely before anything of it is recorded
fn build_triangle(
    scene: &KacScene,
    face_idx: usize,
    face: &SourceFace,
) -> Result<Triangle, ExportError> {
    let corners: &[SourceFaceVertex; 3] = face.vertices.as_slice().try_into().map_err(|_| {
        ExportError::NonTriangularFace {
            face: face_idx,
            vertex_count: face.vertices.len(),
        }
    })?;

    let material = face
        .material
        .ok_or(ExportError::MissingMaterial { face: face_idx })?;
    let material_idx = checked_index(face_idx, "material", material, scene.materials.len())
        .map_err(|err| match err {
            ExportError::IndexOutOfBounds { index, len, .. } => {
                ExportError::MaterialIndexOutOfRange {
                    face: face_idx,
                    index,
                    len,
                }
            }
            other => other,
        })?;

    let mut vertices = [TriangleVertex::default(); 3];
    for (vertex, corner) in vertices.iter_mut().zip(corners) {
        *vertex = TriangleVertex {
            vertex_coordinates_idx: corner_index(
                face_idx,
                "position",
                corner.position,
                scene.vertex_coordinates.len(),
            )?,
            normal_idx: corner_index(face_idx, "normal", corner.normal, scene.normals.len())?,
            uv_idx: corner_index(face_idx, "uv", corner.uv, scene.uv_coordinates.len())?,
        };
    }

    Ok(Triangle {
        material_idx,
        vertices,
    })
}

fn corner_index(
    face: usize,
    attribute: &'static str,
    index: Option<usize>,
    len: usize,
) -> Result<u16, ExportError> {
    let index = index.ok_or(ExportError::MissingVertexAttribute { face, attribute })?;
    checked_index(face, attribute, index, len)
}

/// 16-bit index that resolves in an array of `len` records
fn checked_index(
    face: usize,
    attribute: &'static str,
    index: usize,
    len: usize,
) -> Result<u16, ExportError> {
    let narrow = u16::try_from(index).map_err(|_| ExportError::IndexOverflow {
        face,
        attribute,
        index,
    })?;
    if index >= len {
        return Err(ExportError::IndexOutOfBounds {
            face,
            attribute,
            index,
            len,
        });
    }
    Ok(narrow)
}
