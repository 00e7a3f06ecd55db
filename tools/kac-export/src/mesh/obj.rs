//! OBJ mesh parsing
//!
//! Reads positions, texture coordinates, normals, faces, smoothing groups and
//! material assignments. Faces are kept as written (no triangulation) and
//! missing attributes stay missing; deciding what is acceptable is up to the
//! scene assembler.

use hashbrown::{HashMap, HashSet};
use std::path::Path;

use super::mtl::parse_mtl_file;
use super::types::{SourceFace, SourceFaceVertex, SourceScene};
use crate::error::ExportError;

/// Statements that carry nothing KAC can store
const IGNORED_STATEMENTS: &[&str] = &["o", "g", "vp", "l", "p", "mg"];

/// Parse an OBJ file and the material libraries it references
///
/// `mtllib` paths are resolved against the OBJ file's directory.
pub fn parse_obj_file(input: &Path) -> Result<SourceScene, ExportError> {
    let text = std::fs::read_to_string(input).map_err(|source| ExportError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let base_dir = input.parent().unwrap_or_else(|| Path::new(""));

    parse_obj_str(&text, input, |library| parse_mtl_file(&base_dir.join(library)))
}

/// Parse OBJ text; `load_library` is called for every `mtllib` entry
///
/// `path` is only used in error messages.
pub fn parse_obj_str<F>(
    text: &str,
    path: &Path,
    mut load_library: F,
) -> Result<SourceScene, ExportError>
where
    F: FnMut(&str) -> Result<Vec<super::SourceMaterial>, ExportError>,
{
    let mut scene = SourceScene::default();
    let mut material_ids: HashMap<String, usize> = HashMap::new();
    let mut current_material: Option<usize> = None;
    let mut smoothing_group = 0u32;
    let mut unknown_statements: HashSet<String> = HashSet::new();

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let error = |reason: String| ExportError::ObjParse {
            path: path.to_path_buf(),
            line: line_idx + 1,
            reason,
        };

        match parts[0] {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&parts[1..]).map_err(error)?;
                scene.positions.push([x, y, z]);
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&parts[1..]).map_err(error)?;
                scene.uvs.push([u, v]);
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&parts[1..]).map_err(error)?;
                scene.normals.push([x, y, z]);
            }
            "f" => {
                let vertices = parts[1..]
                    .iter()
                    .map(|v| parse_obj_vertex(v, &scene))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(error)?;

                scene.faces.push(SourceFace {
                    material: current_material,
                    smoothing_group,
                    vertices,
                });
            }
            "s" => {
                smoothing_group = match parts.get(1) {
                    Some(&"off") | None => 0,
                    Some(value) => value
                        .parse()
                        .map_err(|_| error(format!("invalid smoothing group '{}'", value)))?,
                };
            }
            "usemtl" => {
                let name = parts[1..].join(" ");
                let id = material_ids
                    .get(&name)
                    .copied()
                    .ok_or_else(|| error(format!("unknown material '{}'", name)))?;
                current_material = Some(id);
            }
            "mtllib" => {
                for library in &parts[1..] {
                    for material in load_library(library)? {
                        // Later definitions of the same name win, like in most OBJ loaders
                        material_ids.insert(material.name.clone(), scene.materials.len());
                        scene.materials.push(material);
                    }
                }
            }
            statement if IGNORED_STATEMENTS.contains(&statement) => {}
            statement => {
                if unknown_statements.insert(statement.to_string()) {
                    tracing::warn!("{:?}: ignoring unsupported OBJ statement '{}'", path, statement);
                }
            }
        }
    }

    tracing::debug!(
        "Parsed OBJ {:?}: {} positions, {} normals, {} uvs, {} materials, {} faces",
        path,
        scene.positions.len(),
        scene.normals.len(),
        scene.uvs.len(),
        scene.materials.len(),
        scene.faces.len()
    );

    Ok(scene)
}

/// Parse the first `N` floats of a statement (extra components such as `w` are ignored)
fn parse_floats<const N: usize>(parts: &[&str]) -> Result<[f32; N], String> {
    if parts.len() < N {
        return Err(format!("expected {} values, found {}", N, parts.len()));
    }

    let mut values = [0.0f32; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|_| format!("invalid number '{}'", part))?;
    }
    Ok(values)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str, scene: &SourceScene) -> Result<SourceFaceVertex, String> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() > 3 {
        return Err(format!("invalid face vertex '{}'", s));
    }

    let index = |i: usize, count: usize| -> Result<Option<usize>, String> {
        match parts.get(i).filter(|p| !p.is_empty()) {
            Some(p) => resolve_index(p, count).map(Some),
            None => Ok(None),
        }
    };

    Ok(SourceFaceVertex {
        position: index(0, scene.positions.len())?,
        uv: index(1, scene.uvs.len())?,
        normal: index(2, scene.normals.len())?,
    })
}

/// Turn a 1-based (or negative, relative) OBJ index into a 0-based one
fn resolve_index(s: &str, count: usize) -> Result<usize, String> {
    let index: i64 = s
        .parse()
        .map_err(|_| format!("invalid index '{}'", s))?;

    let resolved = if index > 0 {
        usize::try_from(index - 1).ok()
    } else if index < 0 {
        usize::try_from(index.unsigned_abs())
            .ok()
            .and_then(|back| count.checked_sub(back))
    } else {
        None
    };

    resolved.ok_or_else(|| format!("invalid index '{}'", s))
}
