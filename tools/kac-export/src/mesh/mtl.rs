//! MTL material library parsing
//!
//! Only what KAC can store is read: the diffuse color (`Kd`) and the diffuse
//! texture map (`map_Kd`).

use std::path::{Path, PathBuf};

use super::types::SourceMaterial;
use crate::error::ExportError;

/// Parse an MTL file; texture paths are resolved against its directory
pub fn parse_mtl_file(path: &Path) -> Result<Vec<SourceMaterial>, ExportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_mtl_str(&text, base_dir, path)
}

pub(crate) fn parse_mtl_str(
    text: &str,
    base_dir: &Path,
    path: &Path,
) -> Result<Vec<SourceMaterial>, ExportError> {
    let mut materials: Vec<SourceMaterial> = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let error = |reason: &str| ExportError::ObjParse {
            path: path.to_path_buf(),
            line: line_idx + 1,
            reason: reason.to_string(),
        };

        match parts[0] {
            "newmtl" => {
                let name = parts[1..].join(" ");
                if name.is_empty() {
                    return Err(error("newmtl without a name"));
                }
                materials.push(SourceMaterial {
                    name,
                    ..SourceMaterial::default()
                });
            }
            "Kd" => {
                let material = materials
                    .last_mut()
                    .ok_or_else(|| error("Kd before newmtl"))?;
                // A single value is a grey level
                let values = parts[1..]
                    .iter()
                    .map(|p| p.parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| error("invalid Kd value"))?;
                material.diffuse = match values.as_slice() {
                    [v] => [*v; 3],
                    [r, g, b, ..] => [*r, *g, *b],
                    _ => return Err(error("Kd needs 1 or 3 values")),
                };
            }
            "map_Kd" => {
                let material = materials
                    .last_mut()
                    .ok_or_else(|| error("map_Kd before newmtl"))?;
                // Options (-s, -o, ...) come first; the file name is last
                let file = parts
                    .last()
                    .filter(|_| parts.len() > 1)
                    .ok_or_else(|| error("map_Kd without a file name"))?;
                material.diffuse_texture = Some(resolve(base_dir, file));
            }
            _ => {}
        }
    }

    Ok(materials)
}

fn resolve(base_dir: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        base_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<SourceMaterial>, ExportError> {
        parse_mtl_str(text, Path::new("assets"), Path::new("assets/test.mtl"))
    }

    #[test]
    fn test_parse_materials() {
        let materials = parse(
            "# two materials\n\
             newmtl red\n\
             Ka 0 0 0\n\
             Kd 1.0 0.0 0.0\n\
             \n\
             newmtl brick wall\n\
             Kd 0.5\n\
             map_Kd -s 1 1 1 textures/brick.png\n",
        )
        .unwrap();

        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].name, "red");
        assert_eq!(materials[0].diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(materials[0].diffuse_texture, None);

        assert_eq!(materials[1].name, "brick wall");
        assert_eq!(materials[1].diffuse, [0.5, 0.5, 0.5]);
        assert_eq!(
            materials[1].diffuse_texture,
            Some(Path::new("assets").join("textures/brick.png"))
        );
    }

    #[test]
    fn test_statement_before_newmtl() {
        let result = parse("Kd 1 1 1\n");
        assert!(matches!(result, Err(ExportError::ObjParse { line: 1, .. })));
    }

    #[test]
    fn test_invalid_kd() {
        let result = parse("newmtl a\nKd red green blue\n");
        assert!(matches!(result, Err(ExportError::ObjParse { line: 2, .. })));
    }
}
