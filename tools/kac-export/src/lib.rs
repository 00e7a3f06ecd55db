//! kac-export library
//!
//! Converts Wavefront OBJ meshes (with MTL materials and their diffuse
//! textures) to KAC 1.0 files. The binary is a thin CLI over
//! [`convert_obj`]; other tools can use the pieces directly.

pub mod config;
pub mod error;
pub mod formats;
pub mod mesh;
pub mod scene;
pub mod texture;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use config::{ExportConfig, ResizeFilter, TexturePolicy};
pub use error::ExportError;
pub use formats::{encode_scene_to_vec, EncodeError, KacWriter};
pub use scene::assemble_scene;

// Re-export the format types the API is expressed in
pub use kac_common::{FormatVersion, KacScene};

use texture::{ImageFileLoader, ImageResampler};

/// Read an OBJ file (and its materials and textures) into a validated scene
pub fn convert_obj_to_memory(input: &Path, config: &ExportConfig) -> Result<KacScene> {
    let source = mesh::parse_obj_file(input)
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    let resampler = ImageResampler::new(config.resize_filter);
    let scene = assemble_scene(&source, config, &ImageFileLoader, &resampler)
        .with_context(|| format!("Failed to convert {:?}", input))?;

    tracing::info!(
        "{:?}: {} vertices, {} triangles, {} materials, {} textures",
        input,
        scene.vertex_coordinates.len(),
        scene.triangles.len(),
        scene.materials.len(),
        scene.textures.len()
    );

    Ok(scene)
}

/// Convert an OBJ file to a KAC file
///
/// A regular output file is written next to its destination and renamed
/// into place once complete, so a failed conversion leaves the previous
/// contents (or nothing) behind. Anything else at `output` (a symlink, a
/// device, a pipe) is written through directly and never removed.
pub fn convert_obj(input: &Path, output: &Path, config: &ExportConfig) -> Result<()> {
    let scene = convert_obj_to_memory(input, config)?;

    let size = if replaces_regular_file(output) {
        write_kac_atomic(&scene, output, config.format)
    } else {
        tracing::debug!("{:?} is not a regular file, writing in place", output);
        write_kac_in_place(&scene, output, config.format)
    }
    .with_context(|| format!("Failed to write KAC: {:?}", output))?;

    tracing::info!("Wrote {:?} ({}, {} bytes)", output, config.format, size);
    Ok(())
}

/// True if `output` is missing or a plain file (not followed through symlinks)
fn replaces_regular_file(output: &Path) -> bool {
    match std::fs::symlink_metadata(output) {
        Ok(metadata) => metadata.file_type().is_file(),
        Err(_) => true,
    }
}

fn write_kac_atomic(scene: &KacScene, output: &Path, format: FormatVersion) -> Result<u64> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    let size = write_kac(scene, BufWriter::new(temp.as_file_mut()), format)?;

    // Dropping `temp` on any earlier return deletes it
    temp.persist(output)
        .map_err(|err| err.error)
        .with_context(|| format!("Failed to move output into place: {:?}", output))?;
    Ok(size)
}

fn write_kac_in_place(scene: &KacScene, output: &Path, format: FormatVersion) -> Result<u64> {
    let file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .with_context(|| format!("Failed to open output: {:?}", output))?;
    write_kac(scene, BufWriter::new(file), format)
}

fn write_kac<W: Write>(scene: &KacScene, writer: W, format: FormatVersion) -> Result<u64> {
    let mut writer = KacWriter::new(writer, format);
    writer.encode_scene(scene)?;
    let size = writer.bytes_written();
    writer.finish()?;
    Ok(size)
}
