//! Wavefront OBJ export
//!
//! All meshes of one object kind are merged into a single file. Vertices are
//! transformed by their object's location (provider space, no handedness
//! flip) and carry the kind's color as `v x y z r g b`. Faces are 1-based.

use crate::assets::ExportError;
use crate::foundation::math::Vec3;
use crate::render::coordinates::transform_point;
use crate::render::Color;
use crate::scene::model::{SceneObjectKind, SceneObjectRecord};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// What [`write_kind_obj`] wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjSummary {
    /// Output file
    pub path: PathBuf,
    /// Vertices written
    pub vertices: usize,
    /// Faces written
    pub faces: usize,
}

/// `SU_<Kind>_<timestamp>.obj`
pub fn obj_file_name(kind: SceneObjectKind, timestamp: u64) -> String {
    format!("SU_{}_{timestamp}.obj", kind.name())
}

/// Render the OBJ text for a set of objects
pub fn obj_text<'a>(objects: impl IntoIterator<Item = &'a SceneObjectRecord>, color: Color) -> (String, usize, usize) {
    let mut vertices = String::new();
    let mut faces = String::new();
    let mut vertex_count = 0usize;
    let mut face_count = 0usize;

    for object in objects {
        let location = object.location_matrix();
        for mesh in &object.meshes {
            let offset = vertex_count;
            for p in &mesh.positions {
                let v = transform_point(&location, Vec3::new(p[0], p[1], p[2]));
                let _ = writeln!(vertices, "v {} {} {} {} {} {}", v.x, v.y, v.z, color.r, color.g, color.b);
            }
            vertex_count += mesh.positions.len();

            for tri in mesh.indices.chunks_exact(3) {
                let _ = writeln!(
                    faces,
                    "f {} {} {}",
                    offset + tri[0] as usize + 1,
                    offset + tri[1] as usize + 1,
                    offset + tri[2] as usize + 1
                );
                face_count += 1;
            }
        }
    }

    vertices.push_str(&faces);
    (vertices, vertex_count, face_count)
}

/// Write every mesh of `objects` into `dir/file_name`.
///
/// Returns [`ExportError::Empty`] without touching the disk when the objects
/// carry no geometry.
pub fn write_kind_obj<'a>(
    dir: &Path,
    file_name: &str,
    objects: impl IntoIterator<Item = &'a SceneObjectRecord>,
    color: Color,
) -> Result<ObjSummary, ExportError> {
    let (text, vertices, faces) = obj_text(objects, color);
    if vertices == 0 {
        return Err(ExportError::Empty(file_name.to_string()));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, text)?;
    log::info!("Exported {vertices} vertices and {faces} faces to {:?}", path);

    Ok(ObjSummary { path, vertices, faces })
}
