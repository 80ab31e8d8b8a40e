//! Mesh data for scene geometry
//!
//! Pure data handed to the visual host. Positions are already in the host's
//! left-handed space.

use crate::foundation::math::{Vec2, Vec3};
use crate::render::coordinates::CoordinateConverter;
use crate::scene::model::SceneMesh;

/// Largest vertex count addressable with 16-bit indices
pub const MAX_U16_VERTICES: usize = 65_535;

/// Index width the host should allocate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

/// Mesh geometry errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// An index refers past the end of the vertex list
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Vertices available
        vertex_count: usize,
    },
    
    /// The index list is not made of whole triangles
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Triangle-list mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Texture coordinates, empty when the mesh is untextured
    pub uvs: Vec<Vec2>,
}

impl MeshData {
    /// Index width required by the vertex count
    pub fn index_format(&self) -> IndexFormat {
        if self.positions.len() > MAX_U16_VERTICES {
            IndexFormat::U32
        } else {
            IndexFormat::U16
        }
    }
    
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Build the centred quad used for a scene quad of `extents` (width, height).
///
/// The quad lies in the local XY plane; UVs map the lower-left corner to
/// `(0, 0)`.
pub fn quad_mesh(extents: Vec2) -> MeshData {
    let (hw, hh) = (extents.x / 2.0, extents.y / 2.0);
    MeshData {
        positions: vec![
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
        ],
        indices: vec![1, 3, 0, 3, 2, 0],
        uvs: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ],
    }
}

/// Merge provider meshes into one host mesh.
///
/// Vertices are converted to the host's handedness and each mesh's indices
/// are offset by the number of vertices already merged.
pub fn combine_meshes<'a>(meshes: impl IntoIterator<Item = &'a SceneMesh>) -> Result<MeshData, GeometryError> {
    let converter = CoordinateConverter::default();
    let mut combined = MeshData::default();
    
    for mesh in meshes {
        if mesh.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(mesh.indices.len()));
        }
        let vertex_count = mesh.positions.len();
        if let Some(&index) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange { index, vertex_count });
        }
        
        #[allow(clippy::cast_possible_truncation)]
        let offset = combined.positions.len() as u32;
        combined.positions.extend(mesh.positions.iter().map(|p| converter.convert_point(*p)));
        combined.indices.extend(mesh.indices.iter().map(|i| i + offset));
    }
    
    if combined.index_format() == IndexFormat::U32 {
        log::debug!(
            "combine_meshes: {} vertices, using a 32-bit index buffer",
            combined.positions.len()
        );
    }
    
    Ok(combined)
}
