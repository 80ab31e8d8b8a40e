//! Renderer-agnostic geometry, materials and coordinate conversion
//!
//! Nothing in here talks to a GPU. These modules turn scene records into
//! plain data (matrices, meshes, textures) that a visual host consumes.

pub mod coordinates;
pub mod mask;
pub mod material;
pub mod mesh;

pub use coordinates::{decompose, to_engine_space, try_decompose, CoordinateConverter, CoordinateSystem};
pub use mask::{apply_mask, MaskError, MaskResolution};
pub use material::{Color, Material, MaterialKind};
pub use mesh::{combine_meshes, quad_mesh, GeometryError, IndexFormat, MeshData};
