//! Scene records as reported by the scene provider
//!
//! These are plain serde types: a decoded byte buffer yields one [`Scene`].
//! Locations are row-major 4x4 matrices in the provider's right-handed
//! space, column-vector convention.

use crate::foundation::math::{mat4_from_rows, Mat4, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic classification of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneObjectKind {
    /// Vertical boundary
    Wall,
    /// Walkable ground
    Floor,
    /// Overhead boundary
    Ceiling,
    /// Large horizontal surface such as a table
    Platform,
    /// Anything the provider could not classify but knows is not a boundary
    Background,
    /// Observed but unclassified
    Unknown,
    /// Produced entirely by inference, never observed
    CompletelyInferred,
    /// Dense mesh of the whole observed environment
    World,
}

impl SceneObjectKind {
    /// Every kind, in export order
    pub const ALL: [Self; 8] = [
        Self::Background,
        Self::Ceiling,
        Self::CompletelyInferred,
        Self::Floor,
        Self::Platform,
        Self::Unknown,
        Self::Wall,
        Self::World,
    ];
    
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::Floor => "Floor",
            Self::Ceiling => "Ceiling",
            Self::Platform => "Platform",
            Self::Background => "Background",
            Self::Unknown => "Unknown",
            Self::CompletelyInferred => "CompletelyInferred",
            Self::World => "World",
        }
    }
    
    /// Kinds a person recognizes and that therefore get a text label
    pub fn has_label(self) -> bool {
        matches!(
            self,
            Self::Wall | Self::Floor | Self::Ceiling | Self::Unknown | Self::Platform | Self::Background
        )
    }
}

impl fmt::Display for SceneObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-texel classification of a quad's surface mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SurfaceKind {
    /// Texel is not covered by the surface
    NotSurface = 0,
    /// Texel was observed on the surface
    SurfaceObserved = 1,
    /// Texel was inferred to be on the surface
    SurfaceInferred = 2,
}

/// Stored surface mask of a quad, at the provider's own resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceMask {
    /// Texels along the quad width
    pub width: u16,
    /// Texels along the quad height
    pub height: u16,
    /// Row-major [`SurfaceKind`] bytes
    pub texels: Vec<u8>,
}

/// Planar rectangle approximating a scene object's surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneQuad {
    /// Width and height in metres
    pub extents: [f32; 2],
    /// Coverage mask, if the provider supplied one
    #[serde(default)]
    pub mask: Option<SurfaceMask>,
}

impl SceneQuad {
    /// Create an unmasked quad
    pub fn new(width: f32, height: f32) -> Self {
        Self { extents: [width, height], mask: None }
    }
    
    /// Extents as a vector
    pub fn extents(&self) -> Vec2 {
        Vec2::new(self.extents[0], self.extents[1])
    }
    
    /// Width times height
    pub fn area(&self) -> f32 {
        self.extents[0] * self.extents[1]
    }
    
    /// Sample the mask at the requested resolution (nearest texel).
    ///
    /// A quad without a mask, or with an empty one, reports every texel as
    /// [`SurfaceKind::NotSurface`].
    pub fn surface_mask(&self, width: u16, height: u16) -> Vec<u8> {
        let count = usize::from(width) * usize::from(height);
        let Some(mask) = self.mask.as_ref().filter(|m| {
            m.width > 0 && m.height > 0 && m.texels.len() == usize::from(m.width) * usize::from(m.height)
        }) else {
            return vec![SurfaceKind::NotSurface as u8; count];
        };
        
        let (src_w, src_h) = (usize::from(mask.width), usize::from(mask.height));
        let (dst_w, dst_h) = (usize::from(width), usize::from(height));
        let mut out = Vec::with_capacity(count);
        for y in 0..dst_h {
            let sy = y * src_h / dst_h;
            for x in 0..dst_w {
                let sx = x * src_w / dst_w;
                out.push(mask.texels[sy * src_w + sx]);
            }
        }
        out
    }
}

/// Triangle mesh in the object's local, right-handed frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneMesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Triangle list indices
    pub indices: Vec<u32>,
}

/// One spatial entity reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObjectRecord {
    /// Classification
    pub kind: SceneObjectKind,
    /// Row-major location matrix in provider space
    pub location: [[f32; 4]; 4],
    /// Quad representation
    #[serde(default)]
    pub quads: Vec<SceneQuad>,
    /// Render meshes
    #[serde(default)]
    pub meshes: Vec<SceneMesh>,
    /// Collision meshes, index-aligned with `meshes`
    #[serde(default)]
    pub collider_meshes: Vec<SceneMesh>,
}

impl SceneObjectRecord {
    /// Create an empty record at `location`
    pub fn new(kind: SceneObjectKind, location: [[f32; 4]; 4]) -> Self {
        Self {
            kind,
            location,
            quads: Vec::new(),
            meshes: Vec::new(),
            collider_meshes: Vec::new(),
        }
    }
    
    /// Location as a matrix, still in provider space
    pub fn location_matrix(&self) -> Mat4 {
        mat4_from_rows(&self.location)
    }
}

/// Decoded form of one serialized scene buffer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Objects in provider order
    pub objects: Vec<SceneObjectRecord>,
}

impl Scene {
    /// Wrap a list of records
    pub fn new(objects: Vec<SceneObjectRecord>) -> Self {
        Self { objects }
    }
    
    /// Records of the given kind
    pub fn objects_of_kind(&self, kind: SceneObjectKind) -> impl Iterator<Item = &SceneObjectRecord> {
        self.objects.iter().filter(move |o| o.kind == kind)
    }
}

/// Row-major identity location
pub const IDENTITY_LOCATION: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let labelled: Vec<_> = SceneObjectKind::ALL.iter().filter(|k| k.has_label()).collect();
        assert_eq!(labelled.len(), 6);
        assert!(!SceneObjectKind::World.has_label());
        assert!(!SceneObjectKind::CompletelyInferred.has_label());
    }

    #[test]
    fn test_surface_mask_without_mask_is_not_surface() {
        let quad = SceneQuad::new(1.0, 2.0);
        let mask = quad.surface_mask(4, 4);
        assert_eq!(mask.len(), 16);
        assert!(mask.iter().all(|t| *t == SurfaceKind::NotSurface as u8));
    }

    #[test]
    fn test_surface_mask_nearest_upsample() {
        let quad = SceneQuad {
            extents: [1.0, 1.0],
            mask: Some(SurfaceMask { width: 2, height: 1, texels: vec![0, 1] }),
        };
        assert_eq!(quad.surface_mask(4, 2), vec![0, 0, 1, 1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_location_matrix_is_row_major() {
        let mut location = IDENTITY_LOCATION;
        location[0][3] = 5.0;
        let record = SceneObjectRecord::new(SceneObjectKind::Wall, location);
        assert_eq!(record.location_matrix()[(0, 3)], 5.0);
    }
}
