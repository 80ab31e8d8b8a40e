//! Material descriptions handed to the visual host

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Fully transparent black
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    
    /// Create a color from its components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    
    /// Same color with full alpha
    pub const fn opaque(self) -> Self {
        Self { a: 1.0, ..self }
    }
    
    /// Quantize to 8-bit RGBA
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Which shading the host should use for a piece of geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Solid shaded mesh
    Mesh,
    /// Quad material sampling the surface mask texture
    MaskedQuad,
    /// Wireframe overlay
    Wireframe,
    /// Invisible material that only writes depth
    TransparentOcclusion,
}

/// Material instance attached to a geometry node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Shading kind
    pub kind: MaterialKind,
    /// Tint, if any
    pub color: Option<Color>,
}

impl Material {
    /// Create a material
    pub fn new(kind: MaterialKind, color: Option<Color>) -> Self {
        Self { kind, color }
    }
    
    /// Replace the shading with the occlusion-only material, keeping the tint
    pub fn ghosted(self) -> Self {
        Self { kind: MaterialKind::TransparentOcclusion, ..self }
    }
}
