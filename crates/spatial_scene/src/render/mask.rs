//! Quad surface-mask compositing
//!
//! A quad reports, per texel, whether that part of its rectangle is actually
//! covered by the surface. The compositor turns such a mask into an RGBA
//! texture: uncovered texels are fully transparent, covered texels take the
//! object's color at full alpha.

use crate::render::material::Color;
use crate::scene::model::SurfaceKind;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Texture size used for quad masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskResolution {
    /// Texels along the quad width
    pub width: u16,
    /// Texels along the quad height
    pub height: u16,
}

impl MaskResolution {
    /// Create a resolution
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
    
    /// Number of texels
    pub fn texel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for MaskResolution {
    fn default() -> Self {
        Self::new(256, 256)
    }
}

/// Mask compositing errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MaskError {
    /// The buffer does not hold one byte per texel
    #[error("mask holds {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        /// Bytes required by the resolution
        expected: usize,
        /// Bytes supplied
        actual: usize,
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },
    
    /// Zero-sized texture requested
    #[error("mask resolution must be non-zero")]
    EmptyResolution,
}

/// Composite a surface mask into a texture.
///
/// `mask` is row-major, one [`SurfaceKind`] byte per texel.
pub fn apply_mask(mask: &[u8], resolution: MaskResolution, base_color: Color) -> Result<RgbaImage, MaskError> {
    if resolution.texel_count() == 0 {
        return Err(MaskError::EmptyResolution);
    }
    if mask.len() != resolution.texel_count() {
        return Err(MaskError::SizeMismatch {
            expected: resolution.texel_count(),
            actual: mask.len(),
            width: resolution.width,
            height: resolution.height,
        });
    }
    
    let surface = Rgba(base_color.opaque().to_rgba8());
    let clear = Rgba(Color::CLEAR.to_rgba8());
    let width = u32::from(resolution.width);
    
    Ok(RgbaImage::from_fn(width, u32::from(resolution.height), |x, y| {
        let texel = (y * width + x) as usize;
        if mask[texel] == SurfaceKind::NotSurface as u8 {
            clear
        } else {
            surface
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOR: Color = Color::new(0.2, 0.4, 0.6, 0.5);

    #[test]
    fn test_all_not_surface_is_transparent() {
        let resolution = MaskResolution::new(8, 4);
        let mask = vec![SurfaceKind::NotSurface as u8; resolution.texel_count()];
        let texture = apply_mask(&mask, resolution, COLOR).unwrap();

        assert_eq!(texture.dimensions(), (8, 4));
        assert!(texture.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_all_surface_is_opaque_color() {
        let resolution = MaskResolution::new(4, 8);
        let mask = vec![SurfaceKind::SurfaceObserved as u8; resolution.texel_count()];
        let texture = apply_mask(&mask, resolution, COLOR).unwrap();

        let expected = COLOR.opaque().to_rgba8();
        assert!(texture.pixels().all(|p| p.0 == expected));
        assert_eq!(expected[3], 255);
    }

    #[test]
    fn test_mixed_mask_is_row_major() {
        let resolution = MaskResolution::new(2, 2);
        let mask = [
            SurfaceKind::NotSurface as u8, SurfaceKind::SurfaceInferred as u8,
            SurfaceKind::SurfaceObserved as u8, SurfaceKind::NotSurface as u8,
        ];
        let texture = apply_mask(&mask, resolution, COLOR).unwrap();

        assert_eq!(texture.get_pixel(0, 0).0[3], 0);
        assert_eq!(texture.get_pixel(1, 0).0[3], 255);
        assert_eq!(texture.get_pixel(0, 1).0[3], 255);
        assert_eq!(texture.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn test_wrong_size_is_rejected() {
        let err = apply_mask(&[0; 3], MaskResolution::new(2, 2), COLOR).unwrap_err();
        assert_eq!(err, MaskError::SizeMismatch { expected: 4, actual: 3, width: 2, height: 2 });
        assert_eq!(
            apply_mask(&[], MaskResolution::new(0, 2), COLOR).unwrap_err(),
            MaskError::EmptyResolution
        );
    }
}
