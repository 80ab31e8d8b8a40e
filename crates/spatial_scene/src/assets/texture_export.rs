//! PNG dumps of composited mask textures

use crate::assets::ExportError;
use image::RgbaImage;
use std::path::Path;

/// Save a texture as PNG
pub fn write_texture_png(texture: &RgbaImage, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    texture
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| ExportError::Image(format!("Failed to write {:?}: {}", path, e)))?;
    log::debug!("Wrote {}x{} texture to {:?}", texture.width(), texture.height(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let texture = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255]));

        write_texture_png(&texture, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, texture);
    }
}
