//! Serialized scene buffers
//!
//! The provider hands out opaque byte buffers. A [`SceneCodec`] turns them
//! into [`Scene`] records and back (the latter is what persisted fragments
//! and the demo tools use).

use crate::scene::model::Scene;

/// Codec errors
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// Buffer could not be parsed
    #[error("failed to decode scene: {0}")]
    Decode(String),
    
    /// Scene could not be written
    #[error("failed to encode scene: {0}")]
    Encode(String),
}

/// Converts between scene buffers and decoded scenes
pub trait SceneCodec: Send + Sync {
    /// Parse a buffer
    fn decode(&self, bytes: &[u8]) -> Result<Scene, CodecError>;
    
    /// Serialize a scene
    fn encode(&self, scene: &Scene) -> Result<Vec<u8>, CodecError>;
}

/// RON text encoding of [`Scene`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RonSceneCodec;

impl SceneCodec for RonSceneCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Scene, CodecError> {
        ron::de::from_bytes(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
    
    fn encode(&self, scene: &Scene) -> Result<Vec<u8>, CodecError> {
        ron::ser::to_string(scene)
            .map(String::into_bytes)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::model::{SceneMesh, SceneObjectKind, SceneObjectRecord, SceneQuad, SurfaceMask, IDENTITY_LOCATION};

    #[test]
    fn test_ron_codec_preserves_records() {
        let mut floor = SceneObjectRecord::new(SceneObjectKind::Floor, IDENTITY_LOCATION);
        floor.quads.push(SceneQuad {
            extents: [3.0, 2.5],
            mask: Some(SurfaceMask { width: 2, height: 1, texels: vec![0, 1] }),
        });
        floor.meshes.push(SceneMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            indices: vec![0, 1, 2],
        });
        let scene = Scene::new(vec![floor, SceneObjectRecord::new(SceneObjectKind::World, IDENTITY_LOCATION)]);

        let codec = RonSceneCodec;
        let bytes = codec.encode(&scene).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), scene);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = RonSceneCodec.decode(b"\x00\x01 not a scene").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_optional_sections_default() {
        let text = b"(objects: [(kind: Wall, location: ((1.0, 0.0, 0.0, 0.0), (0.0, 1.0, 0.0, 0.0), (0.0, 0.0, 1.0, 0.0), (0.0, 0.0, 0.0, 1.0)))])";
        let scene = RonSceneCodec.decode(text).unwrap();
        assert_eq!(scene.objects.len(), 1);
        assert!(scene.objects[0].quads.is_empty());
        assert!(scene.objects[0].collider_meshes.is_empty());
    }
}
