//! Scene data source abstraction
//!
//! The mixed-reality runtime is reached through [`SceneProvider`]. It hands
//! out serialized scenes on demand and knows how to place a scene's origin
//! in the host's coordinate system.

use crate::core::config::LevelOfDetail;
use crate::foundation::math::Mat4;
use crate::scene::model::Scene;
use std::fmt;

/// Result of asking the runtime for scene access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    /// Access granted
    Allowed,
    /// The application does not declare the capability
    NotDeclaredByApp,
    /// The user refused
    DeniedByUser,
    /// The user has not been asked yet
    UserPromptRequired,
    /// System policy refused
    DeniedBySystem,
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a single query asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuerySettings {
    /// Quad representation of objects
    pub enable_quads: bool,
    /// Mesh representation of objects
    pub enable_meshes: bool,
    /// Only objects that were actually observed
    pub enable_only_observed: bool,
    /// The world mesh
    pub enable_world_mesh: bool,
    /// Requested mesh resolution
    pub level_of_detail: LevelOfDetail,
    /// Query radius in metres
    pub bounding_sphere_radius: f32,
}

impl QuerySettings {
    /// First query after start-up: observed object meshes only, coarse
    pub fn initial(bounding_sphere_radius: f32) -> Self {
        Self {
            enable_quads: false,
            enable_meshes: true,
            enable_only_observed: true,
            enable_world_mesh: false,
            level_of_detail: LevelOfDetail::Coarse,
            bounding_sphere_radius,
        }
    }
    
    /// Steady-state query: quads, meshes and the world mesh. Filtering is
    /// left to the display side.
    pub fn full(bounding_sphere_radius: f32, request_inferred: bool, level_of_detail: LevelOfDetail) -> Self {
        Self {
            enable_quads: true,
            enable_meshes: true,
            enable_only_observed: !request_inferred,
            enable_world_mesh: true,
            level_of_detail,
            bounding_sphere_radius,
        }
    }
}

/// Errors reported by a provider
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Scene understanding is unavailable on this platform
    #[error("scene understanding is not supported on this platform")]
    Unsupported,
    
    /// Access to scene data was refused
    #[error("access to scene understanding denied: {0}")]
    AccessDenied(AccessStatus),
    
    /// A query failed
    #[error("scene query failed: {0}")]
    Query(String),
}

/// Source of serialized scenes
pub trait SceneProvider: Send + Sync {
    /// Whether the platform offers scene data at all
    fn is_supported(&self) -> bool;
    
    /// Ask the runtime for access
    fn request_access(&self) -> AccessStatus;
    
    /// Compute and serialize the current scene
    fn compute_serialized(&self, settings: &QuerySettings) -> Result<Vec<u8>, ProviderError>;
    
    /// Transform from the scene's origin to the host's coordinate system,
    /// in the provider's right-handed space. `None` when the runtime cannot
    /// locate the origin right now.
    fn scene_to_host_transform(&self, scene: &Scene) -> Option<Mat4>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_query_is_minimal() {
        let settings = QuerySettings::initial(10.0);
        assert!(!settings.enable_quads);
        assert!(settings.enable_meshes);
        assert!(settings.enable_only_observed);
        assert!(!settings.enable_world_mesh);
        assert_eq!(settings.level_of_detail, LevelOfDetail::Coarse);
    }

    #[test]
    fn test_full_query_inference_flag() {
        assert!(!QuerySettings::full(10.0, true, LevelOfDetail::Fine).enable_only_observed);
        assert!(QuerySettings::full(10.0, false, LevelOfDetail::Fine).enable_only_observed);
    }
}
