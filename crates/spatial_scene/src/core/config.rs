//! # Unified Configuration System
//!
//! All settings of the scene pipeline in one place. Every structure is
//! serde-enabled and uses `#[serde(default)]`, so a TOML or RON file only
//! needs to list the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Display filter**: which object kinds are shown and how
//! - **Display**: colors, mask resolution, frame budget, colliders
//! - **Query**: what the background poller asks the provider for
//! - **Manager**: auto-refresh policy plus the sections above

use serde::{Deserialize, Serialize};

use crate::render::{Color, MaskResolution};
use crate::scene::model::SceneObjectKind;

pub use crate::config::{Config, ConfigError};

/// Smallest query radius the provider accepts, in metres
pub const MIN_BOUNDING_SPHERE_RADIUS: f32 = 5.0;

/// Largest query radius the provider accepts, in metres
pub const MAX_BOUNDING_SPHERE_RADIUS: f32 = 100.0;

/// How scene objects (other than the world mesh) are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// One flat quad per scene quad
    Quad,
    /// Quads textured with their surface mask
    QuadWithMask,
    /// Shaded object meshes
    #[default]
    Mesh,
    /// Object meshes as wireframe
    Wireframe,
}

impl RenderMode {
    /// Whether this mode draws quads rather than meshes
    pub fn uses_quads(self) -> bool {
        matches!(self, Self::Quad | Self::QuadWithMask)
    }
}

/// Mesh resolution requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelOfDetail {
    /// Fewest triangles
    Coarse,
    /// Balanced
    #[default]
    Medium,
    /// Most triangles
    Fine,
}

/// # Display Filter
///
/// Toggles deciding which scene objects reach the visual host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayFilterConfig {
    /// Master switch for every kind except the world mesh
    pub render_scene_objects: bool,
    /// Draw the world mesh
    pub render_world_mesh: bool,
    /// Draw platforms
    pub render_platforms: bool,
    /// Draw background objects
    pub render_background: bool,
    /// Draw unknown objects
    pub render_unknown: bool,
    /// Draw completely inferred objects
    pub render_completely_inferred: bool,
    /// Attach text labels to recognizable kinds
    pub display_text_labels: bool,
    /// Drawing mode for scene objects
    pub render_mode: RenderMode,
    /// Mesh resolution
    pub level_of_detail: LevelOfDetail,
}

impl DisplayFilterConfig {
    /// Whether an object of `kind` passes the filter.
    ///
    /// World objects only follow `render_world_mesh`; every other kind needs
    /// `render_scene_objects` and, where one exists, its own toggle.
    pub fn allows(&self, kind: SceneObjectKind) -> bool {
        match kind {
            SceneObjectKind::World => self.render_world_mesh,
            _ if !self.render_scene_objects => false,
            SceneObjectKind::Platform => self.render_platforms,
            SceneObjectKind::Background => self.render_background,
            SceneObjectKind::Unknown => self.render_unknown,
            SceneObjectKind::CompletelyInferred => self.render_completely_inferred,
            SceneObjectKind::Wall | SceneObjectKind::Floor | SceneObjectKind::Ceiling => true,
        }
    }
    
    /// Set the render mode
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }
    
    /// Toggle the world mesh
    pub fn with_world_mesh(mut self, enabled: bool) -> Self {
        self.render_world_mesh = enabled;
        self
    }
}

impl Default for DisplayFilterConfig {
    fn default() -> Self {
        Self {
            render_scene_objects: true,
            render_world_mesh: false,
            render_platforms: true,
            render_background: true,
            render_unknown: true,
            render_completely_inferred: true,
            display_text_labels: true,
            render_mode: RenderMode::default(),
            level_of_detail: LevelOfDetail::default(),
        }
    }
}

/// # Scene Colors
///
/// Tint per object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneColors {
    /// Background objects
    pub background: Color,
    /// Walls
    pub wall: Color,
    /// Floors
    pub floor: Color,
    /// Ceilings
    pub ceiling: Color,
    /// Platforms
    pub platform: Color,
    /// Unknown objects
    pub unknown: Color,
    /// Completely inferred objects
    pub completely_inferred: Color,
    /// World mesh
    pub world: Color,
}

impl SceneColors {
    /// Tint for `kind`
    pub fn for_kind(&self, kind: SceneObjectKind) -> Color {
        match kind {
            SceneObjectKind::Background => self.background,
            SceneObjectKind::Wall => self.wall,
            SceneObjectKind::Floor => self.floor,
            SceneObjectKind::Ceiling => self.ceiling,
            SceneObjectKind::Platform => self.platform,
            SceneObjectKind::Unknown => self.unknown,
            SceneObjectKind::CompletelyInferred => self.completely_inferred,
            SceneObjectKind::World => self.world,
        }
    }
}

impl Default for SceneColors {
    fn default() -> Self {
        Self {
            background: Color::new(0.953, 0.475, 0.875, 1.0),
            wall: Color::new(0.953, 0.494, 0.475, 1.0),
            floor: Color::new(0.733, 0.953, 0.475, 1.0),
            ceiling: Color::new(0.475, 0.596, 0.953, 1.0),
            platform: Color::new(0.204, 0.792, 0.714, 1.0),
            unknown: Color::new(1.0, 1.0, 1.0, 1.0),
            completely_inferred: Color::new(0.5, 0.5, 0.5, 1.0),
            world: Color::new(0.0, 1.0, 1.0, 1.0),
        }
    }
}

/// # Display Configuration
///
/// Everything the display pipeline needs besides the scene data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Kind filter and render mode
    pub filter: DisplayFilterConfig,
    /// Per-kind tint
    pub colors: SceneColors,
    /// Texture size for quad masks
    pub mask_resolution: MaskResolution,
    /// Displayed objects per cooperative slice
    pub yield_every: usize,
    /// Attach box/mesh colliders
    pub add_colliders: bool,
    /// Render everything with the occlusion-only material
    pub ghost_mode: bool,
}

impl DisplayConfig {
    /// Replace the filter
    pub fn with_filter(mut self, filter: DisplayFilterConfig) -> Self {
        self.filter = filter;
        self
    }
    
    /// Enable or disable colliders
    pub fn with_colliders(mut self, enabled: bool) -> Self {
        self.add_colliders = enabled;
        self
    }
    
    /// Set how many objects are displayed per slice (at least one)
    pub fn with_yield_every(mut self, objects: usize) -> Self {
        self.yield_every = objects.max(1);
        self
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            filter: DisplayFilterConfig::default(),
            colors: SceneColors::default(),
            mask_resolution: MaskResolution::default(),
            yield_every: 5,
            add_colliders: false,
            ghost_mode: false,
        }
    }
}

/// # Query Configuration
///
/// Parameters of the background poller's requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Radius around the observer, clamped to the accepted range on use
    pub bounding_sphere_radius: f32,
    /// Ask for inferred (not only observed) objects
    pub request_inferred_regions: bool,
    /// Pause between two queries, in milliseconds
    pub poll_interval_ms: u64,
}

impl QueryConfig {
    /// The radius clamped to `[MIN_BOUNDING_SPHERE_RADIUS, MAX_BOUNDING_SPHERE_RADIUS]`
    pub fn clamped_radius(&self) -> f32 {
        self.bounding_sphere_radius
            .clamp(MIN_BOUNDING_SPHERE_RADIUS, MAX_BOUNDING_SPHERE_RADIUS)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            bounding_sphere_radius: 10.0,
            request_inferred_regions: true,
            poll_interval_ms: 0,
        }
    }
}

/// # Manager Configuration
///
/// Top-level configuration of the scene manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Redisplay automatically when a newer snapshot arrives
    pub auto_refresh: bool,
    /// Seconds between two auto-refresh checks
    pub auto_refresh_interval_secs: f32,
    /// Provider query parameters
    pub query: QueryConfig,
    /// Display pipeline parameters
    pub display: DisplayConfig,
}

impl ManagerConfig {
    /// Set the auto-refresh policy
    pub fn with_auto_refresh(mut self, enabled: bool, interval_secs: f32) -> Self {
        self.auto_refresh = enabled;
        self.auto_refresh_interval_secs = interval_secs;
        self
    }
    
    /// Replace the display section
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            auto_refresh_interval_secs: 10.0,
            query: QueryConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config for ManagerConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_ignores_scene_object_switch() {
        let filter = DisplayFilterConfig {
            render_scene_objects: false,
            render_world_mesh: true,
            ..DisplayFilterConfig::default()
        };
        assert!(filter.allows(SceneObjectKind::World));
        assert!(!filter.allows(SceneObjectKind::Wall));
        assert!(!filter.allows(SceneObjectKind::Platform));
    }

    #[test]
    fn test_per_kind_toggles() {
        let filter = DisplayFilterConfig {
            render_platforms: false,
            render_completely_inferred: false,
            ..DisplayFilterConfig::default()
        };
        assert!(!filter.allows(SceneObjectKind::Platform));
        assert!(!filter.allows(SceneObjectKind::CompletelyInferred));
        assert!(filter.allows(SceneObjectKind::Floor));
        assert!(filter.allows(SceneObjectKind::Background));
        // World mesh is off by default
        assert!(!filter.allows(SceneObjectKind::World));
    }

    #[test]
    fn test_radius_clamp() {
        let mut query = QueryConfig::default();
        query.bounding_sphere_radius = 1.0;
        assert_eq!(query.clamped_radius(), MIN_BOUNDING_SPHERE_RADIUS);
        query.bounding_sphere_radius = 500.0;
        assert_eq!(query.clamped_radius(), MAX_BOUNDING_SPHERE_RADIUS);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            auto_refresh = false

            [display]
            yield_every = 3

            [display.filter]
            render_mode = "QuadWithMask"
        "#;
        let config = ManagerConfig::from_text(text, crate::config::ConfigFormat::Toml).unwrap();
        assert!(!config.auto_refresh);
        assert_eq!(config.display.yield_every, 3);
        assert_eq!(config.display.filter.render_mode, RenderMode::QuadWithMask);
        assert_eq!(config.display.colors, SceneColors::default());
        assert_eq!(config.query, QueryConfig::default());
    }

    #[test]
    fn test_ron_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");
        let config = ManagerConfig::default().with_auto_refresh(false, 2.5);
        config.save_to_file(&path).unwrap();
        assert_eq!(ManagerConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = ManagerConfig::load_from_file("scene.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
