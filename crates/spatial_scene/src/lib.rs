//! # Spatial Scene
//!
//! Turns mixed-reality scene understanding data into a renderable scene
//! tree, a few objects per frame.
//!
//! ## Features
//!
//! - **Background Retrieval**: A poller thread keeps the newest serialized
//!   scene in a lock-protected snapshot cell
//! - **Incremental Display**: A cooperative pipeline rebuilds the visual tree
//!   without stalling the frame loop
//! - **Coordinate Conversion**: Right-handed provider space to the engine's
//!   left-handed space
//! - **Floor Alignment**: Persisted scenes are rotated so the floor is level
//! - **Quad Masks**: Surface masks composited into RGBA textures
//! - **Export**: Raw buffers, per-kind OBJ files and PNG masks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spatial_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("SU_Frag0.bytes")?;
//!     let mut manager = SceneManager::new(
//!         ManagerConfig::default(),
//!         SceneSource::Fragments(vec![bytes]),
//!         Box::new(RonSceneCodec),
//!     );
//!     manager.start()?;
//!
//!     let mut tree = VisualTree::default();
//!     if let Some(report) = manager.bake(&mut tree)? {
//!         println!("{} objects displayed", report.objects_displayed);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod scene;

pub use scene::SceneError;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        core::config::{Config, DisplayConfig, DisplayFilterConfig, LevelOfDetail, ManagerConfig, RenderMode},
        foundation::math::{Mat4, Quat, Transform, Vec3},
        render::{decompose, to_engine_space, Color, MaskResolution},
        scene::{
            DisplayProgress, DisplayReport, RonSceneCodec, Scene, SceneCodec, SceneManager, SceneObjectKind,
            SceneObjectRecord, SceneProvider, SceneSource, VisualSceneBuilder, VisualTree,
        },
        SceneError,
    };
}
