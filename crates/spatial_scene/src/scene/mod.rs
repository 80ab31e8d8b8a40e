//! Scene understanding pipeline
//!
//! ## Architecture
//!
//! ```text
//! SceneProvider ──(poller thread)──> SnapshotCell
//!                                          ↓
//!          SceneManager ── decode ──> DisplayPipeline ──> VisualSceneBuilder
//! ```
//!
//! The poller keeps the newest serialized scene in a [`SnapshotCell`]. The
//! [`SceneManager`] decides when to display it and feeds decoded scenes to
//! the [`DisplayPipeline`], which builds nodes through a
//! [`VisualSceneBuilder`] a few objects per frame.

pub mod codec;
pub mod display;
pub mod model;
pub mod orientation;
pub mod poller;
pub mod provider;
pub mod scene_graph;
pub mod snapshot;

mod scene_manager;

pub use codec::{CodecError, RonSceneCodec, SceneCodec};
pub use display::{
    DisplayError, DisplayJob, DisplayPipeline, DisplayProgress, DisplayReport, PlacedScene, RootPlacement,
};
pub use model::{Scene, SceneMesh, SceneObjectKind, SceneObjectRecord, SceneQuad, SurfaceKind, SurfaceMask};
pub use orientation::compute_up_rotation;
pub use poller::{RetrievalPlan, ScenePoller};
pub use provider::{AccessStatus, ProviderError, QuerySettings, SceneProvider};
pub use scene_graph::{Collider, Geometry, Label, NodeKey, VisualNode, VisualSceneBuilder, VisualTree};
pub use scene_manager::{SceneManager, SceneSource};
pub use snapshot::{SceneSnapshot, SnapshotCell};

use crate::assets::ExportError;
use thiserror::Error;

/// Errors surfaced by [`SceneManager`]
#[derive(Error, Debug)]
pub enum SceneError {
    /// Platform support or access problem, or a failed query
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A buffer could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Writing to disk failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The poller thread could not be started
    #[error("failed to start scene poller: {0}")]
    Io(#[from] std::io::Error),
}
