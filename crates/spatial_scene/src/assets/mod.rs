//! Writing scene data to disk
//!
//! Raw scene buffers are persisted as `.bytes` fragments that can be fed back
//! into the desktop path; decoded scenes can be exported as one OBJ file per
//! object kind; mask textures can be dumped as PNG.

pub mod fragments;
pub mod obj_export;
pub mod texture_export;

pub use fragments::{fragment_file_name, load_fragments, snapshot_file_name, timestamp_secs, write_fragment};
pub use obj_export::{obj_file_name, write_kind_obj, ObjSummary};
pub use texture_export::write_texture_png;

use thiserror::Error;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// File system failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to write
    #[error("nothing to export: {0}")]
    Empty(String),

    /// Texture encoding failed
    #[error("image error: {0}")]
    Image(String),
}
