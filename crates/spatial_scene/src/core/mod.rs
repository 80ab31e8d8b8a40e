//! # Core Module
//!
//! Shared configuration types used by the scene pipeline, the background
//! poller and the scene manager.
//!
//! ## Organization
//!
//! - **Config**: Display filters, render mode, query and refresh settings
//! - **Foundation**: Low-level utilities (math, time, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    Config,
    ConfigError,
    DisplayConfig,
    DisplayFilterConfig,
    LevelOfDetail,
    ManagerConfig,
    QueryConfig,
    RenderMode,
    SceneColors,
};
