//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and the position/rotation/scale transform
//! - Time management (stopwatch and refresh interval)
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
