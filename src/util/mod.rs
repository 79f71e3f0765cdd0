//! Shared utilities for the viewport controller.
//!
//! Helpers for frame timing, quaternion stepping, and colour conversion.

pub mod color;
pub mod frame_timing;
pub mod rotation;
