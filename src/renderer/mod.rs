//! Rendering module
//!
//! `scene` is platform independent and describes a frame as draw commands;
//! `canvas` (web only) executes them on a 2D canvas context.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, ImageBank};
pub use scene::{DrawCommand, build_scene};
