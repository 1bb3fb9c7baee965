//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, inert on native)
//! - Input events (keyboard and pointer mapping)

pub mod input;
pub mod storage;

pub use input::{InputEvent, map_key};
