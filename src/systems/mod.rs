//! Per-frame systems.
//!
//! Submodules overview
//! - [`animation`] – advance animated sprites by the frame delta
//! - [`input`] – poll the input device into [`crate::resources::input::InputManager`]
//! - [`render`] – sprite batch and raylib drawing
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod input;
pub mod render;
pub mod time;
