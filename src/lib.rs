//! Atlaskit library.
//!
//! Texture atlases loaded from XML, static and animated sprites, and
//! double-buffered keyboard/mouse input for raylib + bevy_ecs games.

pub mod components;
pub mod error;
pub mod resources;
pub mod systems;
