//! ECS resources made available to systems.
//!
//! Overview
//! - `appconfig` – viewer settings loaded from an INI file
//! - `atlasloader` – XML atlas descriptions and the texture loader seam
//! - `input` – double-buffered keyboard and mouse snapshots
//! - `textureatlas` – named regions and animations cut from one texture
//! - `texturestore` – loaded textures keyed by string IDs
//! - `worldtime` – simulation time and delta
pub mod appconfig;
pub mod atlasloader;
pub mod input;
pub mod textureatlas;
pub mod texturestore;
pub mod worldtime;
