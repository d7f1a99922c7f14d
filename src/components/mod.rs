//! ECS components for sprites.
//!
//! Submodules overview:
//! - [`animatedsprite`] – frame timer cycling a sprite's region, plus a bundle pairing both
//! - [`mapposition`] – world-space position a sprite is drawn at
//! - [`sprite`] – atlas region and render attributes (tint, rotation, scale, origin, flips, depth)

pub mod animatedsprite;
pub mod mapposition;
pub mod sprite;
