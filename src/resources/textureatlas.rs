//! Texture atlas resource.
//!
//! A [`TextureAtlas`] splits a single texture into named [`TextureRegion`]s
//! and groups regions into named [`Animation`]s. Sprites and animated sprites
//! are built from the atlas by name.
//!
//! Regions and animations are shared through [`Arc`] so that sprites can keep
//! referencing them without owning the atlas. Entries live as long as the
//! atlas (or any sprite still holding them).
//!
//! The XML loader lives in [`crate::resources::atlasloader`].

use std::sync::Arc;
use std::time::Duration;

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

use crate::components::animatedsprite::AnimatedSprite;
use crate::components::sprite::{RenderAttributes, Sprite};
use crate::error::{AtlasError, Result};
use crate::systems::render::SpriteBatch;

/// Delay used by [`Animation::default`].
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Rectangle inside a texture, in pixels.
///
/// `tex_key` is the id of the texture in
/// [`TextureStore`](crate::resources::texturestore::TextureStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRegion {
    pub tex_key: Arc<str>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TextureRegion {
    pub fn new(tex_key: Arc<str>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            tex_key,
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the region as a vector.
    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width as f32, self.height as f32)
    }

    /// Forward a draw of this region to the batch.
    pub fn draw(&self, batch: &mut impl SpriteBatch, position: Vector2, render: &RenderAttributes) {
        batch.draw_region(self, position, render);
    }
}

/// Ordered frames plus the time each frame stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub frames: Vec<Arc<TextureRegion>>,
    pub delay: Duration,
}

impl Animation {
    pub fn new(frames: Vec<Arc<TextureRegion>>, delay: Duration) -> Self {
        Self { frames, delay }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_FRAME_DELAY)
    }
}

/// Registry of named regions and animations cut from one texture.
#[derive(Resource, Debug, Clone)]
pub struct TextureAtlas {
    texture: Arc<str>,
    regions: FxHashMap<String, Arc<TextureRegion>>,
    animations: FxHashMap<String, Arc<Animation>>,
}

impl TextureAtlas {
    /// Create an empty atlas bound to the given texture id.
    pub fn new(texture: impl Into<Arc<str>>) -> Self {
        Self {
            texture: texture.into(),
            regions: FxHashMap::default(),
            animations: FxHashMap::default(),
        }
    }

    /// Create an atlas with no texture bound yet.
    ///
    /// Regions added before [`set_texture`](Self::set_texture) keep the empty
    /// texture id.
    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn texture(&self) -> &Arc<str> {
        &self.texture
    }

    pub fn set_texture(&mut self, texture: impl Into<Arc<str>>) {
        self.texture = texture.into();
    }

    /// Cut a region out of the atlas texture and register it under `name`.
    pub fn add_region(
        &mut self,
        name: impl Into<String>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        let name = name.into();
        if self.regions.contains_key(&name) {
            return Err(AtlasError::DuplicateRegion(name));
        }
        let region = TextureRegion::new(self.texture.clone(), x, y, width, height);
        self.regions.insert(name, Arc::new(region));
        Ok(())
    }

    pub fn get_region(&self, name: &str) -> Result<&Arc<TextureRegion>> {
        self.regions
            .get(name)
            .ok_or_else(|| AtlasError::RegionNotFound(name.to_string()))
    }

    /// Returns true if a region was registered under `name`.
    pub fn remove_region(&mut self, name: &str) -> bool {
        self.regions.remove(name).is_some()
    }

    /// Remove every region. Animations keep the frames they already hold.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn add_animation(&mut self, name: impl Into<String>, animation: Animation) -> Result<()> {
        let name = name.into();
        if self.animations.contains_key(&name) {
            return Err(AtlasError::DuplicateAnimation(name));
        }
        self.animations.insert(name, Arc::new(animation));
        Ok(())
    }

    pub fn get_animation(&self, name: &str) -> Result<&Arc<Animation>> {
        self.animations
            .get(name)
            .ok_or_else(|| AtlasError::AnimationNotFound(name.to_string()))
    }

    pub fn remove_animation(&mut self, name: &str) -> bool {
        self.animations.remove(name).is_some()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    /// Build a static sprite showing the named region.
    pub fn create_sprite(&self, region_name: &str) -> Result<Sprite> {
        Ok(Sprite::new(self.get_region(region_name)?.clone()))
    }

    /// Build an animated sprite playing the named animation from frame 0.
    pub fn create_animated_sprite(&self, animation_name: &str) -> Result<AnimatedSprite> {
        AnimatedSprite::new(self.get_animation(animation_name)?.clone())
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self::empty()
    }
}
