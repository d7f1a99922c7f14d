//! Timer-driven frame cycling for sprites.
//!
//! [`AnimationTimer`] is the playback state: which frame of an
//! [`Animation`] is showing and how much time has accumulated towards the next
//! one. It drives the region of a [`Sprite`] living next to it, either on the
//! same entity (see [`crate::systems::animation`]) or inside an
//! [`AnimatedSprite`] bundle.

use std::sync::Arc;
use std::time::Duration;

use bevy_ecs::prelude::{Bundle, Component};
use log::debug;
use raylib::prelude::Vector2;

use crate::components::sprite::Sprite;
use crate::error::{AtlasError, Result};
use crate::resources::textureatlas::{Animation, TextureRegion};
use crate::systems::render::SpriteBatch;

#[derive(Component, Clone, Debug)]
pub struct AnimationTimer {
    animation: Arc<Animation>,
    frame_index: usize,
    elapsed: Duration,
}

impl AnimationTimer {
    /// Start playback at frame 0. Fails on an animation with no frames.
    pub fn new(animation: Arc<Animation>) -> Result<Self> {
        if animation.is_empty() {
            return Err(AtlasError::EmptyAnimation);
        }
        Ok(Self {
            animation,
            frame_index: 0,
            elapsed: Duration::ZERO,
        })
    }

    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    /// Swap the animation and restart from frame 0.
    ///
    /// On error the current animation keeps playing untouched.
    pub fn set_animation(&mut self, animation: Arc<Animation>) -> Result<()> {
        *self = Self::new(animation)?;
        debug!(
            "Animation set: {} frames, {:?} delay",
            self.animation.frame_count(),
            self.animation.delay
        );
        Ok(())
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Time accumulated towards the next frame.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn current_region(&self) -> &Arc<TextureRegion> {
        &self.animation.frames[self.frame_index]
    }

    /// Accumulate `delta` and step at most one frame forward.
    ///
    /// Only one delay is consumed per call even if `delta` covers several;
    /// the leftover stays in [`elapsed`](Self::elapsed) for later calls.
    /// Returns true when the frame changed.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.elapsed += delta;
        if self.elapsed < self.animation.delay {
            return false;
        }
        self.elapsed -= self.animation.delay;
        self.frame_index = (self.frame_index + 1) % self.animation.frame_count();
        true
    }

    /// [`tick`](Self::tick), then show the current frame on `sprite`.
    pub fn update(&mut self, sprite: &mut Sprite, delta: Duration) {
        if self.tick(delta) {
            sprite.region = self.current_region().clone();
        }
    }
}

/// A sprite plus the timer cycling its region.
///
/// Spawnable as a bundle; the pieces can also be driven directly.
#[derive(Bundle, Clone, Debug)]
pub struct AnimatedSprite {
    pub sprite: Sprite,
    pub timer: AnimationTimer,
}

impl AnimatedSprite {
    pub fn new(animation: Arc<Animation>) -> Result<Self> {
        let timer = AnimationTimer::new(animation)?;
        Ok(Self {
            sprite: Sprite::new(timer.current_region().clone()),
            timer,
        })
    }

    /// Replace the animation, restart it and show its first frame.
    pub fn set_animation(&mut self, animation: Arc<Animation>) -> Result<()> {
        self.timer.set_animation(animation)?;
        self.sprite.region = self.timer.current_region().clone();
        Ok(())
    }

    pub fn animation(&self) -> &Arc<Animation> {
        self.timer.animation()
    }

    pub fn update(&mut self, delta: Duration) {
        self.timer.update(&mut self.sprite, delta);
    }

    pub fn draw(&self, batch: &mut impl SpriteBatch, position: Vector2) {
        self.sprite.draw(batch, position);
    }
}
