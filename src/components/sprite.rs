use std::sync::Arc;

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector2};

use crate::resources::textureatlas::TextureRegion;
use crate::systems::render::SpriteBatch;

/// Horizontal/vertical mirroring applied when drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteEffects {
    pub flip_h: bool,
    pub flip_v: bool,
}

impl SpriteEffects {
    pub const NONE: Self = Self {
        flip_h: false,
        flip_v: false,
    };
}

/// Everything a draw call needs besides the region and the position.
///
/// `rotation` is in radians. `origin` is the pivot in source-texture pixels,
/// relative to the region's top-left corner. `layer_depth` orders draws inside
/// a batch (lower first).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderAttributes {
    pub tint: Color,
    pub rotation: f32,
    pub scale: Vector2,
    pub origin: Vector2,
    pub effects: SpriteEffects,
    pub layer_depth: f32,
}

impl Default for RenderAttributes {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            rotation: 0.0,
            scale: Vector2::new(1.0, 1.0),
            origin: Vector2::zero(),
            effects: SpriteEffects::NONE,
            layer_depth: 0.0,
        }
    }
}

/// Static sprite: a shared atlas region plus render attributes.
///
/// Pair it with an [`AnimationTimer`](crate::components::animatedsprite::AnimationTimer)
/// to have the displayed region cycle over time.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub region: Arc<TextureRegion>,
    pub render: RenderAttributes,
}

impl Sprite {
    pub fn new(region: Arc<TextureRegion>) -> Self {
        Self {
            region,
            render: RenderAttributes::default(),
        }
    }

    /// Width on screen: region width times horizontal scale.
    pub fn width(&self) -> f32 {
        self.region.width as f32 * self.render.scale.x
    }

    /// Height on screen: region height times vertical scale.
    pub fn height(&self) -> f32 {
        self.region.height as f32 * self.render.scale.y
    }

    /// Put the origin at the center of the unscaled region.
    pub fn center_origin(&mut self) {
        self.render.origin = Vector2::new(
            self.region.width as f32 * 0.5,
            self.region.height as f32 * 0.5,
        );
    }

    pub fn draw(&self, batch: &mut impl SpriteBatch, position: Vector2) {
        self.region.draw(batch, position, &self.render);
    }
}
