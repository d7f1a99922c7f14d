//! Sprite rendering.
//!
//! Sprites don't draw themselves: they hand their region and
//! [`RenderAttributes`] to a [`SpriteBatch`]. [`RaylibSpriteBatch`] queues
//! those draws and flushes them through raylib sorted by layer depth, the
//! same way the world is drawn back-to-front.
use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::sprite::{RenderAttributes, Sprite};
use crate::resources::textureatlas::TextureRegion;
use crate::resources::texturestore::TextureStore;

/// Draw primitive for a textured rectangle.
pub trait SpriteBatch {
    fn draw_region(&mut self, region: &TextureRegion, position: Vector2, render: &RenderAttributes);
}

/// One queued draw call.
#[derive(Clone, Debug)]
pub struct QueuedDraw {
    pub region: TextureRegion,
    pub position: Vector2,
    pub render: RenderAttributes,
}

impl QueuedDraw {
    /// Source rectangle in texture pixels. Flips are negative extents.
    pub fn source(&self) -> Rectangle {
        let mut src = Rectangle {
            x: self.region.x as f32,
            y: self.region.y as f32,
            width: self.region.width as f32,
            height: self.region.height as f32,
        };
        if self.render.effects.flip_h {
            src.width = -src.width;
        }
        if self.render.effects.flip_v {
            src.height = -src.height;
        }
        src
    }

    /// Destination rectangle: the position with the scaled region size.
    pub fn dest(&self) -> Rectangle {
        Rectangle {
            x: self.position.x,
            y: self.position.y,
            width: self.region.width as f32 * self.render.scale.x,
            height: self.region.height as f32 * self.render.scale.y,
        }
    }

    /// Origin moved from texture pixels into destination space.
    pub fn origin(&self) -> Vector2 {
        Vector2 {
            x: self.render.origin.x * self.render.scale.x,
            y: self.render.origin.y * self.render.scale.y,
        }
    }
}

#[derive(Default)]
pub struct RaylibSpriteBatch {
    queue: Vec<QueuedDraw>,
}

impl RaylibSpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queued(&self) -> &[QueuedDraw] {
        &self.queue
    }

    /// Sort the queue by ascending layer depth. Equal depths keep submit order.
    pub fn sort(&mut self) {
        self.queue
            .sort_by(|a, b| a.render.layer_depth.total_cmp(&b.render.layer_depth));
    }

    /// Draw everything queued and empty the queue.
    pub fn flush<D: RaylibDraw>(&mut self, d: &mut D, textures: &TextureStore) {
        self.sort();
        for draw in self.queue.drain(..) {
            let Some(texture) = textures.get(&*draw.region.tex_key) else {
                warn!("Texture '{}' not loaded, skipping draw", draw.region.tex_key);
                continue;
            };
            d.draw_texture_pro(
                texture,
                draw.source(),
                draw.dest(),
                draw.origin(),
                draw.render.rotation.to_degrees(),
                draw.render.tint,
            );
        }
    }
}

impl SpriteBatch for RaylibSpriteBatch {
    fn draw_region(&mut self, region: &TextureRegion, position: Vector2, render: &RenderAttributes) {
        self.queue.push(QueuedDraw {
            region: region.clone(),
            position,
            render: *render,
        });
    }
}

/// Queue every positioned sprite into `batch`.
pub fn queue_sprites(world: &mut World, batch: &mut impl SpriteBatch) {
    let mut query = world.query::<(&Sprite, &MapPosition)>();
    for (sprite, position) in query.iter(world) {
        sprite.draw(batch, position.pos);
    }
}

/// Draw every positioned sprite inside raylib's drawing scope.
pub fn render_sprites<D: RaylibDraw>(world: &mut World, d: &mut D) {
    let mut batch = RaylibSpriteBatch::new();
    queue_sprites(world, &mut batch);
    let textures = world.resource::<TextureStore>();
    batch.flush(d, textures);
}

/// Exclusive system: open a raylib frame, clear it and draw all sprites.
///
/// Expects the [`RaylibHandle`] and [`RaylibThread`] as non-send resources.
pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        warn!("No raylib handle in the world, nothing rendered");
        return;
    };
    if let Some(thread) = world.remove_non_send_resource::<RaylibThread>() {
        {
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::RAYWHITE);
            render_sprites(world, &mut d);
        }
        world.insert_non_send_resource(thread);
    }
    world.insert_non_send_resource(rl);
}
