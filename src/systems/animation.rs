//! Animation system.
//!
//! [`animated_sprite_system`] advances every entity carrying both an
//! [`AnimationTimer`] and a [`Sprite`] by the frame delta from [`WorldTime`],
//! swapping the sprite's region when the timer steps to a new frame.
//!
//! # Related
//!
//! - [`crate::components::animatedsprite::AnimatedSprite`] – bundle spawning both components
//! - [`crate::resources::textureatlas::TextureAtlas`] – source of animations

use bevy_ecs::prelude::*;

use crate::components::animatedsprite::AnimationTimer;
use crate::components::sprite::Sprite;
use crate::resources::worldtime::WorldTime;

pub fn animated_sprite_system(
    mut query: Query<(&mut AnimationTimer, &mut Sprite)>,
    time: Res<WorldTime>,
) {
    let delta = time.delta_duration();
    for (mut timer, mut sprite) in query.iter_mut() {
        timer.update(&mut sprite, delta);
    }
}
