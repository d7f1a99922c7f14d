use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// World position where a sprite is drawn. The sprite's origin lands here.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vector2 { x, y },
        }
    }
}
