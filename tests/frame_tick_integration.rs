//! Frame tick integration tests: atlas loading, animated sprites and input
//! driven through a bevy_ecs `World` and `Schedule`, without a window.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use bevy_ecs::prelude::*;
use raylib::prelude::{KeyboardKey, Vector2};

use atlaskit::components::animatedsprite::{AnimatedSprite, AnimationTimer};
use atlaskit::components::mapposition::MapPosition;
use atlaskit::components::sprite::Sprite;
use atlaskit::error::{AtlasError, Result};
use atlaskit::resources::atlasloader::TextureLoader;
use atlaskit::resources::input::{
    InputDevice, InputManager, KeyboardState, MouseButton, MouseState,
};
use atlaskit::resources::textureatlas::TextureAtlas;
use atlaskit::resources::worldtime::WorldTime;
use atlaskit::systems::animation::animated_sprite_system;
use atlaskit::systems::input::update_input_system;
use atlaskit::systems::render::{RaylibSpriteBatch, queue_sprites};
use atlaskit::systems::time::update_world_time;

const HERO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TextureAtlas>
    <Texture>images/hero</Texture>
    <Regions>
        <Region name="idle" x="0" y="0" width="16" height="16" />
        <Region name="walk-1" x="16" y="0" width="16" height="16" />
        <Region name="walk-2" x="32" y="0" width="16" height="16" />
        <Region name="walk-3" x="48" y="0" width="16" height="16" />
    </Regions>
    <Animations>
        <Animation name="walk" delay="100">
            <Frame region="walk-1" />
            <Frame region="walk-2" />
            <Frame region="walk-3" />
        </Animation>
        <Animation name="idle" delay="250">
            <Frame region="idle" />
        </Animation>
    </Animations>
</TextureAtlas>
"#;

struct KeyLoader;

impl TextureLoader for KeyLoader {
    fn load_texture(&mut self, path: &str) -> Result<Arc<str>> {
        Ok(Arc::from(format!("tex:{path}")))
    }
}

#[derive(Default)]
struct ScriptedDevice {
    keyboard: VecDeque<KeyboardState>,
    mouse: VecDeque<MouseState>,
}

impl InputDevice for ScriptedDevice {
    fn poll_keyboard(&mut self, previous: &KeyboardState) -> KeyboardState {
        self.keyboard.pop_front().unwrap_or_else(|| previous.clone())
    }

    fn poll_mouse(&mut self, previous: &MouseState) -> MouseState {
        self.mouse.pop_front().unwrap_or(*previous)
    }

    fn warp_mouse(&mut self, _position: Vector2) {}
}

fn hero_atlas() -> TextureAtlas {
    TextureAtlas::from_description(HERO, &mut KeyLoader).unwrap()
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputManager::new());
    world
}

fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

#[test]
fn loaded_regions_share_the_loaded_texture() {
    let atlas = hero_atlas();
    assert_eq!(&**atlas.texture(), "tex:images/hero");
    assert_eq!(atlas.region_count(), 4);
    assert_eq!(atlas.animation_count(), 2);
    for name in atlas.region_names() {
        assert_eq!(&*atlas.get_region(name).unwrap().tex_key, "tex:images/hero");
    }
}

#[test]
fn failed_load_returns_no_atlas() {
    let broken = HERO.replace(r#"<Frame region="walk-3" />"#, r#"<Frame region="run-1" />"#);
    let err = TextureAtlas::from_description(&broken, &mut KeyLoader).unwrap_err();
    assert!(matches!(err, AtlasError::RegionNotFound(ref name) if name == "run-1"));
}

#[test]
fn animated_sprite_system_cycles_regions() {
    let atlas = hero_atlas();
    let mut world = make_world();
    let entity = world
        .spawn((
            atlas.create_animated_sprite("walk").unwrap(),
            MapPosition::new(0.0, 0.0),
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(animated_sprite_system);

    let region_x = |world: &World| world.get::<Sprite>(entity).unwrap().region.x;
    assert_eq!(region_x(&world), 16);

    tick(&mut world, &mut schedule, 0.0625);
    assert_eq!(region_x(&world), 16);

    tick(&mut world, &mut schedule, 0.0625);
    assert_eq!(region_x(&world), 32);

    tick(&mut world, &mut schedule, 0.125);
    assert_eq!(region_x(&world), 48);

    tick(&mut world, &mut schedule, 0.125);
    assert_eq!(region_x(&world), 16);
    assert_eq!(world.get::<AnimationTimer>(entity).unwrap().frame_index(), 0);
}

#[test]
fn paused_time_freezes_animation() {
    let atlas = hero_atlas();
    let mut world = make_world();
    world.resource_mut::<WorldTime>().time_scale = 0.0;
    let entity = world.spawn(atlas.create_animated_sprite("walk").unwrap()).id();

    let mut schedule = Schedule::default();
    schedule.add_systems(animated_sprite_system);
    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.5);
    }

    let timer = world.get::<AnimationTimer>(entity).unwrap();
    assert_eq!(timer.frame_index(), 0);
    assert_eq!(timer.elapsed(), Duration::ZERO);
}

#[test]
fn static_sprites_are_left_alone() {
    let atlas = hero_atlas();
    let mut world = make_world();
    let entity = world.spawn(atlas.create_sprite("idle").unwrap()).id();

    let mut schedule = Schedule::default();
    schedule.add_systems(animated_sprite_system);
    tick(&mut world, &mut schedule, 1.0);

    assert_eq!(world.get::<Sprite>(entity).unwrap().region.x, 0);
}

#[test]
fn switching_animation_restarts_playback() {
    let atlas = hero_atlas();
    let mut animated: AnimatedSprite = atlas.create_animated_sprite("walk").unwrap();
    animated.update(Duration::from_millis(150));
    assert_eq!(animated.timer.frame_index(), 1);

    animated
        .set_animation(atlas.get_animation("idle").unwrap().clone())
        .unwrap();
    assert_eq!(animated.timer.frame_index(), 0);
    assert_eq!(animated.timer.elapsed(), Duration::ZERO);
    assert_eq!(animated.sprite.region.x, 0);
}

#[test]
fn input_system_updates_manager_once_per_tick() {
    let mut world = make_world();
    let mut device = ScriptedDevice::default();
    let space = || KeyboardState::new([KeyboardKey::KEY_SPACE]);
    device.keyboard.extend([KeyboardState::default(), space(), space(), KeyboardState::default()]);
    let at = |x: f32, y: f32| MouseState {
        position: Vector2::new(x, y),
        ..Default::default()
    };
    device.mouse.extend([
        at(0.0, 0.0),
        at(4.0, 3.0).with_button(MouseButton::Left, true),
        at(4.0, 3.0),
        at(4.0, 3.0),
    ]);
    world.insert_non_send_resource(device);

    let mut schedule = Schedule::default();
    schedule.add_systems(update_input_system::<ScriptedDevice>);

    let mut downs = Vec::new();
    let mut helds = Vec::new();
    let mut ups = Vec::new();
    let mut moved = Vec::new();
    for _ in 0..4 {
        tick(&mut world, &mut schedule, 0.016);
        let input = world.resource::<InputManager>();
        downs.push(input.key_down(KeyboardKey::KEY_SPACE));
        helds.push(input.key(KeyboardKey::KEY_SPACE));
        ups.push(input.key_up(KeyboardKey::KEY_SPACE));
        moved.push(input.mouse.was_moved());
    }

    assert_eq!(downs, vec![false, true, false, false]);
    assert_eq!(helds, vec![false, true, true, false]);
    assert_eq!(ups, vec![false, false, false, true]);
    assert_eq!(moved, vec![false, true, false, false]);

    let input = world.resource::<InputManager>();
    assert_eq!(input.frame_time(), 0.016);
    assert!(!input.mouse_button(MouseButton::Left));
}

#[test]
fn render_queue_follows_animation_frames() {
    let atlas = hero_atlas();
    let mut world = make_world();
    let mut animated = atlas.create_animated_sprite("walk").unwrap();
    animated.sprite.render.layer_depth = 1.0;
    world.spawn((animated, MapPosition::new(10.0, 10.0)));
    world.spawn((atlas.create_sprite("idle").unwrap(), MapPosition::new(0.0, 0.0)));

    let mut schedule = Schedule::default();
    schedule.add_systems(animated_sprite_system);
    tick(&mut world, &mut schedule, 0.125);

    let mut batch = RaylibSpriteBatch::new();
    queue_sprites(&mut world, &mut batch);
    batch.sort();

    let drawn: Vec<(i32, f32)> = batch
        .queued()
        .iter()
        .map(|q| (q.region.x, q.position.x))
        .collect();
    assert_eq!(drawn, vec![(0, 0.0), (32, 10.0)]);
}
