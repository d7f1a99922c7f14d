//! Atlas viewer.
//!
//! Opens a raylib window, loads a texture atlas description and shows it:
//! either one animation playing in the middle of the screen, or every region
//! of the atlas side by side.
//!
//! Controls
//! - mouse wheel – zoom
//! - left click – move the sprites under the cursor
//! - F – flip horizontally
//! - Space – pause/resume animations
//! - Right/Left – cycle through the atlas animations
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --atlas atlas.xml --animation walk
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use raylib::prelude::{KeyboardKey, RaylibHandle, Vector2};

use atlaskit::components::animatedsprite::AnimationTimer;
use atlaskit::components::mapposition::MapPosition;
use atlaskit::components::sprite::Sprite;
use atlaskit::error::Result;
use atlaskit::resources::appconfig::AppConfig;
use atlaskit::resources::input::{InputManager, MouseButton};
use atlaskit::resources::textureatlas::TextureAtlas;
use atlaskit::resources::texturestore::{RaylibTextureLoader, TextureStore};
use atlaskit::resources::worldtime::WorldTime;
use atlaskit::systems::animation::animated_sprite_system;
use atlaskit::systems::input::update_input_system;
use atlaskit::systems::render::render_system;
use atlaskit::systems::time::update_world_time;

const SPRITE_SCALE: f32 = 4.0;
const ZOOM_STEP: f32 = 0.25;
const REGION_GAP: f32 = 8.0;

/// Texture atlas viewer
#[derive(Parser)]
#[command(version, about = "Shows the regions and animations of a texture atlas.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Directory atlas files and textures are resolved against.
    #[arg(long, value_name = "DIR")]
    content_root: Option<PathBuf>,

    /// Atlas description, relative to the content root.
    #[arg(long, value_name = "FILE")]
    atlas: Option<PathBuf>,

    /// Animation to play. Without it every region is shown.
    #[arg(long, value_name = "NAME")]
    animation: Option<String>,
}

/// Names of the atlas animations in display order, and the one showing.
#[derive(Resource, Default)]
struct AnimationCycle {
    names: Vec<String>,
    current: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::info!("{}, using defaults", e);
    }
    if let Some(root) = cli.content_root {
        config.content_root = root;
    }
    if let Some(atlas) = cli.atlas {
        config.atlas_file = atlas;
    }
    if cli.animation.is_some() {
        config.animation = cli.animation;
    }

    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title("Atlas Viewer")
        .build();
    rl.set_target_fps(config.target_fps);

    let mut textures = TextureStore::new();
    let atlas = {
        let mut loader = RaylibTextureLoader {
            rl: &mut rl,
            thread: &thread,
            store: &mut textures,
            content_root: config.content_root.clone(),
        };
        TextureAtlas::from_file(&config.content_root, &config.atlas_file, &mut loader)
    };
    let atlas = match atlas {
        Ok(atlas) => atlas,
        Err(e) => {
            log::error!("Failed to load atlas {:?}: {}", config.atlas_path(), e);
            std::process::exit(1);
        }
    };

    let center = Vector2::new(
        rl.get_screen_width() as f32 / 2.0,
        rl.get_screen_height() as f32 / 2.0,
    );

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputManager::new());
    world.insert_resource(textures);

    let mut cycle = AnimationCycle::default();
    cycle.names = atlas.animation_names().map(str::to_string).collect();
    cycle.names.sort();

    let spawned = match config.animation.as_deref() {
        Some(name) => {
            cycle.current = cycle.names.iter().position(|n| n == name).unwrap_or(0);
            spawn_animation(&mut world, &atlas, name, center)
        }
        None => spawn_regions(&mut world, &atlas, center),
    };
    if let Err(e) = spawned {
        log::error!("{}", e);
        std::process::exit(1);
    }

    world.insert_resource(cycle);
    world.insert_resource(atlas);
    world.insert_resource(config);
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    let mut update = Schedule::default();
    update.add_systems(update_input_system::<RaylibHandle>);
    update.add_systems(viewer_controls.after(update_input_system::<RaylibHandle>));
    update.add_systems(animated_sprite_system.after(viewer_controls));
    update.add_systems(render_system.after(animated_sprite_system));

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<RaylibHandle>()
        .window_should_close()
    {
        let dt = world.non_send_resource::<RaylibHandle>().get_frame_time();
        update_world_time(&mut world, dt);
        update.run(&mut world);
        world.clear_trackers();
    }
}

fn spawn_animation(world: &mut World, atlas: &TextureAtlas, name: &str, at: Vector2) -> Result<()> {
    let mut animated = atlas.create_animated_sprite(name)?;
    animated.sprite.render.scale = Vector2::new(SPRITE_SCALE, SPRITE_SCALE);
    animated.sprite.center_origin();
    world.spawn((animated, MapPosition { pos: at }));
    log::info!("Playing animation '{}'", name);
    Ok(())
}

fn spawn_regions(world: &mut World, atlas: &TextureAtlas, center: Vector2) -> Result<()> {
    let mut names: Vec<&str> = atlas.region_names().collect();
    names.sort_unstable();

    let total_width: f32 = names
        .iter()
        .map(|n| atlas.get_region(n).map(|r| r.width as f32 * SPRITE_SCALE + REGION_GAP))
        .sum::<Result<f32>>()?;
    let mut x = center.x - total_width / 2.0;
    for name in names {
        let mut sprite = atlas.create_sprite(name)?;
        sprite.render.scale = Vector2::new(SPRITE_SCALE, SPRITE_SCALE);
        let width = sprite.width();
        world.spawn((sprite, MapPosition::new(x, center.y - width / 2.0)));
        x += width + REGION_GAP;
    }
    log::info!("Showing {} regions", atlas.region_count());
    Ok(())
}

fn viewer_controls(
    input: Res<InputManager>,
    atlas: Res<TextureAtlas>,
    mut cycle: ResMut<AnimationCycle>,
    mut time: ResMut<WorldTime>,
    mut sprites: Query<(&mut Sprite, &mut MapPosition, Option<&mut AnimationTimer>)>,
) {
    let wheel = input.mouse.scroll_wheel_delta();
    let flip = input.key_down(KeyboardKey::KEY_F);
    let step: isize = if input.key_down(KeyboardKey::KEY_RIGHT) {
        1
    } else if input.key_down(KeyboardKey::KEY_LEFT) {
        -1
    } else {
        0
    };

    if input.key_down(KeyboardKey::KEY_SPACE) {
        time.time_scale = if time.time_scale == 0.0 { 1.0 } else { 0.0 };
    }

    let next_animation = if step != 0 && !cycle.names.is_empty() {
        let len = cycle.names.len() as isize;
        cycle.current = (cycle.current as isize + step).rem_euclid(len) as usize;
        atlas.get_animation(&cycle.names[cycle.current]).ok().cloned()
    } else {
        None
    };

    for (mut sprite, mut position, timer) in sprites.iter_mut() {
        if wheel != 0.0 {
            let scale = (sprite.render.scale.x + wheel * ZOOM_STEP).max(ZOOM_STEP);
            sprite.render.scale = Vector2::new(scale, scale);
        }
        if flip {
            sprite.render.effects.flip_h = !sprite.render.effects.flip_h;
        }
        if input.mouse_button(MouseButton::Left) && input.mouse.was_moved() {
            position.pos.x += input.mouse.x_delta();
            position.pos.y += input.mouse.y_delta();
        }
        if let (Some(mut timer), Some(animation)) = (timer, next_animation.clone()) {
            match timer.set_animation(animation) {
                Ok(()) => {
                    sprite.region = timer.current_region().clone();
                    sprite.center_origin();
                    log::info!("Playing animation '{}'", cycle.names[cycle.current]);
                }
                Err(e) => log::warn!("{}: {}", cycle.names[cycle.current], e),
            }
        }
    }
}
