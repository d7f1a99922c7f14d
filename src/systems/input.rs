//! Input system.
//!
//! [`update_input_system`] polls the device once per frame and shifts the
//! snapshots held by [`InputManager`]. Register it before any system that
//! reads input. The device is a non-send resource: the raylib handle in the
//! viewer, a scripted device in tests.
use bevy_ecs::prelude::*;

use crate::resources::input::{InputDevice, InputManager};
use crate::resources::worldtime::WorldTime;

pub fn update_input_system<D: InputDevice + 'static>(
    mut input: ResMut<InputManager>,
    mut device: NonSendMut<D>,
    time: Res<WorldTime>,
) {
    input.update(&mut *device, time.delta);
}
