//! Per-frame keyboard and mouse input resource.
//!
//! Each device keeps two immutable snapshots: the one polled this frame and
//! the one from the frame before. Edge queries compare the two:
//!
//! - `*_down` – pressed now, not pressed last frame
//! - `*_up` – not pressed now, pressed last frame
//! - plain queries – pressed now
//!
//! [`InputManager`] bundles both devices and is updated once per frame,
//! before any query for that frame, by
//! [`update_input_system`](crate::systems::input::update_input_system).
//! Raw polling goes through the [`InputDevice`] trait so the snapshots can be
//! driven by raylib or by a scripted device in tests.
use bevy_ecs::prelude::Resource;
use raylib::ffi::MouseButton as RaylibMouseButton;
use raylib::prelude::{KeyboardKey, RaylibHandle, Vector2};
use smallvec::SmallVec;

/// Mouse buttons tracked by [`MouseState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// First side button (raylib `SIDE`).
    X1,
    /// Second side button (raylib `EXTRA`).
    X2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::X1,
        MouseButton::X2,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn to_raylib(self) -> RaylibMouseButton {
        match self {
            MouseButton::Left => RaylibMouseButton::MOUSE_BUTTON_LEFT,
            MouseButton::Middle => RaylibMouseButton::MOUSE_BUTTON_MIDDLE,
            MouseButton::Right => RaylibMouseButton::MOUSE_BUTTON_RIGHT,
            MouseButton::X1 => RaylibMouseButton::MOUSE_BUTTON_SIDE,
            MouseButton::X2 => RaylibMouseButton::MOUSE_BUTTON_EXTRA,
        }
    }
}

/// Keys held down at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyboardState {
    keys: SmallVec<[KeyboardKey; 8]>,
}

impl KeyboardState {
    pub fn new(keys: impl IntoIterator<Item = KeyboardKey>) -> Self {
        let mut state = Self::default();
        for key in keys {
            if !state.keys.contains(&key) {
                state.keys.push(key);
            }
        }
        state
    }

    pub fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_key_up(&self, key: KeyboardKey) -> bool {
        !self.is_key_down(key)
    }

    pub fn pressed_keys(&self) -> &[KeyboardKey] {
        &self.keys
    }

    pub fn pressed_key_count(&self) -> usize {
        self.keys.len()
    }
}

/// Mouse position, buttons and accumulated wheel value at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseState {
    pub position: Vector2,
    /// Total wheel movement since the device started reporting.
    pub scroll_wheel: f32,
    pub buttons: [bool; 5],
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            scroll_wheel: 0.0,
            buttons: [false; 5],
        }
    }
}

impl MouseState {
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    pub fn with_button(mut self, button: MouseButton, pressed: bool) -> Self {
        self.buttons[button.index()] = pressed;
        self
    }
}

/// Source of raw device snapshots.
pub trait InputDevice {
    /// Poll the keys held right now. `previous` is the last snapshot handed out.
    fn poll_keyboard(&mut self, previous: &KeyboardState) -> KeyboardState;
    /// Poll the mouse right now. `previous` is the last snapshot handed out.
    fn poll_mouse(&mut self, previous: &MouseState) -> MouseState;
    /// Move the OS cursor.
    fn warp_mouse(&mut self, position: Vector2);
}

impl InputDevice for RaylibHandle {
    fn poll_keyboard(&mut self, previous: &KeyboardState) -> KeyboardState {
        // raylib can't enumerate held keys: keep last frame's keys that are
        // still down and add everything pressed since, even if it was
        // released again within the frame.
        let mut keys: SmallVec<[KeyboardKey; 8]> = previous
            .pressed_keys()
            .iter()
            .copied()
            .filter(|key| self.is_key_down(*key))
            .collect();
        while let Some(key) = self.get_key_pressed() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        KeyboardState { keys }
    }

    fn poll_mouse(&mut self, previous: &MouseState) -> MouseState {
        let mut state = MouseState {
            position: self.get_mouse_position(),
            scroll_wheel: previous.scroll_wheel + self.get_mouse_wheel_move(),
            buttons: [false; 5],
        };
        for button in MouseButton::ALL {
            state.buttons[button.index()] = self.is_mouse_button_down(button.to_raylib());
        }
        state
    }

    fn warp_mouse(&mut self, position: Vector2) {
        self.set_mouse_position(position);
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardInfo {
    previous: KeyboardState,
    current: KeyboardState,
}

impl KeyboardInfo {
    pub fn update(&mut self, device: &mut impl InputDevice) {
        let polled = device.poll_keyboard(&self.current);
        self.previous = std::mem::replace(&mut self.current, polled);
    }

    pub fn previous_state(&self) -> &KeyboardState {
        &self.previous
    }

    pub fn current_state(&self) -> &KeyboardState {
        &self.current
    }

    /// Pressed this frame only.
    pub fn key_down(&self, key: KeyboardKey) -> bool {
        self.current.is_key_down(key) && self.previous.is_key_up(key)
    }

    /// Released this frame only.
    pub fn key_up(&self, key: KeyboardKey) -> bool {
        self.current.is_key_up(key) && self.previous.is_key_down(key)
    }

    /// Held this frame.
    pub fn key(&self, key: KeyboardKey) -> bool {
        self.current.is_key_down(key)
    }

    pub fn any_pressed(&self) -> bool {
        self.current.pressed_key_count() > 0
    }

    pub fn pressed_keys(&self) -> &[KeyboardKey] {
        self.current.pressed_keys()
    }

    /// The held key when exactly one key is held.
    pub fn single_pressed_key(&self) -> Option<KeyboardKey> {
        match self.current.pressed_keys() {
            [key] => Some(*key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MouseInfo {
    previous: MouseState,
    current: MouseState,
}

impl MouseInfo {
    pub fn update(&mut self, device: &mut impl InputDevice) {
        let polled = device.poll_mouse(&self.current);
        self.previous = std::mem::replace(&mut self.current, polled);
    }

    pub fn previous_state(&self) -> &MouseState {
        &self.previous
    }

    pub fn current_state(&self) -> &MouseState {
        &self.current
    }

    pub fn position(&self) -> Vector2 {
        self.current.position
    }

    pub fn x(&self) -> f32 {
        self.current.position.x
    }

    pub fn y(&self) -> f32 {
        self.current.position.y
    }

    /// Warp the cursor and show the new position right away, without
    /// waiting for the next poll.
    pub fn set_position(&mut self, device: &mut impl InputDevice, x: f32, y: f32) {
        let position = Vector2::new(x, y);
        device.warp_mouse(position);
        self.current.position = position;
    }

    pub fn set_x(&mut self, device: &mut impl InputDevice, x: f32) {
        let y = self.current.position.y;
        self.set_position(device, x, y);
    }

    pub fn set_y(&mut self, device: &mut impl InputDevice, y: f32) {
        let x = self.current.position.x;
        self.set_position(device, x, y);
    }

    pub fn position_delta(&self) -> Vector2 {
        Vector2::new(self.x_delta(), self.y_delta())
    }

    pub fn x_delta(&self) -> f32 {
        self.current.position.x - self.previous.position.x
    }

    pub fn y_delta(&self) -> f32 {
        self.current.position.y - self.previous.position.y
    }

    pub fn was_moved(&self) -> bool {
        self.position_delta() != Vector2::zero()
    }

    pub fn scroll_wheel(&self) -> f32 {
        self.current.scroll_wheel
    }

    pub fn scroll_wheel_delta(&self) -> f32 {
        self.current.scroll_wheel - self.previous.scroll_wheel
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.current.is_button_down(button) && !self.previous.is_button_down(button)
    }

    pub fn button_up(&self, button: MouseButton) -> bool {
        !self.current.is_button_down(button) && self.previous.is_button_down(button)
    }

    pub fn button(&self, button: MouseButton) -> bool {
        self.current.is_button_down(button)
    }
}

/// Keyboard and mouse snapshots for the current frame.
///
/// Owned by the world and updated by exactly one system per frame; every
/// other system only reads it.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputManager {
    pub keyboard: KeyboardInfo,
    pub mouse: MouseInfo,
    frame_time: f32,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both devices by one frame. `frame_time` is the frame delta in
    /// seconds.
    pub fn update(&mut self, device: &mut impl InputDevice, frame_time: f32) {
        self.keyboard.update(device);
        self.mouse.update(device);
        self.frame_time = frame_time;
    }

    /// Delta passed to the last [`update`](Self::update).
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    pub fn key_down(&self, key: KeyboardKey) -> bool {
        self.keyboard.key_down(key)
    }

    pub fn key(&self, key: KeyboardKey) -> bool {
        self.keyboard.key(key)
    }

    pub fn key_up(&self, key: KeyboardKey) -> bool {
        self.keyboard.key_up(key)
    }

    pub fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse.button_down(button)
    }

    pub fn mouse_button(&self, button: MouseButton) -> bool {
        self.mouse.button(button)
    }

    pub fn mouse_button_up(&self, button: MouseButton) -> bool {
        self.mouse.button_up(button)
    }
}
