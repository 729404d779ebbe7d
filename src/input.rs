use std::collections::HashSet;

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::renderer::RenderMode;

/// Edge-triggered actions, queued on key press and drained once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    ResetView,
    ToggleAutoRotate,
    ToggleGrid,
    ToggleAxes,
    ToggleProjection,
    SetRenderMode(RenderMode),
    Reload,
}

impl Command {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        let command = match key {
            KeyCode::Escape => Command::Quit,
            KeyCode::KeyR => Command::ResetView,
            KeyCode::KeyT => Command::ToggleAutoRotate,
            KeyCode::KeyG => Command::ToggleGrid,
            KeyCode::KeyX => Command::ToggleAxes,
            KeyCode::KeyP => Command::ToggleProjection,
            KeyCode::Digit1 | KeyCode::Numpad1 => Command::SetRenderMode(RenderMode::Wireframe),
            KeyCode::Digit2 | KeyCode::Numpad2 => Command::SetRenderMode(RenderMode::Points),
            KeyCode::Digit3 | KeyCode::Numpad3 => Command::SetRenderMode(RenderMode::Solid),
            KeyCode::F5 | KeyCode::KeyL => Command::Reload,
            _ => return None,
        };
        Some(command)
    }
}

/// Per-tick continuous control values derived from the held keys. Each axis
/// is -1, 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub zoom: f32,
    pub pan: Vec2,
}

#[derive(Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    pending: Vec<Command>,
}

impl InputState {
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        if pressed {
            self.held.insert(key);
            if !repeat {
                if let Some(command) = Command::from_key(key) {
                    self.pending.push(command);
                }
            }
        } else {
            self.held.remove(&key);
        }
    }

    /// Focus loss means release events may never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    pub fn controls(&self) -> Controls {
        let axis = |neg: &[KeyCode], pos: &[KeyCode]| -> f32 {
            let down = |keys: &[KeyCode]| keys.iter().any(|k| self.is_held(*k));
            match (down(neg), down(pos)) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            }
        };

        Controls {
            pitch: axis(&[KeyCode::KeyW], &[KeyCode::KeyS]),
            yaw: axis(&[KeyCode::KeyA], &[KeyCode::KeyD]),
            roll: axis(&[KeyCode::KeyQ], &[KeyCode::KeyE]),
            zoom: axis(
                &[KeyCode::Minus, KeyCode::NumpadSubtract],
                &[KeyCode::Equal, KeyCode::NumpadAdd],
            ),
            pan: Vec2::new(
                axis(&[KeyCode::ArrowLeft], &[KeyCode::ArrowRight]),
                axis(&[KeyCode::ArrowUp], &[KeyCode::ArrowDown]),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_drive_controls_until_released() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyW, true, false);
        input.handle_key(KeyCode::ArrowRight, true, false);
        input.handle_key(KeyCode::Equal, true, false);

        let controls = input.controls();
        assert_eq!(controls.pitch, -1.0);
        assert_eq!(controls.zoom, 1.0);
        assert_eq!(controls.pan, Vec2::new(1.0, 0.0));

        // still held on the next tick
        assert_eq!(input.controls().pitch, -1.0);

        input.handle_key(KeyCode::KeyW, false, false);
        assert_eq!(input.controls().pitch, 0.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyA, true, false);
        input.handle_key(KeyCode::KeyD, true, false);
        assert_eq!(input.controls().yaw, 0.0);
    }

    #[test]
    fn commands_fire_once_per_press() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyT, true, false);
        input.handle_key(KeyCode::KeyT, true, true);
        input.handle_key(KeyCode::Digit3, true, false);

        assert_eq!(
            input.take_commands(),
            vec![
                Command::ToggleAutoRotate,
                Command::SetRenderMode(RenderMode::Solid)
            ]
        );
        assert!(input.take_commands().is_empty());
    }

    #[test]
    fn release_all_clears_held_state() {
        let mut input = InputState::default();
        input.handle_key(KeyCode::KeyQ, true, false);
        input.release_all();
        assert_eq!(input.controls(), Controls::default());
    }
}
