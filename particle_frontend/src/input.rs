use glm::Vec2;
use particle_common::view::{MouseButtons, ViewState};
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta},
    keyboard::{Key, NamedKey},
};

/// What the main loop should do in response to a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Exit,
    TogglePause,
}

/// Mouse state between events, translated into view changes.
#[derive(Default, Debug)]
pub struct InputState {
    pub mouse_buttons: MouseButtons,
    pub cursor_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        view_state: &mut ViewState,
    ) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.mouse_buttons.left = pressed,
            MouseButton::Right => self.mouse_buttons.right = pressed,
            MouseButton::Middle => self.mouse_buttons.middle = pressed,
            _ => return,
        }
        if pressed {
            view_state.on_mouse_pressed(self.cursor_position);
        }
    }

    pub fn on_cursor_moved(&mut self, position: Vec2, view_state: &mut ViewState) {
        self.cursor_position = position;
        view_state.on_mouse_moved(position, self.mouse_buttons);
    }

    pub fn on_mouse_wheel(&self, delta: MouseScrollDelta, view_state: &mut ViewState) {
        view_state.on_mouse_wheel(Self::wheel_units(delta));
    }

    pub fn on_key(&self, logical_key: &Key, state: ElementState) -> InputAction {
        if state != ElementState::Pressed {
            return InputAction::None;
        }
        match logical_key {
            Key::Named(NamedKey::Escape) => InputAction::Exit,
            Key::Character(character) if character.eq_ignore_ascii_case("p") => {
                InputAction::TogglePause
            }
            _ => InputAction::None,
        }
    }

    // line deltas count notches, pixel deltas are taken as wheel units directly
    fn wheel_units(delta: MouseScrollDelta) -> f32 {
        match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * ViewState::WHEEL_DELTA_PER_NOTCH,
            MouseScrollDelta::PixelDelta(position) => position.y as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn left_drag_rotates_view() {
        let mut input = InputState::new();
        let mut view = ViewState::new();
        input.on_cursor_moved(Vec2::new(10.0, 10.0), &mut view);
        input.on_mouse_button(MouseButton::Left, ElementState::Pressed, &mut view);
        assert_eq!(view.mouse_pos, Vec2::new(10.0, 10.0));

        input.on_cursor_moved(Vec2::new(12.0, 8.0), &mut view);
        assert_eq!(view.rotation.x, 2.0 * 1.25);
        assert_eq!(view.rotation.y, 2.0 * 1.25);
        assert!(view.take_view_updated());

        input.on_mouse_button(MouseButton::Left, ElementState::Released, &mut view);
        input.on_cursor_moved(Vec2::new(50.0, 50.0), &mut view);
        assert!(!view.take_view_updated());
    }

    #[test]
    fn one_wheel_notch_is_120_units() {
        let input = InputState::new();
        let mut view = ViewState::new();
        input.on_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0), &mut view);
        let after_line = view.zoom;
        assert!((after_line - (ViewState::INITIAL_ZOOM + 0.6)).abs() < 1e-5);

        input.on_mouse_wheel(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -120.0)),
            &mut view,
        );
        assert!((view.zoom - ViewState::INITIAL_ZOOM).abs() < 1e-5);
    }

    #[test]
    fn keys_map_to_actions() {
        let input = InputState::new();
        assert_eq!(
            input.on_key(&Key::Named(NamedKey::Escape), ElementState::Pressed),
            InputAction::Exit
        );
        assert_eq!(
            input.on_key(&Key::Character("p".into()), ElementState::Pressed),
            InputAction::TogglePause
        );
        assert_eq!(
            input.on_key(&Key::Character("P".into()), ElementState::Released),
            InputAction::None
        );
        assert_eq!(
            input.on_key(&Key::Character("x".into()), ElementState::Pressed),
            InputAction::None
        );
    }
}
