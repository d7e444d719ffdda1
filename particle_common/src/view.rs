use nalgebra_glm::{Vec2, Vec3};
//////////////////////// Structs ///////////////////////
/// Which mouse buttons are held down while the cursor moves.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

/// The user controlled view: zoom, rotation and panning driven by the mouse.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub zoom: f32,
    /// Rotation in degrees around the x, y and z axis
    pub rotation: Vec3,
    pub camera_pos: Vec3,
    pub mouse_pos: Vec2,
    pub rotation_speed: f32,
    pub zoom_speed: f32,
    view_updated: bool,
}
//////////////////////// Impls ///////////////////////
impl ViewState {
    pub const INITIAL_ZOOM: f32 = -2.5;
    /// Mouse wheel deltas are expressed in these units, one notch being 120
    pub const WHEEL_DELTA_PER_NOTCH: f32 = 120.0;
    const ZOOM_FACTOR: f32 = 0.005;
    const ROTATION_FACTOR: f32 = 1.25;
    const PAN_FACTOR: f32 = 0.01;

    pub fn new() -> Self {
        Self {
            zoom: Self::INITIAL_ZOOM,
            rotation: Vec3::zeros(),
            camera_pos: Vec3::zeros(),
            mouse_pos: Vec2::zeros(),
            rotation_speed: 1.0,
            zoom_speed: 1.0,
            view_updated: false,
        }
    }

    pub fn on_mouse_pressed(&mut self, position: Vec2) {
        self.mouse_pos = position;
    }

    pub fn on_mouse_wheel(&mut self, wheel_delta: f32) {
        self.zoom += wheel_delta * Self::ZOOM_FACTOR * self.zoom_speed;
        self.view_updated = true;
    }

    pub fn on_mouse_moved(&mut self, position: Vec2, buttons: MouseButtons) {
        if buttons.right {
            self.zoom += (self.mouse_pos.y - position.y) * Self::ZOOM_FACTOR * self.zoom_speed;
            self.mouse_pos = position;
            self.view_updated = true;
        }
        if buttons.left {
            self.rotation.x +=
                (self.mouse_pos.y - position.y) * Self::ROTATION_FACTOR * self.rotation_speed;
            self.rotation.y -=
                (self.mouse_pos.x - position.x) * Self::ROTATION_FACTOR * self.rotation_speed;
            self.mouse_pos = position;
            self.view_updated = true;
        }
        if buttons.middle {
            self.camera_pos.x -= (self.mouse_pos.x - position.x) * Self::PAN_FACTOR;
            self.camera_pos.y -= (self.mouse_pos.y - position.y) * Self::PAN_FACTOR;
            self.mouse_pos = position;
            self.view_updated = true;
        }
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn take_view_updated(&mut self) -> bool {
        std::mem::replace(&mut self.view_updated, false)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn wheel_zooms_by_notch() {
        let mut view = ViewState::new();
        view.on_mouse_wheel(ViewState::WHEEL_DELTA_PER_NOTCH);
        assert!(approx(view.zoom, -2.5 + 0.6));
        assert!(view.take_view_updated());
        assert!(!view.take_view_updated());
    }

    #[test]
    fn left_drag_rotates() {
        let mut view = ViewState::new();
        view.on_mouse_pressed(Vec2::new(100.0, 100.0));
        let buttons = MouseButtons {
            left: true,
            ..Default::default()
        };
        view.on_mouse_moved(Vec2::new(110.0, 90.0), buttons);
        // (100 - 90) * 1.25
        assert!(approx(view.rotation.x, 12.5));
        // -(100 - 110) * 1.25
        assert!(approx(view.rotation.y, 12.5));
        assert_eq!(view.mouse_pos, Vec2::new(110.0, 90.0));
        assert!(approx(view.zoom, ViewState::INITIAL_ZOOM));
    }

    #[test]
    fn right_drag_zooms_and_middle_drag_pans() {
        let mut view = ViewState::new();
        view.on_mouse_pressed(Vec2::new(0.0, 0.0));
        view.on_mouse_moved(
            Vec2::new(0.0, -100.0),
            MouseButtons {
                right: true,
                ..Default::default()
            },
        );
        assert!(approx(view.zoom, -2.0));

        view.on_mouse_moved(
            Vec2::new(50.0, -50.0),
            MouseButtons {
                middle: true,
                ..Default::default()
            },
        );
        assert!(approx(view.camera_pos.x, 0.5));
        assert!(approx(view.camera_pos.y, 0.5));
    }

    #[test]
    fn moving_without_buttons_changes_nothing() {
        let mut view = ViewState::new();
        view.on_mouse_moved(Vec2::new(30.0, 40.0), MouseButtons::default());
        assert_eq!(view.mouse_pos, Vec2::zeros());
        assert!(!view.take_view_updated());
    }
}
