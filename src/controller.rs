use glam::Vec2;
use log::debug;

use crate::camera::{CameraState, Viewport};
use crate::trackball;

pub const MIN_SCALE: f32 = 0.001;
pub const MAX_SCALE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Rotates the camera while held.
    Primary,
    /// Zooms the camera while held.
    Secondary,
    Middle,
}

/// Platform-agnostic input events, in screen pixels with the origin at the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    ButtonPressed(PointerButton),
    ButtonReleased(PointerButton),
    Escape,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    pub min_scale: f32,
    pub max_scale: f32,
    pub trackball_radius: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            trackball_radius: trackball::TRACKBALL_RADIUS,
        }
    }
}

/// Turns input events into camera changes.
///
/// The rotate and zoom buttons are tracked independently, so holding both
/// rotates and zooms on the same pointer motion.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    settings: ControllerSettings,
}

impl InteractionController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn handle_event(&self, state: &mut CameraState, event: InputEvent, viewport: Viewport) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                let cursor = Vec2::new(x, y);
                if state.rotating {
                    self.rotate(state, cursor, viewport);
                }
                if state.zooming {
                    self.zoom(state, cursor, viewport);
                }
                state.last_cursor = cursor;
            }
            InputEvent::ButtonPressed(button) => self.set_button(state, button, true),
            InputEvent::ButtonReleased(button) => self.set_button(state, button, false),
            InputEvent::Escape | InputEvent::Quit => {
                debug!("exit requested by {event:?}");
                state.should_exit = true;
            }
        }
    }

    fn set_button(&self, state: &mut CameraState, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => state.rotating = pressed,
            PointerButton::Secondary => state.zooming = pressed,
            PointerButton::Middle => {}
        }
    }

    fn rotate(&self, state: &mut CameraState, cursor: Vec2, viewport: Viewport) {
        let previous = trackball::normalize_cursor(viewport, state.last_cursor);
        let current = trackball::normalize_cursor(viewport, cursor);
        let delta = trackball::drag_quaternion(previous, current, self.settings.trackball_radius);
        state.orientation = trackball::compose(delta, state.orientation).normalize();
    }

    fn zoom(&self, state: &mut CameraState, cursor: Vec2, viewport: Viewport) {
        // Screen y grows downward: dragging down enlarges the scene.
        let factor = 1.0 + (cursor.y - state.last_cursor.y) / viewport.height() as f32;
        state.scale =
            (state.scale * factor).clamp(self.settings.min_scale, self.settings.max_scale);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800, 600).unwrap()
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    fn press(button: PointerButton) -> InputEvent {
        InputEvent::ButtonPressed(button)
    }

    fn release(button: PointerButton) -> InputEvent {
        InputEvent::ButtonReleased(button)
    }

    fn apply(state: &mut CameraState, events: &[InputEvent]) {
        let controller = InteractionController::default();
        for event in events {
            controller.handle_event(state, *event, viewport());
        }
    }

    #[test]
    fn buttons_drive_independent_modes() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(&mut state, &[press(PointerButton::Primary)]);
        assert!(state.is_rotating());
        apply(&mut state, &[press(PointerButton::Secondary)]);
        assert!(state.is_rotating() && state.is_zooming());
        apply(&mut state, &[release(PointerButton::Primary)]);
        assert!(!state.is_rotating() && state.is_zooming());
        apply(&mut state, &[release(PointerButton::Secondary)]);
        assert!(!state.is_rotating() && !state.is_zooming());
        apply(&mut state, &[press(PointerButton::Middle)]);
        assert!(!state.is_rotating() && !state.is_zooming());
    }

    #[test]
    fn pointer_motion_always_updates_cursor() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(&mut state, &[moved(12.0, 34.0)]);
        assert_eq!(state.last_cursor(), Vec2::new(12.0, 34.0));
        assert_eq!(state.orientation(), Quat::IDENTITY);
        assert_eq!(state.scale(), 1.0);
    }

    #[test]
    fn zero_delta_rotation_keeps_identity() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(
            &mut state,
            &[
                moved(100.0, 100.0),
                press(PointerButton::Primary),
                moved(100.0, 100.0),
            ],
        );
        assert_eq!(state.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn dragging_rotates_orientation() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(
            &mut state,
            &[
                moved(400.0, 300.0),
                press(PointerButton::Primary),
                moved(440.0, 300.0),
            ],
        );
        assert_ne!(state.orientation(), Quat::IDENTITY);
        assert!((state.orientation() * Vec3::Z).x > 0.0);
    }

    #[test]
    fn zoom_drag_down_half_height_scales_by_one_and_a_half() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(
            &mut state,
            &[
                moved(400.0, 100.0),
                press(PointerButton::Secondary),
                moved(400.0, 400.0),
            ],
        );
        assert!((state.scale() - 1.5).abs() < 1e-6);
        apply(&mut state, &[moved(400.0, 250.0)]);
        assert!(state.scale() < 1.5);
    }

    #[test]
    fn scale_stays_within_bounds() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(&mut state, &[press(PointerButton::Secondary)]);
        for step in 0..200 {
            let y = if step % 3 == 0 { 0.0 } else { 590.0 };
            apply(&mut state, &[moved(0.0, y)]);
            assert!((MIN_SCALE..=MAX_SCALE).contains(&state.scale()));
        }
        for _ in 0..50 {
            apply(
                &mut state,
                &[
                    moved(0.0, 0.0),
                    release(PointerButton::Secondary),
                    moved(0.0, 599.0),
                    press(PointerButton::Secondary),
                    moved(0.0, 0.0),
                ],
            );
        }
        assert_eq!(state.scale(), MIN_SCALE);
        for _ in 0..50 {
            apply(
                &mut state,
                &[
                    release(PointerButton::Secondary),
                    moved(0.0, 0.0),
                    press(PointerButton::Secondary),
                    moved(0.0, 599.0),
                ],
            );
        }
        assert_eq!(state.scale(), MAX_SCALE);
    }

    #[test]
    fn simultaneous_rotate_and_zoom_apply_together() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(
            &mut state,
            &[
                moved(400.0, 300.0),
                press(PointerButton::Primary),
                press(PointerButton::Secondary),
                moved(400.0, 360.0),
            ],
        );
        assert_ne!(state.orientation(), Quat::IDENTITY);
        assert!(state.scale() > 1.0);
    }

    #[test]
    fn many_small_rotations_keep_unit_norm() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(&mut state, &[press(PointerButton::Primary)]);
        for step in 0..1000 {
            let x = 400.0 + (step as f32 * 0.37).sin() * 150.0;
            let y = 300.0 + (step as f32 * 0.23).cos() * 120.0;
            apply(&mut state, &[moved(x, y)]);
        }
        assert!((state.orientation().length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn escape_and_quit_request_exit() {
        let mut state = CameraState::new(Vec3::ZERO);
        apply(&mut state, &[InputEvent::Escape]);
        assert!(state.should_exit());

        let mut state = CameraState::new(Vec3::ZERO);
        apply(&mut state, &[InputEvent::Quit]);
        assert!(state.should_exit());
    }

    #[test]
    fn custom_bounds_are_respected() {
        let controller = InteractionController::new(ControllerSettings {
            min_scale: 0.5,
            max_scale: 2.0,
            ..ControllerSettings::default()
        });
        let mut state = CameraState::new(Vec3::ZERO);
        for event in [press(PointerButton::Secondary), moved(0.0, 599.0)] {
            controller.handle_event(&mut state, event, viewport());
        }
        assert!(state.scale() <= 2.0);
        for event in [moved(0.0, 0.0), moved(0.0, 0.0)] {
            controller.handle_event(&mut state, event, viewport());
        }
        assert_eq!(state.scale(), 0.5);
    }
}
