//! Mouse and keyboard input for the product orbit view
//!
//! Input is first turned into an [`OrbitInput`], then applied to the
//! camera. Left drag orbits around the target, Shift+drag pans it, the
//! wheel zooms and Shift+C goes back to the framed home view.

use log::debug;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

const LEFT_MOUSE_BUTTON: u32 = 0;

/// One camera adjustment derived from raw input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitInput {
    /// Yaw and pitch deltas in radians
    Orbit { yaw: f32, pitch: f32 },
    /// Target shift in view-plane units
    Pan { dx: f32, dy: f32 },
    /// Distance delta, positive moves away from the target
    Zoom(f32),
    /// Back to the home pose set by framing
    Home,
}

pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    shift_held: bool,
    dragging: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            shift_held: false,
            dragging: false,
        }
    }

    /// Applies a device event to `camera`, redrawing when it moved
    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        if let Some(input) = self.interpret(event) {
            apply(input, camera);
            window.request_redraw();
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        if let PhysicalKey::Code(code) = event.physical_key {
            if let Some(input) = self.on_key(code, event.state) {
                apply(input, camera);
            }
        }
    }

    /// Tracks the drag button and maps motion and wheel to camera input
    pub fn interpret(&mut self, event: &DeviceEvent) -> Option<OrbitInput> {
        match event {
            DeviceEvent::Button {
                button: LEFT_MOUSE_BUTTON,
                state,
            } => {
                self.dragging = *state == ElementState::Pressed;
                None
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                Some(OrbitInput::Zoom(-scroll * self.zoom_speed))
            }
            DeviceEvent::MouseMotion { delta: (dx, dy) } if self.dragging => {
                let (dx, dy) = (*dx as f32, *dy as f32);
                if self.shift_held {
                    Some(OrbitInput::Pan {
                        dx: -dx * self.pan_speed,
                        dy: dy * self.pan_speed,
                    })
                } else {
                    Some(OrbitInput::Orbit {
                        yaw: -dx * self.rotate_speed,
                        pitch: dy * self.rotate_speed,
                    })
                }
            }
            _ => None,
        }
    }

    /// Tracks Shift; Shift+C asks for the home view
    pub fn on_key(&mut self, code: KeyCode, state: ElementState) -> Option<OrbitInput> {
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.shift_held = state == ElementState::Pressed;
                None
            }
            KeyCode::KeyC if state == ElementState::Pressed && self.shift_held => {
                debug!("Resetting camera to home view");
                Some(OrbitInput::Home)
            }
            _ => None,
        }
    }
}

pub fn apply(input: OrbitInput, camera: &mut OrbitCamera) {
    match input {
        OrbitInput::Orbit { yaw, pitch } => {
            camera.add_yaw(yaw);
            camera.add_pitch(pitch);
        }
        OrbitInput::Pan { dx, dy } => camera.pan((dx, dy)),
        OrbitInput::Zoom(delta) => camera.add_distance(delta),
        OrbitInput::Home => camera.reset_to_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(controller: &mut CameraController) {
        controller.interpret(&DeviceEvent::Button {
            button: LEFT_MOUSE_BUTTON,
            state: ElementState::Pressed,
        });
    }

    #[test]
    fn test_motion_without_drag_is_ignored() {
        let mut controller = CameraController::new(0.005, 0.1);
        let motion = DeviceEvent::MouseMotion { delta: (10.0, 4.0) };
        assert_eq!(controller.interpret(&motion), None);
    }

    #[test]
    fn test_drag_orbits_and_shift_drag_pans() {
        let mut controller = CameraController::new(0.5, 0.1);
        press(&mut controller);

        let motion = DeviceEvent::MouseMotion { delta: (2.0, 4.0) };
        assert_eq!(
            controller.interpret(&motion),
            Some(OrbitInput::Orbit {
                yaw: -1.0,
                pitch: 2.0
            })
        );

        controller.on_key(KeyCode::ShiftLeft, ElementState::Pressed);
        assert!(matches!(
            controller.interpret(&motion),
            Some(OrbitInput::Pan { .. })
        ));

        controller.interpret(&DeviceEvent::Button {
            button: LEFT_MOUSE_BUTTON,
            state: ElementState::Released,
        });
        assert_eq!(controller.interpret(&motion), None);
    }

    #[test]
    fn test_wheel_zooms_out_on_negative_lines() {
        let mut controller = CameraController::new(0.005, 0.5);
        let wheel = DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, -2.0),
        };
        assert_eq!(controller.interpret(&wheel), Some(OrbitInput::Zoom(1.0)));
    }

    #[test]
    fn test_home_needs_shift() {
        let mut controller = CameraController::new(0.005, 0.1);
        assert_eq!(controller.on_key(KeyCode::KeyC, ElementState::Pressed), None);

        controller.on_key(KeyCode::ShiftRight, ElementState::Pressed);
        assert_eq!(
            controller.on_key(KeyCode::KeyC, ElementState::Pressed),
            Some(OrbitInput::Home)
        );

        controller.on_key(KeyCode::ShiftRight, ElementState::Released);
        assert_eq!(controller.on_key(KeyCode::KeyC, ElementState::Pressed), None);
    }

    #[test]
    fn test_home_undoes_orbit_and_zoom() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, cgmath::Vector3::new(0.0, 0.0, 0.0), 1.5);
        camera.frame_origin(4.0);

        apply(OrbitInput::Orbit { yaw: 0.7, pitch: 0.3 }, &mut camera);
        apply(OrbitInput::Zoom(2.0), &mut camera);
        assert!(camera.yaw != 0.0 && camera.distance != 4.0);

        apply(OrbitInput::Home, &mut camera);
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
        assert_eq!(camera.distance, 4.0);
    }
}
