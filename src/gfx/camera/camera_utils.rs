use cgmath::{Deg, Matrix4, SquareMatrix, Vector3, Zero};
use winit::{
    event::{DeviceEvent, KeyEvent},
    window::Window,
};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

/// Distance of the initial eye position from the origin, before any model is framed
pub const INITIAL_CAMERA_DISTANCE: f32 = 5.0;

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Camera looking down -Z at the origin from [`INITIAL_CAMERA_DISTANCE`]
    pub fn for_viewer(fovy_degrees: f32, aspect: f32) -> Self {
        let camera = OrbitCamera::new(INITIAL_CAMERA_DISTANCE, 0.0, 0.0, Vector3::zero(), aspect)
            .with_fovy(Deg(fovy_degrees));
        let controller = CameraController::new(0.005, 0.1);
        Self::new(camera, controller)
    }

    pub fn process_event(&mut self, event: &DeviceEvent, window: &Window) {
        self.controller
            .process_events(event, window, &mut self.camera);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_viewer_camera_defaults() {
        let manager = CameraManager::for_viewer(85.0, 1.5);
        let camera = &manager.camera;

        assert_relative_eq!(camera.eye.z, INITIAL_CAMERA_DISTANCE);
        assert_relative_eq!(camera.fovy.0, Deg(85.0_f32).0.to_radians());
        assert_relative_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn test_matrix_conversion_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let array = convert_matrix4_to_array(m);
        assert_eq!(array[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
