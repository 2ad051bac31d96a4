use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Pointer position sample, forwarded to the camera's look state machine
    pub fn process_pointer(&mut self, x: f32, y: f32) {
        self.camera.process_pointer(x, y);
    }

    /// Applies held movement keys, then refreshes the camera uniform.
    ///
    /// Called once per frame before anything reads the camera pose.
    pub fn update(&mut self, delta_time: f32) {
        self.controller.update(&mut self.camera, delta_time);
        self.camera.update_view_proj();
    }

    pub fn position(&self) -> Vector3<f32> {
        self.camera.position
    }

    /// Get the view projection matrix from the camera
    pub fn get_view_proj_matrix(&self) -> cgmath::Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

impl Default for CameraManager {
    fn default() -> Self {
        Self::new(
            OrbitCamera::new(Vector3::new(0.0, 0.0, 3.0), 1.0),
            CameraController::new(),
        )
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
    /// Creates a default [CameraUniform].
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
    use crate::gfx::camera::orbit_camera::CameraMovement;

    #[test]
    fn test_update_moves_then_refreshes_uniform() {
        let mut manager = CameraManager::default();
        manager.camera.move_speed = 1.0;
        manager.controller.set_movement(CameraMovement::Up, true);
        manager.update(2.0);

        assert_eq!(manager.position(), Vector3::new(0.0, 2.0, 3.0));
        assert_eq!(manager.camera.uniform.view_position, [0.0, 2.0, 3.0, 1.0]);
        let expected: [[f32; 4]; 4] = manager.get_view_proj_matrix().into();
        assert_eq!(manager.camera.uniform.view_proj, expected);
    }
}
