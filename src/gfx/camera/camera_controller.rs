use std::collections::HashSet;

use super::orbit_camera::{CameraMovement, OrbitCamera};

/// Turns held movement keys into per-frame camera translation
#[derive(Debug, Default)]
pub struct CameraController {
    held: HashSet<CameraMovement>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a movement key going down (`pressed`) or up
    pub fn set_movement(&mut self, movement: CameraMovement, pressed: bool) {
        if pressed {
            self.held.insert(movement);
        } else {
            self.held.remove(&movement);
        }
    }

    pub fn is_moving(&self) -> bool {
        !self.held.is_empty()
    }

    /// Releases every held key, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Applies every held movement for one tick of `delta_time` seconds
    pub fn update(&self, camera: &mut OrbitCamera, delta_time: f32) {
        for movement in &self.held {
            camera.translate(*movement, delta_time);
        }
    }
}
