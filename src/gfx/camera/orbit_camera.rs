use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed world up axis
pub const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// Pitch is kept strictly inside ±90° so `forward` never lines up with `WORLD_UP`
pub const PITCH_LIMIT: f32 = 89.0;

/// Discrete camera translation directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-look camera driven by pointer position samples.
///
/// Two states: before the first pointer sample (`last_pointer == None`) and
/// tracking. The first sample only records the pointer, so the view never
/// jumps when input starts.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub position: Vector3<f32>,
    /// Unit view direction derived from `yaw`/`pitch`
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Degrees, -90 looks down -Z
    pub yaw: f32,
    /// Degrees, clamped to ±[`PITCH_LIMIT`]
    pub pitch: f32,
    /// Degrees per pixel of pointer travel
    pub sensitivity: f32,
    /// World units per second
    pub move_speed: f32,
    last_pointer: Option<(f32, f32)>,
    pub aspect: f32,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.build_projection_matrix() * self.view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(position: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            forward: -Vector3::unit_z(), // Will be auto-calculated in `update()` nevertheless.
            up: WORLD_UP,
            yaw: -90.0,
            pitch: 0.0,
            sensitivity: 0.1,
            move_speed: 2.5,
            last_pointer: None,
            aspect,
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Feeds an absolute pointer position (window pixels).
    pub fn process_pointer(&mut self, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            return;
        };

        let dx = (x - last_x) * self.sensitivity;
        // screen y grows downwards, pitch grows upwards
        let dy = (last_y - y) * self.sensitivity;

        self.yaw += dx;
        self.set_pitch(self.pitch + dy);
    }

    /// Forgets the last pointer sample, so the next one produces no rotation
    pub fn reset_pointer(&mut self) {
        self.last_pointer = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.last_pointer.is_some()
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    /// Unit vector to the camera's right, parallel to the ground plane
    pub fn right(&self) -> Vector3<f32> {
        self.forward.cross(WORLD_UP).normalize()
    }

    /// Moves `move_speed * delta_time` units along one of the camera axes
    pub fn translate(&mut self, movement: CameraMovement, delta_time: f32) {
        let distance = self.move_speed * delta_time;
        let direction = match movement {
            CameraMovement::Forward => self.forward,
            CameraMovement::Backward => -self.forward,
            CameraMovement::Right => self.right(),
            CameraMovement::Left => -self.right(),
            CameraMovement::Up => WORLD_UP,
            CameraMovement::Down => -WORLD_UP,
        };
        self.position += direction * distance;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_at_rh(eye, eye + self.forward, self.up)
    }

    pub fn build_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Recomputes `forward` after changing `yaw` or `pitch`.
    fn update(&mut self) {
        self.forward = calculate_forward(self.yaw, self.pitch);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.position.x, self.position.y, self.position.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

fn calculate_forward(yaw: f32, pitch: f32) -> Vector3<f32> {
    let (yaw, pitch) = (Deg(yaw), Deg(pitch));
    Vector3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}
