use crate::{
    gfx::camera::camera_utils::CameraManager,
    import::TextureCache,
};

use super::{
    light::{LightingStrengths, LightingTerm, PointLight},
    object::{AnimatedObject, Axis},
};

/// Degrees added per rotate command
pub const ROTATION_STEP: f32 = 10.0;

/// Scale change per scale command
pub const SCALE_STEP: f32 = 0.1;

/// Edits applied to the scene by user input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    SelectNext,
    /// Append the camera position to the selected object's path
    AddWaypoint,
    Rotate(Axis),
    /// Signed change of the selected object's uniform scale
    Scale(f32),
    Lighting(LightingTerm, f32),
}

/// All mutable viewer state: objects, selection, lighting and the camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<AnimatedObject>,
    /// Index into `objects`; meaningless while `objects` is empty
    pub selected: usize,
    pub light: PointLight,
    pub lighting: LightingStrengths,
    /// Decoded images waiting for upload, addressed by the objects' texture handles
    pub textures: TextureCache,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            selected: 0,
            light: PointLight::default(),
            lighting: LightingStrengths::default(),
            textures: TextureCache::new(),
        }
    }

    pub fn add_object(&mut self, object: AnimatedObject) {
        self.objects.push(object);
    }

    pub fn selected_object(&self) -> Option<&AnimatedObject> {
        self.objects.get(self.selected)
    }

    pub fn selected_object_mut(&mut self) -> Option<&mut AnimatedObject> {
        self.objects.get_mut(self.selected)
    }

    /// Advances the selection, wrapping to the first object
    pub fn select_next(&mut self) {
        if self.objects.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.objects.len();
        log::info!(
            "Selected object {} ({})",
            self.selected,
            self.objects[self.selected].name
        );
    }

    /// Appends the current camera position to the selected object's path
    pub fn add_waypoint_at_camera(&mut self) {
        let position = self.camera_manager.position();
        let Some(object) = self.objects.get_mut(self.selected) else {
            return;
        };
        object.path.push(position);
        log::info!(
            "Waypoint ({:.2}, {:.2}, {:.2}) added to {} ({} total)",
            position.x,
            position.y,
            position.z,
            object.name,
            object.path.len()
        );
    }

    pub fn apply(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::SelectNext => self.select_next(),
            SceneCommand::AddWaypoint => self.add_waypoint_at_camera(),
            SceneCommand::Rotate(axis) => {
                if let Some(object) = self.selected_object_mut() {
                    object.rotate(axis, ROTATION_STEP);
                }
            }
            SceneCommand::Scale(delta) => {
                if let Some(object) = self.selected_object_mut() {
                    object.scale_by(delta);
                }
            }
            SceneCommand::Lighting(term, delta) => {
                let value = self.lighting.adjust(term, delta);
                log::debug!("{term:?} strength now {value:.2}");
            }
        }
    }

    /// Moves the camera by the held keys and refreshes its uniform
    pub fn update_camera(&mut self, delta_time: f32) {
        self.camera_manager.update(delta_time);
    }

    /// Writes every object's transform and material to its GPU buffer
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.update_transform(queue);
        }
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            animated_count: self
                .objects
                .iter()
                .filter(|object| object.path.is_animated())
                .count(),
            texture_count: self.textures.len(),
            total_triangles: self.objects.iter().map(|o| o.triangle_count()).sum(),
            total_vertices: self.objects.iter().map(|o| o.vertex_count()).sum(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CameraManager::default())
    }
}

/// Scene statistics for logging
#[derive(Debug, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub animated_count: usize,
    pub texture_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
