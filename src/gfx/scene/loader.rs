//! Scene description (JSON) loading
//!
//! ```json
//! {
//!   "objects": [
//!     { "file": "cube.obj", "material": "cube.mtl",
//!       "position": [0, 0, 0], "rotation": [0, 45, 0], "scale": 1.0,
//!       "waypoints": [[0, 0, 0], [2, 0, 0], [2, 0, 2], [0, 0, 2]], "speed": 0.5 }
//!   ],
//!   "light": { "position": [5, 10, 5], "color": [1, 1, 1] },
//!   "camera": { "position": [0, 0, 3] }
//! }
//! ```
//!
//! Every object is decoded and imported on its own. A broken object is
//! reported and left out; the rest of the scene still loads.

use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::Vector3;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    gfx::scene::{
        light::PointLight,
        object::{AnimatedObject, DEFAULT_PATH_SPEED},
        scene::Scene,
    },
    import::{ImportError, MeshImporter},
    simulation::spline::WaypointPath,
};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene description {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scene description {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("object #{index} is malformed")]
    MalformedObject {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("object #{index} has invalid {field}: {value}")]
    InvalidField {
        index: usize,
        field: &'static str,
        value: f32,
    },

    #[error("object #{index} failed to import")]
    Import {
        index: usize,
        #[source]
        source: ImportError,
    },
}

/// Top level of the file. Records are kept as raw JSON so that each one can
/// fail independently.
#[derive(Debug, Default, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub objects: Vec<serde_json::Value>,
    #[serde(default)]
    pub light: Option<serde_json::Value>,
    #[serde(default)]
    pub camera: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRecord {
    pub file: String,
    pub material: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: f32,
    #[serde(default)]
    pub waypoints: Vec<[f32; 3]>,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct LightRecord {
    position: [f32; 3],
    color: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
struct CameraRecord {
    position: [f32; 3],
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn read(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn object(&self, index: usize) -> Result<ObjectRecord, SceneError> {
        let value = self.objects.get(index).cloned().unwrap_or_default();
        let record: ObjectRecord = serde_json::from_value(value)
            .map_err(|source| SceneError::MalformedObject { index, source })?;

        if record.scale.is_nan() || record.scale <= 0.0 {
            return Err(SceneError::InvalidField {
                index,
                field: "scale",
                value: record.scale,
            });
        }
        if let Some(speed) = record.speed.filter(|s| s.is_nan() || *s < 0.0) {
            return Err(SceneError::InvalidField {
                index,
                field: "speed",
                value: speed,
            });
        }
        Ok(record)
    }

    /// The light record, or the default light if it is absent or malformed
    pub fn light(&self) -> PointLight {
        match self.light.clone().map(serde_json::from_value::<LightRecord>) {
            Some(Ok(record)) => PointLight {
                position: record.position.into(),
                color: record.color.into(),
            },
            Some(Err(err)) => {
                log::warn!("Ignoring malformed light record: {err}");
                PointLight::default()
            }
            None => PointLight::default(),
        }
    }

    /// The initial camera position, if a usable camera record exists
    pub fn camera_position(&self) -> Option<Vector3<f32>> {
        match self.camera.clone().map(serde_json::from_value::<CameraRecord>)? {
            Ok(record) => Some(record.position.into()),
            Err(err) => {
                log::warn!("Ignoring malformed camera record: {err}");
                None
            }
        }
    }
}

/// Outcome of populating a scene
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Builds scene objects from a description, resolving files under `asset_dir`
pub struct SceneLoader {
    asset_dir: PathBuf,
    default_speed: f32,
}

impl SceneLoader {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            default_speed: DEFAULT_PATH_SPEED,
        }
    }

    /// Path speed for objects without a `speed` field
    pub fn with_default_speed(mut self, speed: f32) -> Self {
        self.default_speed = speed;
        self
    }

    /// Reads `path` and adds its contents to `scene`.
    ///
    /// Fails only if the file as a whole cannot be read or parsed; in that
    /// case `scene` is left untouched.
    pub fn load(&self, path: &Path, scene: &mut Scene) -> Result<LoadReport, SceneError> {
        let description = SceneDescription::read(path)?;
        Ok(self.apply(&description, scene))
    }

    /// Like [`load`](Self::load), but a missing or broken file only logs an
    /// error and leaves an empty scene
    pub fn load_or_empty(&self, path: &Path, scene: &mut Scene) -> LoadReport {
        match self.load(path, scene) {
            Ok(report) => report,
            Err(err) => {
                log::error!("{err}: {}; starting with an empty scene", error_chain(&err));
                LoadReport::default()
            }
        }
    }

    pub fn apply(&self, description: &SceneDescription, scene: &mut Scene) -> LoadReport {
        scene.light = description.light();
        if let Some(position) = description.camera_position() {
            scene.camera_manager.camera.position = position;
            scene.camera_manager.camera.update_view_proj();
        }

        let mut report = LoadReport::default();
        for index in 0..description.objects.len() {
            match self.build_object(description, index, scene) {
                Ok(object) => {
                    scene.add_object(object);
                    report.loaded += 1;
                }
                Err(err) => {
                    log::warn!("Skipping {err}: {}", error_chain(&err));
                    report.skipped += 1;
                }
            }
        }

        log::info!(
            "Scene loaded: {} objects, {} skipped",
            report.loaded,
            report.skipped
        );
        report
    }

    fn build_object(
        &self,
        description: &SceneDescription,
        index: usize,
        scene: &mut Scene,
    ) -> Result<AnimatedObject, SceneError> {
        let record = description.object(index)?;
        let mesh_path = self.asset_dir.join(&record.file);
        let material_path = self.asset_dir.join(&record.material);

        let mesh = MeshImporter::new(&mut scene.textures)
            .import(&mesh_path, &material_path)
            .map_err(|source| SceneError::Import { index, source })?;

        let mut object = AnimatedObject::from_imported(mesh);
        object.position = record.position.into();
        object.rotation = record.rotation.into();
        object.scale = record.scale;
        object.path = WaypointPath::new(
            record.waypoints.iter().map(|&w| Vector3::from(w)).collect(),
            record.speed.unwrap_or(self.default_speed),
        );
        if let Some(start) = object.path.sample() {
            object.position = start;
        }
        Ok(object)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    err.source().map(|cause| cause.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("waypath-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tri.obj"), TRIANGLE).unwrap();
        fs::write(dir.join("tri.mtl"), "Kd 0.2 0.4 0.6\nNs 10\n").unwrap();
        dir
    }

    #[test]
    fn test_broken_objects_are_skipped() {
        let dir = scratch_dir("loader-skip");
        let json = r#"{
            "objects": [
                { "file": "tri.obj", "material": "tri.mtl",
                  "position": [1, 2, 3], "rotation": [0, 90, 0], "scale": 2.0 },
                { "file": "tri.obj", "material": "tri.mtl", "position": [0, 0, 0] },
                { "file": "missing.obj", "material": "tri.mtl",
                  "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": 1 },
                { "file": "tri.obj", "material": "tri.mtl",
                  "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": -1 }
            ],
            "light": { "position": [1, 1, 1], "color": [0.5, 0.5, 0.5] },
            "camera": { "position": [0, 1, 8] }
        }"#;
        fs::write(dir.join("scene.json"), json).unwrap();

        let mut scene = Scene::default();
        let report = SceneLoader::new(&dir)
            .load(&dir.join("scene.json"), &mut scene)
            .unwrap();

        assert_eq!(report, LoadReport { loaded: 1, skipped: 3 });
        let object = &scene.objects[0];
        assert_eq!(object.name, "tri");
        assert_eq!(object.vertex_count(), 3);
        assert_eq!(object.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(object.rotation, Vector3::new(0.0, 90.0, 0.0));
        assert_eq!(object.scale, 2.0);
        assert_eq!(object.material.diffuse, Vector3::new(0.2, 0.4, 0.6));
        assert!(!object.path.is_animated());

        assert_eq!(scene.light.position, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(scene.camera_manager.position(), Vector3::new(0.0, 1.0, 8.0));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_waypoints_and_speed() {
        let dir = scratch_dir("loader-path");
        let json = r#"{ "objects": [
            { "file": "tri.obj", "material": "tri.mtl",
              "position": [9, 9, 9], "rotation": [0, 0, 0], "scale": 1,
              "waypoints": [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]], "speed": 2.0 },
            { "file": "tri.obj", "material": "tri.mtl",
              "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": 1,
              "waypoints": [[0, 0, 0]] }
        ] }"#;
        let description = SceneDescription::from_json(json).unwrap();

        let mut scene = Scene::default();
        let report = SceneLoader::new(&dir)
            .with_default_speed(0.25)
            .apply(&description, &mut scene);

        assert_eq!(report.loaded, 2);
        let moving = &scene.objects[0];
        assert!(moving.path.is_animated());
        assert_eq!(moving.path.speed, 2.0);
        // starts on its first waypoint rather than the declared position
        assert_eq!(moving.position, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(scene.objects[1].path.speed, 0.25);
        assert_eq!(scene.objects[1].path.len(), 1);

        // no light or camera records: defaults
        assert_eq!(scene.light, PointLight::default());
        assert_eq!(scene.camera_manager.position(), Vector3::new(0.0, 0.0, 3.0));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unreadable_file_leaves_empty_scene() {
        let mut scene = Scene::default();
        let loader = SceneLoader::new("/nonexistent");
        let err = loader
            .load(Path::new("/nonexistent/scene.json"), &mut scene)
            .unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));

        let report = loader.load_or_empty(Path::new("/nonexistent/scene.json"), &mut scene);
        assert_eq!(report, LoadReport::default());
        assert!(scene.objects.is_empty());
        assert_eq!(scene.light, PointLight::default());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = scratch_dir("loader-json");
        fs::write(dir.join("scene.json"), "{ \"objects\": [ ").unwrap();
        let mut scene = Scene::default();
        let err = SceneLoader::new(&dir)
            .load(&dir.join("scene.json"), &mut scene)
            .unwrap_err();
        assert!(matches!(err, SceneError::Parse { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bundled_demo_scene_loads() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let mut scene = Scene::default();
        let report = SceneLoader::new(&assets)
            .load(&assets.join("scene.json"), &mut scene)
            .unwrap();

        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        // both cubes share one decoded checker texture
        assert_eq!(scene.textures.len(), 1);
        assert_eq!(scene.objects[0].textures.diffuse, scene.objects[2].textures.diffuse);
        assert!(scene.objects[1].textures.diffuse.is_none());
        // 6 quads and 6 triangles
        assert_eq!(scene.objects[0].vertex_count(), 36);
        assert_eq!(scene.objects[1].vertex_count(), 18);
        assert_eq!(scene.get_statistics().animated_count, 2);
    }

    #[test]
    fn test_malformed_light_falls_back() {
        let description =
            SceneDescription::from_json(r#"{ "light": { "position": [1, 2] } }"#).unwrap();
        assert_eq!(description.light(), PointLight::default());
        assert!(description.camera_position().is_none());
    }
}
