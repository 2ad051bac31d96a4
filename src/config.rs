//! Viewer settings with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[camera]` keeps the defaults for everything else.

use std::path::{Path, PathBuf};

use cgmath::Deg;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gfx::camera::OrbitCamera;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            title: "waypath".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Degrees of rotation per pixel of pointer travel
    pub sensitivity: f32,
    /// World units per second
    pub move_speed: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            move_speed: 2.5,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationOptions {
    /// Segments per second for objects without their own `speed`
    pub path_speed: f32,
    /// Multiplier on frame time for every path, 0 freezes them
    pub time_scale: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            path_speed: 0.5,
            time_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    pub clear_color: [f32; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            clear_color: [0.9, 0.9, 0.9],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowOptions,
    pub camera: CameraOptions,
    pub animation: AnimationOptions,
    pub render: RenderOptions,
}

impl ViewerConfig {
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from a TOML file. Missing fields use defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(path, &content)
    }

    /// Copies the camera settings onto `camera`
    pub fn apply_to_camera(&self, camera: &mut OrbitCamera) {
        camera.sensitivity = self.camera.sensitivity;
        camera.move_speed = self.camera.move_speed;
        camera.fovy = Deg(self.camera.fov);
        camera.znear = self.camera.near;
        camera.zfar = self.camera.far;
    }
}
