//! # Scene Management Module
//!
//! Scene state for the viewer: the animated objects, the light, the camera
//! and the JSON scene description they are loaded from.
//!
//! - [`Scene`] - owns objects, selection, lighting, textures and camera
//! - [`AnimatedObject`] - one imported mesh with transform and waypoint path
//! - [`SceneLoader`] - builds a [`Scene`] from a scene description file
//! - [`Vertex3D`] - GPU vertex layout
//!
//! ```no_run
//! use std::path::Path;
//! use waypath::gfx::scene::{Scene, SceneLoader};
//!
//! let mut scene = Scene::default();
//! let report = SceneLoader::new("assets").load_or_empty(Path::new("assets/scene.json"), &mut scene);
//! println!("{} objects loaded", report.loaded);
//! ```

pub mod light;
pub mod loader;
pub mod object;
pub mod scene;
pub mod vertex;

pub use light::{LightingStrengths, LightingTerm, PointLight};
pub use loader::{LoadReport, ObjectRecord, SceneDescription, SceneError, SceneLoader};
pub use object::{AnimatedObject, Axis, DrawObject, ObjectGpuResources};
pub use scene::{Scene, SceneCommand, SceneStatistics};
pub use vertex::Vertex3D;
