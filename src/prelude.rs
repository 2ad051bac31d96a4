//! # Waypath Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use waypath::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut scene = Scene::default();
//!     SceneLoader::new("assets").load_or_empty(std::path::Path::new("assets/scene.json"), &mut scene);
//!     WaypathApp::new(ViewerConfig::default(), scene)?.run()
//! }
//! ```

pub use crate::app::WaypathApp;
pub use crate::config::ViewerConfig;

pub use crate::gfx::camera::{CameraManager, CameraMovement, OrbitCamera};
pub use crate::gfx::scene::{AnimatedObject, Scene, SceneCommand, SceneLoader};

pub use crate::import::{ImportError, MaterialDescription, MeshImporter, TextureCache};

pub use crate::input::{InputEvent, InputHandler, KeyAction, KeyBindings};

pub use crate::simulation::{Simulation, SimulationManager, SplineAnimator, WaypointPath};

pub use cgmath::Vector3;
