//! # Graphics Module
//!
//! Everything between the imported scene data and the window surface.
//!
//! - **Camera System** ([`camera`]) - free-look camera driven by pointer samples and held keys
//! - **Scene Management** ([`scene`]) - animated objects, lighting and the scene description
//! - **Resource Management** ([`resources`]) - uniform layouts and GPU textures
//! - **Rendering Pipeline** ([`rendering`]) - the Phong pipeline and per-frame draw

pub mod camera;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
