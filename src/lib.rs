// src/lib.rs
//! Waypath
//!
//! A small scene viewer: imports textured meshes, lights them with a single
//! Phong point light and moves objects around closed Catmull-Rom waypoint
//! loops, all on wgpu and winit.
//!
//! - [`import`] - mesh, material and texture loading
//! - [`simulation`] - spline math and the per-frame animator
//! - [`gfx`] - camera, scene state and rendering
//! - [`input`] - key bindings and input dispatch

pub mod app;
pub mod config;
pub mod gfx;
pub mod import;
pub mod input;
pub mod prelude;
pub mod simulation;
pub mod wgpu_utils;

pub use app::WaypathApp;
