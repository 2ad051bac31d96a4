// src/simulation/mod.rs
//! Simulation system
//!
//! Per-frame scene updaters. The only simulation shipped is the
//! [`SplineAnimator`], which moves objects around their waypoint loops.

pub mod manager;
pub mod spline;
pub mod spline_animator;
pub mod traits;

pub use manager::SimulationManager;
pub use spline::{catmull_rom, WaypointPath, MIN_WAYPOINTS};
pub use spline_animator::SplineAnimator;
pub use traits::Simulation;
