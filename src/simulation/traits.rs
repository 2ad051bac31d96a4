//! Core simulation traits
//!
//! Defines the interface per-frame scene updaters implement to be driven by
//! the [`SimulationManager`](super::manager::SimulationManager).

use crate::gfx::scene::Scene;

/// Something that advances scene state once per frame
pub trait Simulation {
    /// Called once when the simulation is attached
    fn initialize(&mut self, _scene: &mut Scene) {}

    /// Advance the simulation by `delta_time` seconds.
    ///
    /// Runs after the camera update and before the renderer reads the scene.
    fn update(&mut self, delta_time: f32, scene: &mut Scene);

    /// Name for logging
    fn name(&self) -> &str;

    /// Whether simulation is currently running
    fn is_running(&self) -> bool;

    /// Start/pause simulation
    fn set_running(&mut self, running: bool);

    /// Reset simulation to initial state
    fn reset(&mut self, scene: &mut Scene);
}
