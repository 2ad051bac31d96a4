//! Simulation manager
//!
//! Owns the attached simulation and drives it from the main loop.

use super::traits::Simulation;
use crate::gfx::scene::Scene;

/// Manages the lifecycle of the active simulation
pub struct SimulationManager {
    simulation: Option<Box<dyn Simulation>>,
    time_scale: f32,
}

impl SimulationManager {
    pub fn new() -> Self {
        Self {
            simulation: None,
            time_scale: 1.0,
        }
    }

    /// Attach a simulation, replacing any previous one
    pub fn attach_simulation(&mut self, mut simulation: Box<dyn Simulation>, scene: &mut Scene) {
        simulation.initialize(scene);
        log::info!("Attached simulation: {}", simulation.name());
        self.simulation = Some(simulation);
    }

    /// Update simulation (called every frame)
    pub fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        if let Some(simulation) = &mut self.simulation {
            if simulation.is_running() {
                simulation.update(delta_time * self.time_scale, scene);
            }
        }
    }

    /// Pause a running simulation or resume a paused one
    pub fn toggle_running(&mut self) {
        if let Some(simulation) = &mut self.simulation {
            let running = !simulation.is_running();
            simulation.set_running(running);
            log::info!(
                "{} {}",
                simulation.name(),
                if running { "resumed" } else { "paused" }
            );
        }
    }

    pub fn reset(&mut self, scene: &mut Scene) {
        if let Some(simulation) = &mut self.simulation {
            simulation.reset(scene);
            log::info!("{} reset", simulation.name());
        }
    }

    pub fn is_running(&self) -> bool {
        self.simulation
            .as_ref()
            .is_some_and(|simulation| simulation.is_running())
    }

    /// Multiplier on frame time; negative values are treated as 0
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}

impl Default for SimulationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::spline_animator::SplineAnimator;
    use cgmath::Vector3;

    #[test]
    fn test_paused_simulation_does_not_advance() {
        let mut scene = Scene::default();
        let mut object = crate::gfx::scene::AnimatedObject::from_vertices("o", Vec::new());
        for i in 0..4 {
            object.path.push(Vector3::new(i as f32, 0.0, 0.0));
        }
        scene.objects.push(object);

        let mut manager = SimulationManager::new();
        manager.attach_simulation(Box::new(SplineAnimator::new()), &mut scene);
        assert!(manager.is_running());

        manager.toggle_running();
        assert!(!manager.is_running());
        manager.update(0.5, &mut scene);
        assert_eq!(scene.objects[0].path.t(), 0.0);

        manager.toggle_running();
        manager.set_time_scale(2.0);
        manager.update(0.1, &mut scene);
        let expected = 0.1 * 2.0 * scene.objects[0].path.speed;
        assert!((scene.objects[0].path.t() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_negative_time_scale_freezes_paths() {
        let mut scene = Scene::default();
        let mut object = crate::gfx::scene::AnimatedObject::from_vertices("o", Vec::new());
        for i in 0..4 {
            object.path.push(Vector3::new(0.0, i as f32, 0.0));
        }
        scene.objects.push(object);

        let mut manager = SimulationManager::new();
        manager.attach_simulation(Box::new(SplineAnimator::new()), &mut scene);
        manager.set_time_scale(-3.0);
        manager.update(1.0, &mut scene);
        assert_eq!(scene.objects[0].path.t(), 0.0);
        assert_eq!(scene.objects[0].path.current_waypoint(), 0);
    }
}
