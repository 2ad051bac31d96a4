//! Moves every scene object along its waypoint loop

use crate::gfx::scene::Scene;

use super::traits::Simulation;

/// Drives each object's [`WaypointPath`](super::spline::WaypointPath) independently.
///
/// Objects with fewer than four waypoints keep their last position.
#[derive(Debug)]
pub struct SplineAnimator {
    running: bool,
}

impl SplineAnimator {
    pub fn new() -> Self {
        Self { running: true }
    }
}

impl Default for SplineAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for SplineAnimator {
    fn initialize(&mut self, scene: &mut Scene) {
        let animated = scene
            .objects
            .iter()
            .filter(|object| object.path.is_animated())
            .count();
        log::info!(
            "Spline animator driving {animated} of {} objects",
            scene.objects.len()
        );
    }

    fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        for object in scene.objects.iter_mut() {
            if let Some(position) = object.path.advance(delta_time) {
                object.position = position;
            }
        }
    }

    fn name(&self) -> &str {
        "Spline Animator"
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn reset(&mut self, scene: &mut Scene) {
        for object in scene.objects.iter_mut() {
            object.path.reset();
            if let Some(position) = object.path.sample() {
                object.position = position;
            }
        }
    }
}
