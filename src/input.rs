//! Keyboard and pointer input, decoupled from the windowing layer
//!
//! The app translates winit events into [`InputEvent`]s and feeds them to an
//! [`InputHandler`], which applies them to the scene and the simulations.

use std::collections::HashMap;

use winit::keyboard::KeyCode;

use crate::{
    gfx::{
        camera::CameraMovement,
        scene::{
            light::{LightingStrengths, LightingTerm},
            object::Axis,
            scene::{Scene, SceneCommand, SCALE_STEP},
        },
    },
    simulation::SimulationManager,
};

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Quit,
    /// Held camera translation
    Move(CameraMovement),
    Edit(SceneCommand),
    ToggleAnimation,
    ResetAnimation,
}

impl KeyAction {
    /// Whether auto-repeat events trigger the action again
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            KeyAction::Edit(SceneCommand::Rotate(_) | SceneCommand::Scale(_))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Repeated,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { code: KeyCode, state: KeyState },
    /// Absolute pointer position in window pixels
    PointerMoved { x: f32, y: f32 },
    FocusChanged(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    Quit,
}

/// Key code to action table
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let step = LightingStrengths::STEP;
        let bindings = HashMap::from([
            (KeyCode::Escape, KeyAction::Quit),
            (KeyCode::KeyW, KeyAction::Move(CameraMovement::Forward)),
            (KeyCode::KeyS, KeyAction::Move(CameraMovement::Backward)),
            (KeyCode::KeyA, KeyAction::Move(CameraMovement::Left)),
            (KeyCode::KeyD, KeyAction::Move(CameraMovement::Right)),
            (KeyCode::Space, KeyAction::Move(CameraMovement::Up)),
            (KeyCode::ControlLeft, KeyAction::Move(CameraMovement::Down)),
            (KeyCode::Tab, KeyAction::Edit(SceneCommand::SelectNext)),
            (KeyCode::KeyE, KeyAction::Edit(SceneCommand::AddWaypoint)),
            (KeyCode::KeyR, KeyAction::Edit(SceneCommand::Rotate(Axis::X))),
            (KeyCode::KeyT, KeyAction::Edit(SceneCommand::Rotate(Axis::Y))),
            (KeyCode::KeyY, KeyAction::Edit(SceneCommand::Rotate(Axis::Z))),
            (KeyCode::KeyU, KeyAction::Edit(SceneCommand::Scale(-SCALE_STEP))),
            (KeyCode::KeyI, KeyAction::Edit(SceneCommand::Scale(SCALE_STEP))),
            (
                KeyCode::Digit1,
                KeyAction::Edit(SceneCommand::Lighting(LightingTerm::Ambient, -step)),
            ),
            (
                KeyCode::Digit2,
                KeyAction::Edit(SceneCommand::Lighting(LightingTerm::Ambient, step)),
            ),
            (
                KeyCode::Digit3,
                KeyAction::Edit(SceneCommand::Lighting(LightingTerm::Diffuse, -step)),
            ),
            (
                KeyCode::Digit4,
                KeyAction::Edit(SceneCommand::Lighting(LightingTerm::Diffuse, step)),
            ),
            (
                KeyCode::Digit5,
                KeyAction::Edit(SceneCommand::Lighting(LightingTerm::Specular, -step)),
            ),
            (
                KeyCode::Digit6,
                KeyAction::Edit(SceneCommand::Lighting(LightingTerm::Specular, step)),
            ),
            (KeyCode::KeyP, KeyAction::ToggleAnimation),
            (KeyCode::Backspace, KeyAction::ResetAnimation),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    #[must_use]
    pub fn lookup(&self, code: KeyCode) -> Option<KeyAction> {
        self.bindings.get(&code).copied()
    }
}

/// Applies input events to the scene in arrival order
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    pub bindings: KeyBindings,
}

impl InputHandler {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn handle(
        &self,
        event: InputEvent,
        scene: &mut Scene,
        simulations: &mut SimulationManager,
    ) -> InputOutcome {
        match event {
            InputEvent::PointerMoved { x, y } => scene.camera_manager.process_pointer(x, y),
            InputEvent::FocusChanged(focused) => {
                // a fresh pointer sample must not turn the camera
                scene.camera_manager.camera.reset_pointer();
                if !focused {
                    scene.camera_manager.controller.clear();
                }
            }
            InputEvent::Key { code, state } => {
                let Some(action) = self.bindings.lookup(code) else {
                    return InputOutcome::Continue;
                };
                return self.handle_key(action, state, scene, simulations);
            }
        }
        InputOutcome::Continue
    }

    fn handle_key(
        &self,
        action: KeyAction,
        state: KeyState,
        scene: &mut Scene,
        simulations: &mut SimulationManager,
    ) -> InputOutcome {
        if let KeyAction::Move(movement) = action {
            let held = state != KeyState::Released;
            scene.camera_manager.controller.set_movement(movement, held);
            return InputOutcome::Continue;
        }

        let fires = match state {
            KeyState::Pressed => true,
            KeyState::Repeated => action.repeats(),
            KeyState::Released => false,
        };
        if !fires {
            return InputOutcome::Continue;
        }

        match action {
            KeyAction::Quit => return InputOutcome::Quit,
            KeyAction::Edit(command) => scene.apply(command),
            KeyAction::ToggleAnimation => simulations.toggle_running(),
            KeyAction::ResetAnimation => simulations.reset(scene),
            KeyAction::Move(_) => {}
        }
        InputOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{AnimatedObject, Vertex3D};
    use crate::simulation::SplineAnimator;
    use cgmath::Vector3;

    fn setup() -> (InputHandler, Scene, SimulationManager) {
        let mut scene = Scene::default();
        scene.add_object(AnimatedObject::from_vertices("a", vec![Vertex3D::default(); 3]));
        scene.add_object(AnimatedObject::from_vertices("b", vec![Vertex3D::default(); 3]));
        let mut simulations = SimulationManager::new();
        simulations.attach_simulation(Box::new(SplineAnimator::new()), &mut scene);
        (InputHandler::default(), scene, simulations)
    }

    fn key(code: KeyCode, state: KeyState) -> InputEvent {
        InputEvent::Key { code, state }
    }

    #[test]
    fn test_waypoint_key_ignores_repeats() {
        let (input, mut scene, mut sims) = setup();
        input.handle(key(KeyCode::KeyE, KeyState::Pressed), &mut scene, &mut sims);
        input.handle(key(KeyCode::KeyE, KeyState::Repeated), &mut scene, &mut sims);
        input.handle(key(KeyCode::KeyE, KeyState::Repeated), &mut scene, &mut sims);
        input.handle(key(KeyCode::KeyE, KeyState::Released), &mut scene, &mut sims);
        assert_eq!(scene.objects[0].path.len(), 1);
        assert_eq!(scene.objects[0].path.waypoints()[0], Vector3::new(0.0, 0.0, 3.0));

        input.handle(key(KeyCode::KeyE, KeyState::Pressed), &mut scene, &mut sims);
        assert_eq!(scene.objects[0].path.len(), 2);
    }

    #[test]
    fn test_rotation_follows_repeats() {
        let (input, mut scene, mut sims) = setup();
        input.handle(key(KeyCode::Tab, KeyState::Pressed), &mut scene, &mut sims);
        input.handle(key(KeyCode::Tab, KeyState::Repeated), &mut scene, &mut sims);
        assert_eq!(scene.selected, 1);

        input.handle(key(KeyCode::KeyT, KeyState::Pressed), &mut scene, &mut sims);
        input.handle(key(KeyCode::KeyT, KeyState::Repeated), &mut scene, &mut sims);
        input.handle(key(KeyCode::KeyT, KeyState::Released), &mut scene, &mut sims);
        assert_eq!(scene.objects[1].rotation.y, 20.0);
        assert_eq!(scene.objects[0].rotation.y, 0.0);
    }

    #[test]
    fn test_lighting_keys_fire_once_per_press() {
        let (input, mut scene, mut sims) = setup();
        input.handle(key(KeyCode::Digit3, KeyState::Pressed), &mut scene, &mut sims);
        input.handle(key(KeyCode::Digit3, KeyState::Repeated), &mut scene, &mut sims);
        assert!((scene.lighting.diffuse - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_movement_keys_hold_until_release() {
        let (input, mut scene, mut sims) = setup();
        input.handle(key(KeyCode::KeyW, KeyState::Pressed), &mut scene, &mut sims);
        assert!(scene.camera_manager.controller.is_moving());
        input.handle(key(KeyCode::KeyW, KeyState::Released), &mut scene, &mut sims);
        assert!(!scene.camera_manager.controller.is_moving());

        input.handle(key(KeyCode::Space, KeyState::Pressed), &mut scene, &mut sims);
        input.handle(InputEvent::FocusChanged(false), &mut scene, &mut sims);
        assert!(!scene.camera_manager.controller.is_moving());
    }

    #[test]
    fn test_focus_resets_pointer_tracking() {
        let (input, mut scene, mut sims) = setup();
        input.handle(InputEvent::PointerMoved { x: 10.0, y: 10.0 }, &mut scene, &mut sims);
        assert!(scene.camera_manager.camera.is_tracking());
        input.handle(InputEvent::FocusChanged(true), &mut scene, &mut sims);
        assert!(!scene.camera_manager.camera.is_tracking());

        input.handle(InputEvent::PointerMoved { x: 500.0, y: 500.0 }, &mut scene, &mut sims);
        assert_eq!(scene.camera_manager.camera.yaw, -90.0);
    }

    #[test]
    fn test_animation_toggle_and_quit() {
        let (input, mut scene, mut sims) = setup();
        assert!(sims.is_running());
        input.handle(key(KeyCode::KeyP, KeyState::Pressed), &mut scene, &mut sims);
        assert!(!sims.is_running());

        let outcome = input.handle(key(KeyCode::Escape, KeyState::Pressed), &mut scene, &mut sims);
        assert_eq!(outcome, InputOutcome::Quit);
        let outcome = input.handle(key(KeyCode::KeyZ, KeyState::Pressed), &mut scene, &mut sims);
        assert_eq!(outcome, InputOutcome::Continue);
    }
}
