// CONTROLLER: Input, game rules, and the session clock
pub mod input;
pub mod movement;
pub mod interaction;
pub mod camera_controller;
pub mod session;

pub use input::{Intent, InputProcessor, KeyBindings, MouseButton};
pub use movement::MovementController;
pub use interaction::{Interaction, InteractionState, TickOutcome};
pub use camera_controller::CameraController;
pub use session::Session;
