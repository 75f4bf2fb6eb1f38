// Input handling system
//
// Keyboard input is event driven: the window's key presses are translated
// through `InputConfig` into `KeyEvent::Down` / `KeyEvent::Up` for the four
// game keys, and delivered to whoever subscribed to the keyboard topic.
//
// - `action`: game keys and default bindings
// - `config`: remappable key bindings
// - `manager`: winit event translation

pub mod action;
pub mod config;
pub mod manager;

pub use action::{GameKey, KeyEvent};
pub use config::InputConfig;
pub use manager::InputManager;
