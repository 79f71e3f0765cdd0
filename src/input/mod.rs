//! Input handling: event types, key actions, and the processor that routes
//! pointer events to the gizmo or an orbit controller.

/// Platform-agnostic input events.
pub mod event;
/// Bindable keyboard actions.
mod keyboard;
/// Pointer routing and drag capture.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
pub use processor::{InputCommand, InputLayout, InputProcessor, PointerTarget};
