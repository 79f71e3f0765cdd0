//! Routes raw pointer events to the gizmo or an orbit controller.
//!
//! The `InputProcessor` owns the transient pointer state (cursor position,
//! held button, modifier keys) and which target captured the current drag.
//! Press decides the target; the drag and the release stay with it.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use crate::event::ControlsId;
use crate::render::ScreenRect;

/// Zoom units per pixel of middle-button drag.
const DRAG_ZOOM_PER_PIXEL: f32 = 0.02;

/// Where a pointer press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The gizmo host square.
    Gizmo,
    /// An orbit controller's area.
    Controls(ControlsId),
}

/// Screen areas that receive input, front to back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLayout {
    /// Gizmo host square.
    pub gizmo: ScreenRect,
    /// Camera-helper quadrant, when shown.
    pub helper: Option<ScreenRect>,
}

impl InputLayout {
    /// Topmost target under `point`. The primary view covers everything
    /// the gizmo and helper don't.
    #[must_use]
    pub fn target_at(&self, point: Vec2) -> PointerTarget {
        if self.gizmo.contains(point) {
            PointerTarget::Gizmo
        } else if self.helper.is_some_and(|rect| rect.contains(point)) {
            PointerTarget::Controls(ControlsId::Secondary)
        } else {
            PointerTarget::Controls(ControlsId::Primary)
        }
    }
}

/// What an input event asks the viewport to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Orbit by a pointer drag.
    Rotate {
        /// Controller to drive.
        controls: ControlsId,
        /// Drag in logical pixels.
        delta: Vec2,
    },
    /// Pan by a pointer drag.
    Pan {
        /// Controller to drive.
        controls: ControlsId,
        /// Drag in logical pixels.
        delta: Vec2,
    },
    /// Dolly in (positive) or out (negative).
    Zoom {
        /// Controller to drive.
        controls: ControlsId,
        /// Zoom amount.
        delta: f32,
    },
    /// Press and release both landed on the gizmo.
    GizmoClick {
        /// Release position relative to the gizmo square's top-left.
        position: Vec2,
    },
}

/// Converts raw pointer events into [`InputCommand`]s.
#[derive(Debug, Default)]
pub struct InputProcessor {
    /// Last cursor position in logical pixels.
    cursor: Vec2,
    /// Button currently held, if any.
    pressed: Option<MouseButton>,
    /// Target that received the press.
    capture: Option<PointerTarget>,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
}

impl InputProcessor {
    /// Create a processor with no button held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position in logical pixels.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Target that owns the current drag.
    #[must_use]
    pub fn capture(&self) -> Option<PointerTarget> {
        self.capture
    }

    /// Drop the current drag without producing a click.
    pub fn release_capture(&mut self) {
        self.pressed = None;
        self.capture = None;
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        layout: &InputLayout,
    ) -> Option<InputCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(Vec2::new(x, y)),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, layout)
            }
            InputEvent::Scroll { delta } => match layout.target_at(self.cursor) {
                PointerTarget::Gizmo => None,
                PointerTarget::Controls(controls) => {
                    Some(InputCommand::Zoom { controls, delta })
                }
            },
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, position: Vec2) -> Option<InputCommand> {
        let delta = position - self.cursor;
        self.cursor = position;

        let Some(PointerTarget::Controls(controls)) = self.capture else {
            return None;
        };
        match self.pressed? {
            MouseButton::Left if self.shift_pressed => {
                Some(InputCommand::Pan { controls, delta })
            }
            MouseButton::Left => Some(InputCommand::Rotate { controls, delta }),
            MouseButton::Right => Some(InputCommand::Pan { controls, delta }),
            MouseButton::Middle => Some(InputCommand::Zoom {
                controls,
                delta: -delta.y * DRAG_ZOOM_PER_PIXEL,
            }),
        }
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        layout: &InputLayout,
    ) -> Option<InputCommand> {
        if pressed {
            if self.pressed.is_none() {
                self.pressed = Some(button);
                self.capture = Some(layout.target_at(self.cursor));
            }
            return None;
        }
        if self.pressed != Some(button) {
            return None;
        }

        let captured = self.capture.take();
        self.pressed = None;
        let on_gizmo = layout.gizmo.contains(self.cursor);
        (button == MouseButton::Left && captured == Some(PointerTarget::Gizmo) && on_gizmo)
            .then(|| InputCommand::GizmoClick {
                position: layout.gizmo.to_local(self.cursor),
            })
    }
}
