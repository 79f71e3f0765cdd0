//! Viewer-wide events and the dispatcher that fans them out.
//!
//! Each [`ViewportController`](crate::viewport::ViewportController) owns one
//! [`EventDispatcher`]. Listeners react to an event by returning a
//! [`ViewerAction`] that the owner carries out after dispatch, so a listener
//! never needs a reference back into the controller.

use crate::gizmo::GizmoAxis;

/// Which orbit controller produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlsId {
    /// Controller of the primary camera.
    Primary,
    /// Controller of the camera-helper view.
    Secondary,
}

/// Something that happened in the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// An orbit controller moved its camera.
    ControlsChanged {
        /// The controller that moved.
        controls: ControlsId,
    },
    /// The host surface changed size or pixel ratio.
    Resized {
        /// Logical width.
        width: f32,
        /// Logical height.
        height: f32,
        /// Device pixels per logical pixel.
        pixel_ratio: f32,
    },
    /// A gizmo click started a reorientation.
    GizmoReorient {
        /// Target axis.
        axis: GizmoAxis,
    },
}

impl ViewerEvent {
    /// The kind listeners subscribe to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ControlsChanged { .. } => EventKind::ControlsChanged,
            Self::Resized { .. } => EventKind::Resized,
            Self::GizmoReorient { .. } => EventKind::GizmoReorient,
        }
    }
}

/// Event discriminant used for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`ViewerEvent::ControlsChanged`].
    ControlsChanged,
    /// See [`ViewerEvent::Resized`].
    Resized,
    /// See [`ViewerEvent::GizmoReorient`].
    GizmoReorient,
}

/// Follow-up requested by a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    /// Schedule a render on the next tick.
    RequestRender,
}

/// Handle returned by [`EventDispatcher::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ViewerEvent) -> Option<ViewerAction>>;

/// Explicitly owned publish/subscribe hub.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(ListenerId, EventKind, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventDispatcher {
    /// Create a dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to events of `kind`.
    pub fn add_listener<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ViewerEvent) -> Option<ViewerAction> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Unsubscribe. Returns whether the listener was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Number of listeners subscribed to `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }

    /// Deliver `event` to its subscribers in subscription order and collect
    /// the actions they request.
    pub fn dispatch(&mut self, event: &ViewerEvent) -> Vec<ViewerAction> {
        let kind = event.kind();
        self.listeners
            .iter_mut()
            .filter(|(_, k, _)| *k == kind)
            .filter_map(|(_, _, listener)| listener(event))
            .collect()
    }
}
