//! Pointer gesture tracking without any DOM dependency.
//!
//! A press only becomes a drag once the pointer has moved more than
//! `DRAG_THRESHOLD_PX` on either axis, so a plain click never reports a drop.

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Finished drag: what was picked up and what it was released over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropEvent<S, T> {
    pub source: S,
    pub target: Option<T>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase<S> {
    Idle,
    /// Button down, not moved far enough yet
    Pending { source: S, start_x: i32, start_y: i32 },
    Dragging { source: S },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureTracker<S, T> {
    phase: Phase<S>,
    hover: Option<T>,
}

impl<S, T> Default for GestureTracker<S, T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            hover: None,
        }
    }
}

impl<S: Copy, T: Copy> GestureTracker<S, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary button pressed on a draggable element
    pub fn press(&mut self, source: S, x: i32, y: i32) {
        self.phase = Phase::Pending { source, start_x: x, start_y: y };
        self.hover = None;
    }

    /// Pointer moved. Returns true when this movement started the drag.
    pub fn motion(&mut self, x: i32, y: i32) -> bool {
        if let Phase::Pending { source, start_x, start_y } = self.phase {
            let dx = (x - start_x).abs();
            let dy = (y - start_y).abs();
            if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
                self.phase = Phase::Dragging { source };
                return true;
            }
        }
        false
    }

    /// Pointer entered a drop target; ignored unless dragging
    pub fn enter(&mut self, target: T) {
        if self.is_dragging() {
            self.hover = Some(target);
        }
    }

    pub fn leave(&mut self) {
        if self.is_dragging() {
            self.hover = None;
        }
    }

    /// Button released. Reports a drop only when a drag was in progress;
    /// the tracker is idle afterwards either way.
    pub fn release(&mut self) -> Option<DropEvent<S, T>> {
        let finished = match self.phase {
            Phase::Dragging { source } => Some(DropEvent {
                source,
                target: self.hover,
            }),
            _ => None,
        };
        self.cancel();
        finished
    }

    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
        self.hover = None;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Element being dragged, once the threshold was passed
    pub fn dragging(&self) -> Option<S> {
        match self.phase {
            Phase::Dragging { source } => Some(source),
            _ => None,
        }
    }

    pub fn hover(&self) -> Option<T> {
        self.hover
    }
}
