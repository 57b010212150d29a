// Drag-to-move for a window without a title bar.
// Grab anywhere with the left button, the window follows the pointer, let go to drop.
// Letting go with Ctrl+Shift held also asks for the control panel.

use crate::types::{Modifiers, Point};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// `offset` is where the pointer grabbed the window, relative to its top-left.
    Dragging { offset: Point },
}

impl DragState {
    /// Left button went down at `pointer` while the window sits at `top_left`.
    pub fn press(&mut self, pointer: Point, top_left: Point) {
        *self = DragState::Dragging { offset: pointer - top_left };
    }

    /// Pointer moved. Returns the new window top-left while dragging.
    /// No clamping: the window may end up partly or fully off-screen.
    pub fn motion(&self, pointer: Point) -> Option<Point> {
        match *self {
            DragState::Dragging { offset } => Some(pointer - offset),
            DragState::Idle => None,
        }
    }

    /// Left button came up. Returns true when the panel gesture was made.
    pub fn release(&mut self, modifiers: Modifiers) -> bool {
        *self = DragState::Idle;
        modifiers.ctrl && modifiers.shift
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}
