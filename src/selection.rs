// Mouse-driven rectangle selection.
// Hold the left button and drag: the rectangle follows the cursor.
// Let go: the selection is dropped and the frame goes back to normal.

use crate::types::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEvent {
    LeftDown(Point),
    Move(Point),
    LeftUp(Point),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selecting(Rect),
}

impl Selection {
    pub fn handle(&mut self, event: MouseEvent) {
        match (*self, event) {
            // A press always starts over, even mid-drag.
            (_, MouseEvent::LeftDown(p)) => *self = Selection::Selecting(Rect::at(p)),
            (Selection::Selecting(rect), MouseEvent::Move(p)) => {
                *self = Selection::Selecting(Rect { end: p, ..rect });
            }
            (Selection::Idle, MouseEvent::Move(_)) => {}
            (_, MouseEvent::LeftUp(_)) => *self = Selection::Idle,
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Selection::Idle => None,
            Selection::Selecting(rect) => Some(*rect),
        }
    }
}

/// minifb reports mouse *state* each frame, not events.
/// This remembers the previous poll and turns changes into `MouseEvent`s.
#[derive(Debug, Default)]
pub struct MouseTracker {
    was_down: bool,
    last_pos: Option<Point>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one poll of the window. Returns the event this poll represents, if any.
    /// Until the cursor has been seen once there is nowhere to put an event,
    /// so nothing is emitted (and a held button is not treated as a press yet).
    pub fn poll(&mut self, button_down: bool, pos: Option<(usize, usize)>) -> Option<MouseEvent> {
        let pos = pos.map(|(x, y)| Point::new(x as i32, y as i32));
        let moved = pos.is_some() && pos != self.last_pos;
        let Some(at) = pos.or(self.last_pos) else {
            return None;
        };

        let event = match (self.was_down, button_down) {
            (false, true) => Some(MouseEvent::LeftDown(at)),
            (true, true) if moved => Some(MouseEvent::Move(at)),
            (true, false) => Some(MouseEvent::LeftUp(at)),
            _ => None,
        };

        self.was_down = button_down;
        if pos.is_some() {
            self.last_pos = pos;
        }
        event
    }
}
