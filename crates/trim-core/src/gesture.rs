//! Arbitration between long-press-to-delete and drag-to-reorder on one
//! pointer stream.

use std::time::{Duration, Instant};

pub const LONG_PRESS: Duration = Duration::from_millis(600);
pub const DRAG_GRACE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pressing { since: Instant },
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// The press was held long enough: ask whether to delete.
    ShowDeletePrompt,
    DragEnded,
}

/// The two gestures are mutually exclusive: starting a drag cancels a pending
/// long-press, and a drag cannot start right after a delete prompt appeared.
#[derive(Debug, Clone)]
pub struct GestureArbiter {
    long_press: Duration,
    drag_grace: Duration,
    state: State,
    prompt_shown_at: Option<Instant>,
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new(LONG_PRESS, DRAG_GRACE)
    }
}

impl GestureArbiter {
    pub fn new(long_press: Duration, drag_grace: Duration) -> Self {
        Self {
            long_press,
            drag_grace,
            state: State::Idle,
            prompt_shown_at: None,
        }
    }

    pub fn pointer_down(&mut self, now: Instant) {
        if self.state != State::Dragging {
            self.state = State::Pressing { since: now };
        }
    }

    pub fn pointer_up(&mut self) -> Option<GestureEvent> {
        let prev = std::mem::replace(&mut self.state, State::Idle);
        (prev == State::Dragging).then_some(GestureEvent::DragEnded)
    }

    /// Advance the long-press timer.
    pub fn poll(&mut self, now: Instant) -> Option<GestureEvent> {
        match self.state {
            State::Pressing { since } if now.duration_since(since) >= self.long_press => {
                self.state = State::Idle;
                self.prompt_shown_at = Some(now);
                Some(GestureEvent::ShowDeletePrompt)
            }
            _ => None,
        }
    }

    /// Try to begin a drag. Refused inside the grace window after a prompt.
    pub fn drag_start(&mut self, now: Instant) -> bool {
        if let Some(shown) = self.prompt_shown_at {
            if now.duration_since(shown) < self.drag_grace {
                return false;
            }
        }
        self.state = State::Dragging;
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.state == State::Dragging
    }

    pub fn is_pressing(&self) -> bool {
        matches!(self.state, State::Pressing { .. })
    }
}
