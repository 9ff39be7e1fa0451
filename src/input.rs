//! Input events and movement intent
//!
//! Movement uses "current intent" semantics: a `MoveIntent` holds until the
//! matching `MoveStop`. Actions and characters are edge-triggered and are
//! delivered to the session exactly once.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Direction along an axis; `Negative` is left or up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Negative => -1.0,
            Direction::Positive => 1.0,
        }
    }
}

/// Discrete one-shot actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Shoot,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    MoveIntent(Axis, Direction),
    MoveStop(Axis),
    Action(ActionKind),
    Character(char),
}

/// Anything that produces input events (keyboard glue, scripted replays)
pub trait InputSource {
    fn poll(&mut self) -> Option<InputEvent>;
}

/// Held movement intent per axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntentState {
    pub horizontal: Option<Direction>,
    pub vertical: Option<Direction>,
}

impl IntentState {
    /// Fold a movement event into the held state. Returns false for
    /// edge-triggered events, which the caller forwards to the session.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::MoveIntent(axis, dir) => {
                *self.slot(axis) = Some(dir);
                true
            }
            InputEvent::MoveStop(axis) => {
                *self.slot(axis) = None;
                true
            }
            InputEvent::Action(_) | InputEvent::Character(_) => false,
        }
    }

    fn slot(&mut self, axis: Axis) -> &mut Option<Direction> {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    /// Signed unit step along an axis (-1, 0 or 1)
    pub fn axis_value(&self, axis: Axis) -> f32 {
        let held = match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        };
        held.map_or(0.0, Direction::sign)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Queue-backed input source for replays, demos and tests
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Queue one `Character` event per char of `text`
    pub fn type_text(&mut self, text: &str) {
        self.queue.extend(text.chars().map(InputEvent::Character));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }
}
