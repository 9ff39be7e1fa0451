//! The per-tick contract shared by every game
//!
//! A tick applies held intents, moves entities, resolves collisions against
//! the post-movement positions, applies side effects, and leaves the session
//! ready to be snapshotted. Discrete inputs arrive between ticks through
//! [`Simulation::handle_event`].

use crate::input::{InputEvent, IntentState};
use crate::renderer::Snapshot;
use crate::settings::ArcadeConfig;

use super::state::{GameEvent, Outcome};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held movement intents
    pub intent: IntentState,
    /// Seconds since the previous tick; drives timers, not movement
    pub dt: f32,
}

/// A game variant the frame engine can drive
pub trait Simulation {
    /// Short name used in log lines
    const NAME: &'static str;

    /// Build a fresh session. Nothing carries over from any earlier session.
    fn new(config: &ArcadeConfig, seed: u64) -> Self;

    /// Edge-triggered input (actions, typed characters). Events that make no
    /// sense in the current phase are ignored.
    fn handle_event(&mut self, event: &InputEvent);

    /// Advance one tick. A no-op once the session is over.
    fn tick(&mut self, input: &TickInput);

    fn snapshot(&self) -> Snapshot;

    /// `Some` once the session reached a terminal phase
    fn outcome(&self) -> Option<Outcome>;

    fn score(&self) -> u64;

    /// Events produced since the last drain
    fn drain_events(&mut self) -> Vec<GameEvent>;

    /// End-of-session summary lines, for games that have one
    fn report_lines(&self) -> Option<Vec<String>> {
        None
    }
}
