//! Shooter time limit with a continue window
//!
//! `Playing` runs a session timer. When it expires the clock spends exactly one
//! tick in `TimedOut`, then opens the `Grace` window. A continue during either
//! resets the session timer to full duration; letting the window run out ends
//! the session as a loss. `Ended` is terminal.
//!
//! Both timers compare accumulated tick time against a threshold each poll.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuePhase {
    Playing,
    TimedOut,
    Grace,
    Ended { win: bool },
}

/// Transition reported by [`ContinueClock::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    TimedOut,
    GraceStarted,
    GraceExpired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueClock {
    session_limit: f32,
    grace_limit: f32,
    session_elapsed: f32,
    grace_elapsed: f32,
    phase: ContinuePhase,
}

impl ContinueClock {
    pub fn new(session_limit: f32, grace_limit: f32) -> Self {
        Self {
            session_limit,
            grace_limit,
            session_elapsed: 0.0,
            grace_elapsed: 0.0,
            phase: ContinuePhase::Playing,
        }
    }

    pub fn phase(&self) -> ContinuePhase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, ContinuePhase::Ended { .. })
    }

    /// True while a continue would be accepted
    pub fn awaiting_continue(&self) -> bool {
        matches!(self.phase, ContinuePhase::TimedOut | ContinuePhase::Grace)
    }

    pub fn session_remaining(&self) -> f32 {
        (self.session_limit - self.session_elapsed).max(0.0)
    }

    pub fn grace_remaining(&self) -> f32 {
        match self.phase {
            ContinuePhase::TimedOut => self.grace_limit,
            ContinuePhase::Grace => (self.grace_limit - self.grace_elapsed).max(0.0),
            _ => 0.0,
        }
    }

    /// Poll the active timer
    pub fn advance(&mut self, dt: f32) -> Option<ClockEvent> {
        match self.phase {
            ContinuePhase::Playing => {
                self.session_elapsed += dt;
                (self.session_elapsed >= self.session_limit).then(|| {
                    self.phase = ContinuePhase::TimedOut;
                    ClockEvent::TimedOut
                })
            }
            ContinuePhase::TimedOut => {
                self.phase = ContinuePhase::Grace;
                self.grace_elapsed = 0.0;
                Some(ClockEvent::GraceStarted)
            }
            ContinuePhase::Grace => {
                self.grace_elapsed += dt;
                (self.grace_elapsed >= self.grace_limit).then(|| {
                    self.phase = ContinuePhase::Ended { win: false };
                    ClockEvent::GraceExpired
                })
            }
            ContinuePhase::Ended { .. } => None,
        }
    }

    /// Accept a continue. Returns false (and changes nothing) outside the
    /// continue window.
    pub fn resume(&mut self) -> bool {
        if !self.awaiting_continue() {
            return false;
        }
        self.phase = ContinuePhase::Playing;
        self.session_elapsed = 0.0;
        self.grace_elapsed = 0.0;
        true
    }

    /// End the session with the given result unless it already ended
    pub fn finish(&mut self, win: bool) -> bool {
        if self.is_ended() {
            return false;
        }
        self.phase = ContinuePhase::Ended { win };
        true
    }
}
