//! Low-frequency timers polled once per tick
//!
//! Timers only advance by the dt they are given, so a paused session (no
//! ticks) freezes them instead of letting them fire a backlog on resume.

/// Periodic timer, the in-simulation stand-in for `setInterval`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    period: f32,
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Takes effect from the current cycle onward
    pub fn set_period(&mut self, period: f32) {
        self.period = period;
    }

    pub fn remaining(&self) -> f32 {
        (self.period - self.elapsed).max(0.0)
    }

    /// Advance by `dt`, returning how many whole periods elapsed. Lateness
    /// carries into the next cycle, so the long-run cadence is exact.
    pub fn poll(&mut self, dt: f32) -> u32 {
        if self.period <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    /// Advance by `dt` and fire at most once, restarting the cycle from now
    pub fn poll_once(&mut self, dt: f32) -> bool {
        if self.period <= 0.0 {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}
