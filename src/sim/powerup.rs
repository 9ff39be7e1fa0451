//! Brick-breaker power-up accumulation
//!
//! Three independent counters gate diminishing-return boosts. A counter only
//! moves when its effect actually lands, and a kind whose counter has reached
//! its cap is inert for the rest of the session.

use serde::{Deserialize, Serialize};

use super::breakout::{Ball, Paddle};
use super::pool::EntityPool;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Raise the primary ball's speed multiplier
    Speed,
    /// Clone the primary ball with reversed velocity
    MultiBall,
    /// Stretch the paddle
    LongerPaddle,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [Self::Speed, Self::MultiBall, Self::LongerPaddle];
}

/// Per-kind application limits for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpCaps {
    pub speed: u32,
    pub multi_ball: u32,
    pub longer_paddle: u32,
}

impl Default for PowerUpCaps {
    fn default() -> Self {
        Self {
            speed: 4,
            multi_ball: 4,
            longer_paddle: 3,
        }
    }
}

impl PowerUpCaps {
    pub fn cap(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Speed => self.speed,
            PowerUpKind::MultiBall => self.multi_ball,
            PowerUpKind::LongerPaddle => self.longer_paddle,
        }
    }
}

/// Effect magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpEffects {
    pub speed_step: f32,
    pub max_speed_multiplier: f32,
    pub length_step: f32,
    pub max_length_multiplier: f32,
    /// Hard cap on simultaneous balls, independent of the multi-ball counter
    pub max_balls: usize,
}

impl Default for PowerUpEffects {
    fn default() -> Self {
        Self {
            speed_step: 0.5,
            max_speed_multiplier: 2.0,
            length_step: 0.5,
            max_length_multiplier: 2.5,
            max_balls: 4,
        }
    }
}

/// How many times each kind has been applied this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpCounters {
    pub speed: u32,
    pub multi_ball: u32,
    pub longer_paddle: u32,
}

impl PowerUpCounters {
    pub fn count(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Speed => self.speed,
            PowerUpKind::MultiBall => self.multi_ball,
            PowerUpKind::LongerPaddle => self.longer_paddle,
        }
    }

    fn bump(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => self.speed += 1,
            PowerUpKind::MultiBall => self.multi_ball += 1,
            PowerUpKind::LongerPaddle => self.longer_paddle += 1,
        }
    }
}

/// Result of a power-up signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpOutcome {
    Applied,
    /// Counter already at its cap
    Exhausted,
    /// Multi-ball refused because the ball cap is reached; counter unchanged
    BallCapReached,
    /// No ball in play to boost or clone
    NoBall,
}

/// The power-up state machine for one brick-breaker session
#[derive(Debug, Clone, Default)]
pub struct PowerUps {
    pub counters: PowerUpCounters,
    pub caps: PowerUpCaps,
    pub effects: PowerUpEffects,
}

impl PowerUps {
    pub fn new(caps: PowerUpCaps, effects: PowerUpEffects) -> Self {
        Self {
            counters: PowerUpCounters::default(),
            caps,
            effects,
        }
    }

    pub fn is_exhausted(&self, kind: PowerUpKind) -> bool {
        self.counters.count(kind) >= self.caps.cap(kind)
    }

    /// Apply `kind` to the session's balls and paddle if its counter allows.
    ///
    /// The speed boost and the multi-ball clone both target the first live
    /// ball in the pool.
    pub fn trigger(
        &mut self,
        kind: PowerUpKind,
        balls: &mut EntityPool<Ball>,
        paddle: &mut Paddle,
    ) -> PowerUpOutcome {
        if self.is_exhausted(kind) {
            return PowerUpOutcome::Exhausted;
        }

        let fx = self.effects;
        match kind {
            PowerUpKind::Speed => {
                let Some(ball) = balls.first_mut() else {
                    return PowerUpOutcome::NoBall;
                };
                ball.speed_multiplier =
                    (ball.speed_multiplier + fx.speed_step).min(fx.max_speed_multiplier);
            }
            PowerUpKind::MultiBall => {
                if balls.len() >= fx.max_balls {
                    return PowerUpOutcome::BallCapReached;
                }
                let Some(first) = balls.first() else {
                    return PowerUpOutcome::NoBall;
                };
                let clone = Ball {
                    vel: -first.vel,
                    ..first.clone()
                };
                balls.add(clone);
            }
            PowerUpKind::LongerPaddle => {
                paddle.length_multiplier =
                    (paddle.length_multiplier + fx.length_step).min(fx.max_length_multiplier);
            }
        }

        self.counters.bump(kind);
        PowerUpOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BreakoutConfig;
    use crate::sim::geometry::Bounds;

    fn fixture() -> (PowerUps, EntityPool<Ball>, Paddle) {
        let config = BreakoutConfig::default();
        let bounds = Bounds::default();
        let mut balls = EntityPool::new();
        balls.add(Ball::spawn(&config, &bounds));
        (
            PowerUps::new(config.power_up_caps, config.power_up_effects),
            balls,
            Paddle::centered(&config, &bounds),
        )
    }

    #[test]
    fn test_speed_boost_saturates_but_counter_keeps_counting() {
        let (mut pu, mut balls, mut paddle) = fixture();
        for _ in 0..4 {
            assert_eq!(
                pu.trigger(PowerUpKind::Speed, &mut balls, &mut paddle),
                PowerUpOutcome::Applied
            );
        }
        assert_eq!(balls.first().map(|b| b.speed_multiplier), Some(2.0));
        assert_eq!(pu.counters.speed, 4);

        assert_eq!(
            pu.trigger(PowerUpKind::Speed, &mut balls, &mut paddle),
            PowerUpOutcome::Exhausted
        );
        assert_eq!(pu.counters.speed, 4);
    }

    #[test]
    fn test_multi_ball_clones_first_ball_reversed() {
        let (mut pu, mut balls, mut paddle) = fixture();
        let first = balls.first().cloned().unwrap();
        pu.trigger(PowerUpKind::MultiBall, &mut balls, &mut paddle);

        assert_eq!(balls.len(), 2);
        let clone = balls.iter().nth(1).unwrap();
        assert_eq!(clone.pos, first.pos);
        assert_eq!(clone.vel, -first.vel);
        assert_eq!(pu.counters.multi_ball, 1);
    }

    #[test]
    fn test_multi_ball_respects_ball_cap_without_counting() {
        let (mut pu, mut balls, mut paddle) = fixture();
        for _ in 0..3 {
            pu.trigger(PowerUpKind::MultiBall, &mut balls, &mut paddle);
        }
        assert_eq!(balls.len(), 4);
        assert_eq!(pu.counters.multi_ball, 3);

        assert_eq!(
            pu.trigger(PowerUpKind::MultiBall, &mut balls, &mut paddle),
            PowerUpOutcome::BallCapReached
        );
        assert_eq!(balls.len(), 4);
        assert_eq!(pu.counters.multi_ball, 3);
    }

    #[test]
    fn test_longer_paddle_caps_independently() {
        let (mut pu, mut balls, mut paddle) = fixture();
        for _ in 0..3 {
            pu.trigger(PowerUpKind::LongerPaddle, &mut balls, &mut paddle);
        }
        assert_eq!(paddle.length_multiplier, 2.5);
        assert!(pu.is_exhausted(PowerUpKind::LongerPaddle));
        assert!(!pu.is_exhausted(PowerUpKind::Speed));

        let before = paddle.length_multiplier;
        assert_eq!(
            pu.trigger(PowerUpKind::LongerPaddle, &mut balls, &mut paddle),
            PowerUpOutcome::Exhausted
        );
        assert_eq!(paddle.length_multiplier, before);
    }

    #[test]
    fn test_no_ball_is_a_no_op() {
        let (mut pu, mut balls, mut paddle) = fixture();
        balls.clear();
        assert_eq!(
            pu.trigger(PowerUpKind::Speed, &mut balls, &mut paddle),
            PowerUpOutcome::NoBall
        );
        assert_eq!(pu.counters, PowerUpCounters::default());
    }
}
