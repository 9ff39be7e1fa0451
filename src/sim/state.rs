//! Shared session types
//!
//! Outcomes, per-tick events and the seeded RNG every game session owns.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::powerup::{PowerUpKind, PowerUpOutcome};

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn from_win(win: bool) -> Self {
        if win { Outcome::Won } else { Outcome::Lost }
    }

    /// Banner text for the brick-breaker and shooter
    pub fn banner(self) -> &'static str {
        match self {
            Outcome::Won => "YOU WIN, CONGRATULATIONS!",
            Outcome::Lost => "GAME OVER",
        }
    }
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BrickDestroyed { row: usize, column: usize },
    PowerUp { kind: PowerUpKind, outcome: PowerUpOutcome },
    LifeLost { remaining: u32 },
    EnemyDestroyed { at: Vec2 },
    /// Session timer ran out; the grace countdown starts next tick
    TimedOut,
    GraceStarted,
    Resumed,
    WordCompleted(String),
    LevelUp(u32),
    SessionEnded(Outcome),
}

impl GameEvent {
    /// Emit this event through the `log` facade at a level matching its weight
    pub fn log(&self, game: &str) {
        match self {
            GameEvent::BrickDestroyed { row, column } => {
                log::debug!("[{game}] brick ({row}, {column}) destroyed")
            }
            GameEvent::PowerUp { kind, outcome } => {
                log::debug!("[{game}] power-up {kind:?}: {outcome:?}")
            }
            GameEvent::LifeLost { remaining } => {
                log::info!("[{game}] life lost, {remaining} remaining")
            }
            GameEvent::EnemyDestroyed { at } => {
                log::debug!("[{game}] enemy destroyed at ({:.0}, {:.0})", at.x, at.y)
            }
            GameEvent::TimedOut => log::info!("[{game}] time is up"),
            GameEvent::GraceStarted => log::info!("[{game}] grace countdown started"),
            GameEvent::Resumed => log::info!("[{game}] continued, timer reset"),
            GameEvent::WordCompleted(word) => log::debug!("[{game}] typed \"{word}\""),
            GameEvent::LevelUp(level) => log::info!("[{game}] level {level}"),
            GameEvent::SessionEnded(outcome) => log::info!("[{game}] session ended: {outcome:?}"),
        }
    }
}

/// Seeded RNG for a session
pub fn session_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_session_rng_is_reproducible() {
        let mut a = session_rng(42);
        let mut b = session_rng(42);
        let xs: Vec<u32> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_outcome_banner() {
        assert_eq!(Outcome::from_win(true), Outcome::Won);
        assert_eq!(Outcome::Lost.banner(), "GAME OVER");
    }
}
