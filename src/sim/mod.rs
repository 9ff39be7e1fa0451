//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, movement in pixels per tick
//! - Timers advanced only by the dt handed to a tick
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each pool)
//! - No rendering or platform dependencies

pub mod breakout;
pub mod countdown;
pub mod geometry;
pub mod pool;
pub mod powerup;
pub mod shooter;
pub mod state;
pub mod tick;
pub mod timer;
pub mod typing;
pub mod words;

pub use breakout::{Ball, BreakoutPhase, BreakoutSession, Brick, BrickColor, Paddle};
pub use countdown::{ContinueClock, ContinuePhase};
pub use geometry::{Aabb, Bounds, clamp_to_bounds, intersects};
pub use pool::{EntityId, EntityPool};
pub use powerup::{PowerUpKind, PowerUpOutcome, PowerUps};
pub use shooter::ShooterSession;
pub use state::{GameEvent, Outcome};
pub use tick::{Simulation, TickInput};
pub use typing::{TypingPhase, TypingReport, TypingSession};
