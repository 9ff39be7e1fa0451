//! Canvas Arcade - three small real-time games on one frame engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, session state machines)
//! - `engine`: Per-session control surface and arcade-level game selection
//! - `input`: Movement intents, discrete actions and typed characters
//! - `renderer`: Immutable per-tick snapshots and a pure consumer of them
//! - `settings`: Data-driven game balance and JSON configuration

pub mod engine;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use engine::{Arcade, FrameEngine, GameControl, GameKind, SessionToken};
pub use error::ConfigError;
pub use settings::{ArcadeConfig, QualityPreset};

/// Engine-wide constants
pub mod consts {
    /// Nominal tick length (one display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frame deltas above this are clamped so a stalled tab can't fast-forward timers
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default playfield dimensions
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
}

/// Format whole seconds as `m:ss`
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180.0), "3:00");
        assert_eq!(format_clock(65.9), "1:05");
        assert_eq!(format_clock(9.99), "0:09");
        assert_eq!(format_clock(-3.0), "0:00");
    }
}
