//! Typing session
//!
//! Words fall from the top edge; typing a word's letters in order removes it
//! and scores a point. Every `level_up_every` points the level rises, which
//! speeds up both the fall and the spawn cadence. The first word to cross the
//! bottom edge ends the session.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Bounds;
use super::pool::EntityPool;
use super::state::{GameEvent, Outcome, session_rng};
use super::tick::{Simulation, TickInput};
use super::timer::IntervalTimer;
use super::words::{Consume, FallingWord, TypingProgress, max_word_length, pick_word};
use crate::input::InputEvent;
use crate::renderer::{Color, Drawable, Hud, Snapshot};
use crate::settings::{ArcadeConfig, TypingConfig};

pub const GAME_OVER_BANNER: &str = "Game Over";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypingPhase {
    Playing,
    GameOver,
}

/// End-of-session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingReport {
    pub score: u64,
    pub level: u32,
    pub elapsed_secs: u64,
    pub words: Vec<String>,
}

impl TypingReport {
    pub fn lines(&self) -> Vec<String> {
        vec![
            GAME_OVER_BANNER.to_string(),
            format!("Score: {}", self.score),
            format!("Level: {}", self.level),
            format!("Time: {} seconds", self.elapsed_secs),
            format!("Words Typed: {}", self.words.join(", ")),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TypingSession {
    pub config: TypingConfig,
    pub bounds: Bounds,
    pub phase: TypingPhase,
    pub progress: TypingProgress,
    pub words: EntityPool<FallingWord>,
    /// Seconds of play, accumulated from tick deltas
    pub elapsed: f32,
    pub ticks: u64,
    spawner: IntervalTimer,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl TypingSession {
    pub fn with_config(config: TypingConfig, bounds: Bounds, seed: u64) -> Self {
        Self {
            phase: TypingPhase::Playing,
            progress: TypingProgress::default(),
            words: EntityPool::new(),
            elapsed: 0.0,
            ticks: 0,
            spawner: IntervalTimer::new(config.word_interval),
            rng: session_rng(seed),
            events: Vec::new(),
            config,
            bounds,
        }
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    /// Spawn cadence at the current level
    pub fn spawn_interval(&self) -> f32 {
        self.config.word_interval / self.progress.level as f32
    }

    /// Pixels per tick at the current level
    pub fn fall_speed(&self) -> f32 {
        self.config.word_speed * self.progress.level as f32
    }

    /// Drop a new word at the top edge. The next spawn is scheduled one
    /// level-scaled interval from now.
    pub fn spawn_word(&mut self) {
        let max_len = max_word_length(self.progress.score, &self.config);
        let Some(text) = pick_word(&self.config.vocabulary, max_len, &mut self.rng) else {
            log::warn!("[{}] no word of length <= {max_len} to spawn", Self::NAME);
            return;
        };
        let span = (self.bounds.width - self.config.spawn_margin).max(0.0);
        let x = self.rng.random::<f32>() * span;
        let word = FallingWord::new(text, Vec2::new(x, 0.0));
        log::debug!("[{}] spawned \"{}\" at x={x:.0}", Self::NAME, word.word);
        self.words.add(word);
        let interval = self.spawn_interval();
        self.spawner.set_period(interval);
    }

    /// Offer one typed character to every word on screen
    pub fn type_char(&mut self, ch: char) {
        if self.phase != TypingPhase::Playing {
            return;
        }
        for i in 0..self.words.slot_count() {
            let Some(word) = self.words.get_mut(i) else {
                continue;
            };
            if word.consume(ch) != Consume::Completed {
                continue;
            }
            let typed = word.word.clone();
            self.words.mark(i);
            self.events.push(GameEvent::WordCompleted(typed.clone()));
            if let Some(level) = self.progress.record(&typed, self.config.level_up_every) {
                self.events.push(GameEvent::LevelUp(level));
            }
        }
        self.words.compact();
    }

    /// Summary, available once the session is over
    pub fn report(&self) -> Option<TypingReport> {
        (self.phase == TypingPhase::GameOver).then(|| TypingReport {
            score: self.progress.score,
            level: self.progress.level,
            elapsed_secs: self.elapsed.max(0.0).floor() as u64,
            words: self.progress.completed.clone(),
        })
    }
}

impl Simulation for TypingSession {
    const NAME: &'static str = "typing";

    fn new(config: &ArcadeConfig, seed: u64) -> Self {
        Self::with_config(config.typing.clone(), config.bounds, seed)
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if let InputEvent::Character(ch) = event {
            self.type_char(*ch);
        }
    }

    fn tick(&mut self, input: &TickInput) {
        if self.phase != TypingPhase::Playing {
            return;
        }
        self.ticks += 1;
        self.elapsed += input.dt;

        if self.spawner.poll_once(input.dt) {
            self.spawn_word();
        }

        let speed = self.fall_speed();
        let floor = self.bounds.height;
        let mut missed = false;
        for word in self.words.iter_mut() {
            word.pos.y += speed;
            missed |= word.pos.y > floor;
        }

        if missed {
            self.phase = TypingPhase::GameOver;
            self.events.push(GameEvent::SessionEnded(Outcome::Lost));
        }
    }

    fn snapshot(&self) -> Snapshot {
        let shapes = self
            .words
            .iter()
            .map(|w| Drawable::text(w.pos, w.remaining.clone(), Color::WHITE))
            .collect();

        Snapshot {
            tick: self.ticks,
            shapes,
            hud: Hud {
                score: format!("Score: {}", self.progress.score),
                status: Some(format!("Level: {}", self.progress.level)),
                timer: None,
                banner: (self.phase == TypingPhase::GameOver).then(|| GAME_OVER_BANNER.to_string()),
                paused: false,
            },
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        (self.phase == TypingPhase::GameOver).then_some(Outcome::Lost)
    }

    fn score(&self) -> u64 {
        self.progress.score
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn report_lines(&self) -> Option<Vec<String>> {
        self.report().map(|r| r.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TypingSession {
        TypingSession::with_config(TypingConfig::default(), Bounds::default(), 77)
    }

    fn input(dt: f32) -> TickInput {
        TickInput {
            dt,
            ..Default::default()
        }
    }

    fn type_str(s: &mut TypingSession, text: &str) {
        for ch in text.chars() {
            s.handle_event(&InputEvent::Character(ch));
        }
    }

    #[test]
    fn test_typing_cat() {
        let mut s = session();
        s.words.add(FallingWord::new("cat", Vec2::new(100.0, 50.0)));
        type_str(&mut s, "ca");
        assert_eq!(s.words.first().unwrap().remaining, "t");
        assert_eq!(s.progress.score, 0);

        s.handle_event(&InputEvent::Character('t'));
        assert!(s.words.is_empty());
        assert_eq!(s.progress.score, 1);
        assert_eq!(s.progress.completed, vec!["cat".to_string()]);
        assert_eq!(s.drain_events(), vec![GameEvent::WordCompleted("cat".into())]);
    }

    #[test]
    fn test_keystroke_hits_every_matching_word() {
        let mut s = session();
        s.words.add(FallingWord::new("cat", Vec2::ZERO));
        s.words.add(FallingWord::new("cow", Vec2::ZERO));
        s.words.add(FallingWord::new("dog", Vec2::ZERO));
        s.handle_event(&InputEvent::Character('C'));

        let remaining: Vec<&str> = s.words.iter().map(|w| w.remaining.as_str()).collect();
        assert_eq!(remaining, vec!["at", "ow", "dog"]);
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut s = session();
        for _ in 0..7 {
            s.tick(&input(0.25));
        }
        assert!(s.words.is_empty());
        s.tick(&input(0.25));
        assert_eq!(s.words.len(), 1);

        let w = s.words.first().unwrap();
        assert!(TypingConfig::default().vocabulary.contains(&w.word));
        assert!(w.pos.x >= 0.0 && w.pos.x < 750.0);
        assert_eq!(w.pos.y, 1.0, "moves on the tick it spawns");
    }

    #[test]
    fn test_level_four_cadence() {
        let mut s = session();
        s.progress.level = 4;
        s.progress.score = 30;
        s.spawn_word();
        assert_eq!(s.spawn_interval(), 0.5);
        assert_eq!(s.spawner.period(), 0.5);

        s.words.clear();
        s.tick(&input(0.25));
        assert!(s.words.is_empty());
        s.tick(&input(0.25));
        assert_eq!(s.words.len(), 1);
        assert_eq!(s.words.first().unwrap().pos.y, 4.0);
    }

    #[test]
    fn test_level_up_after_ten_words() {
        let mut s = session();
        for _ in 0..10 {
            s.words.add(FallingWord::new("cat", Vec2::ZERO));
            type_str(&mut s, "cat");
        }
        assert_eq!(s.progress.score, 10);
        assert_eq!(s.level(), 2);
        assert_eq!(s.fall_speed(), 2.0);
        assert!(s.drain_events().contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn test_word_past_floor_ends_session() {
        let mut s = session();
        s.words.add(FallingWord::new("dog", Vec2::new(10.0, 600.0)));
        s.tick(&input(0.5));

        assert_eq!(s.phase, TypingPhase::GameOver);
        assert_eq!(s.outcome(), Some(Outcome::Lost));
        assert_eq!(s.snapshot().hud.banner.as_deref(), Some("Game Over"));

        // Terminal: typing and ticking change nothing
        type_str(&mut s, "dog");
        s.tick(&input(0.5));
        assert_eq!(s.progress.score, 0);
        assert_eq!(s.ticks, 1);

        let report = s.report().unwrap();
        assert_eq!(report.elapsed_secs, 0);
        assert_eq!(report.lines()[3], "Time: 0 seconds");
    }

    #[test]
    fn test_report_lists_typed_words() {
        let mut s = session();
        assert!(s.report().is_none());
        for word in ["cat", "dog"] {
            s.words.add(FallingWord::new(word, Vec2::ZERO));
            type_str(&mut s, word);
        }
        for _ in 0..4 {
            s.tick(&input(0.5));
        }
        s.words.add(FallingWord::new("rat", Vec2::new(0.0, 650.0)));
        s.tick(&input(0.5));

        let report = s.report().unwrap();
        assert_eq!(report.score, 2);
        assert_eq!(report.level, 1);
        assert_eq!(report.elapsed_secs, 2);
        assert_eq!(report.lines()[4], "Words Typed: cat, dog");
    }

    #[test]
    fn test_snapshot_draws_remaining_text() {
        let mut s = session();
        s.words.add(FallingWord::new("hat", Vec2::new(5.0, 5.0)));
        s.handle_event(&InputEvent::Character('h'));
        let snap = s.snapshot();
        assert_eq!(snap.shapes.len(), 1);
        assert_eq!(snap.hud.status.as_deref(), Some("Level: 1"));
        assert!(matches!(
            &snap.shapes[0].shape,
            crate::renderer::Shape::Text { text, .. } if text == "at"
        ));
    }
}
