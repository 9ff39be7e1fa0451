//! Falling words and typing progress
//!
//! A word is consumed one leading character at a time. Matching is
//! case-insensitive on the typed character; vocabulary words are lowercase.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::TypingConfig;

/// Result of offering one typed character to a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consume {
    NoMatch,
    Advanced,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingWord {
    /// Word as spawned, kept for logging once it is typed out
    pub word: String,
    /// Suffix still to be typed
    pub remaining: String,
    /// Top-left of the text
    pub pos: Vec2,
}

impl FallingWord {
    pub fn new(word: &str, pos: Vec2) -> Self {
        Self {
            word: word.to_string(),
            remaining: word.to_string(),
            pos,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Strip the leading character if it matches `ch`
    pub fn consume(&mut self, ch: char) -> Consume {
        let mut chars = self.remaining.chars();
        let Some(first) = chars.next() else {
            return Consume::NoMatch;
        };
        if !first.to_lowercase().eq(ch.to_lowercase()) {
            return Consume::NoMatch;
        }
        self.remaining = chars.as_str().to_string();
        if self.remaining.is_empty() {
            Consume::Completed
        } else {
            Consume::Advanced
        }
    }
}

/// Longest word allowed at `score`
pub fn max_word_length(score: u64, config: &TypingConfig) -> usize {
    let bonus = usize::try_from(score / config.word_length_step.max(1)).unwrap_or(usize::MAX);
    config
        .base_word_length
        .saturating_add(bonus)
        .min(config.max_word_length)
}

/// Uniform pick among vocabulary words no longer than `max_len`
pub fn pick_word<'a, R: Rng>(
    vocabulary: &'a [String],
    max_len: usize,
    rng: &mut R,
) -> Option<&'a str> {
    let eligible: Vec<&str> = vocabulary
        .iter()
        .map(String::as_str)
        .filter(|w| !w.is_empty() && w.chars().count() <= max_len)
        .collect();
    if eligible.is_empty() {
        return None;
    }
    Some(eligible[rng.random_range(0..eligible.len())])
}

/// Score, level and the list of words typed so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingProgress {
    pub score: u64,
    pub level: u32,
    pub completed: Vec<String>,
}

impl Default for TypingProgress {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            completed: Vec::new(),
        }
    }
}

impl TypingProgress {
    /// Credit one typed-out word. Returns the new level if this word crossed a
    /// level boundary.
    pub fn record(&mut self, word: &str, level_up_every: u64) -> Option<u32> {
        self.score += 1;
        self.completed.push(word.to_string());
        if self.score % level_up_every.max(1) == 0 {
            self.level += 1;
            Some(self.level)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::session_rng;

    #[test]
    fn test_consume_prefix() {
        let mut w = FallingWord::new("cat", Vec2::ZERO);
        assert_eq!(w.consume('a'), Consume::NoMatch);
        assert_eq!(w.remaining, "cat");
        assert_eq!(w.consume('C'), Consume::Advanced);
        assert_eq!(w.consume('a'), Consume::Advanced);
        assert_eq!(w.remaining, "t");
        assert_eq!(w.consume('t'), Consume::Completed);
        assert!(w.is_complete());
        assert_eq!(w.word, "cat");
        assert_eq!(w.consume('t'), Consume::NoMatch);
    }

    #[test]
    fn test_max_word_length_grows_then_caps() {
        let cfg = TypingConfig::default();
        assert_eq!(max_word_length(0, &cfg), 3);
        assert_eq!(max_word_length(9, &cfg), 3);
        assert_eq!(max_word_length(10, &cfg), 4);
        assert_eq!(max_word_length(49, &cfg), 7);
        assert_eq!(max_word_length(1000, &cfg), 8);
    }

    #[test]
    fn test_pick_word_respects_limit() {
        let vocab: Vec<String> = ["tiger", "ox", "llama"].into_iter().map(String::from).collect();
        let mut rng = session_rng(9);
        for _ in 0..50 {
            assert_eq!(pick_word(&vocab, 3, &mut rng), Some("ox"));
        }
        assert_eq!(pick_word(&vocab, 1, &mut rng), None);
        assert!(pick_word(&vocab, 5, &mut rng).is_some());
    }

    #[test]
    fn test_level_up_every_ten() {
        let mut p = TypingProgress::default();
        for i in 1..10 {
            assert_eq!(p.record("cat", 10), None, "word {i}");
        }
        assert_eq!(p.record("dog", 10), Some(2));
        assert_eq!(p.score, 10);
        assert_eq!(p.completed.len(), 10);
    }
}
