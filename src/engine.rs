//! Frame engine and arcade
//!
//! [`FrameEngine`] owns at most one session of a single game and exposes the
//! control surface a host drives: start, stop, restart, pause, input delivery
//! and one tick per display frame. [`Arcade`] sits above it and switches
//! between games. Every game it loads gets a fresh [`SessionToken`]; calls
//! carrying an older token are dropped, so a host callback left over from a
//! previous session can never reach the next one.

use crate::consts::MAX_FRAME_DT;
use crate::input::{InputEvent, InputSource, IntentState};
use crate::renderer::Renderer;
use crate::settings::ArcadeConfig;
use crate::sim::breakout::BreakoutSession;
use crate::sim::shooter::ShooterSession;
use crate::sim::state::Outcome;
use crate::sim::tick::{Simulation, TickInput};
use crate::sim::typing::TypingSession;

/// Object-safe view of a [`FrameEngine`], used by [`Arcade`]
pub trait GameControl {
    fn name(&self) -> &'static str;
    fn start(&mut self);
    /// Drop the session. Nothing from it survives into the next start.
    fn stop(&mut self);
    /// Discard all state and begin a new session
    fn restart(&mut self);
    /// Freeze or resume ticking. Returns the new paused state.
    fn toggle_pause(&mut self) -> bool;
    fn is_running(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn handle_input(&mut self, event: &InputEvent);
    /// Run one tick (unless paused) and present the resulting snapshot
    fn on_frame(&mut self, dt: f32, renderer: &mut dyn Renderer) -> Option<Outcome>;
    /// Dismiss a terminal banner and start over. Returns false if the session
    /// isn't over.
    fn acknowledge(&mut self) -> bool;
    fn outcome(&self) -> Option<Outcome>;
    fn score(&self) -> Option<u64>;
    fn report_lines(&self) -> Option<Vec<String>>;
}

/// Drives one game's sessions frame by frame
pub struct FrameEngine<S: Simulation> {
    config: ArcadeConfig,
    session: Option<S>,
    intent: IntentState,
    paused: bool,
    restarts: u64,
    outcome_logged: bool,
}

impl<S: Simulation> FrameEngine<S> {
    /// Engine with no session yet; call [`GameControl::start`]
    pub fn new(config: ArcadeConfig) -> Self {
        Self {
            config,
            session: None,
            intent: IntentState::default(),
            paused: false,
            restarts: 0,
            outcome_logged: false,
        }
    }

    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// Seed for the next session: base seed offset by the restart count
    pub fn session_seed(&self) -> u64 {
        self.config.seed.wrapping_add(self.restarts)
    }

    /// Deliver every event the source has queued
    pub fn pump(&mut self, source: &mut dyn InputSource) {
        while let Some(event) = source.poll() {
            self.handle_input(&event);
        }
    }

    fn begin(&mut self) {
        let seed = self.session_seed();
        self.session = Some(S::new(&self.config, seed));
        self.intent.clear();
        self.paused = false;
        self.outcome_logged = false;
        log::info!("[{}] session started (seed {seed})", S::NAME);
    }
}

impl<S: Simulation> GameControl for FrameEngine<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn start(&mut self) {
        if self.session.is_some() {
            log::debug!("[{}] start ignored, already running", S::NAME);
            return;
        }
        self.begin();
    }

    fn stop(&mut self) {
        if self.session.take().is_some() {
            log::info!("[{}] session stopped", S::NAME);
        }
        self.intent.clear();
        self.paused = false;
    }

    fn restart(&mut self) {
        self.restarts += 1;
        self.begin();
    }

    fn toggle_pause(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }
        self.paused = !self.paused;
        log::info!(
            "[{}] {}",
            S::NAME,
            if self.paused { "paused" } else { "resumed" }
        );
        self.paused
    }

    fn is_running(&self) -> bool {
        self.session.is_some()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn handle_input(&mut self, event: &InputEvent) {
        // Held intents track the keyboard even while paused
        if self.intent.apply(event) {
            return;
        }
        if self.paused {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.handle_event(event);
        }
    }

    fn on_frame(&mut self, dt: f32, renderer: &mut dyn Renderer) -> Option<Outcome> {
        let session = self.session.as_mut()?;

        if !self.paused {
            let input = TickInput {
                intent: self.intent,
                dt: dt.clamp(0.0, MAX_FRAME_DT),
            };
            session.tick(&input);
            for event in session.drain_events() {
                event.log(S::NAME);
            }
        }

        let mut snapshot = session.snapshot();
        snapshot.hud.paused = self.paused;
        renderer.present(&snapshot);

        let outcome = session.outcome();
        if let Some(outcome) = outcome
            && !self.outcome_logged
        {
            self.outcome_logged = true;
            log::info!(
                "[{}] finished: {outcome:?} with score {}",
                S::NAME,
                session.score()
            );
        }
        outcome
    }

    fn acknowledge(&mut self) -> bool {
        if self.outcome().is_none() {
            return false;
        }
        self.restart();
        true
    }

    fn outcome(&self) -> Option<Outcome> {
        self.session.as_ref().and_then(Simulation::outcome)
    }

    fn score(&self) -> Option<u64> {
        self.session.as_ref().map(Simulation::score)
    }

    fn report_lines(&self) -> Option<Vec<String>> {
        self.session.as_ref().and_then(Simulation::report_lines)
    }
}

/// The games on the arcade menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    BrickBreaker,
    Shooter,
    Typing,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [Self::BrickBreaker, Self::Shooter, Self::Typing];

    pub fn name(self) -> &'static str {
        match self {
            GameKind::BrickBreaker => BreakoutSession::NAME,
            GameKind::Shooter => ShooterSession::NAME,
            GameKind::Typing => TypingSession::NAME,
        }
    }

    fn engine(self, config: ArcadeConfig) -> Box<dyn GameControl> {
        match self {
            GameKind::BrickBreaker => Box::new(FrameEngine::<BreakoutSession>::new(config)),
            GameKind::Shooter => Box::new(FrameEngine::<ShooterSession>::new(config)),
            GameKind::Typing => Box::new(FrameEngine::<TypingSession>::new(config)),
        }
    }
}

/// Identifies one loaded session; invalidated by restart, reload or menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(pub u64);

struct ActiveGame {
    kind: GameKind,
    token: SessionToken,
    engine: Box<dyn GameControl>,
}

/// Menu-level game selection
pub struct Arcade {
    config: ArcadeConfig,
    active: Option<ActiveGame>,
    generation: u64,
}

impl Arcade {
    pub fn new(config: ArcadeConfig) -> Self {
        Self {
            config,
            active: None,
            generation: 0,
        }
    }

    /// Stop whatever is running and start `kind`
    pub fn load_game(&mut self, kind: GameKind) -> SessionToken {
        self.go_to_menu();
        let token = self.next_token();
        let mut engine = kind.engine(self.config.clone());
        engine.start();
        log::info!("Loaded {} ({token:?})", kind.name());
        self.active = Some(ActiveGame {
            kind,
            token,
            engine,
        });
        token
    }

    /// Stop the current game, if any
    pub fn go_to_menu(&mut self) {
        if let Some(mut game) = self.active.take() {
            game.engine.stop();
            log::info!("Back to menu from {}", game.kind.name());
        }
    }

    pub fn current(&self) -> Option<(GameKind, SessionToken)> {
        self.active.as_ref().map(|g| (g.kind, g.token))
    }

    /// Engine for `token`, or `None` if the token is stale
    pub fn engine(&self, token: SessionToken) -> Option<&dyn GameControl> {
        match &self.active {
            Some(game) if game.token == token => Some(&*game.engine),
            _ => None,
        }
    }

    fn engine_mut(&mut self, token: SessionToken) -> Option<&mut Box<dyn GameControl>> {
        match &mut self.active {
            Some(game) if game.token == token => Some(&mut game.engine),
            _ => {
                log::warn!("Ignoring call with stale session token {token:?}");
                None
            }
        }
    }

    /// Returns false if the token is stale
    pub fn handle_input(&mut self, token: SessionToken, event: &InputEvent) -> bool {
        match self.engine_mut(token) {
            Some(engine) => {
                engine.handle_input(event);
                true
            }
            None => false,
        }
    }

    pub fn on_frame(
        &mut self,
        token: SessionToken,
        dt: f32,
        renderer: &mut dyn Renderer,
    ) -> Option<Outcome> {
        self.engine_mut(token)?.on_frame(dt, renderer)
    }

    /// New paused state, or `None` for a stale token
    pub fn toggle_pause(&mut self, token: SessionToken) -> Option<bool> {
        self.engine_mut(token).map(|e| e.toggle_pause())
    }

    /// Restart the current game under a new token
    pub fn restart(&mut self, token: SessionToken) -> Option<SessionToken> {
        self.engine_mut(token)?.restart();
        Some(self.reissue())
    }

    /// Dismiss the terminal banner. Yields the new session's token, or `None`
    /// if the token is stale or the session isn't over.
    pub fn acknowledge(&mut self, token: SessionToken) -> Option<SessionToken> {
        if !self.engine_mut(token)?.acknowledge() {
            return None;
        }
        Some(self.reissue())
    }

    fn next_token(&mut self) -> SessionToken {
        self.generation += 1;
        SessionToken(self.generation)
    }

    fn reissue(&mut self) -> SessionToken {
        let token = self.next_token();
        if let Some(game) = self.active.as_mut() {
            game.token = token;
        }
        token
    }
}
