//! Brick-breaker session
//!
//! Per tick: the paddle follows the held horizontal intent, then each ball
//! that existed at the start of the tick advances, bounces off the side and
//! top walls, may fall through the floor (costing a life), may bounce off the
//! paddle, and finally breaks every live brick whose rectangle contains its
//! centre. Balls spawned by a multi-ball power-up start moving next tick.

use std::f32::consts::FRAC_PI_3;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Bounds, clamp_to_bounds};
use super::pool::EntityPool;
use super::powerup::{PowerUpKind, PowerUps};
use super::state::{GameEvent, Outcome, session_rng};
use super::tick::{Simulation, TickInput};
use crate::input::{Axis, InputEvent};
use crate::renderer::{Color, Drawable, Hud, Snapshot};
use crate::settings::{ArcadeConfig, BreakoutConfig};

/// Steepest paddle bounce, reached when the ball hits the paddle's end
pub const MAX_BOUNCE_ANGLE: f32 = FRAC_PI_3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakoutPhase {
    Playing,
    GameOver,
    Won,
}

/// Brick color; three of the four also select a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Azure,
    Orange,
    Green,
    Pink,
}

impl BrickColor {
    pub const ALL: [BrickColor; 4] = [Self::Azure, Self::Orange, Self::Green, Self::Pink];

    pub fn color(self) -> Color {
        match self {
            BrickColor::Azure => Color::AZURE,
            BrickColor::Orange => Color::from_rgb_hex(0xFF5733),
            BrickColor::Green => Color::from_rgb_hex(0x33FF57),
            BrickColor::Pink => Color::from_rgb_hex(0xFF33A1),
        }
    }

    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            BrickColor::Azure => None,
            BrickColor::Orange => Some(PowerUpKind::Speed),
            BrickColor::Green => Some(PowerUpKind::MultiBall),
            BrickColor::Pink => Some(PowerUpKind::LongerPaddle),
        }
    }

    fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickStatus {
    Alive,
    /// Terminal; a destroyed brick never collides again
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub row: usize,
    pub column: usize,
    pub rect: Aabb,
    pub status: BrickStatus,
    pub color: BrickColor,
}

impl Brick {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == BrickStatus::Alive
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub base_width: f32,
    pub height: f32,
    /// Pixels per tick while moving
    pub speed: f32,
    /// Width multiplier in `[1, 2.5]`
    pub length_multiplier: f32,
}

impl Paddle {
    pub fn centered(config: &BreakoutConfig, bounds: &Bounds) -> Self {
        let mut paddle = Self {
            pos: Vec2::new(0.0, bounds.height - config.paddle_floor_gap),
            base_width: config.paddle_width,
            height: config.paddle_height,
            speed: config.paddle_speed,
            length_multiplier: 1.0,
        };
        paddle.recenter(bounds);
        paddle
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.base_width * self.length_multiplier
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width() / 2.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width(), self.height)
    }

    /// Center on the base width, as a fresh paddle sits
    pub fn recenter(&mut self, bounds: &Bounds) {
        self.pos.x = bounds.width / 2.0 - self.base_width / 2.0;
    }

    /// Move by `direction * speed` and keep the whole paddle on screen
    pub fn step(&mut self, direction: f32, bounds: &Bounds) {
        self.pos.x += direction * self.speed;
        let clamped = clamp_to_bounds(self.aabb(), bounds);
        self.pos.x = clamped.aabb.min.x;
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Centre
    pub pos: Vec2,
    /// Pixels per tick before the speed multiplier
    pub vel: Vec2,
    pub radius: f32,
    /// Base speed used to rebuild velocity on a paddle bounce
    pub speed: f32,
    /// In `[1, 2]`
    pub speed_multiplier: f32,
}

impl Ball {
    pub fn spawn(config: &BreakoutConfig, bounds: &Bounds) -> Self {
        Self {
            pos: Vec2::new(
                bounds.width / 2.0,
                bounds.height - config.ball_spawn_floor_gap,
            ),
            vel: config.ball_spawn_velocity,
            radius: config.ball_radius,
            speed: config.ball_speed,
            speed_multiplier: 1.0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }
}

/// Velocity after a paddle bounce.
///
/// Depends only on where the ball meets the paddle: the offset from the
/// paddle's centre, normalised to `[-1, 1]` by half its width, maps linearly
/// onto `[-60°, 60°]` from vertical.
pub fn paddle_bounce_velocity(
    impact_x: f32,
    paddle_left: f32,
    paddle_width: f32,
    speed: f32,
) -> Vec2 {
    let half = paddle_width / 2.0;
    let offset = ((impact_x - (paddle_left + half)) / half).clamp(-1.0, 1.0);
    let angle = offset * MAX_BOUNCE_ANGLE;
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Lay out the full brick grid with random colors
pub fn generate_bricks(config: &BreakoutConfig, rng: &mut Pcg32) -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(config.brick_count());
    for column in 0..config.brick_columns {
        for row in 0..config.brick_rows {
            let x = column as f32 * (config.brick_width + config.brick_padding)
                + config.brick_offset_left;
            let y = row as f32 * (config.brick_height + config.brick_padding)
                + config.brick_offset_top;
            bricks.push(Brick {
                row,
                column,
                rect: Aabb::new(x, y, config.brick_width, config.brick_height),
                status: BrickStatus::Alive,
                color: BrickColor::random(rng),
            });
        }
    }
    bricks
}

/// Complete brick-breaker session state
#[derive(Debug, Clone)]
pub struct BreakoutSession {
    pub config: BreakoutConfig,
    pub bounds: Bounds,
    pub phase: BreakoutPhase,
    pub score: u64,
    pub lives: u32,
    pub paddle: Paddle,
    pub balls: EntityPool<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: PowerUps,
    pub ticks: u64,
    events: Vec<GameEvent>,
}

impl BreakoutSession {
    pub fn with_config(config: BreakoutConfig, bounds: Bounds, seed: u64) -> Self {
        let mut rng = session_rng(seed);
        let bricks = generate_bricks(&config, &mut rng);
        let mut balls = EntityPool::with_capacity(config.power_up_effects.max_balls);
        balls.add(Ball::spawn(&config, &bounds));

        Self {
            phase: BreakoutPhase::Playing,
            score: 0,
            lives: config.lives,
            paddle: Paddle::centered(&config, &bounds),
            balls,
            bricks,
            power_ups: PowerUps::new(config.power_up_caps, config.power_up_effects),
            ticks: 0,
            events: Vec::new(),
            config,
            bounds,
        }
    }

    pub fn live_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    fn end(&mut self, phase: BreakoutPhase, outcome: Outcome) {
        self.phase = phase;
        self.events.push(GameEvent::SessionEnded(outcome));
    }

    /// Advance the ball in slot `index` through one tick
    fn step_ball(&mut self, index: usize) {
        let bounds = self.bounds;
        let mut triggered: Vec<PowerUpKind> = Vec::new();

        {
            let Some(ball) = self.balls.get_mut(index) else {
                return;
            };

            ball.pos += ball.vel * ball.speed_multiplier;

            // Side and top walls reflect; the floor is the exit edge
            let clamped = clamp_to_bounds(ball.aabb(), &bounds);
            let edges = clamped.edges;
            if edges.left {
                ball.vel.x = ball.vel.x.abs();
            }
            if edges.right {
                ball.vel.x = -ball.vel.x.abs();
            }
            if edges.side() {
                ball.pos.x = clamped.aabb.center().x;
            }
            if edges.top {
                ball.vel.y = ball.vel.y.abs();
                ball.pos.y = clamped.aabb.center().y;
            }

            if edges.bottom {
                self.lives = self.lives.saturating_sub(1);
                self.events.push(GameEvent::LifeLost {
                    remaining: self.lives,
                });
                if self.lives == 0 {
                    self.phase = BreakoutPhase::GameOver;
                    self.events.push(GameEvent::SessionEnded(Outcome::Lost));
                } else {
                    *ball = Ball::spawn(&self.config, &bounds);
                    self.paddle.recenter(&bounds);
                }
                return;
            }

            let paddle = &self.paddle;
            if ball.pos.x > paddle.pos.x
                && ball.pos.x < paddle.pos.x + paddle.width()
                && ball.pos.y + ball.radius > paddle.pos.y
            {
                ball.vel =
                    paddle_bounce_velocity(ball.pos.x, paddle.pos.x, paddle.width(), ball.speed);
            }

            for brick in self.bricks.iter_mut().filter(|b| b.is_alive()) {
                if brick.rect.contains_point(ball.pos) {
                    brick.status = BrickStatus::Destroyed;
                    ball.vel.y = -ball.vel.y;
                    self.score += 1;
                    self.events.push(GameEvent::BrickDestroyed {
                        row: brick.row,
                        column: brick.column,
                    });
                    if let Some(kind) = brick.color.power_up() {
                        triggered.push(kind);
                    }
                }
            }
        }

        for kind in triggered {
            let outcome = self.power_ups.trigger(kind, &mut self.balls, &mut self.paddle);
            self.events.push(GameEvent::PowerUp { kind, outcome });
        }
        // A longer paddle may now overhang the right wall
        self.paddle.step(0.0, &bounds);

        if self.score as usize == self.bricks.len() {
            self.end(BreakoutPhase::Won, Outcome::Won);
        }
    }
}

impl Simulation for BreakoutSession {
    const NAME: &'static str = "brick-breaker";

    fn new(config: &ArcadeConfig, seed: u64) -> Self {
        Self::with_config(config.breakout.clone(), config.bounds, seed)
    }

    fn handle_event(&mut self, _event: &InputEvent) {
        // Paddle movement is intent-driven; there are no discrete actions
    }

    fn tick(&mut self, input: &TickInput) {
        if self.phase != BreakoutPhase::Playing {
            return;
        }
        self.ticks += 1;

        self.paddle
            .step(input.intent.axis_value(Axis::Horizontal), &self.bounds);

        let count = self.balls.slot_count();
        for index in 0..count {
            if self.phase != BreakoutPhase::Playing {
                break;
            }
            self.step_ball(index);
        }
    }

    fn snapshot(&self) -> Snapshot {
        let mut shapes = Vec::with_capacity(self.bricks.len() + self.balls.len() + 1);
        for brick in self.bricks.iter().filter(|b| b.is_alive()) {
            shapes.push(Drawable::rect(brick.rect.min, brick.rect.size, brick.color.color()));
        }
        for ball in self.balls.iter() {
            shapes.push(Drawable::circle(ball.pos, ball.radius, Color::AZURE));
        }
        let paddle = self.paddle.aabb();
        shapes.push(Drawable::rect(paddle.min, paddle.size, Color::AZURE));

        Snapshot {
            tick: self.ticks,
            shapes,
            hud: Hud {
                score: format!("Score: {}", self.score),
                status: Some(format!("Lives: {}", self.lives)),
                timer: None,
                banner: self.outcome().map(|o| o.banner().to_string()),
                paused: false,
            },
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            BreakoutPhase::Playing => None,
            BreakoutPhase::GameOver => Some(Outcome::Lost),
            BreakoutPhase::Won => Some(Outcome::Won),
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Direction, IntentState};
    use crate::sim::powerup::PowerUpOutcome;

    fn session() -> BreakoutSession {
        BreakoutSession::with_config(BreakoutConfig::default(), Bounds::default(), 12345)
    }

    fn idle() -> TickInput {
        TickInput {
            dt: crate::consts::SIM_DT,
            ..Default::default()
        }
    }

    fn ball_mut(s: &mut BreakoutSession) -> &mut Ball {
        s.balls.first_mut().unwrap()
    }

    /// Recolor every brick so tests don't depend on the seed
    fn paint(s: &mut BreakoutSession, color: BrickColor) {
        for brick in &mut s.bricks {
            brick.color = color;
        }
    }

    #[test]
    fn test_initial_layout() {
        let s = session();
        assert_eq!(s.bricks.len(), 45);
        assert_eq!(s.bricks[0].rect, Aabb::new(35.0, 30.0, 70.0, 20.0));
        // Column-major: the second brick is one row down
        assert_eq!(s.bricks[1].rect.min, Vec2::new(35.0, 60.0));
        assert_eq!(s.bricks[5].rect.min, Vec2::new(115.0, 30.0));
        assert_eq!(s.paddle.pos, Vec2::new(350.0, 570.0));
        assert_eq!(s.balls.first().unwrap().pos, Vec2::new(400.0, 560.0));
        assert_eq!(s.lives, 3);
    }

    #[test]
    fn test_bounce_angle_is_pure_function_of_offset() {
        let center = paddle_bounce_velocity(400.0, 350.0, 100.0, 4.0);
        assert!(center.x.abs() < 1e-6);
        assert!((center.y + 4.0).abs() < 1e-6);

        let right = paddle_bounce_velocity(450.0, 350.0, 100.0, 4.0);
        let angle = right.x.atan2(-right.y);
        assert!((angle - MAX_BOUNCE_ANGLE).abs() < 1e-5);

        let left = paddle_bounce_velocity(350.0, 350.0, 100.0, 4.0);
        assert!((left.x + right.x).abs() < 1e-5);
        assert!((left.length() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_paddle_bounce_ignores_incoming_velocity() {
        let mut a = session();
        let mut b = session();
        for (s, vel) in [(&mut a, Vec2::new(3.0, 2.0)), (&mut b, Vec2::new(-1.0, 5.0))] {
            let ball = ball_mut(s);
            ball.vel = vel;
            ball.pos = Vec2::new(375.0, 565.0) - vel;
        }
        a.tick(&idle());
        b.tick(&idle());
        assert_eq!(a.balls.first().unwrap().vel, b.balls.first().unwrap().vel);
        assert!(a.balls.first().unwrap().vel.y < 0.0);
    }

    #[test]
    fn test_side_wall_reflects_and_clamps() {
        let mut s = session();
        let ball = ball_mut(&mut s);
        ball.pos = Vec2::new(12.0, 300.0);
        ball.vel = Vec2::new(-4.0, 1.0);
        s.tick(&idle());

        let ball = s.balls.first().unwrap();
        assert_eq!(ball.vel.x, 4.0);
        assert_eq!(ball.pos.x, 10.0);
        assert!(s.bounds.contains(&ball.aabb()));
    }

    #[test]
    fn test_top_wall_reflects() {
        let mut s = session();
        let ball = ball_mut(&mut s);
        ball.pos = Vec2::new(20.0, 12.0);
        ball.vel = Vec2::new(0.0, -4.0);
        s.tick(&idle());

        let ball = s.balls.first().unwrap();
        assert_eq!(ball.vel.y, 4.0);
        assert_eq!(ball.pos.y, 10.0);
    }

    #[test]
    fn test_floor_costs_a_life_and_respawns() {
        let mut s = session();
        s.paddle.pos.x = 0.0;
        let ball = ball_mut(&mut s);
        ball.pos = Vec2::new(700.0, 589.0);
        ball.vel = Vec2::new(0.0, 4.0);
        ball.speed_multiplier = 2.0;
        s.tick(&idle());

        assert_eq!(s.lives, 2);
        assert_eq!(s.phase, BreakoutPhase::Playing);
        let ball = s.balls.first().unwrap();
        assert_eq!(ball.pos, Vec2::new(400.0, 560.0));
        assert_eq!(ball.speed_multiplier, 1.0);
        assert_eq!(s.paddle.pos.x, 350.0);
        assert!(s.drain_events().contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut s = session();
        s.lives = 1;
        s.paddle.pos.x = 0.0;
        let ball = ball_mut(&mut s);
        ball.pos = Vec2::new(700.0, 589.0);
        ball.vel = Vec2::new(0.0, 4.0);
        s.tick(&idle());

        assert_eq!(s.phase, BreakoutPhase::GameOver);
        assert_eq!(s.outcome(), Some(Outcome::Lost));
        assert_eq!(s.snapshot().hud.banner.as_deref(), Some("GAME OVER"));

        let ticks = s.ticks;
        s.tick(&idle());
        assert_eq!(s.ticks, ticks, "terminal phase doesn't tick");
    }

    #[test]
    fn test_brick_hit_is_terminal_and_scores_once() {
        let mut s = session();
        paint(&mut s, BrickColor::Green);
        let target = s.bricks[0].rect.center();
        let ball = ball_mut(&mut s);
        ball.pos = target;
        ball.vel = Vec2::ZERO;

        s.tick(&idle());
        assert_eq!(s.score, 1);
        assert_eq!(s.bricks[0].status, BrickStatus::Destroyed);
        assert_eq!(s.power_ups.counters.multi_ball, 1);
        assert_eq!(s.balls.len(), 2);

        // Both balls sit inside the dead brick; it neither scores nor fires again
        s.tick(&idle());
        assert_eq!(s.score, 1);
        assert_eq!(s.live_bricks(), 44);
        assert_eq!(s.power_ups.counters.multi_ball, 1);
        assert_eq!(s.balls.len(), 2);
    }

    #[test]
    fn test_brick_hit_inverts_vertical_velocity() {
        let mut s = session();
        paint(&mut s, BrickColor::Azure);
        let target = s.bricks[0].rect.center();
        let ball = ball_mut(&mut s);
        ball.vel = Vec2::new(1.0, -3.0);
        ball.pos = target - ball.vel;
        s.tick(&idle());
        assert_eq!(s.balls.first().unwrap().vel, Vec2::new(1.0, 3.0));
    }

    #[test]
    fn test_colored_brick_fires_power_up() {
        let mut s = session();
        paint(&mut s, BrickColor::Green);
        let target = s.bricks[0].rect.center();
        let ball = ball_mut(&mut s);
        ball.pos = target;
        ball.vel = Vec2::new(0.0, 0.0);
        s.tick(&idle());

        assert_eq!(s.balls.len(), 2);
        assert_eq!(s.power_ups.counters.multi_ball, 1);
        assert!(s.drain_events().contains(&GameEvent::PowerUp {
            kind: PowerUpKind::MultiBall,
            outcome: PowerUpOutcome::Applied,
        }));
    }

    #[test]
    fn test_clearing_every_brick_wins() {
        let mut s = session();
        let targets: Vec<Vec2> = s.bricks.iter().map(|b| b.rect.center()).collect();
        for target in targets {
            let ball = ball_mut(&mut s);
            ball.pos = target;
            ball.vel = Vec2::ZERO;
            s.tick(&idle());
        }
        assert_eq!(s.score, 45);
        assert_eq!(s.phase, BreakoutPhase::Won);
        assert_eq!(s.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_paddle_follows_intent_and_stays_on_screen() {
        let mut s = session();
        s.balls.clear();
        let mut intent = IntentState::default();
        intent.apply(&InputEvent::MoveIntent(Axis::Horizontal, Direction::Positive));
        let input = TickInput {
            intent,
            dt: crate::consts::SIM_DT,
        };
        s.tick(&input);
        assert_eq!(s.paddle.pos.x, 357.0);

        for _ in 0..200 {
            s.tick(&input);
        }
        assert_eq!(s.paddle.pos.x + s.paddle.width(), 800.0);
    }

    #[test]
    fn test_seeds_are_reproducible() {
        let a = session();
        let b = session();
        let colors = |s: &BreakoutSession| s.bricks.iter().map(|b| b.color).collect::<Vec<_>>();
        assert_eq!(colors(&a), colors(&b));
    }
}
