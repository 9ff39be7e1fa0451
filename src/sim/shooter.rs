//! Top-down shooter session
//!
//! Per tick: the player follows held intents, bullets rise, enemies fall,
//! particles drift and decay, and entities past their exit edge despawn. Then
//! every surviving (bullet, enemy) pair is tested once against post-movement
//! positions; a hit removes both, scores, and bursts into particles. Finally
//! the continue clock is polled and the periodic spawner drops new enemies at
//! the top edge.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::countdown::{ClockEvent, ContinueClock, ContinuePhase};
use super::geometry::{Aabb, Bounds, clamp_to_bounds, intersects};
use super::pool::EntityPool;
use super::state::{GameEvent, Outcome, session_rng};
use super::tick::{Simulation, TickInput};
use super::timer::IntervalTimer;
use crate::format_clock;
use crate::input::{ActionKind, Axis, InputEvent};
use crate::renderer::{Color, Drawable, Hud, Snapshot};
use crate::settings::{ArcadeConfig, ShooterConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Aabb,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Aabb,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Aabb,
    pub speed: f32,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Ticks left before the particle is pruned
    pub life: u32,
}

impl Particle {
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Complete shooter session state
#[derive(Debug, Clone)]
pub struct ShooterSession {
    pub config: ShooterConfig,
    pub bounds: Bounds,
    pub clock: ContinueClock,
    pub score: u64,
    pub player: Player,
    pub bullets: EntityPool<Bullet>,
    pub enemies: EntityPool<Enemy>,
    pub particles: EntityPool<Particle>,
    pub max_particles: usize,
    pub ticks: u64,
    spawner: IntervalTimer,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl ShooterSession {
    pub fn with_config(
        config: ShooterConfig,
        bounds: Bounds,
        max_particles: usize,
        seed: u64,
    ) -> Self {
        let center = bounds.center();
        Self {
            clock: ContinueClock::new(config.session_duration, config.grace_duration),
            score: 0,
            player: Player {
                rect: Aabb::new(center.x, center.y, config.player_size, config.player_size),
                speed: config.player_speed,
            },
            bullets: EntityPool::new(),
            enemies: EntityPool::new(),
            particles: EntityPool::with_capacity(max_particles.min(256)),
            max_particles,
            ticks: 0,
            spawner: IntervalTimer::new(config.spawn_interval),
            rng: session_rng(seed),
            events: Vec::new(),
            config,
            bounds,
        }
    }

    pub fn phase(&self) -> ContinuePhase {
        self.clock.phase()
    }

    /// Fire a bullet from the top-centre of the player
    pub fn shoot(&mut self) {
        let cfg = &self.config;
        let p = &self.player.rect;
        let x = p.min.x + p.size.x / 2.0 - cfg.bullet_width / 2.0;
        self.bullets.add(Bullet {
            rect: Aabb::new(x, p.min.y, cfg.bullet_width, cfg.bullet_height),
            speed: cfg.bullet_speed,
        });
    }

    /// Drop an enemy at the top edge at a random x that keeps it fully on screen
    pub fn spawn_enemy(&mut self) {
        let size = self.config.enemy_size;
        let x = self.rng.random::<f32>() * (self.bounds.width - size);
        let rect = clamp_to_bounds(Aabb::new(x, 0.0, size, size), &self.bounds).aabb;
        self.enemies.add(Enemy {
            rect,
            speed: self.config.enemy_speed,
        });
    }

    /// Burst of short-lived particles, capped by the particle budget. Particles
    /// that would start outside the playfield are dropped.
    pub fn explode(&mut self, at: Vec2) {
        let cfg = &self.config;
        for _ in 0..cfg.explosion_particles {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let size = self.rng.random::<f32>() * cfg.particle_size_range + cfg.particle_min_size;
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * cfg.particle_spread,
                (self.rng.random::<f32>() - 0.5) * cfg.particle_spread,
            );
            let particle = Particle {
                pos: at,
                vel,
                size,
                life: cfg.particle_life,
            };
            if self.bounds.contains(&particle.rect()) {
                self.particles.add(particle);
            }
        }
    }

    fn move_entities(&mut self, input: &TickInput) {
        let delta = Vec2::new(
            input.intent.axis_value(Axis::Horizontal),
            input.intent.axis_value(Axis::Vertical),
        ) * self.player.speed;
        self.player.rect = clamp_to_bounds(self.player.rect.translated(delta), &self.bounds).aabb;

        for bullet in self.bullets.iter_mut() {
            bullet.rect.min.y -= bullet.speed;
        }
        self.bullets.remove_where(|b| b.rect.min.y < 0.0);

        let floor = self.bounds.height;
        for enemy in self.enemies.iter_mut() {
            enemy.rect.min.y += enemy.speed;
        }
        self.enemies.remove_where(|e| e.rect.min.y > floor);

        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
        let bounds = self.bounds;
        self.particles.remove_where(|p| p.life == 0 || !bounds.contains(&p.rect()));
    }

    /// Resolve bullet/enemy hits. Each bullet and each enemy takes part in at
    /// most one hit per tick; the pools are compacted once at the end.
    fn resolve_collisions(&mut self) {
        let bullet_slots = self.bullets.slot_count();
        let enemy_slots = self.enemies.slot_count();

        for bi in 0..bullet_slots {
            for ei in 0..enemy_slots {
                let (Some(bullet), Some(enemy)) = (self.bullets.get(bi), self.enemies.get(ei))
                else {
                    continue;
                };
                if !intersects(&bullet.rect, &enemy.rect) {
                    continue;
                }

                let at = enemy.rect.center();
                self.bullets.mark(bi);
                self.enemies.mark(ei);
                self.score += self.config.kill_score;
                self.explode(at);
                self.events.push(GameEvent::EnemyDestroyed { at });

                if self.score >= self.config.target_score && self.clock.finish(true) {
                    self.events.push(GameEvent::SessionEnded(Outcome::Won));
                }
                break;
            }
        }

        self.bullets.compact();
        self.enemies.compact();
    }

    fn poll_clock(&mut self, dt: f32) {
        match self.clock.advance(dt) {
            Some(ClockEvent::TimedOut) => self.events.push(GameEvent::TimedOut),
            Some(ClockEvent::GraceStarted) => self.events.push(GameEvent::GraceStarted),
            Some(ClockEvent::GraceExpired) => {
                self.events.push(GameEvent::SessionEnded(Outcome::Lost))
            }
            None => {}
        }
    }
}

impl Simulation for ShooterSession {
    const NAME: &'static str = "shooter";

    fn new(config: &ArcadeConfig, seed: u64) -> Self {
        Self::with_config(config.shooter.clone(), config.bounds, config.max_particles(), seed)
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if self.clock.is_ended() {
            return;
        }
        match event {
            InputEvent::Action(ActionKind::Shoot) => self.shoot(),
            InputEvent::Action(ActionKind::Continue) => {
                if self.clock.resume() {
                    self.events.push(GameEvent::Resumed);
                }
            }
            _ => {}
        }
    }

    fn tick(&mut self, input: &TickInput) {
        if self.clock.is_ended() {
            return;
        }
        self.ticks += 1;

        self.move_entities(input);
        self.resolve_collisions();
        if self.clock.is_ended() {
            return;
        }

        self.poll_clock(input.dt);
        if self.clock.is_ended() {
            return;
        }

        for _ in 0..self.spawner.poll(input.dt) {
            self.spawn_enemy();
        }
    }

    fn snapshot(&self) -> Snapshot {
        let mut shapes = Vec::with_capacity(
            1 + self.bullets.len() + self.enemies.len() + self.particles.len(),
        );
        shapes.push(Drawable::rect(self.player.rect.min, self.player.rect.size, Color::GREEN));
        for bullet in self.bullets.iter() {
            shapes.push(Drawable::rect(bullet.rect.min, bullet.rect.size, Color::YELLOW));
        }
        for enemy in self.enemies.iter() {
            shapes.push(Drawable::rect(enemy.rect.min, enemy.rect.size, Color::RED));
        }
        for particle in self.particles.iter() {
            shapes.push(Drawable::rect(particle.pos, Vec2::splat(particle.size), Color::ORANGE));
        }

        let timer = match self.clock.phase() {
            ContinuePhase::Playing => {
                Some(format!("Time: {}", format_clock(self.clock.session_remaining())))
            }
            ContinuePhase::TimedOut | ContinuePhase::Grace => {
                Some(format!("Continue? {}", format_clock(self.clock.grace_remaining())))
            }
            ContinuePhase::Ended { .. } => None,
        };

        Snapshot {
            tick: self.ticks,
            shapes,
            hud: Hud {
                score: format!("Score: {}", self.score),
                status: None,
                timer,
                banner: self.outcome().map(|o| o.banner().to_string()),
                paused: false,
            },
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.clock.phase() {
            ContinuePhase::Ended { win } => Some(Outcome::from_win(win)),
            _ => None,
        }
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
