//! Canvas Arcade entry point
//!
//! Headless host: runs each game through the arcade with a snapshot-reading
//! autopilot standing in for the keyboard, tessellating every frame the way a
//! windowed host would before upload.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use canvas_arcade::consts::SIM_DT;
    use canvas_arcade::input::{ActionKind, Axis, Direction, InputEvent, InputSource, ScriptedInput};
    use canvas_arcade::renderer::{Color, LatestSnapshot, MeshRenderer, Renderer, Shape, Snapshot};
    use canvas_arcade::{Arcade, ArcadeConfig, GameKind};

    /// Simulated frames per game before the demo moves on
    const DEMO_FRAMES: u32 = 60 * 120;
    /// Frames between autopilot decisions for discrete actions
    const ACTION_EVERY: u32 = 8;

    /// Tessellates every frame and remembers the last snapshot for the autopilot
    #[derive(Default)]
    struct DemoRenderer {
        mesh: MeshRenderer,
        last: LatestSnapshot,
    }

    impl Renderer for DemoRenderer {
        fn present(&mut self, snapshot: &Snapshot) {
            self.mesh.present(snapshot);
            self.last.present(snapshot);
        }
    }

    /// Plays by looking at the screen, like a person would
    struct Autopilot {
        kind: GameKind,
        queue: ScriptedInput,
        steering: Option<Direction>,
        frame: u32,
    }

    impl Autopilot {
        fn new(kind: GameKind) -> Self {
            Self {
                kind,
                queue: ScriptedInput::default(),
                steering: None,
                frame: 0,
            }
        }

        fn steer_toward(&mut self, target_x: f32, current_x: f32) {
            let want = if target_x > current_x + 4.0 {
                Some(Direction::Positive)
            } else if target_x < current_x - 4.0 {
                Some(Direction::Negative)
            } else {
                None
            };
            if want == self.steering {
                return;
            }
            self.steering = want;
            self.queue.push(match want {
                Some(dir) => InputEvent::MoveIntent(Axis::Horizontal, dir),
                None => InputEvent::MoveStop(Axis::Horizontal),
            });
        }

        fn observe(&mut self, snapshot: &Snapshot) {
            self.frame += 1;
            match self.kind {
                GameKind::BrickBreaker => self.play_breakout(snapshot),
                GameKind::Shooter => self.play_shooter(snapshot),
                GameKind::Typing => self.play_typing(snapshot),
            }
        }

        fn play_breakout(&mut self, snapshot: &Snapshot) {
            let ball = snapshot.shapes.iter().find_map(|d| match d.shape {
                Shape::Circle { center, .. } => Some(center.x),
                _ => None,
            });
            // The paddle is drawn last
            let paddle = snapshot.shapes.last().and_then(|d| match d.shape {
                Shape::Rect { min, size } => Some(min.x + size.x / 2.0),
                _ => None,
            });
            if let (Some(ball), Some(paddle)) = (ball, paddle) {
                self.steer_toward(ball, paddle);
            }
        }

        fn play_shooter(&mut self, snapshot: &Snapshot) {
            if snapshot.hud.timer.as_deref().is_some_and(|t| t.starts_with("Continue?")) {
                self.queue.push(InputEvent::Action(ActionKind::Continue));
            }

            let rect_center = |d: &canvas_arcade::renderer::Drawable| match d.shape {
                Shape::Rect { min, size } => Some(min + size / 2.0),
                _ => None,
            };
            let player = snapshot.shapes.first().and_then(rect_center);
            let target = snapshot
                .shapes
                .iter()
                .filter(|d| d.color == Color::RED)
                .filter_map(rect_center)
                .max_by(|a, b| a.y.total_cmp(&b.y));

            if let (Some(player), Some(target)) = (player, target) {
                self.steer_toward(target.x, player.x);
            }
            if self.frame % ACTION_EVERY == 0 {
                self.queue.push(InputEvent::Action(ActionKind::Shoot));
            }
        }

        fn play_typing(&mut self, snapshot: &Snapshot) {
            if self.frame % ACTION_EVERY != 0 {
                return;
            }
            let lowest = snapshot
                .shapes
                .iter()
                .filter_map(|d| match &d.shape {
                    Shape::Text { origin, text } => Some((origin.y, text.as_str())),
                    _ => None,
                })
                .max_by(|a, b| a.0.total_cmp(&b.0));
            if let Some(ch) = lowest.and_then(|(_, text)| text.chars().next()) {
                self.queue.push(InputEvent::Character(ch));
            }
        }
    }

    fn load_config() -> ArcadeConfig {
        let Some(path) = std::env::var_os("ARCADE_CONFIG").map(PathBuf::from) else {
            log::info!("Using default config");
            return ArcadeConfig::default();
        };
        match ArcadeConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {e}; using defaults", path.display());
                ArcadeConfig::default()
            }
        }
    }

    fn play(arcade: &mut Arcade, kind: GameKind) {
        let token = arcade.load_game(kind);
        let mut renderer = DemoRenderer::default();
        let mut pilot = Autopilot::new(kind);

        for frame in 0..DEMO_FRAMES {
            while let Some(event) = pilot.queue.poll() {
                arcade.handle_input(token, &event);
            }
            let outcome = arcade.on_frame(token, SIM_DT, &mut renderer);

            if let Some(outcome) = outcome {
                log::info!("{} ended after {frame} frames: {outcome:?}", kind.name());
                break;
            }
            if let Some(snapshot) = renderer.last.latest.as_ref() {
                pilot.observe(snapshot);
            }
        }

        if let Some(engine) = arcade.engine(token) {
            if let Some(lines) = engine.report_lines() {
                for line in lines {
                    log::info!("  {line}");
                }
            }
            log::info!(
                "{}: score {}, {} vertices in last frame ({} bytes)",
                kind.name(),
                engine.score().unwrap_or(0),
                renderer.mesh.vertices.len(),
                renderer.mesh.as_bytes().len()
            );
        }
        if let Some(hud) = renderer.last.latest.as_ref().map(|s| &s.hud) {
            log::info!("Final HUD: {} {:?} {:?}", hud.score, hud.status, hud.banner);
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Canvas Arcade starting...");

        let mut config = load_config();
        if let Ok(name) = std::env::var("ARCADE_QUALITY") {
            if config.override_quality(&name).is_none() {
                log::warn!("Unknown ARCADE_QUALITY {name:?}; keeping {}", config.quality.as_str());
            }
        }
        if let Err(e) = config.validate() {
            log::error!("Invalid config: {e}");
            return;
        }
        log::info!(
            "Playfield {}x{}, quality {}, seed {}",
            config.bounds.width,
            config.bounds.height,
            config.quality.as_str(),
            config.seed
        );

        let mut arcade = Arcade::new(config);
        for kind in GameKind::ALL {
            play(&mut arcade, kind);
        }
        arcade.go_to_menu();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the arcade through the library API
}
