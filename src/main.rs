//! Nose Slicer entry point
//!
//! Native builds run a headless autopilot session and print a summary. The
//! browser build is driven from JavaScript through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use std::path::PathBuf;

    use glam::Vec2;
    use nose_slicer::error::Result;
    use nose_slicer::sim::{Difficulty, GameEngine, GamePhase, GameState, Recorder, TickInput};
    use nose_slicer::{HighScore, Tuning};

    /// Keep this far from bombs when choosing a target
    const BOMB_CLEARANCE: f32 = 160.0;
    /// Give up on calibration after this many frames
    const CALIBRATION_LIMIT: u32 = 600;

    pub struct Options {
        pub seed: u64,
        pub difficulty: Difficulty,
        pub max_frames: u32,
        pub tuning: Option<PathBuf>,
        pub high_score: Option<PathBuf>,
    }

    impl Options {
        /// `nose-slicer [seed] [easy|medium|hard] [frames]`, plus
        /// `NOSE_SLICER_TUNING` and `NOSE_SLICER_HIGHSCORE` file paths
        pub fn from_env() -> Self {
            let args: Vec<String> = std::env::args().skip(1).collect();
            Self {
                seed: args.first().and_then(|s| s.parse().ok()).unwrap_or(42),
                difficulty: args
                    .get(1)
                    .and_then(|s| Difficulty::parse(s))
                    .unwrap_or_default(),
                max_frames: args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60 * 120),
                tuning: std::env::var_os("NOSE_SLICER_TUNING").map(PathBuf::from),
                high_score: std::env::var_os("NOSE_SLICER_HIGHSCORE").map(PathBuf::from),
            }
        }
    }

    /// Aim at the nearest fruit or special that is not sitting next to a bomb
    fn choose_target(state: &GameState) -> Vec2 {
        let cursor = state.cursor.pos;
        let bombs: Vec<Vec2> = state
            .entities
            .live()
            .filter(|e| e.is_bomb())
            .map(|e| e.pos)
            .collect();
        let view = Vec2::new(state.width, state.height);
        let in_view = |p: Vec2| p.cmpge(Vec2::ZERO).all() && p.cmple(view).all();

        state
            .entities
            .live()
            .filter(|e| !e.is_bomb() && in_view(e.pos))
            .filter(|e| bombs.iter().all(|b| b.distance(e.pos) > BOMB_CLEARANCE))
            .min_by(|a, b| a.pos.distance(cursor).total_cmp(&b.pos.distance(cursor)))
            .map(|e| e.pos)
            .unwrap_or(Vec2::new(state.width / 2.0, state.height * 0.35))
    }

    pub fn run(options: &Options) -> Result<()> {
        let tuning = match &options.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let mut engine =
            GameEngine::with_tuning(options.seed, 1280.0, 720.0, tuning, Recorder::default());
        engine.set_difficulty(options.difficulty);

        engine.set_phase(GamePhase::Calibration);
        let center = Vec2::new(640.0, 360.0);
        for _ in 0..CALIBRATION_LIMIT {
            engine.tick(&TickInput::tracked(center.x, center.y));
            if engine.callbacks().calibration_complete > 0 {
                break;
            }
        }
        log::info!("Calibrated after {} frames", engine.state().frame);

        engine.set_phase(GamePhase::Playing);
        let mut frames = 0;
        while frames < options.max_frames && engine.phase() == GamePhase::Playing {
            let target = choose_target(engine.state());
            engine.tick(&TickInput::tracked(target.x, target.y));
            frames += 1;
        }

        let state = engine.state();
        let recorder = engine.callbacks();
        println!("Seed {} on {}", options.seed, options.difficulty.as_str());
        println!("  frames played: {}", frames);
        println!("  score:         {}", state.score);
        println!("  lives left:    {}", state.lives);
        println!("  bomb hits:     {}", recorder.damage);
        println!(
            "  effects:       {}",
            recorder.effects.iter().filter(|e| e.is_some()).count()
        );
        println!("  outcome:       {}", state.phase.as_str());

        if let Some(path) = &options.high_score {
            let mut high_score = HighScore::load_from(path)?;
            if high_score.submit(state.score) {
                high_score.save_to(path)?;
                println!("  new high score!");
            } else {
                println!("  high score:    {}", high_score.best);
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Nose Slicer (native) starting...");
    log::info!("Native mode runs a headless autopilot; build for wasm32 to play");

    let options = autopilot::Options::from_env();
    if let Err(e) = autopilot::run(&options) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
