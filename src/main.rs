//! Tilt Maze entry point
//!
//! Headless native run: loads settings and a maze, feeds a slowly circling tilt
//! from a background thread, and drives the game from a fixed-interval timer,
//! logging what a renderer would draw.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::{Vec2, Vec3};

    use tilt_maze::game::{Presenter, TiltMaze};
    use tilt_maze::maze::{Maze, WallGrid};
    use tilt_maze::sensor::ScriptedTilt;
    use tilt_maze::settings::Settings;
    use tilt_maze::sim::Layout;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Headless tilt maze simulation")]
    struct Args {
        /// Settings JSON (defaults are used when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Maze JSON with width, height and row-major cells; an open room when omitted
        #[arg(long)]
        maze: Option<PathBuf>,
        /// Seed for ball and hole placement
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of timer ticks to run
        #[arg(long, default_value_t = 600)]
        ticks: u32,
        /// Play area width in pixels
        #[arg(long, default_value_t = 480.0)]
        width: f32,
        /// Play area height in pixels
        #[arg(long, default_value_t = 800.0)]
        height: f32,
    }

    /// Logs draw calls instead of drawing
    #[derive(Default)]
    struct LogPresenter {
        frames: u64,
    }

    impl Presenter for LogPresenter {
        fn show_layout(&mut self, layout: &Layout) {
            log::info!(
                "Layout: {} wall rects over {:?}, hole at {:?}",
                layout.walls.len(),
                layout.area,
                layout.hole.pos
            );
        }

        fn move_ball(&mut self, center: Vec2) {
            self.frames += 1;
            if self.frames % 30 == 0 {
                log::info!("Ball at ({:.1}, {:.1})", center.x, center.y);
            }
        }

        fn hide_ball(&mut self) {
            log::info!("Ball in the hole");
        }

        fn set_opacity(&mut self, opacity: f32) {
            log::debug!("Opacity {opacity:.2}");
        }

        fn show_notice(&mut self, text: &str) {
            log::warn!("{text}");
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        env_logger::init();
        log::info!("Tilt Maze (native) starting...");

        let settings = Settings::load(args.settings.as_deref()).context("loading settings")?;
        let maze = match &args.maze {
            Some(path) => WallGrid::load(path)
                .with_context(|| format!("loading maze {}", path.display()))?,
            None => WallGrid::enclosed(settings.maze_width, settings.maze_height),
        };
        log::info!("Maze is {}x{}", maze.width(), maze.height());

        let interval = settings.tick_interval();
        let mut game = TiltMaze::new(settings, maze, LogPresenter::default(), args.seed);

        // Tilt vector sweeping a circle every 8 seconds
        let tilt = ScriptedTilt::new(Duration::from_millis(16), |t: f32| {
            let phase = t * std::f32::consts::TAU / 8.0;
            Vec3::new(0.4 * phase.cos(), 0.4 * phase.sin(), -0.9)
        });
        game.start_sensor(Box::new(tilt));

        game.resize(Vec2::new(args.width, args.height))
            .context("setting up the first game")?;

        let mut deadline = Instant::now();
        for _ in 0..args.ticks {
            if !game.on_timer() {
                break;
            }
            deadline += interval;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                // Overran; start the next tick now instead of queueing missed ones
                deadline = now;
            }
        }

        game.shutdown();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `TiltMaze` directly on the web
}
