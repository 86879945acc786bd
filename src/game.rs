//! Session driver
//!
//! Owns the current `GameSession` and runs it from a recurring timer:
//! measure elapsed time, step the ball with the latest tilt snapshot, push the
//! ball to the presenter, and on a win fade out, build the next game, and fade
//! back in before ticking resumes.

use std::time::Instant;

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::maze::MazeSource;
use crate::sensor::{SharedTilt, TiltSource};
use crate::settings::Settings;
use crate::sim::{
    GamePhase, GameSession, Layout, RngState, SetupError, StartCorner, TickInput, tick,
};

/// Notice shown once when the tilt sensor cannot be started
pub const UNSUPPORTED_NOTICE: &str = "Sorry, accelerometer not supported";

/// Rendering collaborator; draws what it is told and does no physics
pub trait Presenter {
    /// Walls, hole and ball size for a new game
    fn show_layout(&mut self, layout: &Layout);
    /// Ball centre, once per tick while in play
    fn move_ball(&mut self, center: Vec2);
    /// Take the ball off screen while the old game fades out
    fn hide_ball(&mut self);
    /// Whole play area opacity (0.0 - 1.0)
    fn set_opacity(&mut self, opacity: f32);
    fn show_notice(&mut self, text: &str);
}

/// Fade stage between two games
#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    FadeOut { elapsed: f32 },
    FadeIn { elapsed: f32 },
}

/// Fraction of a fade completed, treating a zero-length fade as instant
fn fade_progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

/// Timer-driven game loop state
pub struct TiltMaze<M: MazeSource, P: Presenter> {
    settings: Settings,
    mazes: M,
    presenter: P,
    tilt: SharedTilt,
    sensor: Option<Box<dyn TiltSource>>,
    rng: Pcg32,
    area: Option<Vec2>,
    session: Option<GameSession>,
    transition: Option<Transition>,
    last_tick: Option<Instant>,
    games_won: u32,
    running: bool,
}

impl<M: MazeSource, P: Presenter> TiltMaze<M, P> {
    pub fn new(settings: Settings, mazes: M, presenter: P, seed: u64) -> Self {
        let tilt = SharedTilt::new(settings.tilt_smoothing);
        Self {
            settings,
            mazes,
            presenter,
            tilt,
            sensor: None,
            rng: RngState::new(seed).to_rng(),
            area: None,
            session: None,
            transition: None,
            last_tick: None,
            games_won: 0,
            running: true,
        }
    }

    /// Start the accelerometer; without one the ball only keeps whatever motion it has
    pub fn start_sensor(&mut self, mut source: Box<dyn TiltSource>) {
        match source.start(self.tilt.clone()) {
            Ok(()) => self.sensor = Some(source),
            Err(err) => {
                log::warn!("Tilt input unavailable, running without it: {err}");
                self.presenter.show_notice(UNSUPPORTED_NOTICE);
            }
        }
    }

    /// Handle for delivering samples from outside the crate
    pub fn tilt(&self) -> SharedTilt {
        self.tilt.clone()
    }

    /// Play area size changed; the first positive size starts the first game
    pub fn resize(&mut self, area: Vec2) -> Result<(), SetupError> {
        if area.x <= 0.0 || area.y <= 0.0 {
            return Ok(());
        }
        if self.session.is_some() {
            log::debug!("Ignoring resize to {area:?} during a game");
            return Ok(());
        }
        self.area = Some(area);
        self.new_game(area)?;
        if let Some(session) = self.session.as_mut() {
            session.start();
        }
        Ok(())
    }

    /// Timer callback; returns false once the loop should stop
    pub fn on_timer(&mut self) -> bool {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_tick = Some(now);

        match self.advance(delta) {
            Ok(keep_going) => keep_going,
            Err(err) => {
                log::error!("Could not set up the next game: {err}");
                self.running = false;
                false
            }
        }
    }

    /// Advance by a measured `delta_seconds`
    pub fn advance(&mut self, delta_seconds: f32) -> Result<bool, SetupError> {
        if !self.running {
            return Ok(false);
        }

        if let Some(transition) = self.transition {
            self.advance_transition(transition, delta_seconds)?;
            return Ok(true);
        }

        let Some(session) = self.session.as_mut() else {
            return Ok(true);
        };
        if session.phase != GamePhase::InPlay {
            return Ok(true);
        }

        let dt = delta_seconds.clamp(0.0, self.settings.max_delta_seconds);
        let input = TickInput {
            tilt: self.tilt.snapshot(),
        };
        let won = tick(session, &input, dt);
        self.presenter.move_ball(session.ball.pos);

        if won {
            self.games_won += 1;
            session.phase = GamePhase::Transitioning;
            self.presenter.hide_ball();
            self.transition = Some(Transition::FadeOut { elapsed: 0.0 });
        }

        Ok(true)
    }

    fn advance_transition(&mut self, transition: Transition, delta: f32) -> Result<(), SetupError> {
        match transition {
            Transition::FadeOut { elapsed } => {
                let elapsed = elapsed + delta;
                let progress = fade_progress(elapsed, self.settings.fade_out_seconds);
                self.presenter.set_opacity(1.0 - progress);

                if progress >= 1.0 {
                    let area = self.area.unwrap_or(Vec2::ZERO);
                    self.new_game(area)?;
                    self.transition = Some(Transition::FadeIn { elapsed: 0.0 });
                } else {
                    self.transition = Some(Transition::FadeOut { elapsed });
                }
            }
            Transition::FadeIn { elapsed } => {
                let elapsed = elapsed + delta;
                let progress = fade_progress(elapsed, self.settings.fade_in_seconds);
                self.presenter.set_opacity(progress);

                if progress >= 1.0 {
                    self.transition = None;
                    if let Some(session) = self.session.as_mut() {
                        session.start();
                    }
                } else {
                    self.transition = Some(Transition::FadeIn { elapsed });
                }
            }
        }
        Ok(())
    }

    /// Replace the session with a freshly built one
    fn new_game(&mut self, area: Vec2) -> Result<(), SetupError> {
        let maze = self.mazes.next_maze();
        let corner = StartCorner::random(&mut self.rng);
        let session = GameSession::new(&maze, area, &self.settings, corner)?;

        self.presenter.show_layout(session.layout());
        self.presenter.move_ball(session.ball.pos);
        self.session = Some(session);
        Ok(())
    }

    /// Phase of the current game, `None` before the first game
    pub fn phase(&self) -> Option<GamePhase> {
        if self.transition.is_some() {
            return Some(GamePhase::Transitioning);
        }
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    /// Stop the sensor and make the next timer callback return false
    pub fn shutdown(&mut self) {
        if let Some(mut sensor) = self.sensor.take() {
            sensor.stop();
        }
        self.tilt.reset();
        self.running = false;
        log::info!("Tilt maze stopped after {} wins", self.games_won);
    }
}
