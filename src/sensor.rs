//! Tilt input
//!
//! Accelerometer samples arrive on their own schedule, usually from another
//! thread. Each sample is folded into an exponential moving average on arrival
//! and the tick reads one whole-vector snapshot, so a reader never sees x from
//! one sample and y from the next.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SensorError {
    #[error("accelerometer not supported: {0}")]
    Unsupported(String),
}

/// Smoothed acceleration shared between the sample handler and the tick
#[derive(Debug, Clone)]
pub struct SharedTilt {
    current: Arc<Mutex<Vec3>>,
    smoothing: f32,
}

impl SharedTilt {
    /// `smoothing` is the weight kept from the previous value (0.5 averages equally)
    pub fn new(smoothing: f32) -> Self {
        Self {
            current: Arc::new(Mutex::new(Vec3::ZERO)),
            smoothing,
        }
    }

    /// Fold one raw sample into the average
    pub fn push(&self, sample: Vec3) {
        if !sample.is_finite() {
            log::debug!("Dropping non-finite tilt sample {sample:?}");
            return;
        }
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current = self.smoothing * *current + (1.0 - self.smoothing) * sample;
    }

    /// Copy of the current smoothed value
    pub fn snapshot(&self) -> Vec3 {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Vec3::ZERO;
    }
}

/// Accelerometer collaborator
pub trait TiltSource {
    /// Begin delivering samples into `sink`
    fn start(&mut self, sink: SharedTilt) -> Result<(), SensorError>;
    fn stop(&mut self);
}

/// A device without an accelerometer
#[derive(Debug, Default)]
pub struct NoSensor;

impl TiltSource for NoSensor {
    fn start(&mut self, _sink: SharedTilt) -> Result<(), SensorError> {
        Err(SensorError::Unsupported("no accelerometer on this device".to_string()))
    }

    fn stop(&mut self) {}
}

/// Feeds samples from a closure of elapsed seconds on a background thread
pub struct ScriptedTilt<F> {
    script: Option<F>,
    interval: Duration,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<F> ScriptedTilt<F>
where
    F: FnMut(f32) -> Vec3 + Send + 'static,
{
    pub fn new(interval: Duration, script: F) -> Self {
        Self {
            script: Some(script),
            interval,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl<F> TiltSource for ScriptedTilt<F>
where
    F: FnMut(f32) -> Vec3 + Send + 'static,
{
    fn start(&mut self, sink: SharedTilt) -> Result<(), SensorError> {
        let mut script = self
            .script
            .take()
            .ok_or_else(|| SensorError::Unsupported("scripted tilt already started".to_string()))?;
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        running.store(true, Ordering::SeqCst);

        self.worker = Some(std::thread::spawn(move || {
            let started = std::time::Instant::now();
            while running.load(Ordering::SeqCst) {
                sink.push(script(started.elapsed().as_secs_f32()));
                std::thread::sleep(interval);
            }
        }));
        log::info!("Scripted tilt started ({:?} interval)", interval);
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Tilt worker panicked");
            }
        }
    }
}

impl<F> Drop for ScriptedTilt<F> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
