//! Cooperative timers for ambient audio.
//!
//! A [`ScheduledTask`] records when it should next fire on its own clock and
//! is polled by the tick driver; it never blocks. Each task exposes a
//! [`CancelHandle`] so the owner can guarantee nothing fires after teardown.
//!
//! [`AmbientScheduler`] uses one task to play a random ambient clip after a
//! random wait drawn from `[min, max]`, forever, until cancelled. It draws
//! from its own RNG so its rhythm stays decorrelated from gameplay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{draw_between, AudioMixer, ChannelName, ClipId, ClipPool};
use crate::config::AmbientConfig;
use crate::meter::{FearEvent, FearSource};

/// Shared cancellation flag for a scheduled task.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Cancels the task.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the task was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Deferred callback slot with its next fire time in seconds.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    clock: f64,
    next_fire: f64,
    cancel: CancelHandle,
}

impl ScheduledTask {
    /// Creates a task due `delay` seconds from now.
    #[must_use]
    pub fn after(delay: f32) -> Self {
        Self {
            clock: 0.0,
            next_fire: f64::from(delay.max(0.0)),
            cancel: CancelHandle::default(),
        }
    }

    /// Advances the task clock and reports whether it is due.
    ///
    /// A cancelled task is never due.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.clock += f64::from(dt.max(0.0));
        self.clock >= self.next_fire
    }

    /// Schedules the next firing `delay` seconds after the current clock.
    pub fn requeue(&mut self, delay: f32) {
        self.next_fire = self.clock + f64::from(delay.max(0.0));
    }

    /// Handle that can cancel this task from elsewhere.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Whether the task was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Seconds elapsed on the task's own clock.
    #[must_use]
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Clock time of the next firing.
    #[must_use]
    pub const fn next_fire(&self) -> f64 {
        self.next_fire
    }
}

/// One ambient playback.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientPlayback {
    /// Clip to play.
    pub clip: ClipId,
    /// Scheduler clock at which the clip played.
    pub at: f64,
    /// Fear to apply, when the bump is enabled.
    pub fear: Option<FearEvent>,
}

/// Random-interval ambient clip player.
#[derive(Debug)]
pub struct AmbientScheduler {
    config: AmbientConfig,
    pool: ClipPool,
    rng: StdRng,
    task: Option<ScheduledTask>,
}

impl AmbientScheduler {
    /// Creates the scheduler and queues the first wait. An empty clip pool
    /// leaves the scheduler idle.
    #[must_use]
    pub fn new(config: AmbientConfig, seed: u64) -> Self {
        let pool = ClipPool::from_names(config.clips.iter().cloned());
        let mut rng = StdRng::seed_from_u64(seed);
        let task = if pool.is_empty() {
            warn!("no ambient clips configured; ambient scheduler idle");
            None
        } else {
            let first = draw_wait(&config, &mut rng);
            debug!("first ambient clip in {first:.2}s");
            Some(ScheduledTask::after(first))
        };
        Self {
            config,
            pool,
            rng,
            task,
        }
    }

    /// Polls the task, playing at most one clip.
    pub fn poll(&mut self, dt: f32, mixer: Option<&mut dyn AudioMixer>) -> Option<AmbientPlayback> {
        let task = self.task.as_mut()?;
        if !task.advance(dt) {
            return None;
        }
        let wait = draw_wait(&self.config, &mut self.rng);
        task.requeue(wait);
        let at = task.clock();

        let clip = self.pool.choose(&mut self.rng)?.clone();
        if let Some(channel) = mixer.and_then(|m| m.channel(ChannelName::Ambient)) {
            channel.play_one_shot(&clip, self.config.volume);
        }
        debug!("ambient '{clip}' at {at:.2}s, next in {wait:.2}s");
        let fear = (self.config.fear_bump > 0.0)
            .then(|| FearEvent::new(self.config.fear_bump, FearSource::Ambient));
        Some(AmbientPlayback { clip, at, fear })
    }

    /// Cancels the pending wait. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.as_ref() {
            if !task.is_cancelled() {
                info!("ambient scheduler cancelled");
            }
            task.cancel_handle().cancel();
        }
    }

    /// Handle to the running task, if any.
    #[must_use]
    pub fn cancel_handle(&self) -> Option<CancelHandle> {
        self.task.as_ref().map(ScheduledTask::cancel_handle)
    }

    /// Whether a task is scheduled and not cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_cancelled())
    }

    /// Sets the ambient volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32, mixer: Option<&mut dyn AudioMixer>) {
        self.config.volume = volume.clamp(0.0, 1.0);
        if let Some(channel) = mixer.and_then(|m| m.channel(ChannelName::Ambient)) {
            channel.set_volume(self.config.volume);
        }
    }

    /// Ambient channel volume.
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.config.volume
    }
}

fn draw_wait<R: Rng + ?Sized>(config: &AmbientConfig, rng: &mut R) -> f32 {
    draw_between(rng, config.min_interval, config.max_interval)
}
