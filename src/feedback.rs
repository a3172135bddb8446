//! Fear feedback: heartbeat audio, camera tremor and scare sounds.
//!
//! [`FearFeedbackRouter`] is evaluated once per tick from the fear level
//! `f` in `[0, 1]`. The heartbeat starts only when `f` rises strictly above
//! the activation threshold and begins a timed fade once `f` falls to the
//! release threshold; between the two the previous state is kept. Volume and
//! pitch ease towards fear-scaled targets with exponential smoothing so the
//! response does not depend on tick rate.
//!
//! [`ScareSounds`] plays discrete scare clips and returns the [`FearEvent`]
//! the caller should feed into the fear meter.

use glam::Vec3;
use log::{debug, warn};
use rand::Rng;
use serde::Deserialize;

use crate::audio::{AudioMixer, ChannelName, ClipId, ClipPool};
use crate::config::{ConfigError, HeartbeatConfig, ScareConfig, ShakeConfig};
use crate::meter::{FearEvent, FearSource};

/// Shape mapping fear to shake strength.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCurve {
    /// `f`.
    Linear,
    /// `f^2`.
    Quadratic,
    /// `3f^2 - 2f^3`.
    SmoothStep,
    /// `f^exponent`.
    Power(f32),
}

impl ResponseCurve {
    /// Evaluates the curve for `fraction`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, fraction: f32) -> f32 {
        let f = fraction.clamp(0.0, 1.0);
        match self {
            Self::Linear => f,
            Self::Quadratic => f * f,
            Self::SmoothStep => f * f * (3.0 - 2.0 * f),
            Self::Power(exponent) => f.powf(exponent),
        }
    }

    pub(crate) fn validate(self) -> Result<(), ConfigError> {
        match self {
            Self::Power(exponent) if !(exponent > 0.0 && exponent.is_finite()) => {
                Err(ConfigError::Invalid {
                    field: "shake.curve",
                    reason: format!("power exponent must be positive, got {exponent}"),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Output of the router for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFeedbackState {
    /// Whether the heartbeat loop is playing or fading.
    pub heartbeat_active: bool,
    /// Smoothed heartbeat volume.
    pub heartbeat_volume: f32,
    /// Smoothed heartbeat pitch.
    pub heartbeat_pitch: f32,
    /// Camera offset from the shake.
    pub shake_offset: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HeartbeatPhase {
    Silent,
    Playing,
    FadingOut { elapsed: f32, start_volume: f32 },
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Blend factor for exponential smoothing at `rate` per second.
fn smoothing(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

/// Derives heartbeat and shake output from the fear level.
#[derive(Debug, Clone, PartialEq)]
pub struct FearFeedbackRouter {
    heartbeat: HeartbeatConfig,
    shake: ShakeConfig,
    clip: Option<ClipId>,
    phase: HeartbeatPhase,
    volume: f32,
    pitch: f32,
    shake_phase: f32,
    shake_offset: Vec3,
}

impl FearFeedbackRouter {
    /// Builds an idle router.
    #[must_use]
    pub fn new(heartbeat: HeartbeatConfig, shake: ShakeConfig) -> Self {
        let clip = heartbeat.clip.clone().map(ClipId);
        let pitch = heartbeat.min_pitch;
        Self {
            heartbeat,
            shake,
            clip,
            phase: HeartbeatPhase::Silent,
            volume: 0.0,
            pitch,
            shake_phase: 0.0,
            shake_offset: Vec3::ZERO,
        }
    }

    /// Advances the router with fear level `fear` and pushes the result to
    /// the heartbeat channel when one exists.
    pub fn update(
        &mut self,
        fear: f32,
        seconds: f32,
        mixer: Option<&mut dyn AudioMixer>,
    ) -> AudioFeedbackState {
        let f = fear.clamp(0.0, 1.0);
        let dt = seconds.max(0.0);
        self.update_heartbeat(f, dt, mixer);
        self.update_shake(f, dt);
        self.state()
    }

    fn update_heartbeat(&mut self, f: f32, dt: f32, mixer: Option<&mut dyn AudioMixer>) {
        let target = mixer.and_then(|m| m.channel(ChannelName::Heartbeat));
        match self.phase {
            HeartbeatPhase::Silent if f > self.heartbeat.on_threshold => {
                debug!("heartbeat on at fear {f:.2}");
                self.phase = HeartbeatPhase::Playing;
                self.volume = 0.0;
                self.pitch = self.heartbeat.min_pitch;
                if let (Some(channel), Some(clip)) = (target, self.clip.as_ref()) {
                    channel.set_volume(0.0);
                    channel.set_pitch(self.pitch);
                    channel.play_looping(clip);
                }
                return;
            }
            HeartbeatPhase::Silent => return,
            HeartbeatPhase::Playing if f <= self.heartbeat.off_threshold => {
                debug!("heartbeat fading at fear {f:.2}");
                self.phase = HeartbeatPhase::FadingOut {
                    elapsed: 0.0,
                    start_volume: self.volume,
                };
            }
            HeartbeatPhase::FadingOut { .. } if f > self.heartbeat.on_threshold => {
                debug!("heartbeat fade cancelled at fear {f:.2}");
                self.phase = HeartbeatPhase::Playing;
            }
            _ => {}
        }

        match self.phase {
            HeartbeatPhase::Playing => {
                let target_volume = f * self.heartbeat.max_volume;
                let target_pitch = lerp(self.heartbeat.min_pitch, self.heartbeat.max_pitch, f);
                self.volume = lerp(self.volume, target_volume, smoothing(self.heartbeat.volume_rate, dt));
                self.pitch = lerp(self.pitch, target_pitch, smoothing(self.heartbeat.pitch_rate, dt));
                if let Some(channel) = target {
                    channel.set_volume(self.volume);
                    channel.set_pitch(self.pitch);
                }
            }
            HeartbeatPhase::FadingOut {
                elapsed: before,
                start_volume,
            } => {
                let elapsed = before + dt;
                let fade = self.heartbeat.fade_seconds;
                if elapsed >= fade {
                    debug!("heartbeat off");
                    self.phase = HeartbeatPhase::Silent;
                    self.volume = 0.0;
                    if let Some(channel) = target {
                        channel.stop();
                    }
                } else {
                    self.phase = HeartbeatPhase::FadingOut {
                        elapsed,
                        start_volume,
                    };
                    self.volume = lerp(start_volume, 0.0, elapsed / fade);
                    if let Some(channel) = target {
                        channel.set_volume(self.volume);
                    }
                }
            }
            HeartbeatPhase::Silent => {}
        }
    }

    fn update_shake(&mut self, f: f32, dt: f32) {
        let frequency = self.shake.base_frequency * lerp(1.0, self.shake.frequency_gain, f);
        self.shake_phase = (self.shake_phase + dt * frequency) % (std::f32::consts::TAU * 1000.0);
        let amplitude = self.shake.curve.apply(f) * self.shake.max_amplitude;
        let p = self.shake_phase;
        self.shake_offset = Vec3::new(
            amplitude * 0.5 * (p.sin() + (p * 2.3 + 1.7).sin()),
            amplitude * 0.5 * ((p * 1.3).sin() + (p * 3.1 + 0.5).sin()),
            0.0,
        );
    }

    /// Starts a fade regardless of fear, used on teardown.
    pub fn silence(&mut self, mixer: Option<&mut dyn AudioMixer>) {
        if self.phase == HeartbeatPhase::Silent {
            return;
        }
        if let Some(channel) = mixer.and_then(|m| m.channel(ChannelName::Heartbeat)) {
            channel.fade_out(self.heartbeat.fade_seconds);
        }
        self.phase = HeartbeatPhase::Silent;
        self.volume = 0.0;
    }

    /// Snapshot of the current feedback.
    #[must_use]
    pub fn state(&self) -> AudioFeedbackState {
        AudioFeedbackState {
            heartbeat_active: self.phase != HeartbeatPhase::Silent,
            heartbeat_volume: self.volume,
            heartbeat_pitch: self.pitch,
            shake_offset: self.shake_offset,
        }
    }

    /// Whether the heartbeat is fading out.
    #[must_use]
    pub const fn is_fading(&self) -> bool {
        matches!(self.phase, HeartbeatPhase::FadingOut { .. })
    }
}

/// Kinds of scripted scare sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScareKind {
    /// Loud one-shot scare.
    Scare,
    /// Quiet whisper.
    Whisper,
    /// Unseen footstep.
    FootstepScare,
}

/// Scare clip pools and the fear each one adds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScareSounds {
    config: ScareConfig,
    scare: ClipPool,
    whisper: ClipPool,
    footstep: ClipPool,
}

impl ScareSounds {
    /// Builds the pools from the configured clip names.
    #[must_use]
    pub fn new(config: ScareConfig) -> Self {
        Self {
            scare: ClipPool::from_names(config.scare_clips.iter().cloned()),
            whisper: ClipPool::from_names(config.whisper_clips.iter().cloned()),
            footstep: ClipPool::from_names(config.footstep_scare_clips.iter().cloned()),
            config,
        }
    }

    /// Plays a random clip of `kind` on the scare channel.
    ///
    /// Returns the fear bump to apply, or `None` when there was nothing to
    /// play (no clip or no channel).
    pub fn play<R: Rng + ?Sized>(
        &self,
        kind: ScareKind,
        mixer: Option<&mut dyn AudioMixer>,
        rng: &mut R,
    ) -> Option<FearEvent> {
        let (pool, scale, magnitude, source) = match kind {
            ScareKind::Scare => (&self.scare, 1.0, self.config.scare_fear, FearSource::Scare),
            ScareKind::Whisper => (
                &self.whisper,
                self.config.whisper_volume_scale,
                self.config.whisper_fear,
                FearSource::Whisper,
            ),
            ScareKind::FootstepScare => (
                &self.footstep,
                self.config.footstep_volume_scale,
                self.config.footstep_scare_fear,
                FearSource::FootstepScare,
            ),
        };
        let Some(clip) = pool.choose(rng) else {
            warn!("no clips configured for {kind:?}");
            return None;
        };
        let channel = mixer.and_then(|m| m.channel(ChannelName::Scare))?;
        channel.play_one_shot(clip, self.config.volume * scale);
        Some(FearEvent::new(magnitude, source))
    }

    /// Plays a positional clip heard at `distance` and returns a fear bump
    /// that shrinks linearly from the near to the far magnitude over the
    /// maximum audio distance.
    pub fn play_proximity(
        &self,
        clip: &ClipId,
        distance: f32,
        volume: f32,
        mixer: Option<&mut dyn AudioMixer>,
    ) -> Option<FearEvent> {
        let channel = mixer.and_then(|m| m.channel(ChannelName::Scare))?;
        channel.play_one_shot(clip, volume);
        Some(FearEvent::new(self.proximity_fear(distance), FearSource::ProximityAudio))
    }

    /// Distance-scaled fear for a positional sound.
    #[must_use]
    pub fn proximity_fear(&self, distance: f32) -> f32 {
        let t = (distance / self.config.max_audio_distance).clamp(0.0, 1.0);
        lerp(self.config.proximity_fear_near, self.config.proximity_fear_far, t)
    }

    /// Sets the scare volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32, mixer: Option<&mut dyn AudioMixer>) {
        self.config.volume = volume.clamp(0.0, 1.0);
        if let Some(channel) = mixer.and_then(|m| m.channel(ChannelName::Scare)) {
            channel.set_volume(self.config.volume);
        }
    }

    /// Scare channel volume.
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.config.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn router() -> FearFeedbackRouter {
        FearFeedbackRouter::new(HeartbeatConfig::default(), ShakeConfig::default())
    }

    #[rstest]
    #[case(ResponseCurve::Linear, 0.5, 0.5)]
    #[case(ResponseCurve::Quadratic, 0.5, 0.25)]
    #[case(ResponseCurve::SmoothStep, 0.5, 0.5)]
    #[case(ResponseCurve::Power(3.0), 0.5, 0.125)]
    #[case(ResponseCurve::Linear, 2.0, 1.0)]
    fn curves_map_fear(#[case] curve: ResponseCurve, #[case] f: f32, #[case] expected: f32) {
        assert_relative_eq!(curve.apply(f), expected);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.1)]
    #[case(0.29)]
    #[case(0.3)]
    fn heartbeat_stays_off_at_or_below_activation(mut router: FearFeedbackRouter, #[case] f: f32) {
        assert!(!router.update(f, 0.016, None).heartbeat_active);
    }

    #[rstest]
    #[case(0.29)]
    #[case(0.2)]
    #[case(0.11)]
    fn heartbeat_holds_in_dead_zone(mut router: FearFeedbackRouter, #[case] f: f32) {
        router.update(0.31, 0.016, None);
        for _ in 0..500 {
            assert!(router.update(f, 0.016, None).heartbeat_active);
        }
    }

    #[rstest]
    fn heartbeat_fades_rather_than_cuts(mut router: FearFeedbackRouter) {
        for _ in 0..200 {
            router.update(0.8, 0.05, None);
        }
        let loud = router.state().heartbeat_volume;
        let fading = router.update(0.05, 0.5, None);
        assert!(fading.heartbeat_active);
        assert!(fading.heartbeat_volume < loud && fading.heartbeat_volume > 0.0);
        router.update(0.05, 1.0, None);
        let done = router.update(0.05, 1.0, None);
        assert!(!done.heartbeat_active);
        assert_relative_eq!(done.heartbeat_volume, 0.0);
    }

    #[rstest]
    fn rising_fear_cancels_a_fade(mut router: FearFeedbackRouter) {
        router.update(0.8, 0.1, None);
        router.update(0.8, 0.1, None);
        router.update(0.05, 0.1, None);
        assert!(router.is_fading());
        assert!(router.state().heartbeat_active);

        let resumed = router.update(0.5, 0.1, None);
        assert!(resumed.heartbeat_active);
        assert!(!router.is_fading());
        for _ in 0..100 {
            assert!(router.update(0.2, 0.1, None).heartbeat_active);
        }
    }

    #[rstest]
    fn fear_inside_dead_zone_keeps_fading(mut router: FearFeedbackRouter) {
        router.update(0.8, 0.1, None);
        router.update(0.05, 0.1, None);
        router.update(0.25, 0.1, None);
        assert!(router.is_fading());
    }

    #[rstest]
    fn volume_and_pitch_converge_to_fear_targets(mut router: FearFeedbackRouter) {
        for _ in 0..2000 {
            router.update(1.0, 0.01, None);
        }
        let state = router.state();
        assert_relative_eq!(state.heartbeat_volume, 0.6, epsilon = 1e-3);
        assert_relative_eq!(state.heartbeat_pitch, 1.5, epsilon = 1e-3);
    }

    #[rstest]
    fn smoothing_is_tick_rate_independent() {
        let mut coarse = FearFeedbackRouter::new(HeartbeatConfig::default(), ShakeConfig::default());
        let mut fine = coarse.clone();
        coarse.update(0.9, 0.0, None);
        fine.update(0.9, 0.0, None);
        for _ in 0..10 {
            coarse.update(0.9, 0.1, None);
        }
        for _ in 0..100 {
            fine.update(0.9, 0.01, None);
        }
        assert_relative_eq!(
            coarse.state().heartbeat_volume,
            fine.state().heartbeat_volume,
            epsilon = 1e-4
        );
    }

    #[rstest]
    fn no_shake_without_fear(mut router: FearFeedbackRouter) {
        for _ in 0..10 {
            assert_eq!(router.update(0.0, 0.016, None).shake_offset, Vec3::ZERO);
        }
    }

    #[rstest]
    fn shake_grows_with_fear() {
        let peak = |f: f32| {
            let mut router = FearFeedbackRouter::new(HeartbeatConfig::default(), ShakeConfig::default());
            (0..400)
                .map(|_| router.update(f, 0.01, None).shake_offset.length())
                .fold(0.0_f32, f32::max)
        };
        assert!(peak(0.9) > peak(0.4));
    }

    #[rstest]
    #[case(0.0, 15.0)]
    #[case(10.0, 10.0)]
    #[case(40.0, 5.0)]
    fn proximity_fear_scales_with_distance(#[case] distance: f32, #[case] expected: f32) {
        let sounds = ScareSounds::new(ScareConfig::default());
        assert_relative_eq!(sounds.proximity_fear(distance), expected);
    }

    #[rstest]
    fn scare_without_mixer_adds_no_fear() {
        let sounds = ScareSounds::new(ScareConfig::default());
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert!(sounds.play(ScareKind::Scare, None, &mut rng).is_none());
    }
}
