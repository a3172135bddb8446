//! Character tuning configuration.
//!
//! Every value is a named numeric constant supplied at character
//! initialisation. Defaults come from [`crate::constants`]; a TOML document
//! may override any subset of them:
//!
//! ```
//! use dread::config::CharacterConfig;
//!
//! let config = CharacterConfig::from_toml_str("[locomotion]\nrun_speed = 7.5\n").unwrap();
//! assert!((config.locomotion.run_speed - 7.5).abs() < f32::EPSILON);
//! assert!((config.locomotion.walk_speed - dread::WALK_SPEED).abs() < f32::EPSILON);
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::*;
use crate::feedback::ResponseCurve;

/// Failures raised while loading or validating a [`CharacterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but violates a semantic constraint.
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable constraint description.
        reason: String,
    },
}

/// Movement speeds, gravity, jump and footstep cadence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Walking speed in metres per second.
    pub walk_speed: f32,
    /// Running speed in metres per second.
    pub run_speed: f32,
    /// Crouched speed in metres per second.
    pub crouch_speed: f32,
    /// Signed vertical acceleration; negative pulls down.
    pub gravity: f32,
    /// Jump apex height in metres.
    pub jump_height: f32,
    /// Vertical velocity held while grounded.
    pub grounded_bias: f32,
    /// Input magnitude treated as standing still.
    pub move_epsilon: f32,
    /// Capsule height in metres.
    pub height: f32,
    /// Radius of the ground probe sphere.
    pub ground_probe_radius: f32,
    /// Eye height above the capsule base.
    pub eye_height: f32,
    /// Seconds between running footsteps.
    pub run_step_interval: f32,
    /// Seconds between walking footsteps.
    pub walk_step_interval: f32,
    /// Seconds between crouched footsteps.
    pub crouch_step_interval: f32,
    /// Footstep volume in `[0, 1]`.
    pub footstep_volume: f32,
    /// Lower bound of the random footstep pitch.
    pub footstep_pitch_min: f32,
    /// Upper bound of the random footstep pitch.
    pub footstep_pitch_max: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            crouch_speed: CROUCH_SPEED,
            gravity: GRAVITY,
            jump_height: JUMP_HEIGHT,
            grounded_bias: GROUNDED_BIAS,
            move_epsilon: MOVE_EPSILON,
            height: CHARACTER_HEIGHT,
            ground_probe_radius: GROUND_PROBE_RADIUS,
            eye_height: EYE_HEIGHT,
            run_step_interval: RUN_STEP_INTERVAL,
            walk_step_interval: WALK_STEP_INTERVAL,
            crouch_step_interval: CROUCH_STEP_INTERVAL,
            footstep_volume: FOOTSTEP_VOLUME,
            footstep_pitch_min: FOOTSTEP_PITCH_MIN,
            footstep_pitch_max: FOOTSTEP_PITCH_MAX,
        }
    }
}

/// Mouse look settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Degrees of rotation per unit of look delta.
    pub sensitivity: f32,
    /// Maximum pitch either side of level.
    pub pitch_clamp_degrees: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: MOUSE_SENSITIVITY,
            pitch_clamp_degrees: PITCH_CLAMP_DEGREES,
        }
    }
}

/// Camera head bob while walking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeadBobConfig {
    /// Disables the bob entirely when false.
    pub enabled: bool,
    /// Bob cycles per second.
    pub frequency: f32,
    /// Walking amplitude in metres.
    pub amplitude: f32,
    /// Running amplitude in metres.
    pub amplitude_running: f32,
    /// Rate at which the bob eases back to rest.
    pub return_rate: f32,
}

impl Default for HeadBobConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: BOB_FREQUENCY,
            amplitude: BOB_AMPLITUDE,
            amplitude_running: BOB_AMPLITUDE_RUNNING,
            return_rate: BOB_RETURN_RATE,
        }
    }
}

/// Stamina meter tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    /// Full stamina.
    pub max: f32,
    /// Loss per second while running.
    pub drain_rate: f32,
    /// Gain per second otherwise.
    pub regen_rate: f32,
    /// Run permission returns only once stamina rises strictly above this.
    pub min_run_threshold: f32,
    /// Fraction of max below which the meter reports itself as low.
    pub low_threshold: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max: STAMINA_MAX,
            drain_rate: STAMINA_DRAIN_RATE,
            regen_rate: STAMINA_REGEN_RATE,
            min_run_threshold: STAMINA_MIN_RUN,
            low_threshold: STAMINA_LOW_THRESHOLD,
        }
    }
}

/// Fear meter tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FearConfig {
    /// Full fear.
    pub max: f32,
    /// Passive loss per second.
    pub decay_rate: f32,
    /// Fraction below which fear reads as low.
    pub low_threshold: f32,
}

impl Default for FearConfig {
    fn default() -> Self {
        Self {
            max: FEAR_MAX,
            decay_rate: FEAR_DECAY_RATE,
            low_threshold: FEAR_LOW_THRESHOLD,
        }
    }
}

/// Reticle targeting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Reticle reach in metres.
    pub range: f32,
    /// Lifetime of transient UI messages.
    pub message_seconds: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            range: INTERACTION_RANGE,
            message_seconds: MESSAGE_SECONDS,
        }
    }
}

/// Heartbeat audio driven by fear.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Activation requires fear strictly above this fraction.
    pub on_threshold: f32,
    /// Fade-out begins once fear is at or below this fraction.
    pub off_threshold: f32,
    /// Volume target at full fear.
    pub max_volume: f32,
    /// Pitch target at no fear.
    pub min_pitch: f32,
    /// Pitch target at full fear.
    pub max_pitch: f32,
    /// Exponential smoothing rate for volume, per second.
    pub volume_rate: f32,
    /// Exponential smoothing rate for pitch, per second.
    pub pitch_rate: f32,
    /// Length of the fade-out.
    pub fade_seconds: f32,
    /// Looping clip; `None` keeps the heartbeat silent.
    pub clip: Option<String>,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            on_threshold: HEARTBEAT_ON_THRESHOLD,
            off_threshold: HEARTBEAT_OFF_THRESHOLD,
            max_volume: HEARTBEAT_MAX_VOLUME,
            min_pitch: HEARTBEAT_MIN_PITCH,
            max_pitch: HEARTBEAT_MAX_PITCH,
            volume_rate: HEARTBEAT_VOLUME_RATE,
            pitch_rate: HEARTBEAT_PITCH_RATE,
            fade_seconds: HEARTBEAT_FADE_SECONDS,
            clip: Some("heartbeat".to_owned()),
        }
    }
}

/// Fear-driven camera tremor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Amplitude in metres at full fear.
    pub max_amplitude: f32,
    /// Frequency at no fear.
    pub base_frequency: f32,
    /// Frequency multiplier reached at full fear.
    pub frequency_gain: f32,
    /// Maps fear to amplitude.
    pub curve: ResponseCurve,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            max_amplitude: SHAKE_MAX_AMPLITUDE,
            base_frequency: SHAKE_BASE_FREQUENCY,
            frequency_gain: SHAKE_FREQUENCY_GAIN,
            curve: ResponseCurve::Quadratic,
        }
    }
}

/// Discrete scare sounds and the fear they add.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScareConfig {
    /// Fear added by a scare.
    pub scare_fear: f32,
    /// Fear added by a whisper.
    pub whisper_fear: f32,
    /// Fear added by an unseen footstep.
    pub footstep_scare_fear: f32,
    /// Proximity fear for a sound at the listener.
    pub proximity_fear_near: f32,
    /// Proximity fear at `max_audio_distance` and beyond.
    pub proximity_fear_far: f32,
    /// Distance over which proximity fear falls off.
    pub max_audio_distance: f32,
    /// Scare channel volume in `[0, 1]`.
    pub volume: f32,
    /// Whisper volume relative to `volume`.
    pub whisper_volume_scale: f32,
    /// Footstep scare volume relative to `volume`.
    pub footstep_volume_scale: f32,
    /// Pool for scares.
    pub scare_clips: Vec<String>,
    /// Pool for whispers.
    pub whisper_clips: Vec<String>,
    /// Pool for footstep scares.
    pub footstep_scare_clips: Vec<String>,
}

impl Default for ScareConfig {
    fn default() -> Self {
        Self {
            scare_fear: SCARE_FEAR,
            whisper_fear: WHISPER_FEAR,
            footstep_scare_fear: FOOTSTEP_SCARE_FEAR,
            proximity_fear_near: PROXIMITY_FEAR_NEAR,
            proximity_fear_far: PROXIMITY_FEAR_FAR,
            max_audio_distance: MAX_AUDIO_DISTANCE,
            volume: SCARE_VOLUME,
            whisper_volume_scale: WHISPER_VOLUME_SCALE,
            footstep_volume_scale: FOOTSTEP_SCARE_VOLUME_SCALE,
            scare_clips: vec!["scream".to_owned()],
            whisper_clips: vec!["whisper".to_owned()],
            footstep_scare_clips: vec!["creak".to_owned()],
        }
    }
}

/// Ambient playback scheduling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Shortest wait between clips, in seconds.
    pub min_interval: f32,
    /// Longest wait between clips, in seconds.
    pub max_interval: f32,
    /// Ambient channel volume in `[0, 1]`.
    pub volume: f32,
    /// Fear added per playback; zero disables it.
    pub fear_bump: f32,
    /// Pool of ambient clips; empty leaves the scheduler idle.
    pub clips: Vec<String>,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            min_interval: AMBIENT_MIN_INTERVAL,
            max_interval: AMBIENT_MAX_INTERVAL,
            volume: AMBIENT_VOLUME,
            fear_bump: AMBIENT_FEAR,
            clips: vec!["wind".to_owned(), "drip".to_owned(), "distant_door".to_owned()],
        }
    }
}

/// Every tunable the character reads at spawn.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Movement tuning.
    pub locomotion: LocomotionConfig,
    /// Mouse look tuning.
    pub look: LookConfig,
    /// Head bob tuning.
    pub head_bob: HeadBobConfig,
    /// Stamina meter tuning.
    pub stamina: StaminaConfig,
    /// Fear meter tuning.
    pub fear: FearConfig,
    /// Reticle tuning.
    pub interaction: InteractionConfig,
    /// Heartbeat tuning.
    pub heartbeat: HeartbeatConfig,
    /// Camera shake tuning.
    pub shake: ShakeConfig,
    /// Scare sounds.
    pub scare: ScareConfig,
    /// Ambient scheduling.
    pub ambient: AmbientConfig,
    /// Pool of footstep clips.
    pub footstep_clips: Vec<String>,
    /// Clip played when the flashlight toggles.
    pub flashlight_click: Option<String>,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must lie in [0, 1], got {value}")))
    }
}

impl CharacterConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a value breaks a constraint.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`CharacterConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let source = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks the semantic constraints between values.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_motion()?;
        self.validate_meters()?;
        self.validate_feedback()?;
        self.validate_audio()?;
        positive("interaction.range", self.interaction.range)?;
        non_negative("interaction.message_seconds", self.interaction.message_seconds)
    }

    fn validate_motion(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        positive("locomotion.walk_speed", loco.walk_speed)?;
        positive("locomotion.run_speed", loco.run_speed)?;
        positive("locomotion.crouch_speed", loco.crouch_speed)?;
        non_negative("locomotion.jump_height", loco.jump_height)?;
        non_negative("locomotion.move_epsilon", loco.move_epsilon)?;
        positive("locomotion.height", loco.height)?;
        positive("locomotion.ground_probe_radius", loco.ground_probe_radius)?;
        non_negative("locomotion.eye_height", loco.eye_height)?;
        positive("locomotion.run_step_interval", loco.run_step_interval)?;
        positive("locomotion.walk_step_interval", loco.walk_step_interval)?;
        positive("locomotion.crouch_step_interval", loco.crouch_step_interval)?;
        fraction("locomotion.footstep_volume", loco.footstep_volume)?;
        positive("locomotion.footstep_pitch_min", loco.footstep_pitch_min)?;
        positive("locomotion.footstep_pitch_max", loco.footstep_pitch_max)?;
        finite("locomotion.gravity", loco.gravity)?;
        finite("locomotion.grounded_bias", loco.grounded_bias)?;
        if loco.gravity >= 0.0 {
            return Err(invalid("locomotion.gravity", "must pull downwards"));
        }
        if loco.grounded_bias > 0.0 {
            return Err(invalid("locomotion.grounded_bias", "must not be positive"));
        }
        if loco.footstep_pitch_min > loco.footstep_pitch_max {
            return Err(invalid("locomotion.footstep_pitch_min", "exceeds footstep_pitch_max"));
        }

        finite("look.sensitivity", self.look.sensitivity)?;
        non_negative("look.pitch_clamp_degrees", self.look.pitch_clamp_degrees)?;

        let bob = &self.head_bob;
        non_negative("head_bob.frequency", bob.frequency)?;
        non_negative("head_bob.amplitude", bob.amplitude)?;
        non_negative("head_bob.amplitude_running", bob.amplitude_running)?;
        non_negative("head_bob.return_rate", bob.return_rate)
    }

    fn validate_meters(&self) -> Result<(), ConfigError> {
        positive("stamina.max", self.stamina.max)?;
        non_negative("stamina.drain_rate", self.stamina.drain_rate)?;
        non_negative("stamina.regen_rate", self.stamina.regen_rate)?;
        fraction("stamina.low_threshold", self.stamina.low_threshold)?;
        if !(0.0..self.stamina.max).contains(&self.stamina.min_run_threshold) {
            return Err(invalid(
                "stamina.min_run_threshold",
                format!("must lie in [0, {})", self.stamina.max),
            ));
        }

        positive("fear.max", self.fear.max)?;
        non_negative("fear.decay_rate", self.fear.decay_rate)?;
        fraction("fear.low_threshold", self.fear.low_threshold)
    }

    fn validate_feedback(&self) -> Result<(), ConfigError> {
        let heart = &self.heartbeat;
        fraction("heartbeat.on_threshold", heart.on_threshold)?;
        fraction("heartbeat.off_threshold", heart.off_threshold)?;
        if heart.off_threshold >= heart.on_threshold {
            return Err(invalid(
                "heartbeat.off_threshold",
                "must be below on_threshold to form a dead zone",
            ));
        }
        fraction("heartbeat.max_volume", heart.max_volume)?;
        positive("heartbeat.min_pitch", heart.min_pitch)?;
        positive("heartbeat.max_pitch", heart.max_pitch)?;
        non_negative("heartbeat.fade_seconds", heart.fade_seconds)?;
        non_negative("heartbeat.volume_rate", heart.volume_rate)?;
        non_negative("heartbeat.pitch_rate", heart.pitch_rate)?;

        let shake = &self.shake;
        non_negative("shake.max_amplitude", shake.max_amplitude)?;
        non_negative("shake.base_frequency", shake.base_frequency)?;
        non_negative("shake.frequency_gain", shake.frequency_gain)?;
        shake.curve.validate()
    }

    fn validate_audio(&self) -> Result<(), ConfigError> {
        let scare = &self.scare;
        non_negative("scare.scare_fear", scare.scare_fear)?;
        non_negative("scare.whisper_fear", scare.whisper_fear)?;
        non_negative("scare.footstep_scare_fear", scare.footstep_scare_fear)?;
        non_negative("scare.proximity_fear_near", scare.proximity_fear_near)?;
        non_negative("scare.proximity_fear_far", scare.proximity_fear_far)?;
        positive("scare.max_audio_distance", scare.max_audio_distance)?;
        fraction("scare.volume", scare.volume)?;
        non_negative("scare.whisper_volume_scale", scare.whisper_volume_scale)?;
        non_negative("scare.footstep_volume_scale", scare.footstep_volume_scale)?;

        let ambient = &self.ambient;
        non_negative("ambient.min_interval", ambient.min_interval)?;
        non_negative("ambient.max_interval", ambient.max_interval)?;
        fraction("ambient.volume", ambient.volume)?;
        non_negative("ambient.fear_bump", ambient.fear_bump)?;
        if ambient.min_interval > ambient.max_interval {
            return Err(invalid("ambient.min_interval", "exceeds ambient.max_interval"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_validate() {
        assert!(CharacterConfig::default().validate().is_ok());
    }

    #[rstest]
    fn partial_document_keeps_other_defaults() {
        let config = CharacterConfig::from_toml_str(
            "[stamina]\nmax = 50.0\n\n[ambient]\nclips = [\"howl\"]\n",
        )
        .expect("valid config");
        assert!((config.stamina.max - 50.0).abs() < f32::EPSILON);
        assert!((config.stamina.drain_rate - STAMINA_DRAIN_RATE).abs() < f32::EPSILON);
        assert_eq!(config.ambient.clips, vec!["howl".to_owned()]);
    }

    #[rstest]
    fn curve_is_read_from_toml() {
        let config = CharacterConfig::from_toml_str("[shake]\ncurve = { power = 3.0 }\n")
            .expect("valid config");
        assert_eq!(config.shake.curve, ResponseCurve::Power(3.0));
    }

    #[rstest]
    #[case("[ambient]\nmin_interval = 9.0\nmax_interval = 3.0\n", "ambient.min_interval")]
    #[case("[heartbeat]\non_threshold = 0.1\noff_threshold = 0.3\n", "heartbeat.off_threshold")]
    #[case("[locomotion]\ngravity = 9.8\n", "locomotion.gravity")]
    #[case("[stamina]\nmin_run_threshold = 150.0\n", "stamina.min_run_threshold")]
    #[case("[fear]\nmax = 0.0\n", "fear.max")]
    #[case("[ambient]\nmax_interval = inf\n", "ambient.max_interval")]
    #[case("[locomotion]\nfootstep_pitch_min = nan\n", "locomotion.footstep_pitch_min")]
    #[case("[locomotion]\ngravity = -inf\n", "locomotion.gravity")]
    #[case("[locomotion]\nfootstep_volume = 1.5\n", "locomotion.footstep_volume")]
    #[case("[look]\nsensitivity = nan\n", "look.sensitivity")]
    #[case("[scare]\nvolume = inf\n", "scare.volume")]
    fn rejects_invalid_values(#[case] source: &str, #[case] expected: &str) {
        match CharacterConfig::from_toml_str(source) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            CharacterConfig::from_toml_str("[stamina\nmax = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            CharacterConfig::load("/nonexistent/dread.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
