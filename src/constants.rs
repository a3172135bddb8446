//! Default tuning constants for the character simulation.
//!
//! These values seed [`crate::config::CharacterConfig`]'s defaults. A TOML
//! file may override any of them at character initialisation.

// Locomotion
/// Walking speed in metres per second.
pub const WALK_SPEED: f32 = 3.0;
/// Running speed in metres per second.
pub const RUN_SPEED: f32 = 6.0;
/// Crouched speed in metres per second.
pub const CROUCH_SPEED: f32 = 1.5;
/// Vertical acceleration in metres per second squared.
pub const GRAVITY: f32 = -20.0;
/// Apex height of a jump in metres.
pub const JUMP_HEIGHT: f32 = 1.0;
/// Vertical velocity applied while grounded so the capsule stays pressed to
/// the floor despite float error.
pub const GROUNDED_BIAS: f32 = -2.0;
/// Input magnitudes at or below this value count as no movement.
pub const MOVE_EPSILON: f32 = 0.1;
/// Capsule height in metres.
pub const CHARACTER_HEIGHT: f32 = 2.0;
/// Radius of the ground probe sphere.
pub const GROUND_PROBE_RADIUS: f32 = 0.3;
/// Eye height above the capsule base.
pub const EYE_HEIGHT: f32 = 1.6;
/// Seconds between footsteps while running.
pub const RUN_STEP_INTERVAL: f32 = 0.3;
/// Seconds between footsteps while walking.
pub const WALK_STEP_INTERVAL: f32 = 0.5;
/// Seconds between footsteps while crouched.
pub const CROUCH_STEP_INTERVAL: f32 = 0.8;
/// Footstep playback volume.
pub const FOOTSTEP_VOLUME: f32 = 0.5;
/// Lowest random footstep pitch.
pub const FOOTSTEP_PITCH_MIN: f32 = 0.8;
/// Highest random footstep pitch.
pub const FOOTSTEP_PITCH_MAX: f32 = 1.2;

// Look
/// Degrees of rotation per unit of look delta.
pub const MOUSE_SENSITIVITY: f32 = 2.0;
/// Maximum pitch either side of level, in degrees.
pub const PITCH_CLAMP_DEGREES: f32 = 80.0;
/// Head bob cycles per second of movement.
pub const BOB_FREQUENCY: f32 = 2.0;
/// Head bob amplitude in metres while walking.
pub const BOB_AMPLITUDE: f32 = 0.05;
/// Head bob amplitude in metres while running.
pub const BOB_AMPLITUDE_RUNNING: f32 = 0.1;
/// Rate at which the bob eases back to rest.
pub const BOB_RETURN_RATE: f32 = 4.0;

// Stamina
/// Full stamina.
pub const STAMINA_MAX: f32 = 100.0;
/// Stamina lost per second of running.
pub const STAMINA_DRAIN_RATE: f32 = 20.0;
/// Stamina regained per second when not running.
pub const STAMINA_REGEN_RATE: f32 = 10.0;
/// Stamina that must be exceeded before running is allowed again.
pub const STAMINA_MIN_RUN: f32 = 20.0;
/// Fraction below which stamina reads as low.
pub const STAMINA_LOW_THRESHOLD: f32 = 0.2;

// Fear
/// Full fear.
pub const FEAR_MAX: f32 = 100.0;
/// Fear lost per second.
pub const FEAR_DECAY_RATE: f32 = 5.0;
/// Fraction below which fear reads as low.
pub const FEAR_LOW_THRESHOLD: f32 = 0.1;

// Heartbeat
/// Fear fraction the heartbeat needs to exceed to start.
pub const HEARTBEAT_ON_THRESHOLD: f32 = 0.3;
/// Fear fraction at or below which the heartbeat fades out.
pub const HEARTBEAT_OFF_THRESHOLD: f32 = 0.1;
/// Heartbeat volume at full fear.
pub const HEARTBEAT_MAX_VOLUME: f32 = 0.6;
/// Heartbeat pitch at no fear.
pub const HEARTBEAT_MIN_PITCH: f32 = 1.0;
/// Heartbeat pitch at full fear.
pub const HEARTBEAT_MAX_PITCH: f32 = 1.5;
/// Volume smoothing rate per second.
pub const HEARTBEAT_VOLUME_RATE: f32 = 2.0;
/// Pitch smoothing rate per second.
pub const HEARTBEAT_PITCH_RATE: f32 = 1.0;
/// Length of the heartbeat fade-out.
pub const HEARTBEAT_FADE_SECONDS: f32 = 2.0;

// Camera shake
/// Shake amplitude in metres at full fear.
pub const SHAKE_MAX_AMPLITUDE: f32 = 0.04;
/// Shake frequency at no fear.
pub const SHAKE_BASE_FREQUENCY: f32 = 6.0;
/// Frequency multiplier reached at full fear.
pub const SHAKE_FREQUENCY_GAIN: f32 = 3.0;

// Scares
/// Fear added by a scare.
pub const SCARE_FEAR: f32 = 20.0;
/// Fear added by a whisper.
pub const WHISPER_FEAR: f32 = 10.0;
/// Fear added by an unseen footstep.
pub const FOOTSTEP_SCARE_FEAR: f32 = 5.0;
/// Proximity fear for a sound at the listener.
pub const PROXIMITY_FEAR_NEAR: f32 = 15.0;
/// Proximity fear at or beyond [`MAX_AUDIO_DISTANCE`].
pub const PROXIMITY_FEAR_FAR: f32 = 5.0;
/// Distance over which proximity fear falls off, in metres.
pub const MAX_AUDIO_DISTANCE: f32 = 20.0;
/// Scare channel volume.
pub const SCARE_VOLUME: f32 = 0.8;
/// Whisper volume relative to [`SCARE_VOLUME`].
pub const WHISPER_VOLUME_SCALE: f32 = 0.5;
/// Footstep scare volume relative to [`SCARE_VOLUME`].
pub const FOOTSTEP_SCARE_VOLUME_SCALE: f32 = 0.7;
/// Fear added when picking up a ghost or spirit item.
pub const SPOOKY_PICKUP_FEAR: f32 = 10.0;

// Ambient
/// Shortest wait between ambient clips, in seconds.
pub const AMBIENT_MIN_INTERVAL: f32 = 5.0;
/// Longest wait between ambient clips, in seconds.
pub const AMBIENT_MAX_INTERVAL: f32 = 15.0;
/// Ambient channel volume.
pub const AMBIENT_VOLUME: f32 = 0.3;
/// Fear added each time an ambient clip plays.
pub const AMBIENT_FEAR: f32 = 2.0;

// Interaction
/// Reticle reach in metres.
pub const INTERACTION_RANGE: f32 = 3.0;
/// How long transient messages stay on screen.
pub const MESSAGE_SECONDS: f32 = 2.0;
/// Door swing when fully open, in degrees.
pub const DOOR_OPEN_ANGLE: f32 = 90.0;
/// Door swings per second.
pub const DOOR_OPEN_SPEED: f32 = 2.0;
