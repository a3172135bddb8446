//! Audio collaborator seam.
//!
//! The mixer and spatialisation engine live outside this crate. The core
//! talks to named channels through [`AudioMixer`]; a channel that is not
//! present simply yields `None` and the feature relying on it goes quiet.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

/// Named output channels the character drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelName {
    /// Background ambience on a random timer.
    Ambient,
    /// Scripted scares, whispers and positional sounds.
    Scare,
    /// Fear-driven heartbeat loop.
    Heartbeat,
    /// Footsteps and flashlight clicks.
    Player,
}

/// Identifier for a clip known to the host's asset system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipId(
    /// Asset name as the host knows it.
    pub String,
);

impl ClipId {
    /// Wraps an asset name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The asset name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations exposed by a single mixer channel.
pub trait AudioChannel {
    /// Sets the channel gain in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);
    /// Sets the playback rate; 1 is unchanged.
    fn set_pitch(&mut self, pitch: f32);
    /// Plays `clip` once over whatever is already playing.
    fn play_one_shot(&mut self, clip: &ClipId, volume: f32);
    /// Replaces the channel's loop with `clip`.
    fn play_looping(&mut self, clip: &ClipId);
    /// Stops the loop immediately.
    fn stop(&mut self);
    /// Ramps the loop to silence over `seconds`, then stops it.
    fn fade_out(&mut self, seconds: f32);
}

/// Lookup of channels by name.
pub trait AudioMixer {
    /// Returns the channel, or `None` when the host did not configure it.
    fn channel(&mut self, name: ChannelName) -> Option<&mut dyn AudioChannel>;
}

/// Reborrows an optional mixer so it can be handed to several calls in turn.
pub fn reborrow<'r>(mixer: &'r mut Option<&mut dyn AudioMixer>) -> Option<&'r mut dyn AudioMixer> {
    mixer.as_deref_mut().map(|m| m as &mut dyn AudioMixer)
}

/// Set of interchangeable clips, one of which is picked at random.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipPool {
    clips: Vec<ClipId>,
}

impl ClipPool {
    /// Builds a pool from asset names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clips: names.into_iter().map(ClipId::new).collect(),
        }
    }

    /// Whether the pool has no clips.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Number of clips in the pool.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.clips.len()
    }

    /// Picks a clip uniformly, or `None` for an empty pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ClipId> {
        self.clips.choose(rng)
    }
}

/// Draws uniformly from `[min, max]`.
///
/// Falls back to `min` when the range is empty or its width is not finite,
/// so unvalidated tuning never reaches the sampler.
pub fn draw_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min && (max - min).is_finite() {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
