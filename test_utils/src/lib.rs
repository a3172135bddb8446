//! Utility helpers for tests.
//!
//! Fakes for the collaborators the character talks to: a flat floor with
//! scripted ray hits, and recording audio, UI and inventory doubles whose
//! call logs tests can assert against.

pub mod physics;
pub mod recording;

pub use physics::FlatFloor;
pub use recording::{AudioCall, RecordingMixer, RecordingUi, UiCall, VecInventory};

use dread::{Character, CharacterConfig};
use glam::Vec3;

/// Character standing on a [`FlatFloor`] at the origin.
#[must_use]
pub fn standing_character(config: CharacterConfig, seed: u64) -> Character {
    let height = config.locomotion.height;
    Character::new(config, Vec3::new(0.0, height * 0.5, 0.0), seed)
}
