#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the simulation core of a first-person horror
//! character: locomotion, stamina and fear meters, reticle interaction and
//! the fear-driven audio and camera feedback.
//! Re-exports common types for the demo binary and tests.
pub mod audio;
pub mod character;
pub mod config;
pub mod constants;
pub mod demo;
pub mod feedback;
pub mod host;
pub mod input;
pub mod interactables;
pub mod interaction;
pub mod locomotion;
pub mod logging;
pub mod look;
pub mod meter;
pub mod physics;
pub mod scheduler;
pub use constants::*;

// Re-export commonly used items
pub use audio::{AudioChannel, AudioMixer, ChannelName, ClipId, ClipPool};
pub use character::{Character, Collaborators, TickReport};
pub use config::{CharacterConfig, ConfigError};
pub use feedback::{AudioFeedbackState, FearFeedbackRouter, ResponseCurve, ScareKind};
pub use host::{CharacterHost, CharacterPlugin, LastTick, PlayerInput};
pub use input::InputFrame;
pub use interactables::{Door, InteractableObject, InteractableRegistry, PickupItem};
pub use interaction::{
    InteractAttempt, InteractOutcome, Interactable, InteractableWorld, InteractionActor,
    InteractionCandidate, InteractionNotice, InteractionTargeter, Inventory, Ui,
};
pub use locomotion::{jump_velocity, Locomotion, LocomotionState, LocomotionStep};
pub use logging::init as init_logging;
pub use meter::{FearEvent, FearMeter, FearSource, Meter, MeterIntent, StaminaMeter};
pub use physics::{ObjectId, Physics, RayHit};
pub use scheduler::{AmbientScheduler, CancelHandle, ScheduledTask};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use dread::prelude::*;
    //! ```

    pub use crate::Character;
    pub use crate::CharacterConfig;
    pub use crate::Collaborators;
    pub use crate::FearEvent;
    pub use crate::FearSource;
    pub use crate::InputFrame;
    pub use crate::InteractableRegistry;
    pub use crate::LocomotionState;
    pub use crate::ObjectId;
    pub use crate::Physics;
    pub use glam::{Vec2, Vec3};
}
