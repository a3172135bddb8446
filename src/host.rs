//! Bevy integration.
//!
//! [`CharacterPlugin`] drives a [`Character`] from the engine's fixed
//! timestep. Input is written into the [`PlayerInput`] resource by whatever
//! polls devices; collaborators live with the character in the non-send
//! [`CharacterHost`] resource because audio and UI backends are rarely
//! `Send`. Dropping the host (for example when the app exits) shuts the
//! character down.

use bevy::prelude::*;
use log::warn;

use crate::audio::AudioMixer;
use crate::character::{Character, Collaborators, TickReport};
use crate::feedback::ScareKind;
use crate::input::InputFrame;
use crate::interaction::{InteractableWorld, Inventory, Ui};
use crate::meter::FearEvent;
use crate::physics::Physics;

/// Input polled for the next fixed tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerInput(
    /// Frame handed to the next tick.
    pub InputFrame,
);

/// Report from the most recent fixed tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct LastTick {
    /// Report from the most recent tick.
    pub report: Option<TickReport>,
    /// Ticks run so far.
    pub ticks: u64,
}

/// The character together with the collaborators it is ticked against.
pub struct CharacterHost {
    /// The simulated character.
    pub character: Character,
    physics: Box<dyn Physics>,
    world: Box<dyn InteractableWorld>,
    audio: Option<Box<dyn AudioMixer>>,
    ui: Option<Box<dyn Ui>>,
    inventory: Option<Box<dyn Inventory>>,
}

impl CharacterHost {
    /// Wraps a character with its physics and world.
    #[must_use]
    pub fn new(
        character: Character,
        physics: impl Physics + 'static,
        world: impl InteractableWorld + 'static,
    ) -> Self {
        Self {
            character,
            physics: Box::new(physics),
            world: Box::new(world),
            audio: None,
            ui: None,
            inventory: None,
        }
    }

    /// Attaches a mixer.
    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioMixer + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Attaches a UI.
    #[must_use]
    pub fn with_ui(mut self, ui: impl Ui + 'static) -> Self {
        self.ui = Some(Box::new(ui));
        self
    }

    /// Attaches an inventory.
    #[must_use]
    pub fn with_inventory(mut self, inventory: impl Inventory + 'static) -> Self {
        self.inventory = Some(Box::new(inventory));
        self
    }

    /// Ticks the character against the owned collaborators.
    pub fn tick(&mut self, dt: f32, input: &InputFrame) -> TickReport {
        let mut collab = Collaborators {
            physics: &*self.physics,
            world: &mut *self.world,
            audio: self.audio.as_deref_mut().map(|a| a as &mut dyn AudioMixer),
            ui: self.ui.as_deref_mut().map(|u| u as &mut dyn Ui),
            inventory: self.inventory.as_deref_mut().map(|i| i as &mut dyn Inventory),
        };
        self.character.tick(dt, input, &mut collab)
    }

    /// The scene objects the character interacts with.
    #[must_use]
    pub fn world(&self) -> &dyn InteractableWorld {
        &*self.world
    }

    /// Plays a scripted scare through the owned mixer.
    pub fn play_scare(&mut self, kind: ScareKind) -> Option<FearEvent> {
        let audio = self.audio.as_deref_mut().map(|a| a as &mut dyn AudioMixer);
        match kind {
            ScareKind::Scare => self.character.play_scare(audio),
            ScareKind::Whisper => self.character.play_whisper(audio),
            ScareKind::FootstepScare => self.character.play_footstep_scare(audio),
        }
    }

    /// Shuts the character down with the attached collaborators.
    pub fn shutdown(&mut self) {
        let audio = self.audio.as_deref_mut().map(|a| a as &mut dyn AudioMixer);
        self.character.shutdown(audio);
    }
}

impl Drop for CharacterHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs [`CharacterHost`] once per fixed timestep.
#[derive(Debug, Clone, Copy)]
pub struct CharacterPlugin {
    /// Fixed tick rate.
    pub tick_hz: f64,
}

impl Default for CharacterPlugin {
    fn default() -> Self {
        Self { tick_hz: 60.0 }
    }
}

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.tick_hz))
            .init_resource::<PlayerInput>()
            .init_resource::<LastTick>()
            .add_systems(FixedUpdate, tick_character_system);
    }
}

/// Advances fixed time by one timestep and runs [`FixedUpdate`] directly.
///
/// Headless drivers and tests use this instead of the frame loop.
pub fn step_fixed(app: &mut App) {
    {
        let mut time = app.world_mut().resource_mut::<Time<Fixed>>();
        let step = time.timestep();
        time.advance_by(step);
    }
    app.world_mut().run_schedule(FixedUpdate);
}

/// Advances the character by the fixed delta and consumes input edges.
pub fn tick_character_system(
    time: Res<Time<Fixed>>,
    mut input: ResMut<PlayerInput>,
    mut last: ResMut<LastTick>,
    host: Option<NonSendMut<CharacterHost>>,
    mut warned: Local<bool>,
) {
    let Some(mut host) = host else {
        if !*warned {
            warn!("no CharacterHost inserted; character tick skipped");
            *warned = true;
        }
        return;
    };
    let report = host.tick(time.delta_secs(), &input.0);
    input.0.clear_edges();
    last.report = Some(report);
    last.ticks += 1;
}
