//! Headless corridor scene used by the `dread` binary.
//!
//! A straight corridor runs along `-Z` with a ghostly lantern to pick up and
//! a door at the far end. Collaborators log every call so a run can be read
//! back from the log.

use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use log::info;

use crate::audio::{AudioChannel, AudioMixer, ChannelName, ClipId};
use crate::character::Character;
use crate::config::CharacterConfig;
use crate::feedback::ScareKind;
use crate::host::CharacterHost;
use crate::input::InputFrame;
use crate::interactables::{Door, InteractableRegistry, PickupItem};
use crate::interaction::{Inventory, Ui};
use crate::physics::{ObjectId, Physics, RayHit};

/// Locked door at the end of the corridor.
pub const DOOR: ObjectId = ObjectId(1);
/// Pickup lying halfway along the corridor.
pub const LANTERN: ObjectId = ObjectId(2);

const FLOOR_Y: f32 = 0.0;
const HALF_WIDTH: f32 = 1.5;
const GROUND_TOLERANCE: f32 = 0.05;
const OBJECT_RADIUS: f32 = 0.6;

/// Flat corridor with spherical proxies for its interactables.
#[derive(Debug, Clone)]
pub struct Corridor {
    character_height: f32,
    objects: Vec<(ObjectId, Vec3)>,
}

impl Corridor {
    /// Builds the corridor for a capsule of `character_height`.
    #[must_use]
    pub fn new(character_height: f32) -> Self {
        Self {
            character_height,
            objects: vec![
                (LANTERN, Vec3::new(0.0, 1.2, -4.0)),
                (DOOR, Vec3::new(0.0, 1.2, -8.0)),
            ],
        }
    }
}

impl Physics for Corridor {
    fn is_grounded(&self, position: Vec3, radius: f32) -> bool {
        position.y - radius <= FLOOR_Y + GROUND_TOLERANCE
    }

    fn raycast_forward(&self, origin: Vec3, direction: Vec3, max_range: f32) -> Option<RayHit> {
        let unit = direction.normalize_or_zero();
        self.objects
            .iter()
            .filter_map(|&(object, centre)| {
                let along = (centre - origin).dot(unit);
                let miss = (centre - origin).length_squared() - along * along;
                ((0.0..=max_range).contains(&along) && miss <= OBJECT_RADIUS * OBJECT_RADIUS)
                    .then_some(RayHit {
                        object,
                        distance: along,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn move_character(&self, position: Vec3, displacement: Vec3) -> Vec3 {
        let next = position + displacement;
        Vec3::new(
            next.x.clamp(-HALF_WIDTH, HALF_WIDTH),
            next.y.max(FLOOR_Y + self.character_height * 0.5),
            next.z,
        )
    }
}

/// Channel that logs every call.
#[derive(Debug, Clone)]
pub struct LoggingChannel {
    name: ChannelName,
}

impl AudioChannel for LoggingChannel {
    fn set_volume(&mut self, volume: f32) {
        log::trace!("[{:?}] volume {volume:.2}", self.name);
    }

    fn set_pitch(&mut self, pitch: f32) {
        log::trace!("[{:?}] pitch {pitch:.2}", self.name);
    }

    fn play_one_shot(&mut self, clip: &ClipId, volume: f32) {
        info!("[{:?}] one-shot {clip} at {volume:.2}", self.name);
    }

    fn play_looping(&mut self, clip: &ClipId) {
        info!("[{:?}] loop {clip}", self.name);
    }

    fn stop(&mut self) {
        info!("[{:?}] stop", self.name);
    }

    fn fade_out(&mut self, seconds: f32) {
        info!("[{:?}] fade out over {seconds:.1}s", self.name);
    }
}

/// Mixer with all four channels present.
#[derive(Debug, Clone)]
pub struct LoggingMixer {
    channels: HashMap<ChannelName, LoggingChannel>,
}

impl Default for LoggingMixer {
    fn default() -> Self {
        let channels = [
            ChannelName::Ambient,
            ChannelName::Scare,
            ChannelName::Heartbeat,
            ChannelName::Player,
        ]
        .into_iter()
        .map(|name| (name, LoggingChannel { name }))
        .collect();
        Self { channels }
    }
}

impl AudioMixer for LoggingMixer {
    fn channel(&mut self, name: ChannelName) -> Option<&mut dyn AudioChannel> {
        match self.channels.get_mut(&name) {
            Some(channel) => Some(channel),
            None => None,
        }
    }
}

/// UI that writes prompts and messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingUi;

impl Ui for LoggingUi {
    fn show_prompt(&mut self, text: &str) {
        info!("[ui] prompt: {text}");
    }

    fn hide_prompt(&mut self) {
        info!("[ui] prompt hidden");
    }

    fn show_transient_message(&mut self, text: &str, seconds: f32) {
        info!("[ui] message for {seconds:.1}s: {text}");
    }
}

/// Fixed-capacity inventory.
#[derive(Debug, Clone, Default)]
pub struct Satchel {
    items: Vec<(String, u32)>,
    capacity: usize,
}

impl Satchel {
    /// Empty satchel holding at most `capacity` items.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }
}

impl Inventory for Satchel {
    fn add_item(&mut self, name: &str, quantity: u32) -> bool {
        if let Some((_, held)) = self.items.iter_mut().find(|(item, _)| item == name) {
            *held += quantity;
            return true;
        }
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push((name.to_owned(), quantity));
        info!("[inventory] {name} x{quantity}");
        true
    }

    fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|(item, _)| item == name)
    }
}

/// Fills in clip names the corridor needs when a config leaves them out.
pub fn fill_missing_clips(config: &mut CharacterConfig) {
    if config.footstep_clips.is_empty() {
        config.footstep_clips = vec!["step_stone_1".to_owned(), "step_stone_2".to_owned()];
    }
    if config.flashlight_click.is_none() {
        config.flashlight_click = Some("flashlight_click".to_owned());
    }
}

/// Builds the corridor scene with the character at its entrance.
#[must_use]
pub fn corridor_host(config: CharacterConfig, seed: u64) -> CharacterHost {
    let height = config.locomotion.height;
    let mut world = InteractableRegistry::default();
    world.insert(LANTERN, PickupItem::new("Ghost Lantern"));
    world.insert(DOOR, Door::default());
    let character = Character::new(config, Vec3::new(0.0, height * 0.5, 0.0), seed);
    CharacterHost::new(character, Corridor::new(height), world)
        .with_audio(LoggingMixer::default())
        .with_ui(LoggingUi)
        .with_inventory(Satchel::with_capacity(4))
}

/// Input for fixed tick `tick` of the scripted walk, at 60 ticks a second.
#[must_use]
pub fn scripted_input(tick: u64) -> InputFrame {
    let walk = InputFrame::forward();
    match tick {
        0 => InputFrame {
            flashlight_pressed: true,
            ..walk
        },
        40 | 125 => InputFrame {
            interact_pressed: true,
            ..walk
        },
        0..=130 => walk,
        131..=300 => InputFrame {
            jump_pressed: tick == 200,
            look_delta: if tick < 160 { Vec2::new(0.5, 0.0) } else { Vec2::ZERO },
            ..walk.running()
        },
        320 | 400 => InputFrame {
            crouch_pressed: true,
            ..walk
        },
        301..=420 => walk,
        _ => InputFrame::default(),
    }
}

/// Scripted scares during the walk.
#[must_use]
pub const fn scripted_scare(tick: u64) -> Option<ScareKind> {
    match tick {
        150 => Some(ScareKind::Whisper),
        250 => Some(ScareKind::Scare),
        330 => Some(ScareKind::FootstepScare),
        _ => None,
    }
}
