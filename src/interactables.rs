//! Concrete world objects implementing [`Interactable`].
//!
//! Each variant is its own type; there is no shared mutable base. The
//! [`InteractableRegistry`] maps scene identities to boxed capabilities and
//! is the default [`InteractableWorld`] used by the demo and tests.

use hashbrown::HashMap;
use log::{debug, warn};

use crate::interaction::{InteractOutcome, Interactable, InteractableWorld, InteractionActor};
use crate::physics::ObjectId;
use crate::{DOOR_OPEN_ANGLE, DOOR_OPEN_SPEED, SPOOKY_PICKUP_FEAR};

/// Generic object with a fixed prompt, optionally usable once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractableObject {
    prompt: String,
    enabled: bool,
    one_time_use: bool,
    used: bool,
    uses: u32,
}

impl InteractableObject {
    /// Enabled object with `prompt` and unlimited uses.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            enabled: true,
            one_time_use: false,
            used: false,
            uses: 0,
        }
    }

    /// Disables the object after its first use.
    #[must_use]
    pub const fn one_time(mut self) -> Self {
        self.one_time_use = true;
        self
    }

    /// Enables or disables the object.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Number of successful interactions.
    #[must_use]
    pub const fn uses(&self) -> u32 {
        self.uses
    }
}

impl Interactable for InteractableObject {
    fn prompt(&self) -> String {
        self.prompt.clone()
    }

    fn can_interact_now(&self) -> bool {
        self.enabled && !(self.one_time_use && self.used)
    }

    fn interact(&mut self, _actor: &mut InteractionActor<'_>) -> InteractOutcome {
        self.uses += 1;
        if self.one_time_use {
            self.used = true;
        }
        debug!("used '{}' ({} times)", self.prompt, self.uses);
        InteractOutcome::Keep
    }
}

/// Hinged door that swings open and closed, optionally locked by a key.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    open: bool,
    /// Swing progress towards the target pose, in `[0, 1]`.
    progress: f32,
    from_angle: f32,
    angle: f32,
    open_angle: f32,
    open_speed: f32,
    required_key: Option<String>,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            open: false,
            progress: 1.0,
            from_angle: 0.0,
            angle: 0.0,
            open_angle: DOOR_OPEN_ANGLE,
            open_speed: DOOR_OPEN_SPEED,
            required_key: None,
        }
    }
}

impl Door {
    /// A door locked until the actor carries `key`.
    #[must_use]
    pub fn locked(key: impl Into<String>) -> Self {
        Self {
            required_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Whether the door's target state is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the door is still swinging.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.progress < 1.0
    }

    /// Current hinge angle in degrees.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    fn target_angle(&self) -> f32 {
        if self.open {
            self.open_angle
        } else {
            0.0
        }
    }
}

impl Interactable for Door {
    fn prompt(&self) -> String {
        match (&self.required_key, self.open) {
            (Some(key), _) => format!("Requires {key}"),
            (None, true) => "Close Door".to_owned(),
            (None, false) => "Open Door".to_owned(),
        }
    }

    fn can_interact_now(&self) -> bool {
        !self.is_moving()
    }

    fn interact(&mut self, actor: &mut InteractionActor<'_>) -> InteractOutcome {
        if let Some(key) = self.required_key.as_deref() {
            if !actor.has_item(key) {
                actor.show_message(&format!("Requires {key}"));
                return InteractOutcome::Keep;
            }
            debug!("door unlocked with {key}");
            self.required_key = None;
        }
        self.open = !self.open;
        self.from_angle = self.angle;
        self.progress = 0.0;
        debug!("door {}", if self.open { "opening" } else { "closing" });
        InteractOutcome::Keep
    }

    fn advance(&mut self, dt: f32) {
        if !self.is_moving() {
            return;
        }
        self.progress = (self.progress + dt.max(0.0) * self.open_speed).min(1.0);
        let target = self.target_angle();
        self.angle = self.from_angle + (target - self.from_angle) * self.progress;
    }
}

/// Item that moves into the inventory and leaves the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupItem {
    name: String,
    quantity: u32,
}

impl PickupItem {
    /// Single item called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
        }
    }

    /// Sets how many items the pickup grants.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    fn is_spooky(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("ghost") || name.contains("spirit")
    }
}

impl Interactable for PickupItem {
    fn prompt(&self) -> String {
        format!("Pick up {}", self.name)
    }

    fn can_interact_now(&self) -> bool {
        true
    }

    fn interact(&mut self, actor: &mut InteractionActor<'_>) -> InteractOutcome {
        let Some(inventory) = actor.inventory.as_deref_mut() else {
            warn!("no inventory attached; cannot pick up {}", self.name);
            return InteractOutcome::Keep;
        };
        if !inventory.add_item(&self.name, self.quantity) {
            actor.show_message(&format!("Cannot pick up {} - inventory full!", self.name));
            return InteractOutcome::Keep;
        }

        actor.show_message(&format!("Picked up: {}", self.name));
        if self.is_spooky() {
            actor.add_fear(SPOOKY_PICKUP_FEAR);
        }
        InteractOutcome::Despawn
    }
}

/// Scene objects indexed by identity.
#[derive(Default)]
pub struct InteractableRegistry {
    objects: HashMap<ObjectId, Box<dyn Interactable>>,
}

impl InteractableRegistry {
    /// Registers `object`, replacing any previous occupant of `id`.
    pub fn insert(&mut self, id: ObjectId, object: impl Interactable + 'static) {
        self.objects.insert(id, Box::new(object));
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl InteractableWorld for InteractableRegistry {
    fn interactable(&self, id: ObjectId) -> Option<&dyn Interactable> {
        self.objects.get(&id).map(|object| &**object)
    }

    fn interactable_mut(&mut self, id: ObjectId) -> Option<&mut dyn Interactable> {
        match self.objects.get_mut(&id) {
            Some(object) => Some(&mut **object),
            None => None,
        }
    }

    fn despawn(&mut self, id: ObjectId) {
        if self.objects.remove(&id).is_some() {
            debug!("despawned {id:?}");
        }
    }

    fn advance(&mut self, dt: f32) {
        for object in self.objects.values_mut() {
            object.advance(dt);
        }
    }
}
