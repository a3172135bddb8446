//! Reticle interaction targeting.
//!
//! The [`InteractionTargeter`] resolves the interactable under the reticle
//! once per tick and reports edge-triggered [`InteractionNotice`]s: an
//! object is announced when it becomes the candidate and retired when it
//! stops being one. Staring at the same object produces nothing.
//!
//! World objects participate through the [`Interactable`] capability and are
//! found by identity through an [`InteractableWorld`].

use log::debug;

use crate::meter::{FearEvent, FearMeter, FearSource};
use crate::physics::{ObjectId, RayHit};

/// Prompt and message display owned by the host UI.
pub trait Ui {
    /// Shows the interaction prompt.
    fn show_prompt(&mut self, text: &str);
    /// Hides the interaction prompt.
    fn hide_prompt(&mut self);
    /// Shows `text` for `seconds`.
    fn show_transient_message(&mut self, text: &str, seconds: f32);
}

/// Inventory list manager owned by the host.
pub trait Inventory {
    /// Adds items, returning `false` when the inventory refuses them.
    fn add_item(&mut self, name: &str, quantity: u32) -> bool;
    /// Whether at least one `name` is held.
    fn has_item(&self, name: &str) -> bool;
}

/// Explicit handle to the acting character passed into
/// [`Interactable::interact`].
pub struct InteractionActor<'a> {
    /// Fear meter of the acting character.
    pub fear: &'a mut FearMeter,
    /// Inventory, if the host has one.
    pub inventory: Option<&'a mut dyn Inventory>,
    /// UI, if the host has one.
    pub ui: Option<&'a mut dyn Ui>,
    /// Lifetime of messages shown through this actor.
    pub message_seconds: f32,
}

impl InteractionActor<'_> {
    /// Bumps the actor's fear.
    pub fn add_fear(&mut self, amount: f32) {
        self.fear.apply(FearEvent::new(amount, FearSource::Interaction));
    }

    /// Shows a transient message if a UI is attached.
    pub fn show_message(&mut self, text: &str) {
        if let Some(ui) = self.ui.as_deref_mut() {
            ui.show_transient_message(text, self.message_seconds);
        }
    }

    /// Whether the inventory holds `name`.
    #[must_use]
    pub fn has_item(&self, name: &str) -> bool {
        self.inventory.as_deref().is_some_and(|inv| inv.has_item(name))
    }
}

/// What the world should do with an object after it was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// The object stays in the world.
    Keep,
    /// The object is removed.
    Despawn,
}

/// Capability implemented by world objects the player can use.
pub trait Interactable: Send + Sync {
    /// Text shown while the object is targeted.
    fn prompt(&self) -> String;

    /// Whether [`Interactable::interact`] would currently do anything.
    fn can_interact_now(&self) -> bool;

    /// Performs the interaction. Side effects on the world are opaque to the
    /// character.
    fn interact(&mut self, actor: &mut InteractionActor<'_>) -> InteractOutcome;

    /// Advances any animation the object owns.
    fn advance(&mut self, _dt: f32) {}
}

/// Identity lookup from ray hits to interactable capabilities.
pub trait InteractableWorld {
    /// Looks up the object hit by a ray.
    fn interactable(&self, id: ObjectId) -> Option<&dyn Interactable>;
    /// Mutable form of [`InteractableWorld::interactable`].
    fn interactable_mut(&mut self, id: ObjectId) -> Option<&mut dyn Interactable>;
    /// Removes an object after an interaction consumed it.
    fn despawn(&mut self, id: ObjectId);
    /// Advances per-object animation.
    fn advance(&mut self, _dt: f32) {}
}

/// The object currently resolved under the reticle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionCandidate {
    /// Object under the reticle.
    pub target: ObjectId,
    /// Its prompt text.
    pub prompt: String,
    /// Whether interacting would currently do anything.
    pub can_interact_now: bool,
}

/// Change in the targeted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionNotice {
    /// A new candidate was targeted.
    Enter(InteractionCandidate),
    /// The previous candidate was lost.
    Exit(ObjectId),
}

/// Result of an interact request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractAttempt {
    /// Nothing is targeted.
    NoTarget,
    /// The candidate declined at invocation time.
    Refused,
    /// The interaction ran.
    Used(InteractOutcome),
}

/// Edge-triggered resolver for the reticle candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTargeter {
    current: Option<InteractionCandidate>,
}

impl InteractionTargeter {
    /// Targeter with no candidate.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Current candidate.
    #[must_use]
    pub const fn current(&self) -> Option<&InteractionCandidate> {
        self.current.as_ref()
    }

    /// Re-resolves the candidate from this tick's ray hit.
    ///
    /// Returns zero, one or two notices; when the candidate changes identity
    /// the exit for the old one precedes the enter for the new one.
    pub fn update(
        &mut self,
        hit: Option<RayHit>,
        world: &dyn InteractableWorld,
    ) -> Vec<InteractionNotice> {
        let resolved = hit.and_then(|hit| {
            world
                .interactable(hit.object)
                .map(|capability| (hit.object, capability))
        });

        let mut notices = Vec::new();
        match resolved {
            None => notices.extend(self.clear()),
            Some((object, _)) if self.current.as_ref().is_some_and(|c| c.target == object) => {}
            Some((object, capability)) => {
                notices.extend(self.clear());
                let candidate = InteractionCandidate {
                    target: object,
                    prompt: capability.prompt(),
                    can_interact_now: capability.can_interact_now(),
                };
                debug!("interaction enter {:?} ({})", object, candidate.prompt);
                self.current = Some(candidate.clone());
                notices.push(InteractionNotice::Enter(candidate));
            }
        }
        notices
    }

    /// Drops the current candidate, returning its exit notice.
    pub fn clear(&mut self) -> Option<InteractionNotice> {
        self.current.take().map(|old| {
            debug!("interaction exit {:?}", old.target);
            InteractionNotice::Exit(old.target)
        })
    }

    /// Delegates to the held candidate's capability.
    ///
    /// Interactability is re-checked now rather than trusted from the last
    /// enter notice. An object consumed by the interaction is despawned and
    /// its exit notice returned alongside the attempt.
    pub fn interact(
        &mut self,
        world: &mut dyn InteractableWorld,
        actor: &mut InteractionActor<'_>,
    ) -> (InteractAttempt, Option<InteractionNotice>) {
        let Some(target) = self.current.as_ref().map(|c| c.target) else {
            return (InteractAttempt::NoTarget, None);
        };
        let Some(capability) = world.interactable_mut(target) else {
            return (InteractAttempt::NoTarget, self.clear());
        };
        if !capability.can_interact_now() {
            debug!("interaction with {target:?} refused");
            return (InteractAttempt::Refused, None);
        }

        let outcome = capability.interact(actor);
        let refreshed = capability.prompt();
        let ready = capability.can_interact_now();
        match outcome {
            InteractOutcome::Despawn => {
                world.despawn(target);
                (InteractAttempt::Used(outcome), self.clear())
            }
            InteractOutcome::Keep => {
                if let Some(current) = self.current.as_mut() {
                    current.prompt = refreshed;
                    current.can_interact_now = ready;
                }
                (InteractAttempt::Used(outcome), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FearConfig;
    use crate::interactables::{InteractableObject, InteractableRegistry};
    use rstest::{fixture, rstest};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Lever {
        ready: Arc<AtomicBool>,
    }

    impl Interactable for Lever {
        fn prompt(&self) -> String {
            "Pull".to_owned()
        }

        fn can_interact_now(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn interact(&mut self, _actor: &mut InteractionActor<'_>) -> InteractOutcome {
            InteractOutcome::Keep
        }
    }

    #[fixture]
    fn world() -> InteractableRegistry {
        let mut world = InteractableRegistry::default();
        world.insert(ObjectId(1), InteractableObject::new("Inspect"));
        world.insert(ObjectId(2), InteractableObject::new("Inspect"));
        world
    }

    fn hit(id: u64) -> Option<RayHit> {
        Some(RayHit {
            object: ObjectId(id),
            distance: 1.0,
        })
    }

    fn enter(id: u64) -> InteractionNotice {
        InteractionNotice::Enter(InteractionCandidate {
            target: ObjectId(id),
            prompt: "Inspect".to_owned(),
            can_interact_now: true,
        })
    }

    #[rstest]
    fn notices_fire_once_per_identity_change(world: InteractableRegistry) {
        let mut targeter = InteractionTargeter::new();
        let ticks = [hit(1), hit(1), hit(2), None, hit(1)];
        let notices: Vec<_> = ticks
            .into_iter()
            .flat_map(|h| targeter.update(h, &world))
            .collect();
        assert_eq!(
            notices,
            vec![
                enter(1),
                InteractionNotice::Exit(ObjectId(1)),
                enter(2),
                InteractionNotice::Exit(ObjectId(2)),
                enter(1),
            ]
        );
    }

    #[rstest]
    fn shared_prompt_still_switches_by_identity(world: InteractableRegistry) {
        let mut targeter = InteractionTargeter::new();
        targeter.update(hit(1), &world);
        let notices = targeter.update(hit(2), &world);
        assert_eq!(notices.len(), 2);
    }

    #[rstest]
    fn non_interactable_hit_counts_as_miss(world: InteractableRegistry) {
        let mut targeter = InteractionTargeter::new();
        targeter.update(hit(1), &world);
        assert_eq!(
            targeter.update(hit(99), &world),
            vec![InteractionNotice::Exit(ObjectId(1))]
        );
        assert!(targeter.update(hit(99), &world).is_empty());
    }

    #[rstest]
    fn interact_rechecks_availability(mut world: InteractableRegistry) {
        let ready = Arc::new(AtomicBool::new(true));
        world.insert(
            ObjectId(7),
            Lever {
                ready: Arc::clone(&ready),
            },
        );
        let mut targeter = InteractionTargeter::new();
        let mut fear = FearMeter::new(&FearConfig::default());
        let notices = targeter.update(hit(7), &world);
        assert!(matches!(
            notices.as_slice(),
            [InteractionNotice::Enter(InteractionCandidate { can_interact_now: true, .. })]
        ));
        ready.store(false, Ordering::SeqCst);
        let mut actor = InteractionActor {
            fear: &mut fear,
            inventory: None,
            ui: None,
            message_seconds: 1.0,
        };
        let (attempt, notice) = targeter.interact(&mut world, &mut actor);
        assert_eq!(attempt, InteractAttempt::Refused);
        assert!(notice.is_none());
    }

    #[rstest]
    fn interact_without_target_is_noop(mut world: InteractableRegistry) {
        let mut targeter = InteractionTargeter::new();
        let mut fear = FearMeter::new(&FearConfig::default());
        let mut actor = InteractionActor {
            fear: &mut fear,
            inventory: None,
            ui: None,
            message_seconds: 1.0,
        };
        assert_eq!(
            targeter.interact(&mut world, &mut actor).0,
            InteractAttempt::NoTarget
        );
    }
}
