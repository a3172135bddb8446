//! The owned per-character simulation.
//!
//! [`Character`] bundles the meters, locomotion, look, targeting, fear
//! feedback and ambient scheduler for a single player character and advances
//! them synchronously in [`Character::tick`]. Collaborators are passed in
//! explicitly on every call through [`Collaborators`]; nothing is looked up
//! globally.
//!
//! Tick order:
//! 1. look delta and ground query
//! 2. locomotion, reading the run permission from the previous tick
//! 3. physics move, then stamina and fear meters
//! 4. footsteps, head bob and the flashlight latch
//! 5. interaction targeting and any interact request
//! 6. ambient scheduler poll
//! 7. fear feedback from the resulting fear level

use glam::{Vec2, Vec3};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{self, AudioMixer, ChannelName, ClipId, ClipPool};
use crate::config::CharacterConfig;
use crate::feedback::{AudioFeedbackState, FearFeedbackRouter, ScareKind, ScareSounds};
use crate::input::InputFrame;
use crate::interaction::{
    InteractAttempt, InteractOutcome, InteractableWorld, InteractionActor, InteractionCandidate,
    InteractionNotice, InteractionTargeter, Inventory, Ui,
};
use crate::locomotion::{Locomotion, LocomotionState, LocomotionStep, StepContext};
use crate::look::{HeadBob, LookController};
use crate::meter::{FearEvent, FearMeter, StaminaMeter};
use crate::physics::{ground_probe, Physics};
use crate::scheduler::{AmbientPlayback, AmbientScheduler, CancelHandle};

/// External systems the character talks to during a tick.
pub struct Collaborators<'a> {
    /// Ground probe, reticle ray and capsule movement.
    pub physics: &'a dyn Physics,
    /// Lookup for the objects the reticle can hit.
    pub world: &'a mut dyn InteractableWorld,
    /// Mixer for every sound the character makes.
    pub audio: Option<&'a mut dyn AudioMixer>,
    /// Prompt and message display.
    pub ui: Option<&'a mut dyn Ui>,
    /// Receives picked-up items.
    pub inventory: Option<&'a mut dyn Inventory>,
}

impl<'a> Collaborators<'a> {
    /// Collaborators with only the mandatory physics and world seams.
    #[must_use]
    pub fn new(physics: &'a dyn Physics, world: &'a mut dyn InteractableWorld) -> Self {
        Self {
            physics,
            world,
            audio: None,
            ui: None,
            inventory: None,
        }
    }

    /// Attaches a mixer.
    #[must_use]
    pub fn with_audio(mut self, audio: &'a mut dyn AudioMixer) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Attaches a UI.
    #[must_use]
    pub fn with_ui(mut self, ui: &'a mut dyn Ui) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Attaches an inventory.
    #[must_use]
    pub fn with_inventory(mut self, inventory: &'a mut dyn Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    fn mixer(&mut self) -> Option<&mut dyn AudioMixer> {
        audio::reborrow(&mut self.audio)
    }

    fn ui(&mut self) -> Option<&mut dyn Ui> {
        self.ui.as_deref_mut().map(|ui| ui as &mut dyn Ui)
    }
}

/// Everything observable that happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Locomotion outcome for the tick.
    pub step: LocomotionStep,
    /// Ground probe result at the start of the tick.
    pub grounded: bool,
    /// Candidate enter and exit changes, in order.
    pub notices: Vec<InteractionNotice>,
    /// Result of an interact press, if there was one.
    pub interaction: Option<InteractAttempt>,
    /// Ambient clip that fired this tick.
    pub ambient: Option<AmbientPlayback>,
    /// Heartbeat and shake after the update.
    pub feedback: AudioFeedbackState,
}

/// A single first-person character.
#[derive(Debug)]
pub struct Character {
    config: CharacterConfig,
    position: Vec3,
    grounded: bool,
    look: LookController,
    head_bob: HeadBob,
    locomotion: Locomotion,
    stamina: StaminaMeter,
    fear: FearMeter,
    targeter: InteractionTargeter,
    feedback: FearFeedbackRouter,
    feedback_state: AudioFeedbackState,
    scares: ScareSounds,
    ambient: AmbientScheduler,
    footsteps: ClipPool,
    flashlight_click: Option<ClipId>,
    flashlight_on: bool,
    rng: StdRng,
    shut_down: bool,
}

impl Character {
    /// Spawns a character at `position`. `seed` drives every random choice,
    /// so equal seeds replay identically.
    #[must_use]
    pub fn new(config: CharacterConfig, position: Vec3, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let ambient = AmbientScheduler::new(config.ambient.clone(), rng.gen());
        let feedback = FearFeedbackRouter::new(config.heartbeat.clone(), config.shake.clone());
        let feedback_state = feedback.state();
        let footsteps = ClipPool::from_names(config.footstep_clips.iter().cloned());
        if footsteps.is_empty() {
            debug!("no footstep clips configured");
        }
        info!("character spawned at {position}");
        Self {
            position,
            grounded: false,
            look: LookController::new(&config.look),
            head_bob: HeadBob::new(config.head_bob.clone()),
            locomotion: Locomotion::new(config.locomotion.clone()),
            stamina: StaminaMeter::new(&config.stamina),
            fear: FearMeter::new(&config.fear),
            targeter: InteractionTargeter::new(),
            feedback,
            feedback_state,
            scares: ScareSounds::new(config.scare.clone()),
            ambient,
            footsteps,
            flashlight_click: config.flashlight_click.clone().map(ClipId),
            flashlight_on: false,
            rng,
            shut_down: false,
            config,
        }
    }

    /// Advances the simulation by `seconds`.
    ///
    /// After [`Character::shutdown`] the call does nothing and reports the
    /// last known state.
    pub fn tick(&mut self, seconds: f32, input: &InputFrame, collab: &mut Collaborators<'_>) -> TickReport {
        let dt = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if self.shut_down {
            trace!("tick after shutdown ignored");
            return self.idle_report();
        }

        self.look.apply(input.look_delta);
        let loco = &self.config.locomotion;
        let probe = ground_probe(self.position, loco.height, loco.ground_probe_radius);
        self.grounded = collab.physics.is_grounded(probe, loco.ground_probe_radius);

        let direction = self
            .look
            .planar_direction(input.move_axis.clamp_length_max(1.0));
        let step = self.locomotion.step(
            input,
            StepContext {
                dt,
                grounded: self.grounded,
                can_sustain_run: self.stamina.can_sustain_run(),
                direction,
            },
        );
        self.position = collab.physics.move_character(self.position, step.displacement);

        self.stamina.tick(dt, step.state == LocomotionState::Running);
        self.fear.tick(dt);

        if step.footstep {
            self.play_footstep(collab.mixer());
        }
        let moving = !matches!(step.state, LocomotionState::Idle | LocomotionState::Airborne);
        self.head_bob
            .update(dt, self.grounded, moving, step.state == LocomotionState::Running);
        if input.flashlight_pressed {
            self.toggle_flashlight(collab.mixer());
        }

        collab.world.advance(dt);
        let (notices, interaction) = self.update_interaction(input, collab);

        let ambient = self.ambient.poll(dt, collab.mixer());
        if let Some(event) = ambient.as_ref().and_then(|playback| playback.fear) {
            self.fear.apply(event);
        }

        self.feedback_state = self.feedback.update(self.fear.level(), dt, collab.mixer());

        TickReport {
            step,
            grounded: self.grounded,
            notices,
            interaction,
            ambient,
            feedback: self.feedback_state,
        }
    }

    fn idle_report(&self) -> TickReport {
        TickReport {
            step: LocomotionStep {
                state: self.locomotion.state(),
                speed: 0.0,
                displacement: Vec3::ZERO,
                footstep: false,
                jumped: false,
            },
            grounded: self.grounded,
            notices: Vec::new(),
            interaction: None,
            ambient: None,
            feedback: self.feedback_state,
        }
    }

    fn play_footstep(&mut self, mixer: Option<&mut dyn AudioMixer>) {
        let Some(channel) = mixer.and_then(|m| m.channel(ChannelName::Player)) else {
            return;
        };
        let Some(clip) = self.footsteps.choose(&mut self.rng) else {
            return;
        };
        let loco = &self.config.locomotion;
        let pitch = audio::draw_between(&mut self.rng, loco.footstep_pitch_min, loco.footstep_pitch_max);
        channel.set_pitch(pitch);
        channel.play_one_shot(clip, loco.footstep_volume);
    }

    fn toggle_flashlight(&mut self, mixer: Option<&mut dyn AudioMixer>) {
        self.flashlight_on = !self.flashlight_on;
        debug!("flashlight {}", if self.flashlight_on { "on" } else { "off" });
        if let (Some(channel), Some(clip)) = (
            mixer.and_then(|m| m.channel(ChannelName::Player)),
            self.flashlight_click.as_ref(),
        ) {
            channel.set_pitch(1.0);
            channel.play_one_shot(clip, 1.0);
        }
    }

    fn update_interaction(
        &mut self,
        input: &InputFrame,
        collab: &mut Collaborators<'_>,
    ) -> (Vec<InteractionNotice>, Option<InteractAttempt>) {
        let hit = collab.physics.raycast_forward(
            self.eye_position(),
            self.look.eye_forward(),
            self.config.interaction.range,
        );
        let mut notices = self.targeter.update(hit, &*collab.world);
        route_notices(&notices, collab.ui());

        if !input.interact_pressed {
            return (notices, None);
        }

        let before = self.targeter.current().map(|c| c.prompt.clone());
        let mut actor = InteractionActor {
            fear: &mut self.fear,
            inventory: collab.inventory.as_deref_mut().map(|inv| inv as &mut dyn Inventory),
            ui: collab.ui.as_deref_mut().map(|ui| ui as &mut dyn Ui),
            message_seconds: self.config.interaction.message_seconds,
        };
        let (attempt, lost) = self.targeter.interact(&mut *collab.world, &mut actor);
        debug!("interact -> {attempt:?}");

        if let Some(notice) = lost {
            route_notices(std::slice::from_ref(&notice), collab.ui());
            notices.push(notice);
        } else if attempt == InteractAttempt::Used(InteractOutcome::Keep) {
            let after = self.targeter.current().map(|c| c.prompt.clone());
            if let (Some(prompt), Some(ui)) = (after.filter(|p| Some(p) != before.as_ref()), collab.ui()) {
                ui.show_prompt(&prompt);
            }
        }
        (notices, Some(attempt))
    }

    /// Feeds a discrete fear bump into the fear meter.
    pub fn apply_fear_event(&mut self, event: FearEvent) {
        self.fear.apply(event);
    }

    fn scare(&mut self, kind: ScareKind, mixer: Option<&mut dyn AudioMixer>) -> Option<FearEvent> {
        let event = self.scares.play(kind, mixer, &mut self.rng)?;
        self.apply_fear_event(event);
        Some(event)
    }

    /// Plays a random scare clip and bumps fear by the scare amount.
    pub fn play_scare(&mut self, mixer: Option<&mut dyn AudioMixer>) -> Option<FearEvent> {
        self.scare(ScareKind::Scare, mixer)
    }

    /// Plays a whisper and applies its fear.
    pub fn play_whisper(&mut self, mixer: Option<&mut dyn AudioMixer>) -> Option<FearEvent> {
        self.scare(ScareKind::Whisper, mixer)
    }

    /// Plays an unseen footstep and applies its fear.
    pub fn play_footstep_scare(&mut self, mixer: Option<&mut dyn AudioMixer>) -> Option<FearEvent> {
        self.scare(ScareKind::FootstepScare, mixer)
    }

    /// Plays `clip` as a positional sound `distance` metres away; nearer
    /// sounds frighten more.
    pub fn play_proximity(
        &mut self,
        clip: &ClipId,
        distance: f32,
        volume: f32,
        mixer: Option<&mut dyn AudioMixer>,
    ) -> Option<FearEvent> {
        let event = self.scares.play_proximity(clip, distance, volume, mixer)?;
        self.apply_fear_event(event);
        Some(event)
    }

    /// Sets the ambient volume and forwards it to the channel.
    pub fn set_ambient_volume(&mut self, volume: f32, mixer: Option<&mut dyn AudioMixer>) {
        self.ambient.set_volume(volume, mixer);
    }

    /// Sets the scare volume and forwards it to the channel.
    pub fn set_scare_volume(&mut self, volume: f32, mixer: Option<&mut dyn AudioMixer>) {
        self.scares.set_volume(volume, mixer);
    }

    /// Tears the character down: cancels the ambient task, fades the
    /// heartbeat out and stops the ambient channel. Safe to call repeatedly.
    pub fn shutdown(&mut self, mut mixer: Option<&mut dyn AudioMixer>) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.ambient.cancel();
        self.feedback.silence(audio::reborrow(&mut mixer));
        self.feedback_state = self.feedback.state();
        if let Some(channel) = mixer.and_then(|m| m.channel(ChannelName::Ambient)) {
            channel.stop();
        }
        info!("character shut down");
    }

    /// Whether [`Character::shutdown`] has run.
    #[must_use]
    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Capsule centre in world space.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Camera position before head bob and shake.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        let loco = &self.config.locomotion;
        self.position + Vec3::Y * (loco.eye_height - loco.height * 0.5)
    }

    /// Combined head bob and fear shake applied to the camera.
    #[must_use]
    pub fn camera_offset(&self) -> Vec3 {
        self.head_bob.offset() + self.feedback_state.shake_offset
    }

    /// Camera yaw and pitch in degrees.
    #[must_use]
    pub const fn look_angles(&self) -> Vec2 {
        Vec2::new(self.look.yaw(), self.look.pitch())
    }

    /// Current locomotion state.
    #[must_use]
    pub const fn state(&self) -> LocomotionState {
        self.locomotion.state()
    }

    /// Vertical velocity in metres per second; positive is up.
    #[must_use]
    pub const fn vertical_velocity(&self) -> f32 {
        self.locomotion.vertical_velocity()
    }

    /// Ground probe result from the last tick.
    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the crouch latch is set.
    #[must_use]
    pub const fn is_crouched(&self) -> bool {
        self.locomotion.is_crouched()
    }

    /// Stamina as a fraction of its maximum.
    #[must_use]
    pub const fn stamina_percentage(&self) -> f32 {
        self.stamina.percentage()
    }

    /// Whether running is currently permitted.
    #[must_use]
    pub const fn can_sustain_run(&self) -> bool {
        self.stamina.can_sustain_run()
    }

    /// Fear as a fraction of its maximum.
    #[must_use]
    pub const fn fear_percentage(&self) -> f32 {
        self.fear.level()
    }

    /// Stamina meter.
    #[must_use]
    pub const fn stamina(&self) -> &StaminaMeter {
        &self.stamina
    }

    /// Fear meter.
    #[must_use]
    pub const fn fear(&self) -> &FearMeter {
        &self.fear
    }

    /// Heartbeat and shake as of the last tick.
    #[must_use]
    pub const fn feedback_state(&self) -> AudioFeedbackState {
        self.feedback_state
    }

    /// Whether the flashlight is lit.
    #[must_use]
    pub const fn flashlight_on(&self) -> bool {
        self.flashlight_on
    }

    /// Object under the reticle, if any.
    #[must_use]
    pub const fn candidate(&self) -> Option<&InteractionCandidate> {
        self.targeter.current()
    }

    /// Handle that cancels the ambient task, if one is running.
    #[must_use]
    pub fn ambient_cancel_handle(&self) -> Option<CancelHandle> {
        self.ambient.cancel_handle()
    }

    /// Whether the ambient task is still scheduled.
    #[must_use]
    pub fn ambient_active(&self) -> bool {
        self.ambient.is_active()
    }

    /// Tuning the character was built with.
    #[must_use]
    pub const fn config(&self) -> &CharacterConfig {
        &self.config
    }
}

impl Drop for Character {
    fn drop(&mut self) {
        self.ambient.cancel();
    }
}

fn route_notices(notices: &[InteractionNotice], target: Option<&mut dyn Ui>) {
    let Some(ui) = target else {
        if !notices.is_empty() {
            trace!("no ui attached for {} interaction notices", notices.len());
        }
        return;
    };
    for notice in notices {
        match notice {
            InteractionNotice::Enter(candidate) => ui.show_prompt(&candidate.prompt),
            InteractionNotice::Exit(_) => ui.hide_prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioChannel;
    use crate::config::AmbientConfig;
    use crate::interactables::{Door, InteractableRegistry};
    use crate::meter::FearSource;
    use crate::physics::{ObjectId, RayHit};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    struct Floor {
        target: Option<ObjectId>,
    }

    impl Physics for Floor {
        fn is_grounded(&self, _position: Vec3, _radius: f32) -> bool {
            true
        }

        fn raycast_forward(&self, _origin: Vec3, _direction: Vec3, _max_range: f32) -> Option<RayHit> {
            self.target.map(|object| RayHit {
                object,
                distance: 1.0,
            })
        }
    }

    #[derive(Default)]
    struct Log(Vec<String>);

    impl AudioChannel for Log {
        fn set_volume(&mut self, _volume: f32) {}
        fn set_pitch(&mut self, _pitch: f32) {}
        fn play_one_shot(&mut self, clip: &ClipId, _volume: f32) {
            self.0.push(format!("one_shot {clip}"));
        }
        fn play_looping(&mut self, clip: &ClipId) {
            self.0.push(format!("loop {clip}"));
        }
        fn stop(&mut self) {
            self.0.push("stop".to_owned());
        }
        fn fade_out(&mut self, _seconds: f32) {
            self.0.push("fade_out".to_owned());
        }
    }

    #[derive(Default)]
    struct Mixer {
        ambient: Log,
        heartbeat: Log,
    }

    impl AudioMixer for Mixer {
        fn channel(&mut self, name: ChannelName) -> Option<&mut dyn AudioChannel> {
            match name {
                ChannelName::Ambient => Some(&mut self.ambient),
                ChannelName::Heartbeat => Some(&mut self.heartbeat),
                ChannelName::Scare | ChannelName::Player => None,
            }
        }
    }

    #[derive(Default)]
    struct Prompts(Vec<String>);

    impl Ui for Prompts {
        fn show_prompt(&mut self, text: &str) {
            self.0.push(format!("show {text}"));
        }
        fn hide_prompt(&mut self) {
            self.0.push("hide".to_owned());
        }
        fn show_transient_message(&mut self, text: &str, _seconds: f32) {
            self.0.push(format!("message {text}"));
        }
    }

    #[fixture]
    fn character() -> Character {
        Character::new(CharacterConfig::default(), Vec3::new(0.0, 1.0, 0.0), 11)
    }

    fn run(character: &mut Character, input: InputFrame, ticks: usize) -> Vec<TickReport> {
        let floor = Floor { target: None };
        let mut world = InteractableRegistry::default();
        let mut collab = Collaborators::new(&floor, &mut world);
        (0..ticks)
            .map(|_| character.tick(0.1, &input, &mut collab))
            .collect()
    }

    #[rstest]
    fn walking_moves_along_facing(mut character: Character) {
        run(&mut character, InputFrame::forward(), 10);
        assert_eq!(character.state(), LocomotionState::Walking);
        assert_relative_eq!(character.position().z, -3.0, epsilon = 1e-4);
        assert_relative_eq!(character.position().x, 0.0, epsilon = 1e-4);
    }

    #[rstest]
    fn running_drains_stamina(mut character: Character) {
        run(&mut character, InputFrame::forward().running(), 10);
        assert_eq!(character.state(), LocomotionState::Running);
        assert_relative_eq!(character.stamina_percentage(), 0.8, epsilon = 1e-4);
    }

    #[rstest]
    fn exhaustion_forces_walking(mut character: Character) {
        let reports = run(&mut character, InputFrame::forward().running(), 60);
        assert!(!character.can_sustain_run());
        assert_eq!(reports.last().map(|r| r.step.state), Some(LocomotionState::Walking));
    }

    #[rstest]
    fn fear_bumps_stack(mut character: Character) {
        character.apply_fear_event(FearEvent::new(10.0, FearSource::Scare));
        character.apply_fear_event(FearEvent::new(10.0, FearSource::Whisper));
        assert_relative_eq!(character.fear_percentage(), 0.2);
    }

    #[rstest]
    fn shutdown_is_idempotent_and_silences(mut character: Character) {
        let floor = Floor { target: None };
        let mut world = InteractableRegistry::default();
        let mut mixer = Mixer::default();
        character.apply_fear_event(FearEvent::new(100.0, FearSource::Scare));
        {
            let mut collab = Collaborators::new(&floor, &mut world).with_audio(&mut mixer);
            let report = character.tick(0.016, &InputFrame::default(), &mut collab);
            assert!(report.feedback.heartbeat_active);
        }
        character.shutdown(Some(&mut mixer));
        character.shutdown(Some(&mut mixer));
        assert!(character.is_shut_down());
        assert!(!character.ambient_active());
        assert_eq!(mixer.heartbeat.0, vec!["loop heartbeat", "fade_out"]);
        assert_eq!(mixer.ambient.0, vec!["stop"]);

        let mut collab = Collaborators::new(&floor, &mut world).with_audio(&mut mixer);
        for _ in 0..100 {
            assert!(character.tick(1.0, &InputFrame::default(), &mut collab).ambient.is_none());
        }
    }

    #[rstest]
    fn ambient_playback_reaches_channel() {
        let config = CharacterConfig {
            ambient: AmbientConfig {
                min_interval: 0.45,
                max_interval: 0.45,
                ..AmbientConfig::default()
            },
            ..CharacterConfig::default()
        };
        let mut character = Character::new(config, Vec3::Y, 5);
        let floor = Floor { target: None };
        let mut world = InteractableRegistry::default();
        let mut mixer = Mixer::default();
        let mut collab = Collaborators::new(&floor, &mut world).with_audio(&mut mixer);
        let played = (0..10)
            .filter_map(|_| character.tick(0.1, &InputFrame::default(), &mut collab).ambient)
            .count();
        assert_eq!(played, 2);
        assert_eq!(mixer.ambient.0.len(), 2);
    }

    #[rstest]
    fn door_prompt_follows_interaction(mut character: Character) {
        let floor = Floor {
            target: Some(ObjectId(1)),
        };
        let mut world = InteractableRegistry::default();
        world.insert(ObjectId(1), Door::default());
        let mut ui = Prompts::default();
        {
            let mut collab = Collaborators::new(&floor, &mut world).with_ui(&mut ui);
            character.tick(0.016, &InputFrame::default(), &mut collab);
            character.tick(0.016, &InputFrame::default(), &mut collab);
            let use_door = InputFrame {
                interact_pressed: true,
                ..InputFrame::default()
            };
            let report = character.tick(0.016, &use_door, &mut collab);
            assert_eq!(report.interaction, Some(InteractAttempt::Used(InteractOutcome::Keep)));
        }
        assert_eq!(ui.0, vec!["show Open Door", "show Close Door"]);
    }

    #[rstest]
    fn flashlight_toggles_on_press(mut character: Character) {
        let press = InputFrame {
            flashlight_pressed: true,
            ..InputFrame::default()
        };
        run(&mut character, press, 1);
        assert!(character.flashlight_on());
        run(&mut character, press, 1);
        assert!(!character.flashlight_on());
    }
}
