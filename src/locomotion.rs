//! Grounded/airborne, crouch and run state machine.
//!
//! Each tick resolves exactly one [`LocomotionState`] from the ground query,
//! the crouch latch, input magnitude and the stamina run permission, in that
//! order of precedence. The resulting speed, vertical velocity and footstep
//! cadence are reported in a [`LocomotionStep`].

use glam::Vec3;
use log::debug;

use crate::config::LocomotionConfig;
use crate::input::InputFrame;

/// Movement state resolved for a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    /// Grounded without movement input.
    #[default]
    Idle,
    /// Grounded at walking speed.
    Walking,
    /// Grounded at running speed.
    Running,
    /// Moving with the crouch latch set.
    Crouching,
    /// Off the ground.
    Airborne,
}

/// Outcome of [`Locomotion::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionStep {
    /// State after the step.
    pub state: LocomotionState,
    /// Horizontal speed used this tick, in metres per second.
    pub speed: f32,
    /// World-space displacement to hand to the physics collaborator.
    pub displacement: Vec3,
    /// `true` when a footstep should sound this tick.
    pub footstep: bool,
    /// Whether a jump launched this step.
    pub jumped: bool,
}

/// Inputs to a locomotion step that come from other subsystems.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Seconds since the last step.
    pub dt: f32,
    /// Ground probe result.
    pub grounded: bool,
    /// Run permission from the stamina meter.
    pub can_sustain_run: bool,
    /// Movement direction on the ground plane, scaled by the input
    /// magnitude (at most unit length).
    pub direction: Vec3,
}

/// Character locomotion state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Locomotion {
    config: LocomotionConfig,
    state: LocomotionState,
    crouched: bool,
    vertical_velocity: f32,
    /// Horizontal speed carried into the air from the last grounded tick.
    air_speed: f32,
    elapsed: f32,
    last_footstep: f32,
}

impl Locomotion {
    /// Idle locomotion with no vertical velocity.
    #[must_use]
    pub fn new(config: LocomotionConfig) -> Self {
        let air_speed = config.walk_speed;
        Self {
            config,
            state: LocomotionState::Idle,
            crouched: false,
            vertical_velocity: 0.0,
            air_speed,
            elapsed: 0.0,
            last_footstep: f32::NEG_INFINITY,
        }
    }

    /// Launch speed for the configured jump height and gravity.
    #[must_use]
    pub fn jump_velocity(&self) -> f32 {
        jump_velocity(self.config.jump_height, self.config.gravity)
    }

    /// Resolves this tick's state and motion.
    pub fn step(&mut self, input: &InputFrame, ctx: StepContext) -> LocomotionStep {
        let dt = ctx.dt.max(0.0);
        self.elapsed += dt;
        let previous = self.state;

        self.update_vertical(ctx.grounded, dt);

        if input.crouch_pressed {
            if ctx.grounded {
                self.crouched = !self.crouched;
                debug!("crouch latch -> {}", self.crouched);
            } else {
                debug!("crouch ignored while airborne");
            }
        }

        let magnitude = input.move_magnitude();
        let moving = magnitude > self.config.move_epsilon;
        let state = if !ctx.grounded {
            LocomotionState::Airborne
        } else if !moving {
            LocomotionState::Idle
        } else if input.run_held && ctx.can_sustain_run && !self.crouched {
            LocomotionState::Running
        } else if self.crouched {
            LocomotionState::Crouching
        } else {
            LocomotionState::Walking
        };

        let mut jumped = false;
        if input.jump_pressed && ctx.grounded && !self.crouched {
            self.vertical_velocity = self.jump_velocity();
            jumped = true;
            debug!("jump at {:.3} m/s", self.vertical_velocity);
        }

        let speed = match state {
            LocomotionState::Idle => 0.0,
            LocomotionState::Walking => self.config.walk_speed,
            LocomotionState::Running => self.config.run_speed,
            LocomotionState::Crouching => self.config.crouch_speed,
            LocomotionState::Airborne => self.air_speed,
        };
        if ctx.grounded && state != LocomotionState::Idle {
            self.air_speed = speed;
        } else if ctx.grounded {
            self.air_speed = self.config.walk_speed;
        }

        let footstep = ctx.grounded && moving && self.footstep_due(state);

        if state != previous {
            debug!("locomotion {previous:?} -> {state:?}");
        }
        self.state = state;

        let horizontal = if moving { ctx.direction * speed } else { Vec3::ZERO };
        LocomotionStep {
            state,
            speed,
            displacement: (horizontal + Vec3::Y * self.vertical_velocity) * dt,
            footstep,
            jumped,
        }
    }

    fn update_vertical(&mut self, grounded: bool, dt: f32) {
        if grounded {
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = self.config.grounded_bias;
            }
        } else {
            self.vertical_velocity += self.config.gravity * dt;
        }
    }

    fn footstep_due(&mut self, state: LocomotionState) -> bool {
        let interval = match state {
            LocomotionState::Running => self.config.run_step_interval,
            LocomotionState::Crouching => self.config.crouch_step_interval,
            LocomotionState::Walking => self.config.walk_step_interval,
            LocomotionState::Idle | LocomotionState::Airborne => return false,
        };
        if self.elapsed - self.last_footstep >= interval {
            self.last_footstep = self.elapsed;
            true
        } else {
            false
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LocomotionState {
        self.state
    }

    /// Whether the crouch latch is set.
    #[must_use]
    pub const fn is_crouched(&self) -> bool {
        self.crouched
    }

    /// Current vertical velocity.
    #[must_use]
    pub const fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Movement tuning.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }
}

/// Closed-form launch speed `sqrt(2 h |g|)` reaching `jump_height` under
/// `gravity`.
///
/// ```
/// let v = dread::locomotion::jump_velocity(1.5, -20.0);
/// assert!((v - 7.745_967).abs() < 1e-4);
/// ```
#[must_use]
pub fn jump_velocity(jump_height: f32, gravity: f32) -> f32 {
    (2.0 * jump_height.max(0.0) * gravity.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn locomotion() -> Locomotion {
        Locomotion::new(LocomotionConfig::default())
    }

    fn grounded(dt: f32) -> StepContext {
        StepContext {
            dt,
            grounded: true,
            can_sustain_run: true,
            direction: Vec3::NEG_Z,
        }
    }

    fn airborne(dt: f32) -> StepContext {
        StepContext {
            grounded: false,
            ..grounded(dt)
        }
    }

    fn crouch() -> InputFrame {
        InputFrame {
            crouch_pressed: true,
            ..InputFrame::default()
        }
    }

    #[rstest]
    #[case(InputFrame::default(), LocomotionState::Idle)]
    #[case(InputFrame::forward(), LocomotionState::Walking)]
    #[case(InputFrame::forward().running(), LocomotionState::Running)]
    fn grounded_states(mut locomotion: Locomotion, #[case] input: InputFrame, #[case] expected: LocomotionState) {
        assert_eq!(locomotion.step(&input, grounded(0.016)).state, expected);
    }

    #[rstest]
    fn ground_loss_overrides_input(mut locomotion: Locomotion) {
        let step = locomotion.step(&InputFrame::forward().running(), airborne(0.016));
        assert_eq!(step.state, LocomotionState::Airborne);
    }

    #[rstest]
    fn run_refused_without_permission(mut locomotion: Locomotion) {
        let ctx = StepContext {
            can_sustain_run: false,
            ..grounded(0.016)
        };
        assert_eq!(
            locomotion.step(&InputFrame::forward().running(), ctx).state,
            LocomotionState::Walking
        );
    }

    #[rstest]
    fn crouching_while_running_drops_to_crouch_speed(mut locomotion: Locomotion) {
        locomotion.step(&InputFrame::forward().running(), grounded(0.016));
        let input = InputFrame {
            crouch_pressed: true,
            ..InputFrame::forward().running()
        };
        let step = locomotion.step(&input, grounded(0.016));
        assert_eq!(step.state, LocomotionState::Crouching);
        assert_relative_eq!(step.speed, crate::CROUCH_SPEED);
    }

    #[rstest]
    fn crouch_latches_until_toggled(mut locomotion: Locomotion) {
        locomotion.step(&crouch(), grounded(0.016));
        assert!(locomotion.is_crouched());
        locomotion.step(&InputFrame::forward(), grounded(0.016));
        assert!(locomotion.is_crouched());
        locomotion.step(&crouch(), grounded(0.016));
        assert!(!locomotion.is_crouched());
    }

    #[rstest]
    fn crouch_ignored_mid_air(mut locomotion: Locomotion) {
        locomotion.step(&crouch(), airborne(0.016));
        assert!(!locomotion.is_crouched());
        locomotion.step(&InputFrame::default(), grounded(0.016));
        assert!(!locomotion.is_crouched(), "request is not buffered");
    }

    #[rstest]
    #[case(0.001)]
    #[case(0.016)]
    #[case(0.25)]
    fn jump_velocity_is_tick_independent(#[case] dt: f32) {
        let mut locomotion = Locomotion::new(LocomotionConfig {
            jump_height: 1.5,
            gravity: -20.0,
            ..LocomotionConfig::default()
        });
        let input = InputFrame {
            jump_pressed: true,
            ..InputFrame::default()
        };
        let step = locomotion.step(&input, grounded(dt));
        assert!(step.jumped);
        assert_relative_eq!(locomotion.vertical_velocity(), 7.745_967, epsilon = 1e-4);
    }

    #[rstest]
    fn cannot_jump_while_crouched(mut locomotion: Locomotion) {
        locomotion.step(&crouch(), grounded(0.016));
        let input = InputFrame {
            jump_pressed: true,
            ..InputFrame::default()
        };
        assert!(!locomotion.step(&input, grounded(0.016)).jumped);
    }

    #[rstest]
    fn gravity_accumulates_then_resets_to_bias(mut locomotion: Locomotion) {
        locomotion.step(&InputFrame::default(), airborne(0.1));
        locomotion.step(&InputFrame::default(), airborne(0.1));
        assert_relative_eq!(locomotion.vertical_velocity(), -4.0, epsilon = 1e-5);
        locomotion.step(&InputFrame::default(), grounded(0.1));
        assert_relative_eq!(locomotion.vertical_velocity(), crate::GROUNDED_BIAS);
    }

    #[rstest]
    #[case(InputFrame::forward(), 0.5)]
    #[case(InputFrame::forward().running(), 0.3)]
    fn footstep_cadence_follows_elapsed_time(#[case] input: InputFrame, #[case] interval: f32) {
        let mut locomotion = Locomotion::new(LocomotionConfig::default());
        let dt = 0.05;
        let ticks: u16 = 40;
        let steps = (0..ticks)
            .filter(|_| locomotion.step(&input, grounded(dt)).footstep)
            .count();
        let seconds = f32::from(ticks) * dt;
        let expected = (seconds / interval).ceil();
        let counted = f32::from(u16::try_from(steps).expect("step count fits u16"));
        assert!((counted - expected).abs() <= 1.0, "{counted} steps, expected about {expected}");
    }

    #[rstest]
    fn crouched_steps_are_the_slowest(mut locomotion: Locomotion) {
        let first = InputFrame {
            crouch_pressed: true,
            ..InputFrame::forward()
        };
        let steps: Vec<usize> = (0..12)
            .filter(|&tick| {
                let input = if tick == 0 { first } else { InputFrame::forward() };
                let step = locomotion.step(&input, grounded(0.25));
                assert_eq!(step.state, LocomotionState::Crouching);
                step.footstep
            })
            .collect();
        // 0.75 s after a step is too soon at crouch cadence; 1.0 s is due.
        assert_eq!(steps, vec![0, 4, 8]);
    }

    #[rstest]
    fn slow_ticks_still_step_by_elapsed_time() {
        let mut locomotion = Locomotion::new(LocomotionConfig::default());
        assert!(locomotion.step(&InputFrame::forward(), grounded(0.1)).footstep);
        assert!(!locomotion.step(&InputFrame::forward(), grounded(0.1)).footstep);
        assert!(locomotion.step(&InputFrame::forward(), grounded(1.0)).footstep);
    }

    #[rstest]
    fn no_footsteps_when_idle_or_airborne(mut locomotion: Locomotion) {
        assert!(!locomotion.step(&InputFrame::default(), grounded(1.0)).footstep);
        assert!(!locomotion.step(&InputFrame::forward(), airborne(1.0)).footstep);
    }
}
