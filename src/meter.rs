//! Bounded resource meters for stamina and fear.
//!
//! A [`Meter`] saturates silently at `[0, max]`. [`StaminaMeter`] adds the
//! run permission with its hysteresis band, while [`FearMeter`] only ever
//! decays passively and grows through discrete [`FearEvent`]s.

use log::debug;

use crate::config::{FearConfig, StaminaConfig};

/// Direction a meter is pushed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterIntent {
    /// Lower the value at the drain or decay rate.
    Drain,
    /// Raise the value at the regen rate.
    Regen,
    /// Leave the value untouched.
    Hold,
}

/// Bounded scalar with per-second regen and drain rates.
#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    current: f32,
    max: f32,
    regen_rate: f32,
    drain_rate: f32,
    low_threshold: f32,
}

impl Meter {
    /// Creates a meter starting at `initial`, clamped into `[0, max]`.
    ///
    /// A non-positive `max` is raised to `f32::EPSILON` so that
    /// [`Meter::percentage`] stays finite.
    #[must_use]
    pub fn new(initial: f32, max: f32, regen_rate: f32, drain_rate: f32, low_threshold: f32) -> Self {
        let ceiling = max.max(f32::EPSILON);
        Self {
            current: initial.clamp(0.0, ceiling),
            max: ceiling,
            regen_rate: regen_rate.max(0.0),
            drain_rate: drain_rate.max(0.0),
            low_threshold,
        }
    }

    /// Advances the meter by `seconds` in the direction of `intent`.
    pub fn tick(&mut self, seconds: f32, intent: MeterIntent) {
        let dt = seconds.max(0.0);
        let delta = match intent {
            MeterIntent::Drain => -self.drain_rate * dt,
            MeterIntent::Regen => self.regen_rate * dt,
            MeterIntent::Hold => 0.0,
        };
        self.add(delta);
    }

    /// Adds `amount` (which may be negative), saturating at the bounds.
    pub fn add(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Current value.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Fraction of the maximum currently held, in `[0, 1]`.
    #[must_use]
    pub const fn percentage(&self) -> f32 {
        self.current / self.max
    }

    /// Whether the meter sits at or below its low threshold fraction.
    #[must_use]
    pub const fn is_low(&self) -> bool {
        self.percentage() <= self.low_threshold
    }
}

/// Stamina with hysteretic run permission.
///
/// Permission is withdrawn once stamina runs dry while running and only
/// restored after stamina climbs strictly above the minimum run threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct StaminaMeter {
    meter: Meter,
    min_run_threshold: f32,
    can_sustain_run: bool,
}

impl StaminaMeter {
    /// Creates a full stamina meter.
    #[must_use]
    pub fn new(config: &StaminaConfig) -> Self {
        Self {
            meter: Meter::new(
                config.max,
                config.max,
                config.regen_rate,
                config.drain_rate,
                config.low_threshold,
            ),
            min_run_threshold: config.min_run_threshold,
            can_sustain_run: true,
        }
    }

    /// Drains while `running`, otherwise regenerates, then updates the run
    /// permission.
    pub fn tick(&mut self, dt: f32, running: bool) {
        let intent = if running {
            MeterIntent::Drain
        } else {
            MeterIntent::Regen
        };
        self.meter.tick(dt, intent);

        if self.can_sustain_run && running && self.meter.current() <= 0.0 {
            self.can_sustain_run = false;
            debug!("stamina exhausted; running refused");
        } else if !self.can_sustain_run && self.meter.current() > self.min_run_threshold {
            self.can_sustain_run = true;
            debug!("stamina recovered; running permitted");
        }
    }

    /// Whether running is permitted.
    #[must_use]
    pub const fn can_sustain_run(&self) -> bool {
        self.can_sustain_run
    }

    /// Underlying meter.
    #[must_use]
    pub const fn meter(&self) -> &Meter {
        &self.meter
    }

    /// Value as a fraction of the maximum.
    #[must_use]
    pub const fn percentage(&self) -> f32 {
        self.meter.percentage()
    }
}

/// Origin of a discrete fear bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FearSource {
    /// Ambient playback.
    Ambient,
    /// Scripted scare.
    Scare,
    /// Whisper.
    Whisper,
    /// Unseen footstep.
    FootstepScare,
    /// Sound played near the listener.
    ProximityAudio,
    /// World interaction, such as picking up a cursed item.
    Interaction,
}

/// A fear bump, consumed immediately by [`FearMeter::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FearEvent {
    /// Amount added to fear.
    pub magnitude: f32,
    /// What caused it.
    pub source: FearSource,
}

impl FearEvent {
    /// Builds an event.
    #[must_use]
    pub const fn new(magnitude: f32, source: FearSource) -> Self {
        Self { magnitude, source }
    }
}

/// Fear decays passively and rises only through events.
#[derive(Debug, Clone, PartialEq)]
pub struct FearMeter {
    meter: Meter,
}

impl FearMeter {
    /// Creates an empty fear meter.
    #[must_use]
    pub fn new(config: &FearConfig) -> Self {
        Self {
            meter: Meter::new(0.0, config.max, 0.0, config.decay_rate, config.low_threshold),
        }
    }

    /// Passive decay towards zero.
    pub fn tick(&mut self, dt: f32) {
        self.meter.tick(dt, MeterIntent::Drain);
    }

    /// Adds the event's magnitude. Bumps stack without debouncing.
    pub fn apply(&mut self, event: FearEvent) {
        let magnitude = event.magnitude.max(0.0);
        self.meter.add(magnitude);
        debug!(
            "fear +{magnitude:.1} from {:?} -> {:.1}",
            event.source,
            self.meter.current()
        );
    }

    /// Underlying meter.
    #[must_use]
    pub const fn meter(&self) -> &Meter {
        &self.meter
    }

    /// Fear level as a fraction in `[0, 1]`.
    #[must_use]
    pub const fn level(&self) -> f32 {
        self.meter.percentage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn stamina() -> StaminaMeter {
        StaminaMeter::new(&StaminaConfig {
            max: 100.0,
            drain_rate: 50.0,
            regen_rate: 10.0,
            min_run_threshold: 20.0,
            low_threshold: 0.2,
        })
    }

    #[fixture]
    fn fear() -> FearMeter {
        FearMeter::new(&FearConfig {
            max: 100.0,
            decay_rate: 5.0,
            low_threshold: 0.1,
        })
    }

    #[rstest]
    #[case(MeterIntent::Drain, 10.0, 0.0)]
    #[case(MeterIntent::Regen, 10.0, 100.0)]
    #[case(MeterIntent::Hold, 10.0, 50.0)]
    fn meter_saturates_at_bounds(#[case] intent: MeterIntent, #[case] dt: f32, #[case] expected: f32) {
        let mut meter = Meter::new(50.0, 100.0, 30.0, 30.0, 0.2);
        meter.tick(dt, intent);
        assert_relative_eq!(meter.current(), expected);
    }

    #[rstest]
    fn meter_clamps_initial_value() {
        let meter = Meter::new(250.0, 100.0, 1.0, 1.0, 0.2);
        assert_relative_eq!(meter.percentage(), 1.0);
    }

    #[rstest]
    fn negative_dt_is_ignored() {
        let mut meter = Meter::new(50.0, 100.0, 30.0, 30.0, 0.2);
        meter.tick(-1.0, MeterIntent::Regen);
        assert_relative_eq!(meter.current(), 50.0);
    }

    #[rstest]
    fn run_permission_lost_only_when_empty(mut stamina: StaminaMeter) {
        stamina.tick(1.0, true);
        assert!(stamina.can_sustain_run());
        stamina.tick(0.9, true);
        assert!(stamina.can_sustain_run(), "still 5 stamina left");
        stamina.tick(0.2, true);
        assert!(!stamina.can_sustain_run());
    }

    #[rstest]
    fn run_permission_restored_strictly_above_threshold(mut stamina: StaminaMeter) {
        stamina.tick(2.0, true);
        assert!(!stamina.can_sustain_run());
        stamina.tick(2.0, false);
        assert_relative_eq!(stamina.meter().current(), 20.0);
        assert!(!stamina.can_sustain_run(), "exactly at threshold stays refused");
        stamina.tick(0.1, false);
        assert!(stamina.can_sustain_run());
    }

    #[rstest]
    fn fear_bumps_stack(mut fear: FearMeter) {
        fear.apply(FearEvent::new(10.0, FearSource::Whisper));
        fear.apply(FearEvent::new(10.0, FearSource::Whisper));
        assert_relative_eq!(fear.meter().current(), 20.0);
    }

    #[rstest]
    fn fear_bumps_clamp_at_max(mut fear: FearMeter) {
        for _ in 0..8 {
            fear.apply(FearEvent::new(20.0, FearSource::Scare));
        }
        assert_relative_eq!(fear.level(), 1.0);
    }

    #[rstest]
    fn fear_decays_passively(mut fear: FearMeter) {
        fear.apply(FearEvent::new(10.0, FearSource::Scare));
        fear.tick(1.0);
        assert_relative_eq!(fear.meter().current(), 5.0);
        fear.tick(5.0);
        assert_relative_eq!(fear.meter().current(), 0.0);
    }

    #[rstest]
    fn negative_bump_does_not_lower_fear(mut fear: FearMeter) {
        fear.apply(FearEvent::new(30.0, FearSource::Scare));
        fear.apply(FearEvent::new(-10.0, FearSource::Ambient));
        assert_relative_eq!(fear.meter().current(), 30.0);
    }
}
