//! Property tests for the stamina and fear meters.

use dread::config::{FearConfig, StaminaConfig};
use dread::{FearEvent, FearMeter, FearSource, Meter, MeterIntent, StaminaMeter};
use proptest::prelude::*;

fn intent() -> impl Strategy<Value = MeterIntent> {
    prop_oneof![
        Just(MeterIntent::Drain),
        Just(MeterIntent::Regen),
        Just(MeterIntent::Hold),
    ]
}

proptest! {
    #[test]
    fn meter_stays_within_bounds(
        start in 0.0_f32..=100.0,
        steps in prop::collection::vec((0.0_f32..2.0, intent(), -50.0_f32..50.0), 1..200),
    ) {
        let mut meter = Meter::new(start, 100.0, 10.0, 20.0, 0.2);
        for (dt, intent, bump) in steps {
            meter.tick(dt, intent);
            meter.add(bump);
            prop_assert!((0.0..=meter.max()).contains(&meter.current()));
            prop_assert!((0.0..=1.0).contains(&meter.percentage()));
        }
    }

    #[test]
    fn run_permission_flips_only_at_the_band_edges(
        steps in prop::collection::vec((0.01_f32..0.5, any::<bool>()), 1..400),
    ) {
        let config = StaminaConfig::default();
        let mut stamina = StaminaMeter::new(&config);
        for (dt, running) in steps {
            let before = stamina.can_sustain_run();
            stamina.tick(dt, running);
            let after = stamina.can_sustain_run();
            let current = stamina.meter().current();
            if before && !after {
                prop_assert!(running && current <= 0.0);
            }
            if !before && after {
                prop_assert!(current > config.min_run_threshold);
            }
        }
    }

    #[test]
    fn fear_bumps_stack_until_saturation(
        bumps in prop::collection::vec(0.0_f32..30.0, 1..20),
    ) {
        let mut fear = FearMeter::new(&FearConfig::default());
        let mut expected = 0.0_f32;
        for bump in bumps {
            fear.apply(FearEvent::new(bump, FearSource::Scare));
            expected = (expected + bump).min(100.0);
            prop_assert!((fear.meter().current() - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn fear_never_rises_without_events(
        start in 0.0_f32..=100.0,
        dts in prop::collection::vec(0.0_f32..1.0, 1..100),
    ) {
        let mut fear = FearMeter::new(&FearConfig::default());
        fear.apply(FearEvent::new(start, FearSource::Ambient));
        let mut last = fear.meter().current();
        for dt in dts {
            fear.tick(dt);
            let now = fear.meter().current();
            prop_assert!(now <= last);
            last = now;
        }
    }
}

#[test]
fn two_ten_unit_bumps_add_twenty() {
    let mut fear = FearMeter::new(&FearConfig::default());
    fear.apply(FearEvent::new(10.0, FearSource::Whisper));
    fear.apply(FearEvent::new(10.0, FearSource::Whisper));
    approx::assert_relative_eq!(fear.meter().current(), 20.0);
}
