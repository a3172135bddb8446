//! Headless demo: walks a character through a haunted corridor and logs
//! what it hears and sees.

use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use dread::demo::{corridor_host, fill_missing_clips, scripted_input, scripted_scare};
use dread::host::step_fixed;
use dread::{init_logging, CharacterConfig, CharacterHost, CharacterPlugin, LastTick, PlayerInput};
use log::info;

/// Headless walk through a haunted corridor
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Seed for every random choice the character makes
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Fixed tick rate in hertz
    #[arg(long, default_value_t = 60.0, value_parser = parse_hz)]
    hz: f64,
    /// TOML file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_hz(raw: &str) -> Result<f64, String> {
    let hz: f64 = raw.parse().map_err(|err| format!("{raw:?} is not a number: {err}"))?;
    if hz > 0.0 && hz.is_finite() {
        Ok(hz)
    } else {
        Err(format!("tick rate must be positive and finite, got {hz}"))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => CharacterConfig::load(path)
            .with_context(|| format!("loading character config from {}", path.display()))?,
        None => CharacterConfig::default(),
    };
    fill_missing_clips(&mut config);

    let mut app = App::new();
    app.add_plugins(CharacterPlugin { tick_hz: args.hz });
    app.insert_non_send_resource(corridor_host(config, args.seed));

    for tick in 0..args.ticks {
        app.world_mut().resource_mut::<PlayerInput>().0 = scripted_input(tick);
        if let Some(kind) = scripted_scare(tick) {
            app.world_mut()
                .non_send_resource_mut::<CharacterHost>()
                .play_scare(kind);
        }
        step_fixed(&mut app);
    }

    let ticks = app.world().resource::<LastTick>().ticks;
    if let Some(host) = app.world_mut().remove_non_send_resource::<CharacterHost>() {
        let character = &host.character;
        info!(
            "after {ticks} ticks: position {}, state {:?}, stamina {:.0}%, fear {:.0}%",
            character.position(),
            character.state(),
            character.stamina_percentage() * 100.0,
            character.fear_percentage() * 100.0,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0")]
    #[case("-30")]
    #[case("inf")]
    #[case("NaN")]
    #[case("fast")]
    fn rejects_unusable_tick_rates(#[case] hz: &str) {
        assert!(Args::try_parse_from(["dread", "--hz", hz]).is_err());
    }

    #[rstest]
    fn accepts_positive_tick_rate() {
        let args = Args::try_parse_from(["dread", "--hz", "30"]).expect("valid args");
        assert!((args.hz - 30.0).abs() < f64::EPSILON);
        assert_eq!(args.ticks, 600);
    }
}
