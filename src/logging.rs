//! Logger bootstrap for the demo binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, all debug messages are printed, including the
/// per-transition locomotion and feedback logs. Otherwise only info level and
/// above are shown. `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // A second initialisation is ignored so tests can call `init` freely.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
