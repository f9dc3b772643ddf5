use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger from `RUST_LOG`.
///
/// Without `RUST_LOG`, `verbose` selects debug output; otherwise only info
/// and above are shown.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // A logger may already be set, e.g. by an earlier test.
    let _ = builder.try_init();
}
