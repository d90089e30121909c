//! Logging setup

/// Initialize logging with a default filter (e.g. `"info"` or
/// `"scene_engine=debug"`); `RUST_LOG` still wins when set.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
