//! Logger setup for binaries built on the engine

/// Initialize the logging system
///
/// `RUST_LOG` wins over `default_filter`. Calling this twice is harmless; the
/// second call leaves the first logger in place.
pub fn init(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("Logger already initialized");
    }
}
