//! Installs a `tracing` subscriber at load time when the `setup_tracing` feature is enabled and
//! `DEBUG_PLANEIDX` is set to something other than `0`, `false`, or empty. Without the feature,
//! this module compiles to nothing: callers who want their own subscriber are never fought over
//! the global dispatcher.

#[cfg(feature = "setup_tracing")]
mod install {
    use ctor::ctor;
    use tracing::Level;

    #[ctor]
    fn set_debug_level() {
        let enabled = std::env::var("DEBUG_PLANEIDX")
            .map(|v| !(v == "0" || v == "false" || v.is_empty()))
            .unwrap_or(false);
        if enabled {
            tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
        }
    }
}
