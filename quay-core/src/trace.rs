//! Tracing hooks for debugging queue lifecycles.
//!
//! Enable with `--features tracing`. All trace macros become no-ops when
//! the feature is disabled, so the hot paths carry no logging cost.

/// Initialize the tracing subscriber.
///
/// Call this at the start of a test or benchmark to see queue events.
/// The filter defaults to `quay=trace` and can be overridden with `RUST_LOG`.
/// Does nothing if the `tracing` feature is not enabled.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quay_core=trace,quay_crossbeam=trace"));

    // Tests call this repeatedly; only the first subscriber wins.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, error, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! error_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use error_noop as error;
#[cfg(not(feature = "tracing"))]
pub(crate) use trace_noop as trace;
