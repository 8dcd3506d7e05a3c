//! Opt-in `tracing` setup for hosts that embed chart widgets.
//!
//! Mount, recreate and unmount transitions are logged under `chart_mount::*`
//! targets. Construction failures additionally go to the configured
//! [`crate::api::FailureSink`], whether or not a subscriber is installed.

/// Filter used when `RUST_LOG` is unset or unparsable.
#[cfg(feature = "telemetry")]
const DEFAULT_FILTER: &str = "info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// `false` means nothing was installed: either the `telemetry` feature is off
/// or the host already owns the global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
