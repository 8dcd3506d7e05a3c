//! Chart mount lifecycle: registry lookup, size tracking, guarded widget
//! construction and the manager tying them to a host container.

mod config;
mod debounce;
mod failure_guard;
mod lifecycle;
mod registry;
mod size_tracker;

pub use config::{LifecycleConfig, ObservationPreference, RegistryOverrides};
pub use debounce::Debouncer;
pub use failure_guard::{
    FailureEvent, FailureGuard, FailureSink, MemoryFailureSink, TracingFailureSink,
};
pub use lifecycle::{LifecycleState, MountOutcome, PlaceholderReason, WidgetLifecycleManager};
pub use registry::{
    ChartTypeRegistry, ChartVariant, VariantDefaults, VariantKind, Widget, WidgetConfig,
    WidgetFactory,
};
pub use size_tracker::{ObservationSource, SizeNotifier, SizeSignal, SizeTracker};
