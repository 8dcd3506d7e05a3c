//! chart-mount: lifecycle management for chart widgets embedded in a host UI.
//!
//! Given a chart-type identifier and a host container, the crate builds the
//! matching widget, rebuilds it when the container's clamped size or the chart
//! spec changes, and tears it down without leaking instances. Widget failures
//! degrade to a title placeholder instead of reaching the host.

pub mod api;
pub mod core;
pub mod error;
pub mod host;
pub mod render;
pub mod telemetry;
pub mod widgets;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ChartTypeRegistry, FailureGuard, LifecycleConfig, WidgetLifecycleManager};
pub use crate::core::{ChartId, ChartSpec};
pub use error::{MountError, MountResult};
