use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::error;

use crate::core::ChartId;
use crate::error::MountError;
use crate::host::Container;

use super::{Widget, WidgetConfig, WidgetFactory};

/// Emitted once per failed widget construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEvent {
    pub chart_id: ChartId,
    pub error: String,
}

/// Receives construction failures. No other telemetry flows through it.
pub trait FailureSink: Send + Sync {
    fn report(&self, event: &FailureEvent);
}

/// Default sink: logs failures with `tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureSink;

impl FailureSink for TracingFailureSink {
    fn report(&self, event: &FailureEvent) {
        error!(chart_id = %event.chart_id, error = %event.error, "chart mount error");
    }
}

/// Sink that keeps every event, for tests and diagnostics panels.
#[derive(Debug, Clone, Default)]
pub struct MemoryFailureSink {
    events: Arc<Mutex<Vec<FailureEvent>>>,
}

impl MemoryFailureSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<FailureEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureSink for MemoryFailureSink {
    fn report(&self, event: &FailureEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Protected widget construction.
///
/// Factory errors, panics and invalid handles never escape: the container is
/// cleared down to a title placeholder and the failure goes to the sink.
#[derive(Clone)]
pub struct FailureGuard {
    sink: Arc<dyn FailureSink>,
}

impl std::fmt::Debug for FailureGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureGuard").finish_non_exhaustive()
    }
}

impl Default for FailureGuard {
    fn default() -> Self {
        Self::new(Arc::new(TracingFailureSink))
    }
}

impl FailureGuard {
    #[must_use]
    pub fn new(sink: Arc<dyn FailureSink>) -> Self {
        Self { sink }
    }

    pub fn safe_create(
        &self,
        factory: &dyn WidgetFactory,
        container: &mut dyn Container,
        config: &WidgetConfig,
    ) -> Result<Box<dyn Widget>, FailureEvent> {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| factory.create(container, config)));

        let outcome = match attempt {
            Ok(Ok(widget)) => check_handle(widget, config),
            Ok(Err(err)) => Err(err),
            Err(payload) => Err(MountError::WidgetConstruction {
                chart_id: config.chart_id.to_string(),
                reason: format!("factory panicked: {}", panic_message(payload.as_ref())),
            }),
        };

        outcome.map_err(|err| {
            container.clear();
            container.show_placeholder(&config.title);
            let event = FailureEvent {
                chart_id: config.chart_id.clone(),
                error: err.to_string(),
            };
            self.sink.report(&event);
            event
        })
    }
}

fn check_handle(widget: Box<dyn Widget>, config: &WidgetConfig) -> Result<Box<dyn Widget>, MountError> {
    if widget.chart_id() != &config.chart_id {
        return Err(MountError::WidgetConstruction {
            chart_id: config.chart_id.to_string(),
            reason: format!("factory returned a `{}` widget", widget.chart_id()),
        });
    }
    if !widget.size().is_valid() {
        let size = widget.size();
        return Err(MountError::InvalidSize {
            width: size.width,
            height: size.height,
        });
    }
    widget.validate()?;
    Ok(widget)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MapRegion, SizeObservation};
    use crate::host::MemoryContainer;
    use serde_json::{Map, Value};
    use smallvec::SmallVec;

    fn config() -> WidgetConfig {
        WidgetConfig {
            chart_id: ChartId::BAR,
            title: "Revenue".to_owned(),
            size: SizeObservation::new(500, 250),
            data: Value::Null,
            colors: SmallVec::new(),
            region: None::<MapRegion>,
            responsive: true,
            options: Map::new(),
        }
    }

    fn panicking(_: &mut dyn Container, _: &WidgetConfig) -> crate::error::MountResult<Box<dyn Widget>> {
        panic!("library exploded")
    }

    #[test]
    fn panicking_factory_is_contained() {
        let sink = MemoryFailureSink::new();
        let guard = FailureGuard::new(Arc::new(sink.clone()));
        let mut container = MemoryContainer::new(500.0, 250.0);

        let event = guard
            .safe_create(&panicking, &mut container, &config())
            .err()
            .expect("failure event");

        assert!(event.error.contains("library exploded"));
        assert_eq!(container.placeholder().as_deref(), Some("Revenue"));
        assert_eq!(sink.events(), vec![event]);
    }
}
