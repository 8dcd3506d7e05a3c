use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::core::{RawSize, SizeHint, SizeObservation, SizePolicy};
use crate::host::{Container, ObserverToken, WindowEvents};

use super::{Debouncer, ObservationPreference};

/// Raw notification posted by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSignal {
    /// Native container observation with the container's new size.
    Measured(RawSize),
    /// Window-level fallback; the container must be re-measured.
    WindowResized,
}

#[derive(Debug, Clone, Copy)]
struct StampedSignal {
    signal: SizeSignal,
    at: Instant,
}

/// Host-side sending half of a size subscription.
///
/// Sends after the tracker detached are dropped silently.
#[derive(Debug, Clone)]
pub struct SizeNotifier {
    tx: Sender<StampedSignal>,
}

impl SizeNotifier {
    /// Posts a signal stamped with the current time. Returns `false` once detached.
    pub fn notify(&self, signal: SizeSignal) -> bool {
        self.notify_at(signal, Instant::now())
    }

    pub fn notify_at(&self, signal: SizeSignal, at: Instant) -> bool {
        self.tx.send(StampedSignal { signal, at }).is_ok()
    }
}

/// Where size notifications are coming from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationSource {
    Container(ObserverToken),
    Window(ObserverToken),
    None,
}

/// Single consumer of size notifications for one container.
///
/// Measurements pass through the owning variant's `SizePolicy`, so native
/// observation and the window fallback clamp and debounce identically.
#[derive(Debug)]
pub struct SizeTracker {
    policy: SizePolicy,
    hint: SizeHint,
    debouncer: Debouncer<SizeSignal>,
    rx: Option<Receiver<StampedSignal>>,
    source: ObservationSource,
}

impl SizeTracker {
    #[must_use]
    pub fn new(policy: SizePolicy, hint: SizeHint, debounce: Duration) -> Self {
        Self {
            policy,
            hint,
            debouncer: Debouncer::new(debounce),
            rx: None,
            source: ObservationSource::None,
        }
    }

    #[must_use]
    pub fn policy(&self) -> SizePolicy {
        self.policy
    }

    #[must_use]
    pub fn source(&self) -> ObservationSource {
        self.source
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.source != ObservationSource::None
    }

    pub fn set_hint(&mut self, hint: SizeHint) {
        self.hint = hint;
    }

    /// Clamped size for the container's current measurement.
    #[must_use]
    pub fn measure<C: Container + ?Sized>(&self, container: &C) -> SizeObservation {
        self.resolve(container.measure())
    }

    fn resolve(&self, raw: RawSize) -> SizeObservation {
        self.policy.resolve(raw, self.hint)
    }

    /// Subscribes to size changes, preferring native container observation.
    ///
    /// Re-observing first detaches any previous subscription.
    pub fn observe<'w, C: Container + ?Sized>(
        &mut self,
        container: &mut C,
        window: Option<&mut (dyn WindowEvents + 'w)>,
        preference: ObservationPreference,
    ) -> ObservationSource {
        if self.is_observing() {
            debug!("size tracker re-observing; detaching previous subscription");
            self.detach_receiver();
        }
        if preference == ObservationPreference::Disabled {
            return self.source;
        }

        let (tx, rx) = mpsc::channel();
        let notifier = SizeNotifier { tx };

        let native = if preference == ObservationPreference::Auto {
            container.observe_resize(notifier.clone())
        } else {
            None
        };
        self.source = match (native, window) {
            (Some(token), _) => ObservationSource::Container(token),
            (None, Some(window)) => ObservationSource::Window(window.add_resize_listener(notifier)),
            (None, None) => ObservationSource::None,
        };
        if self.source != ObservationSource::None {
            self.rx = Some(rx);
        }
        debug!(source = ?self.source, "size tracker observing");
        self.source
    }

    /// Detaches from the host synchronously and discards pending notifications.
    pub fn unobserve<'w, C: Container + ?Sized>(
        &mut self,
        container: &mut C,
        window: Option<&mut (dyn WindowEvents + 'w)>,
    ) {
        match self.source {
            ObservationSource::Container(token) => container.unobserve_resize(token),
            ObservationSource::Window(token) => {
                if let Some(window) = window {
                    window.remove_resize_listener(token);
                }
            }
            ObservationSource::None => {}
        }
        self.detach_receiver();
    }

    fn detach_receiver(&mut self) {
        self.source = ObservationSource::None;
        self.rx = None;
        self.debouncer.cancel();
    }

    /// Drains the channel and returns the settled clamped size, if any.
    pub fn poll<C: Container + ?Sized>(
        &mut self,
        container: &C,
        now: Instant,
    ) -> Option<SizeObservation> {
        if let Some(rx) = &self.rx {
            loop {
                match rx.try_recv() {
                    Ok(stamped) => {
                        trace!(signal = ?stamped.signal, "size signal received");
                        self.debouncer.push(stamped.signal, stamped.at);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("size notifier disconnected by host");
                        break;
                    }
                }
            }
        }

        let settled = self.debouncer.poll(now)?;
        Some(match settled {
            SizeSignal::Measured(raw) => self.resolve(raw),
            SizeSignal::WindowResized => self.measure(container),
        })
    }

    /// Instant at which a pending burst settles.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }
}
