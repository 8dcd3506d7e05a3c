use serde::{Deserialize, Serialize};

use crate::api::SizeNotifier;
use crate::core::RawSize;
use crate::render::RenderFrame;

/// Handle identifying one resize subscription on a host object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverToken(pub u64);

/// Visual region a widget renders into.
///
/// The host owns the container; the lifecycle manager only borrows it.
/// Clearing must fully release whatever a widget rendered, since widgets
/// expose no dispose primitive of their own.
pub trait Container {
    /// Current rendered size, unrounded and unclamped.
    fn measure(&self) -> RawSize;

    /// Removes every child, frame and placeholder.
    fn clear(&mut self);

    /// Displays a widget's output.
    fn present(&mut self, frame: RenderFrame);

    /// Displays inert text in place of a widget.
    fn show_placeholder(&mut self, text: &str);

    /// Starts native size observation, posting `SizeSignal::Measured` to `notifier`.
    ///
    /// Returns `None` when the host cannot observe this container directly;
    /// callers then fall back to window-level resize events.
    fn observe_resize(&mut self, notifier: SizeNotifier) -> Option<ObserverToken> {
        let _ = notifier;
        None
    }

    fn unobserve_resize(&mut self, token: ObserverToken) {
        let _ = token;
    }
}

/// Window-level resize events, used when a container cannot be observed directly.
pub trait WindowEvents {
    fn add_resize_listener(&mut self, notifier: SizeNotifier) -> ObserverToken;
    fn remove_resize_listener(&mut self, token: ObserverToken);
}
