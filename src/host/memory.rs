use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use indexmap::IndexMap;

use crate::api::{SizeNotifier, SizeSignal};
use crate::core::RawSize;
use crate::render::RenderFrame;

use super::{Container, ObserverToken, WindowEvents};

/// What a [`MemoryContainer`] currently displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContainerContent {
    #[default]
    Empty,
    Placeholder(String),
    Widget(RenderFrame),
}

#[derive(Debug, Default)]
struct ContainerState {
    size: RawSize,
    native_observation: bool,
    content: ContainerContent,
    observers: IndexMap<ObserverToken, SizeNotifier>,
    next_token: u64,
    clear_count: usize,
    present_count: usize,
    overlap_count: usize,
}

/// Headless container handle that records everything written to it.
///
/// Clones share one region, the way UI element references do, so a host can
/// resize the container while a manager borrows another handle to it.
/// Presenting a frame over an existing one is counted as an overlap.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    state: Rc<RefCell<ContainerState>>,
}

impl MemoryContainer {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContainerState {
                size: RawSize::new(width, height),
                native_observation: true,
                ..ContainerState::default()
            })),
        }
    }

    /// Container whose host offers no native size observation.
    #[must_use]
    pub fn without_native_observation(self) -> Self {
        self.state.borrow_mut().native_observation = false;
        self
    }

    #[must_use]
    pub fn content(&self) -> ContainerContent {
        self.state.borrow().content.clone()
    }

    #[must_use]
    pub fn frame(&self) -> Option<RenderFrame> {
        match &self.state.borrow().content {
            ContainerContent::Widget(frame) => Some(frame.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<String> {
        match &self.state.borrow().content {
            ContainerContent::Placeholder(text) => Some(text.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().content == ContainerContent::Empty
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.state.borrow().clear_count
    }

    #[must_use]
    pub fn present_count(&self) -> usize {
        self.state.borrow().present_count
    }

    #[must_use]
    pub fn overlap_count(&self) -> usize {
        self.state.borrow().overlap_count
    }

    /// Changes the size without notifying observers.
    pub fn set_size(&self, width: f64, height: f64) {
        self.state.borrow_mut().size = RawSize::new(width, height);
    }

    /// Changes the size and notifies native observers. Returns delivered notifications.
    pub fn resize_at(&self, width: f64, height: f64, at: Instant) -> usize {
        self.set_size(width, height);
        let state = self.state.borrow();
        let signal = SizeSignal::Measured(state.size);
        state
            .observers
            .values()
            .filter(|notifier| notifier.notify_at(signal, at))
            .count()
    }
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Container for MemoryContainer {
    fn measure(&self) -> RawSize {
        self.state.borrow().size
    }

    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        state.clear_count += 1;
        state.content = ContainerContent::Empty;
    }

    fn present(&mut self, frame: RenderFrame) {
        let mut state = self.state.borrow_mut();
        if matches!(state.content, ContainerContent::Widget(_)) {
            state.overlap_count += 1;
        }
        state.present_count += 1;
        state.content = ContainerContent::Widget(frame);
    }

    fn show_placeholder(&mut self, text: &str) {
        self.state.borrow_mut().content = ContainerContent::Placeholder(text.to_owned());
    }

    fn observe_resize(&mut self, notifier: SizeNotifier) -> Option<ObserverToken> {
        let mut state = self.state.borrow_mut();
        if !state.native_observation {
            return None;
        }
        let token = ObserverToken(state.next_token);
        state.next_token += 1;
        state.observers.insert(token, notifier);
        Some(token)
    }

    fn unobserve_resize(&mut self, token: ObserverToken) {
        self.state.borrow_mut().observers.shift_remove(&token);
    }
}

#[derive(Debug, Default)]
struct WindowState {
    listeners: IndexMap<ObserverToken, SizeNotifier>,
    next_token: u64,
}

/// Headless window handle that fans resize events out to listeners.
#[derive(Debug, Clone, Default)]
pub struct MemoryWindow {
    state: Rc<RefCell<WindowState>>,
}

impl MemoryWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Fires a window resize. Returns delivered notifications.
    pub fn fire_resize_at(&self, at: Instant) -> usize {
        self.state
            .borrow()
            .listeners
            .values()
            .filter(|notifier| notifier.notify_at(SizeSignal::WindowResized, at))
            .count()
    }
}

impl WindowEvents for MemoryWindow {
    fn add_resize_listener(&mut self, notifier: SizeNotifier) -> ObserverToken {
        let mut state = self.state.borrow_mut();
        let token = ObserverToken(state.next_token);
        state.next_token += 1;
        state.listeners.insert(token, notifier);
        token
    }

    fn remove_resize_listener(&mut self, token: ObserverToken) {
        self.state.borrow_mut().listeners.shift_remove(&token);
    }
}
