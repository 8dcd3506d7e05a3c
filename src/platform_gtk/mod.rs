//! GTK4 host adapter.
//!
//! `GtkContainer` wraps a `gtk::DrawingArea`: presented frames are painted in
//! the area's draw function and the area's `resize` signal feeds the size
//! tracker. `GtkWindowEvents` provides the window-level fallback.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk::cairo::Context;
use gtk::glib::SignalHandlerId;
use gtk::prelude::*;
use indexmap::IndexMap;
use tracing::warn;

use crate::api::{SizeNotifier, SizeSignal};
use crate::core::{Color, RawSize};
use crate::host::{Container, ObserverToken, WindowEvents};
use crate::render::{RenderFrame, TextHAlign};

const PLACEHOLDER_FONT_PX: f64 = 14.0;
const PLACEHOLDER_COLOR: Color = Color::rgb(0.45, 0.45, 0.45);

#[derive(Debug, Default)]
enum Surface {
    #[default]
    Empty,
    Placeholder(String),
    Frame(RenderFrame),
}

pub struct GtkContainer {
    area: gtk::DrawingArea,
    surface: Rc<RefCell<Surface>>,
    handlers: IndexMap<ObserverToken, SignalHandlerId>,
    next_token: u64,
}

impl GtkContainer {
    #[must_use]
    pub fn new(area: gtk::DrawingArea) -> Self {
        let surface = Rc::new(RefCell::new(Surface::Empty));
        let draw_surface = Rc::clone(&surface);
        area.set_draw_func(move |_, context, width, height| {
            if let Err(err) = draw(context, &draw_surface.borrow(), width, height) {
                warn!(error = %err, "chart surface draw failed");
            }
        });
        Self {
            area,
            surface,
            handlers: IndexMap::new(),
            next_token: 0,
        }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    fn replace_surface(&mut self, surface: Surface) {
        *self.surface.borrow_mut() = surface;
        self.area.queue_draw();
    }
}

impl Container for GtkContainer {
    fn measure(&self) -> RawSize {
        RawSize::new(f64::from(self.area.width()), f64::from(self.area.height()))
    }

    fn clear(&mut self) {
        self.replace_surface(Surface::Empty);
    }

    fn present(&mut self, frame: RenderFrame) {
        self.replace_surface(Surface::Frame(frame));
    }

    fn show_placeholder(&mut self, text: &str) {
        self.replace_surface(Surface::Placeholder(text.to_owned()));
    }

    fn observe_resize(&mut self, notifier: SizeNotifier) -> Option<ObserverToken> {
        let handler = self.area.connect_resize(move |_, width, height| {
            notifier.notify(SizeSignal::Measured(RawSize::new(
                f64::from(width),
                f64::from(height),
            )));
        });
        let token = ObserverToken(self.next_token);
        self.next_token += 1;
        self.handlers.insert(token, handler);
        Some(token)
    }

    fn unobserve_resize(&mut self, token: ObserverToken) {
        if let Some(handler) = self.handlers.shift_remove(&token) {
            self.area.disconnect(handler);
        }
    }
}

impl Drop for GtkContainer {
    fn drop(&mut self) {
        for (_, handler) in self.handlers.drain(..) {
            self.area.disconnect(handler);
        }
    }
}

/// Window resize fallback driven by the window's default size properties.
pub struct GtkWindowEvents {
    window: gtk::Window,
    handlers: IndexMap<ObserverToken, [SignalHandlerId; 2]>,
    next_token: u64,
}

impl GtkWindowEvents {
    #[must_use]
    pub fn new(window: gtk::Window) -> Self {
        Self {
            window,
            handlers: IndexMap::new(),
            next_token: 0,
        }
    }
}

impl WindowEvents for GtkWindowEvents {
    fn add_resize_listener(&mut self, notifier: SizeNotifier) -> ObserverToken {
        let width_notifier = notifier.clone();
        let width = self.window.connect_default_width_notify(move |_| {
            width_notifier.notify(SizeSignal::WindowResized);
        });
        let height = self.window.connect_default_height_notify(move |_| {
            notifier.notify(SizeSignal::WindowResized);
        });
        let token = ObserverToken(self.next_token);
        self.next_token += 1;
        self.handlers.insert(token, [width, height]);
        token
    }

    fn remove_resize_listener(&mut self, token: ObserverToken) {
        if let Some(handlers) = self.handlers.shift_remove(&token) {
            for handler in handlers {
                self.window.disconnect(handler);
            }
        }
    }
}

fn draw(
    context: &Context,
    surface: &Surface,
    width: i32,
    height: i32,
) -> Result<(), gtk::cairo::Error> {
    match surface {
        Surface::Empty => Ok(()),
        Surface::Placeholder(text) => {
            apply_color(context, PLACEHOLDER_COLOR);
            context.set_font_size(PLACEHOLDER_FONT_PX);
            let extents = context.text_extents(text)?;
            context.move_to(
                (f64::from(width) - extents.width()) / 2.0,
                f64::from(height) / 2.0,
            );
            context.show_text(text)
        }
        Surface::Frame(frame) => {
            for rect in &frame.rects {
                apply_color(context, rect.fill);
                context.rectangle(rect.x, rect.y, rect.width, rect.height);
                context.fill()?;
            }
            for line in &frame.lines {
                apply_color(context, line.color);
                context.set_line_width(line.stroke_width);
                context.move_to(line.x1, line.y1);
                context.line_to(line.x2, line.y2);
                context.stroke()?;
            }
            for text in &frame.texts {
                apply_color(context, text.color);
                context.set_font_size(text.font_size_px);
                let text_width = context.text_extents(&text.text)?.width();
                let x = match text.h_align {
                    TextHAlign::Left => text.x,
                    TextHAlign::Center => text.x - text_width / 2.0,
                    TextHAlign::Right => text.x - text_width,
                };
                context.move_to(x, text.y);
                context.show_text(&text.text)?;
            }
            Ok(())
        }
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}
