//! Backend-agnostic drawing output produced by widgets.
//!
//! Widgets never draw directly; they materialize a `RenderFrame` and hand it to
//! the container, which owns the actual surface.

mod frame;
mod primitives;

pub use frame::RenderFrame;
pub use primitives::{LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

pub use crate::core::Color;
