//! Boundary to the hosting UI.
//!
//! The lifecycle manager only ever talks to these traits. Headless in-memory
//! implementations are provided for tests, benches and server-side previews.

mod container;
mod i18n;
mod memory;

pub use container::{Container, ObserverToken, WindowEvents};
pub use i18n::{Catalog, Translator, interpolate};
pub use memory::{ContainerContent, MemoryContainer, MemoryWindow};
