pub mod chart_spec;
pub mod color;
pub mod types;

pub use chart_spec::{ChartId, ChartSpec, ChartStyle, MapRegion};
pub use color::Color;
pub use types::{ClampBounds, RawSize, SizeHint, SizeObservation, SizePolicy};
