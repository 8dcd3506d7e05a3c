//! Built-in demo widget kit.
//!
//! Stands in for the external charting library: each factory reads its series
//! from `WidgetConfig::data`, lays out a `RenderFrame` at the configured size
//! and presents it to the container.

mod bar;
mod bullet;
mod line;
mod map;
mod pie;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use smallvec::smallvec;

use crate::api::{ChartVariant, VariantDefaults, Widget, WidgetConfig};
use crate::core::{ChartId, ClampBounds, Color, MapRegion, SizeObservation, SizePolicy};
use crate::error::{MountError, MountResult};
use crate::host::Container;
use crate::render::{RenderFrame, TextHAlign, TextPrimitive};

pub use bar::create_bar;
pub use bullet::create_bullet;
pub use line::create_line;
pub use map::{create_map, region_areas};
pub use pie::create_pie;

const TITLE_FONT_PX: f64 = 14.0;
const LABEL_FONT_PX: f64 = 11.0;
const MARGIN_PX: f64 = 12.0;
const TEXT_COLOR: Color = Color::rgb(0.25, 0.25, 0.28);
const FALLBACK_PALETTE: [Color; 4] = [
    Color::rgb(0.098, 0.463, 0.824),
    Color::rgb(0.376, 0.647, 0.980),
    Color::rgb(0.937, 0.424, 0.000),
    Color::rgb(0.180, 0.490, 0.196),
];

/// `{ title, data: [{ label, value }] }` series shape shared by bar, line and pie.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesGroup {
    pub title: String,
    pub data: Vec<LabeledValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// Handle returned by every kit factory.
#[derive(Debug, Clone, PartialEq)]
pub struct KitWidget {
    chart_id: ChartId,
    size: SizeObservation,
    primitive_count: usize,
}

impl KitWidget {
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }
}

impl Widget for KitWidget {
    fn chart_id(&self) -> &ChartId {
        &self.chart_id
    }

    fn size(&self) -> SizeObservation {
        self.size
    }

    fn validate(&self) -> MountResult<()> {
        if self.primitive_count == 0 {
            return Err(MountError::WidgetConstruction {
                chart_id: self.chart_id.to_string(),
                reason: "widget rendered nothing".to_owned(),
            });
        }
        Ok(())
    }
}

/// Plot rectangle left after reserving the title row and margins.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn for_size(size: SizeObservation) -> Self {
        let top = MARGIN_PX + TITLE_FONT_PX + MARGIN_PX;
        Self {
            left: MARGIN_PX,
            top,
            width: (f64::from(size.width) - 2.0 * MARGIN_PX).max(1.0),
            height: (f64::from(size.height) - top - MARGIN_PX - LABEL_FONT_PX).max(1.0),
        }
    }

    fn bottom(self) -> f64 {
        self.top + self.height
    }
}

fn parse_data<T: DeserializeOwned>(config: &WidgetConfig) -> MountResult<T> {
    serde_json::from_value(config.data.clone()).map_err(|err| {
        MountError::InvalidData(format!("`{}` data has unexpected shape: {err}", config.chart_id))
    })
}

fn ensure_finite(values: impl IntoIterator<Item = f64>, what: &str) -> MountResult<()> {
    if values.into_iter().all(f64::is_finite) {
        Ok(())
    } else {
        Err(MountError::InvalidData(format!("{what} must be finite")))
    }
}

fn color_at(config: &WidgetConfig, index: usize) -> Color {
    if config.colors.is_empty() {
        FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()]
    } else {
        config.colors[index % config.colors.len()]
    }
}

fn base_frame(config: &WidgetConfig) -> RenderFrame {
    let frame = RenderFrame::new(config.size);
    if config.title.is_empty() {
        return frame;
    }
    frame.with_text(TextPrimitive::new(
        config.title.clone(),
        MARGIN_PX,
        MARGIN_PX + TITLE_FONT_PX,
        TITLE_FONT_PX,
        TEXT_COLOR,
        TextHAlign::Left,
    ))
}

fn label(text: &str, x: f64, y: f64, h_align: TextHAlign) -> Option<TextPrimitive> {
    (!text.is_empty()).then(|| TextPrimitive::new(text, x, y, LABEL_FONT_PX, TEXT_COLOR, h_align))
}

fn present(
    container: &mut dyn Container,
    config: &WidgetConfig,
    frame: RenderFrame,
) -> MountResult<Box<dyn Widget>> {
    frame.validate()?;
    let primitive_count = frame.primitive_count();
    container.present(frame);
    Ok(Box::new(KitWidget {
        chart_id: config.chart_id.clone(),
        size: config.size,
        primitive_count,
    }))
}

fn options(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect()
}

fn hex(input: &str) -> Color {
    Color::from_hex(input).unwrap_or(FALLBACK_PALETTE[0])
}

fn responsive(min_width: u32, max_width: u32, min_height: u32, max_height: u32) -> ClampBounds {
    ClampBounds {
        min_width,
        max_width,
        min_height,
        max_height,
    }
}

/// Variants shown on the demo page, in display order.
#[must_use]
pub fn builtin_variants() -> Vec<ChartVariant> {
    vec![
        ChartVariant::widget(
            ChartId::BAR,
            SizePolicy::Responsive {
                bounds: responsive(300, 700, 200, 320),
                height_from_width: None,
            },
            create_bar,
        )
        .with_defaults(VariantDefaults {
            data: json!([
                { "title": "Series 1", "data": [{ "label": "A", "value": 30 }, { "label": "B", "value": 55 }] }
            ]),
            colors: smallvec![hex("#1976d2")],
            region: None,
            options: options(&[("responsive", Value::Bool(true))]),
        }),
        ChartVariant::widget(
            ChartId::LINE,
            SizePolicy::Fixed {
                width: 720,
                height: 320,
            },
            create_line,
        )
        .with_defaults(VariantDefaults {
            data: json!([
                { "title": "Jan", "data": [{ "label": "A", "value": 30 }, { "label": "B", "value": 50 }] },
                { "title": "Feb", "data": [{ "label": "A", "value": 40 }, { "label": "B", "value": 60 }] }
            ]),
            colors: smallvec![hex("#1976d2"), hex("#60a5fa")],
            region: None,
            options: options(&[("responsive", Value::Bool(true))]),
        }),
        ChartVariant::widget(
            ChartId::PIE,
            SizePolicy::Fixed {
                width: 320,
                height: 320,
            },
            create_pie,
        )
        .with_defaults(VariantDefaults {
            data: json!([
                { "title": "Series 1", "data": [{ "label": "A", "value": 30 }, { "label": "B", "value": 70 }] }
            ]),
            colors: smallvec![],
            region: None,
            options: options(&[("tooltipVisible", Value::Bool(true))]),
        }),
        ChartVariant::widget(
            ChartId::WORLD,
            SizePolicy::Responsive {
                bounds: responsive(320, 900, 240, 600),
                height_from_width: Some(0.6),
            },
            create_map,
        )
        .with_defaults(VariantDefaults {
            data: Value::Null,
            colors: smallvec![hex("#d8e6ff")],
            region: Some(MapRegion::Uk),
            options: options(&[("responsive", Value::Bool(true))]),
        }),
        ChartVariant::widget(
            ChartId::BULLET,
            SizePolicy::Fixed {
                width: 800,
                height: 240,
            },
            create_bullet,
        )
        .with_defaults(VariantDefaults {
            data: json!([
                { "title": "Revenue", "ranges": [100, 200, 300], "measures": [220], "markers": [250] }
            ]),
            colors: smallvec![],
            region: None,
            options: Map::new(),
        }),
        ChartVariant::preview(ChartId::GET_STARTED, "chart.preview"),
    ]
}
