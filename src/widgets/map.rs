use serde::Deserialize;

use crate::api::{Widget, WidgetConfig};
use crate::core::{Color, MapRegion};
use crate::error::{MountError, MountResult};
use crate::host::Container;
use crate::render::{RectPrimitive, TextHAlign};

use super::{PlotArea, base_frame, color_at, ensure_finite, label, parse_data, present};

const TILE_GAP_PX: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct AreaValue {
    name: String,
    value: f64,
}

/// Areas drawn for a region, in tile order.
#[must_use]
pub fn region_areas(region: MapRegion) -> &'static [&'static str] {
    match region {
        MapRegion::Tr => &["Istanbul", "Ankara", "Izmir", "Antalya", "Bursa", "Adana"],
        MapRegion::Eu => &[
            "France", "Germany", "Spain", "Italy", "Poland", "Netherlands", "Sweden", "Portugal",
        ],
        MapRegion::Uk => &["England", "Scotland", "Wales", "Northern Ireland"],
    }
}

/// Tile map: one tile per area, shaded by the area's share of the maximum value.
pub fn create_map(container: &mut dyn Container, config: &WidgetConfig) -> MountResult<Box<dyn Widget>> {
    let region = config.region.unwrap_or_default();
    let areas = region_areas(region);
    let values: Vec<AreaValue> = if config.data.is_null() {
        Vec::new()
    } else {
        parse_data(config)?
    };
    ensure_finite(values.iter().map(|area| area.value), "map values")?;
    if let Some(unknown) = values
        .iter()
        .find(|area| !areas.iter().any(|known| *known == area.name))
    {
        return Err(MountError::InvalidData(format!(
            "region `{}` has no area named `{}`",
            region.code(),
            unknown.name
        )));
    }
    let max = values
        .iter()
        .map(|area| area.value)
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);

    let plot = PlotArea::for_size(config.size);
    let columns = (areas.len() as f64).sqrt().ceil().max(1.0) as usize;
    let rows = areas.len().div_ceil(columns);
    let tile_width = plot.width / columns as f64;
    let tile_height = plot.height / rows as f64;
    let base = color_at(config, 0);

    let mut frame = base_frame(config);
    for (index, area) in areas.iter().enumerate() {
        let x = plot.left + tile_width * (index % columns) as f64;
        let y = plot.top + tile_height * (index / columns) as f64;
        let share = values
            .iter()
            .find(|value| value.name == *area)
            .map_or(0.0, |value| (value.value / max).clamp(0.0, 1.0));
        frame = frame.with_rect(RectPrimitive::new(
            x,
            y,
            (tile_width - TILE_GAP_PX).max(0.0),
            (tile_height - TILE_GAP_PX).max(0.0),
            darken_by_share(base, share),
        ));
        if let Some(text) = label(area, x + tile_width / 2.0, y + tile_height / 2.0, TextHAlign::Center) {
            frame = frame.with_text(text);
        }
    }

    present(container, config, frame)
}

fn darken_by_share(base: Color, share: f64) -> Color {
    let factor = 1.0 - 0.6 * share;
    Color::rgba(
        base.red * factor,
        base.green * factor,
        base.blue * factor,
        base.alpha,
    )
}
