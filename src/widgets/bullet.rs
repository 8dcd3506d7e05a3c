use serde::Deserialize;

use crate::api::{Widget, WidgetConfig};
use crate::error::{MountError, MountResult};
use crate::host::Container;
use crate::render::{LinePrimitive, RectPrimitive, TextHAlign};

use super::{MARGIN_PX, PlotArea, TEXT_COLOR, base_frame, color_at, ensure_finite, label, parse_data, present};

const ROW_LABEL_WIDTH_PX: f64 = 96.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct BulletRow {
    title: String,
    ranges: Vec<f64>,
    #[serde(default)]
    measures: Vec<f64>,
    #[serde(default)]
    markers: Vec<f64>,
}

/// Horizontal bullet rows: shaded qualitative ranges, measure bar, marker ticks.
pub fn create_bullet(container: &mut dyn Container, config: &WidgetConfig) -> MountResult<Box<dyn Widget>> {
    let rows: Vec<BulletRow> = parse_data(config)?;
    if rows.is_empty() {
        return Err(MountError::InvalidData("bullet chart needs at least one row".to_owned()));
    }

    let plot = PlotArea::for_size(config.size);
    let row_height = plot.height / rows.len() as f64;
    let scale_left = plot.left + ROW_LABEL_WIDTH_PX;
    let scale_width = (plot.width - ROW_LABEL_WIDTH_PX).max(1.0);
    let base = color_at(config, 0);

    let mut frame = base_frame(config);
    for (row_index, row) in rows.iter().enumerate() {
        let all = row.ranges.iter().chain(&row.measures).chain(&row.markers).copied();
        ensure_finite(all.clone(), "bullet values")?;
        let max = all.fold(0.0_f64, f64::max).max(f64::EPSILON);
        let x_at = |value: f64| scale_left + scale_width * value.max(0.0) / max;
        let top = plot.top + row_height * row_index as f64;
        let band = (row_height - MARGIN_PX).max(2.0);

        let mut ranges = row.ranges.clone();
        ranges.sort_by(|a, b| b.total_cmp(a));
        let count = ranges.len().max(1) as f64;
        for (shade, range) in ranges.iter().enumerate() {
            frame = frame.with_rect(RectPrimitive::new(
                scale_left,
                top,
                x_at(*range) - scale_left,
                band,
                base.lighten(0.45 + 0.45 * (count - 1.0 - shade as f64) / count),
            ));
        }
        for measure in &row.measures {
            frame = frame.with_rect(RectPrimitive::new(
                scale_left,
                top + band / 3.0,
                x_at(*measure) - scale_left,
                band / 3.0,
                base,
            ));
        }
        for marker in &row.markers {
            let x = x_at(*marker);
            frame = frame.with_line(LinePrimitive::new(x, top + band * 0.15, x, top + band * 0.85, 2.0, TEXT_COLOR));
        }
        if let Some(text) = label(&row.title, plot.left, top + band / 2.0, TextHAlign::Left) {
            frame = frame.with_text(text);
        }
    }

    present(container, config, frame)
}
